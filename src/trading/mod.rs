pub mod engine;
pub mod report;

pub use engine::SignalDecisionEngine;
pub use report::SignalReport;
