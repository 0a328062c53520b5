pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod scenario;
pub mod store;
#[cfg(test)]
pub mod test_helpers;
pub mod trading;
