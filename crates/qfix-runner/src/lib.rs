pub mod command;
pub mod config;
pub mod driver;
pub mod patcher;
pub mod strategic;
pub mod upgrade;

pub use config::Config;
pub use driver::{RunSummary, Runner};
