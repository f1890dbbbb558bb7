//! Cenová Ponuka Basket Core
//!
//! Layered architecture:
//! - domain: Line entities, pricing rules and the error type
//! - basket: The ledger store with undo/redo, coefficient overrides and views
//! - repository: Basket documents on disk
//! - commands: Handlers turning raw UI input into ledger calls
//! - config: Ledger settings

use std::path::Path;

pub mod basket;
pub mod commands;
pub mod config;
pub mod domain;
pub mod repository;

pub use basket::{BasketStore, CoefficientOverrideOperations, HistoryOperations};
pub use config::LedgerConfig;
pub use domain::{DomainError, DomainResult};

/// Name of the log files written by [`init_logging`]
pub const APP_NAME: &str = "CenovaPonuka";

/// Send log output to rolling files in `log_dir`
pub fn init_logging(log_dir: impl AsRef<Path>) -> Result<(), String> {
    rolling_logger::init_logger(log_dir, APP_NAME)
}
