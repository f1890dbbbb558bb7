//! Commands Layer
//!
//! Handlers the UI calls with raw strings. Errors come back as display
//! strings, ready to show in a dialog.

mod basket_cmd;
mod item_cmd;

pub use basket_cmd::*;
pub use item_cmd::*;
