//! Terminal front end for the corrmap correlation engine
//!
//! Rendering is a pure function of [`corrmap::Dashboard`]; the binaries own
//! the event loop and the refresh task.
pub mod keys;
pub mod logging;
pub mod terminal;
pub mod ui;

pub use keys::{Action, action_for};
