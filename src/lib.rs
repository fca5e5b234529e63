// Library surface for headless/integration tests and reuse.
// The terminal front end in main.rs only wires these together.
pub mod app;
pub mod app_dirs;
pub mod catalog;
pub mod config;
pub mod controls;
pub mod error;
pub mod kv_store;
pub mod logging;
pub mod quiz;
pub mod runtime;
pub mod session;
pub mod speech;
pub mod ui;
pub mod word_list;
pub mod word_list_store;

pub use app::{App, Intent, View};
pub use error::{Result, SpellError};
