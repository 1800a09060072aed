// Library surface for headless/integration tests and reuse.
// The binary in main.rs only adds the CLI and terminal setup.
pub mod app_dirs;
pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod language;
pub mod runtime;
pub mod scoring;
pub mod session;
pub mod time_series;
pub mod ui;
pub mod word_source;

pub use engine::{KeyAction, SessionEngine, Snapshot};
pub use error::{Result, SessionError};
