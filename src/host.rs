//! Host adapter: where status lines and result documents land.
//!
//! The original add-in wrote these into DOM panes owned by the vendor shell.
//! The core only ever talks to this trait; the CLI host maps statuses to
//! tracing events and panes to pretty JSON on stdout.

use serde_json::Value;
use tracing::{error, info, warn};

/// Severity of a status line, mirroring the shell's info/ok/err classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Ok,
    Error,
}

/// Presentation surface injected into the core.
pub trait Host: Send + Sync {
    /// Emits a one-line progress or status update.
    fn status(&self, level: StatusLevel, message: &str);

    /// Emits a named JSON document (the `summary` and `results` panes).
    fn output(&self, pane: &str, value: &Value);
}

/// Console host: statuses become log events, panes become pretty-printed
/// JSON blocks on stdout.
pub struct ConsoleHost;

impl Host for ConsoleHost {
    fn status(&self, level: StatusLevel, message: &str) {
        match level {
            StatusLevel::Info | StatusLevel::Ok => info!("{message}"),
            StatusLevel::Error => error!("{message}"),
        }
    }

    fn output(&self, pane: &str, value: &Value) {
        match serde_json::to_string_pretty(value) {
            Ok(body) => println!("--- {pane} ---\n{body}"),
            Err(e) => warn!(pane, error = %e, "Failed to render output pane"),
        }
    }
}
