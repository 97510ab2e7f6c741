//! Tracing and logging setup shared by the remitdesk binaries.

/// Tracing configuration (filters, output format).
pub mod tracing;

pub use crate::tracing::{LogFormat, LogSettings};

/// Initialize process-wide logging.
///
/// This is safe to call multiple times; subsequent calls become no-ops and
/// return `false`.
pub fn init(settings: &LogSettings) -> bool {
    tracing::init(settings)
}
