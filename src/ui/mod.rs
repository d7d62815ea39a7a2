//! User interface module - step reporting and formatting.
//!
//! Separates concerns:
//! - `formatter` - Pure formatting functions
//! - `reporter` - The [StatusReporter] capability and its implementations

pub mod formatter;
pub mod reporter;

pub use formatter::{
    display_banner, display_error, display_header, display_status, display_success,
    display_warning,
};
pub use reporter::{ConsoleReporter, RecordingReporter, ReportEvent};

use crate::boundary::ReleaseWarning;

/// Presentation of release steps.
///
/// Purely side-effecting: implementations must not fail and must not feed
/// anything back into the release flow.
pub trait StatusReporter {
    /// A step started; show a pending indicator for `label`
    fn begin(&mut self, label: &str);

    /// The step finished; stop the indicator and print a success marker
    fn succeed(&mut self, label: &str, detail: Option<&str>);

    /// The step failed; stop the indicator and print a failure marker
    fn fail(&mut self, label: &str, error: &str);

    /// Informational line attached to the current step
    fn note(&mut self, _label: &str, _detail: &str) {}

    /// Non-fatal warning
    fn warn(&mut self, _warning: &ReleaseWarning) {}
}
