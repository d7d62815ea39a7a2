use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use console::{style, Term};

use crate::boundary::ReleaseWarning;
use crate::ui::formatter::{display_warning, format_detail, format_error, format_info, format_success};
use crate::ui::StatusReporter;

const FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const FRAME_INTERVAL: Duration = Duration::from_millis(80);

/// Transient spinner drawn on its own thread until stopped
struct Spinner {
    stop: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl Spinner {
    /// Returns `None` when the drawing thread cannot be spawned
    fn start(term: Term, label: String) -> Option<Self> {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);

        let handle = thread::Builder::new()
            .name("spinner".to_string())
            .spawn(move || {
                let mut frame = 0;
                while !flag.load(Ordering::Relaxed) {
                    let line = format!("{} {}", style(FRAMES[frame % FRAMES.len()]).cyan(), label);
                    let _ = term.clear_line();
                    let _ = term.write_str(&line);
                    let _ = term.flush();
                    frame += 1;
                    thread::sleep(FRAME_INTERVAL);
                }
                let _ = term.clear_line();
                let _ = term.flush();
            })
            .ok()?;

        Some(Spinner {
            stop,
            handle: Some(handle),
        })
    }

    fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Terminal reporter with a spinner while a step is pending
pub struct ConsoleReporter {
    term: Term,
    animate: bool,
    spinner: Option<Spinner>,
    current: Option<String>,
}

impl ConsoleReporter {
    /// Spinner is enabled only when stderr is an interactive terminal
    pub fn new() -> Self {
        let term = Term::stderr();
        let animate = term.is_term();
        ConsoleReporter {
            term,
            animate,
            spinner: None,
            current: None,
        }
    }

    /// Reporter that never animates, for logs and CI output
    pub fn plain() -> Self {
        ConsoleReporter {
            animate: false,
            ..ConsoleReporter::new()
        }
    }

    fn stop_spinner(&mut self) {
        if let Some(mut spinner) = self.spinner.take() {
            spinner.stop();
        }
    }

    fn start_spinner(&mut self, label: &str) {
        if self.animate {
            self.spinner = Spinner::start(self.term.clone(), label.to_string());
        }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusReporter for ConsoleReporter {
    fn begin(&mut self, label: &str) {
        self.stop_spinner();
        self.current = Some(label.to_string());
        self.start_spinner(label);
        if self.spinner.is_none() {
            println!("{}", format_info(label, ""));
        }
    }

    fn succeed(&mut self, label: &str, detail: Option<&str>) {
        self.stop_spinner();
        self.current = None;
        println!("{}", format_success(label, detail.unwrap_or("")));
    }

    fn fail(&mut self, label: &str, error: &str) {
        self.stop_spinner();
        self.current = None;
        eprintln!("{}", format_error(label, error));
    }

    fn note(&mut self, label: &str, detail: &str) {
        self.stop_spinner();
        println!("{}", format_detail(label, detail));
        if let Some(current) = self.current.clone() {
            self.start_spinner(&current);
        }
    }

    fn warn(&mut self, warning: &ReleaseWarning) {
        self.stop_spinner();
        display_warning(warning);
        if let Some(current) = self.current.clone() {
            self.start_spinner(&current);
        }
    }
}

/// One reporter call, as captured by [RecordingReporter]
#[derive(Debug, Clone, PartialEq)]
pub enum ReportEvent {
    Begin(String),
    Succeed(String, Option<String>),
    Fail(String, String),
    Note(String, String),
    Warn(ReleaseWarning),
}

/// Reporter that records calls instead of printing
#[derive(Debug, Default)]
pub struct RecordingReporter {
    events: Vec<ReportEvent>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[ReportEvent] {
        &self.events
    }

    /// Labels of steps that reported failure
    pub fn failures(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ReportEvent::Fail(label, _) => Some(label.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Detail attached to the success of `label`, if any
    pub fn success_detail(&self, label: &str) -> Option<&str> {
        self.events.iter().find_map(|e| match e {
            ReportEvent::Succeed(l, detail) if l == label => detail.as_deref(),
            _ => None,
        })
    }

    pub fn warnings(&self) -> Vec<&ReleaseWarning> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ReportEvent::Warn(w) => Some(w),
                _ => None,
            })
            .collect()
    }
}

impl StatusReporter for RecordingReporter {
    fn begin(&mut self, label: &str) {
        self.events.push(ReportEvent::Begin(label.to_string()));
    }

    fn succeed(&mut self, label: &str, detail: Option<&str>) {
        self.events.push(ReportEvent::Succeed(
            label.to_string(),
            detail.map(str::to_string),
        ));
    }

    fn fail(&mut self, label: &str, error: &str) {
        self.events
            .push(ReportEvent::Fail(label.to_string(), error.to_string()));
    }

    fn note(&mut self, label: &str, detail: &str) {
        self.events
            .push(ReportEvent::Note(label.to_string(), detail.to_string()));
    }

    fn warn(&mut self, warning: &ReleaseWarning) {
        self.events.push(ReportEvent::Warn(warning.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_console_reporter_does_not_animate() {
        let mut reporter = ConsoleReporter::plain();
        reporter.begin("Fetch latest tag");
        assert!(reporter.spinner.is_none());
        reporter.note("Has conflicts:", "false");
        reporter.succeed("Fetch latest tag", Some("v1.0.0"));
        reporter.begin("Merge merge request");
        reporter.fail("Merge merge request", "refused");
        assert!(reporter.current.is_none());
    }

    #[test]
    fn test_spinner_stops_cleanly() {
        let mut spinner = Spinner::start(Term::stderr(), "working".to_string())
            .expect("spinner thread should spawn");
        thread::sleep(Duration::from_millis(10));
        spinner.stop();
        assert!(spinner.handle.is_none());
    }

    #[test]
    fn test_recording_reporter_captures_events() {
        let mut reporter = RecordingReporter::new();
        reporter.begin("A");
        reporter.succeed("A", Some("done"));
        reporter.begin("B");
        reporter.fail("B", "boom");

        assert_eq!(reporter.events().len(), 4);
        assert_eq!(reporter.failures(), vec!["B"]);
        assert_eq!(reporter.success_detail("A"), Some("done"));
        assert_eq!(reporter.success_detail("B"), None);
    }
}
