use std::fmt;

use crate::{error::RuntimeError, interpreter::node::core::Position};

/// Number of digits after the decimal point used when printing decimals.
pub const DEFAULT_PRECISION: usize = 3;

/// Seed of the `random()` generator when none is given.
const DEFAULT_SEED: u64 = 0x2545_f491_4f6c_dd1d;

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
                        Self::Debug => "debug",
                        Self::Info => "info",
                        Self::Warning => "warning",
                        Self::Error => "error",
                    })
    }
}

/// One message emitted while evaluating expressions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub position: Position,
    pub message:  String,
}

impl fmt::Display for Diagnostic {
    /// Formats the diagnostic as `file(line): severity: message`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.position, self.severity, self.message)
    }
}

/// State shared by every expression evaluated for one stylesheet.
///
/// The session collects diagnostics (and forwards them to `tracing`), owns the
/// counter behind `unique_id()` and the state of the `random()` generator, and
/// carries the output precision. Nothing in the engine is process global, so
/// independent sessions can be used from different threads.
///
/// ## Usage
///
/// ```
/// use csspp_expr::interpreter::{node::core::Position, session::Session};
///
/// let mut session = Session::new();
/// session.warning(Position::new("a.css", 2), "careful");
/// assert_eq!(session.warning_count(), 1);
/// assert_eq!(session.diagnostics()[0].to_string(), "a.css(2): warning: careful");
/// ```
#[derive(Debug, Clone)]
pub struct Session {
    diagnostics:       Vec<Diagnostic>,
    muted:             usize,
    show_debug:        bool,
    precision:         usize,
    unique_id_counter: u64,
    random_state:      u64,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Creates a session with no diagnostics, debug messages hidden and the
    /// default precision.
    #[must_use]
    pub const fn new() -> Self {
        Self { diagnostics:       Vec::new(),
               muted:             0,
               show_debug:        false,
               precision:         DEFAULT_PRECISION,
               unique_id_counter: 0,
               random_state:      DEFAULT_SEED, }
    }

    /// Records a diagnostic and mirrors it as a `tracing` event.
    ///
    /// Debug messages are dropped unless [`Session::set_show_debug`] was
    /// turned on. Nothing is recorded or logged while the session is muted.
    pub fn report(&mut self, severity: Severity, position: Position, message: impl Into<String>) {
        if self.muted > 0 || (severity == Severity::Debug && !self.show_debug) {
            return;
        }
        let message = message.into();
        match severity {
            Severity::Error => tracing::error!(target: "csspp", %position, "{message}"),
            Severity::Warning => tracing::warn!(target: "csspp", %position, "{message}"),
            Severity::Info => tracing::info!(target: "csspp", %position, "{message}"),
            Severity::Debug => tracing::debug!(target: "csspp", %position, "{message}"),
        }
        self.diagnostics.push(Diagnostic { severity,
                                           position,
                                           message });
    }

    pub fn error(&mut self, position: Position, message: impl Into<String>) {
        self.report(Severity::Error, position, message);
    }

    pub fn warning(&mut self, position: Position, message: impl Into<String>) {
        self.report(Severity::Warning, position, message);
    }

    pub fn info(&mut self, position: Position, message: impl Into<String>) {
        self.report(Severity::Info, position, message);
    }

    pub fn debug(&mut self, position: Position, message: impl Into<String>) {
        self.report(Severity::Debug, position, message);
    }

    /// Reports a recoverable runtime error at error severity.
    ///
    /// Logic errors have no position and are not diagnostics; they are
    /// ignored here and must be propagated by the caller instead.
    pub fn report_error(&mut self, error: &RuntimeError) {
        if let Some(position) = error.position() {
            self.error(position.clone(), error.message());
        }
    }

    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    #[must_use]
    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    fn count(&self, severity: Severity) -> usize {
        self.diagnostics.iter().filter(|d| d.severity == severity).count()
    }

    /// Forgets all the diagnostics collected so far.
    pub fn clear(&mut self) {
        self.diagnostics.clear();
    }

    /// Drops every diagnostic until the matching [`Session::unmute`].
    ///
    /// Calls nest: the session speaks again once each `mute` was undone.
    pub const fn mute(&mut self) {
        self.muted += 1;
    }

    pub const fn unmute(&mut self) {
        self.muted = self.muted.saturating_sub(1);
    }

    #[must_use]
    pub const fn is_muted(&self) -> bool {
        self.muted > 0
    }

    pub const fn set_show_debug(&mut self, show_debug: bool) {
        self.show_debug = show_debug;
    }

    #[must_use]
    pub const fn precision(&self) -> usize {
        self.precision
    }

    pub const fn set_precision(&mut self, precision: usize) {
        self.precision = precision;
    }

    #[must_use]
    pub const fn unique_id_counter(&self) -> u64 {
        self.unique_id_counter
    }

    pub const fn set_unique_id_counter(&mut self, counter: u64) {
        self.unique_id_counter = counter;
    }

    /// Increments the unique id counter and returns the new value.
    pub const fn next_unique_id(&mut self) -> u64 {
        self.unique_id_counter += 1;
        self.unique_id_counter
    }

    /// Restarts the `random()` sequence. A zero seed is replaced by the
    /// default one since the generator would otherwise stay stuck at zero.
    pub const fn seed_random(&mut self, seed: u64) {
        self.random_state = if seed == 0 { DEFAULT_SEED } else { seed };
    }

    /// Returns the next number of the `random()` sequence, in `[0, 1)`.
    #[allow(clippy::cast_precision_loss)]
    pub fn next_random(&mut self) -> f64 {
        // xorshift64*
        let mut x = self.random_state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.random_state = x;
        let bits = x.wrapping_mul(0x2545_f491_4f6c_dd1d) >> 11;
        bits as f64 / (1u64 << 53) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_messages_are_hidden_by_default() {
        let mut session = Session::new();
        session.debug(Position::new("a.css", 1), "noise");
        assert!(session.diagnostics().is_empty());

        session.set_show_debug(true);
        session.debug(Position::new("a.css", 1), "noise");
        assert_eq!(session.diagnostics().len(), 1);
    }

    #[test]
    fn muted_sessions_drop_reports() {
        let mut session = Session::new();
        session.mute();
        session.mute();
        session.error(Position::new("a.css", 1), "hidden");
        session.unmute();
        session.warning(Position::new("a.css", 2), "still hidden");
        assert!(session.is_muted());
        assert!(session.diagnostics().is_empty());

        session.unmute();
        session.unmute();
        assert!(!session.is_muted());
        session.error(Position::new("a.css", 3), "shown");
        assert_eq!(session.error_count(), 1);
        assert_eq!(session.diagnostics()[0].message, "shown");
    }

    #[test]
    fn random_stays_in_range_and_is_reproducible() {
        let mut a = Session::new();
        let mut b = Session::new();
        a.seed_random(42);
        b.seed_random(42);
        for _ in 0..100 {
            let r = a.next_random();
            assert!((0.0..1.0).contains(&r));
            assert!((r - b.next_random()).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn unique_ids_increment_first() {
        let mut session = Session::new();
        assert_eq!(session.next_unique_id(), 1);
        session.set_unique_id_counter(10);
        assert_eq!(session.next_unique_id(), 11);
    }
}
