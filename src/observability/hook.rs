//! Diagnostic hook injection point.
//!
//! # Responsibilities
//! - Define the callback contract fed by trace-context extraction
//! - Hold the single replaceable hook shared by every request
//! - Provide a `tracing` adapter as the default sink
//!
//! # Design Decisions
//! - The slot is passed explicitly to its readers, never a global
//! - Reads are wait-free (`ArcSwapOption`); a replacement is seen by
//!   calls that start after it, calls already past the read keep the old hook
//! - Install the hook before traffic starts when ordering matters
//! - Hook panics are not caught: the host owns the hook and its failures

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwapOption;

/// Template of the line produced for each extraction.
pub const TRACE_INFO_FORMAT: &str = "traceID: {}; spanID: {}; isSampled: {}";

/// One extraction result, as handed to a [`DiagnosticHook`].
///
/// `Display` renders the whole line; [`DiagnosticEvent::values`] exposes the
/// ordered values for sinks that format on their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagnosticEvent<'a> {
    pub format: &'static str,
    pub trace_id: &'a str,
    pub span_id: &'a str,
    pub sampled: bool,
}

impl<'a> DiagnosticEvent<'a> {
    pub fn new(trace_id: &'a str, span_id: &'a str, sampled: bool) -> Self {
        Self {
            format: TRACE_INFO_FORMAT,
            trace_id,
            span_id,
            sampled,
        }
    }

    /// Values in template order: trace id, span id, sampled.
    pub fn values(&self) -> [&dyn fmt::Display; 3] {
        [&self.trace_id, &self.span_id, &self.sampled]
    }
}

/// Renders `format`, substituting each `{}` with the next value.
impl fmt::Display for DiagnosticEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut values = self.values().into_iter();
        let mut pieces = self.format.split("{}");
        if let Some(head) = pieces.next() {
            f.write_str(head)?;
        }
        for piece in pieces {
            match values.next() {
                Some(value) => write!(f, "{value}")?,
                None => f.write_str("{}")?,
            }
            f.write_str(piece)?;
        }
        Ok(())
    }
}

/// Consumer of extracted trace information.
pub trait DiagnosticHook: Send + Sync {
    fn emit(&self, event: &DiagnosticEvent<'_>);
}

impl<F> DiagnosticHook for F
where
    F: Fn(&DiagnosticEvent<'_>) + Send + Sync,
{
    fn emit(&self, event: &DiagnosticEvent<'_>) {
        self(event)
    }
}

/// Forwards events to the `tracing` subscriber at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingHook;

impl DiagnosticHook for TracingHook {
    fn emit(&self, event: &DiagnosticEvent<'_>) {
        tracing::debug!(
            trace_id = %event.trace_id,
            span_id = %event.span_id,
            sampled = event.sampled,
            "{}",
            event
        );
    }
}

type SharedHook = Arc<Box<dyn DiagnosticHook>>;

/// Replaceable slot holding at most one hook.
///
/// Clones share the same slot.
#[derive(Clone, Default)]
pub struct HookSlot {
    inner: Arc<ArcSwapOption<Box<dyn DiagnosticHook>>>,
}

impl HookSlot {
    /// Create an empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a slot with `hook` already installed.
    pub fn with_hook<H>(hook: H) -> Self
    where
        H: DiagnosticHook + 'static,
    {
        let slot = Self::new();
        slot.install(hook);
        slot
    }

    /// Install `hook`, replacing any previous one.
    pub fn install<H>(&self, hook: H)
    where
        H: DiagnosticHook + 'static,
    {
        self.inner.store(Some(Arc::new(Box::new(hook))));
    }

    /// Remove the installed hook, if any.
    pub fn clear(&self) {
        self.inner.store(None);
    }

    pub fn is_installed(&self) -> bool {
        self.inner.load().is_some()
    }

    /// Snapshot of the current hook.
    pub(crate) fn current(&self) -> Option<SharedHook> {
        self.inner.load_full()
    }
}

impl fmt::Debug for HookSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookSlot")
            .field("installed", &self.is_installed())
            .finish()
    }
}
