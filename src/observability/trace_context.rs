//! Trace context extraction.
//!
//! # Responsibilities
//! - Recover trace id, span id and sampling flag from a request context
//! - Render ids in their canonical W3C hex form
//! - Feed the installed diagnostic hook exactly once per extraction
//!
//! # Design Decisions
//! - Extraction never fails: a missing trace is `None`/`false`, not an error
//! - Absence is type-distinct from a present id (`Option<TraceId>`)
//! - The hook slot is read once per call and never re-checked

use std::fmt;

use opentelemetry::trace::{SpanId, TraceContextExt, TraceId};
use opentelemetry::Context;

use crate::observability::hook::{DiagnosticEvent, HookSlot};

/// Trace identity of one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TraceInfo {
    pub trace_id: Option<TraceId>,
    pub span_id: Option<SpanId>,
    pub sampled: bool,
}

impl TraceInfo {
    /// 32 lowercase hex digits, or an empty string when absent.
    pub fn trace_id_hex(&self) -> String {
        self.trace_id.map(|id| id.to_string()).unwrap_or_default()
    }

    /// 16 lowercase hex digits, or an empty string when absent.
    pub fn span_id_hex(&self) -> String {
        self.span_id.map(|id| id.to_string()).unwrap_or_default()
    }

    /// `(trace id, span id, sampled)` with absence rendered in-band.
    pub fn as_strings(&self) -> (String, String, bool) {
        (self.trace_id_hex(), self.span_id_hex(), self.sampled)
    }

    pub fn is_empty(&self) -> bool {
        self.trace_id.is_none() && self.span_id.is_none()
    }
}

impl fmt::Display for TraceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (trace_id, span_id, sampled) = self.as_strings();
        fmt::Display::fmt(&DiagnosticEvent::new(&trace_id, &span_id, sampled), f)
    }
}

/// Pure extraction, no hook involved.
pub fn trace_info(cx: &Context) -> TraceInfo {
    let span = cx.span();
    let span_context = span.span_context();

    let trace_id = Some(span_context.trace_id()).filter(|id| *id != TraceId::INVALID);
    let span_id = Some(span_context.span_id()).filter(|id| *id != SpanId::INVALID);

    TraceInfo {
        trace_id,
        span_id,
        sampled: span_context.is_sampled(),
    }
}

/// Extracts [`TraceInfo`] and forwards it to the diagnostic hook, if any.
#[derive(Debug, Clone, Default)]
pub struct TraceContextReader {
    hook: HookSlot,
}

impl TraceContextReader {
    pub fn new(hook: HookSlot) -> Self {
        Self { hook }
    }

    /// The slot this reader consults.
    pub fn hook(&self) -> &HookSlot {
        &self.hook
    }

    pub fn extract(&self, cx: &Context) -> TraceInfo {
        let info = trace_info(cx);

        if let Some(hook) = self.hook.current() {
            let (trace_id, span_id, sampled) = info.as_strings();
            hook.emit(&DiagnosticEvent::new(&trace_id, &span_id, sampled));
        }

        info
    }
}
