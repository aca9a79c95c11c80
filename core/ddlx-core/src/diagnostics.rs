//! Diagnostic sink
//!
//! Out-of-band channel for per-record traces and batch failure reports.
//! Nothing sent here is part of an optimizer's return value.

use crate::error::{DdlxError, DdlxResult};
use parking_lot::Mutex;

/// Event emitted by an optimization pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticEvent {
    /// Prompt rendered for record `index`
    RenderedPrompt { index: usize, prompt: String },
    /// Backend output for record `index`
    GeneratedResult { index: usize, output: String },
    /// The batch was aborted and discarded
    BatchFailed { message: String },
}

impl DiagnosticEvent {
    /// Short label used in log fields
    pub fn kind(&self) -> &'static str {
        match self {
            DiagnosticEvent::RenderedPrompt { .. } => "rendered_prompt",
            DiagnosticEvent::GeneratedResult { .. } => "generated_result",
            DiagnosticEvent::BatchFailed { .. } => "batch_failed",
        }
    }
}

/// Receiver of diagnostic events
pub trait DiagnosticSink: Send + Sync {
    fn record(&self, event: DiagnosticEvent) -> DdlxResult<()>;
}

/// Forwards events to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn record(&self, event: DiagnosticEvent) -> DdlxResult<()> {
        match &event {
            DiagnosticEvent::RenderedPrompt { index, prompt } => {
                tracing::trace!(index, prompt = %prompt, "rendered prompt");
            }
            DiagnosticEvent::GeneratedResult { index, output } => {
                tracing::trace!(index, output = %output, "generated result");
            }
            DiagnosticEvent::BatchFailed { message } => {
                tracing::error!(error = %message, "DDL optimization failed");
            }
        }
        Ok(())
    }
}

/// Keeps events in memory, in arrival order
///
/// With a capacity limit, events past the limit are rejected with
/// `DdlxError::Trace`, which fails the trace stage that sent them.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<DiagnosticEvent>>,
    limit: Option<usize>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sink that holds at most `limit` events
    pub fn with_capacity_limit(limit: usize) -> Self {
        Self {
            events: Mutex::new(Vec::with_capacity(limit)),
            limit: Some(limit),
        }
    }

    /// Snapshot of all recorded events
    pub fn events(&self) -> Vec<DiagnosticEvent> {
        self.events.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    /// Rendered prompts as `(index, prompt)` pairs
    pub fn rendered_prompts(&self) -> Vec<(usize, String)> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                DiagnosticEvent::RenderedPrompt { index, prompt } => Some((*index, prompt.clone())),
                _ => None,
            })
            .collect()
    }

    /// Generated outputs as `(index, output)` pairs
    pub fn generated_results(&self) -> Vec<(usize, String)> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                DiagnosticEvent::GeneratedResult { index, output } => {
                    Some((*index, output.clone()))
                }
                _ => None,
            })
            .collect()
    }

    /// Batch failure messages
    pub fn failures(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                DiagnosticEvent::BatchFailed { message } => Some(message.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl DiagnosticSink for MemorySink {
    fn record(&self, event: DiagnosticEvent) -> DdlxResult<()> {
        let mut events = self.events.lock();
        if let Some(limit) = self.limit {
            if events.len() >= limit {
                return Err(DdlxError::Trace(format!(
                    "memory sink full ({} events), dropped {}",
                    limit,
                    event.kind()
                )));
            }
        }
        events.push(event);
        Ok(())
    }
}
