use super::{Stage, StageValue};
use crate::diagnostics::{DiagnosticEvent, DiagnosticSink};
use crate::error::DdlxResult;
use crate::generation::TextGenerator;
use crate::prompt::PromptTemplate;
use std::sync::Arc;

// ═══════════════════════════════════════════════════════════════
// Stage 1: Render
// ═══════════════════════════════════════════════════════════════

/// Record → rendered prompt
pub struct RenderStage {
    template: PromptTemplate,
}

impl RenderStage {
    pub fn new(template: PromptTemplate) -> Self {
        Self { template }
    }
}

impl Stage for RenderStage {
    fn name(&self) -> &str {
        "render"
    }

    fn apply(&self, _index: usize, value: StageValue) -> DdlxResult<StageValue> {
        let record = value.as_record()?;
        Ok(StageValue::Text(self.template.render(record)?))
    }
}

// ═══════════════════════════════════════════════════════════════
// Stage 2 & 4: Trace
// ═══════════════════════════════════════════════════════════════

/// Where in the pipeline a trace stage sits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TracePoint {
    /// After rendering
    Prompt,
    /// After generation
    Result,
}

/// Emits the passing value to a sink and forwards it unchanged
pub struct TraceStage {
    sink: Arc<dyn DiagnosticSink>,
    point: TracePoint,
}

impl TraceStage {
    pub fn new(sink: Arc<dyn DiagnosticSink>, point: TracePoint) -> Self {
        Self { sink, point }
    }
}

impl Stage for TraceStage {
    fn name(&self) -> &str {
        match self.point {
            TracePoint::Prompt => "trace_prompt",
            TracePoint::Result => "trace_result",
        }
    }

    fn apply(&self, index: usize, value: StageValue) -> DdlxResult<StageValue> {
        let text = value.as_text()?.to_string();
        let event = match self.point {
            TracePoint::Prompt => DiagnosticEvent::RenderedPrompt {
                index,
                prompt: text,
            },
            TracePoint::Result => DiagnosticEvent::GeneratedResult {
                index,
                output: text,
            },
        };
        self.sink.record(event)?;
        Ok(value)
    }
}

// ═══════════════════════════════════════════════════════════════
// Stage 3: Generate
// ═══════════════════════════════════════════════════════════════

/// Rendered prompt → backend output
pub struct GenerateStage {
    generator: Arc<dyn TextGenerator>,
}

impl GenerateStage {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }
}

impl Stage for GenerateStage {
    fn name(&self) -> &str {
        "generate"
    }

    fn apply(&self, index: usize, value: StageValue) -> DdlxResult<StageValue> {
        let prompt = value.as_text()?;
        tracing::trace!(index, backend = self.generator.name(), "calling generation backend");
        Ok(StageValue::Text(self.generator.generate(prompt)?))
    }
}
