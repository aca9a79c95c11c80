//! 문장 단위 처리 파이프라인
//!
//! 레코드 하나에 고정된 스테이지 목록을 순서대로 적용합니다.
//! 기본 구성: Render → TracePrompt → Generate → TraceResult

mod stages;


use crate::diagnostics::DiagnosticSink;
use crate::error::{DdlxError, DdlxResult};
use crate::generation::TextGenerator;
use crate::prompt::PromptTemplate;
use crate::record::DdlRecord;
use std::sync::Arc;

pub use stages::{GenerateStage, RenderStage, TracePoint, TraceStage};

/// 스테이지 사이를 흐르는 값
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageValue {
    /// 파이프라인 입력 레코드
    Record(DdlRecord),
    /// 렌더링된 프롬프트 또는 생성 결과
    Text(String),
}

impl StageValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            StageValue::Record(_) => "Record",
            StageValue::Text(_) => "Text",
        }
    }

    pub fn as_record(&self) -> DdlxResult<&DdlRecord> {
        match self {
            StageValue::Record(r) => Ok(r),
            _ => Err(DdlxError::TypeMismatch {
                expected: "Record".to_string(),
                actual: self.type_name().to_string(),
            }),
        }
    }

    pub fn as_text(&self) -> DdlxResult<&str> {
        match self {
            StageValue::Text(s) => Ok(s),
            _ => Err(DdlxError::TypeMismatch {
                expected: "Text".to_string(),
                actual: self.type_name().to_string(),
            }),
        }
    }

    pub fn into_text(self) -> DdlxResult<String> {
        match self {
            StageValue::Text(s) => Ok(s),
            other => Err(DdlxError::TypeMismatch {
                expected: "Text".to_string(),
                actual: other.type_name().to_string(),
            }),
        }
    }
}

/// 파이프라인 스테이지 트레이트
pub trait Stage: Send + Sync {
    /// 스테이지 이름
    fn name(&self) -> &str;

    /// `index`번째 레코드의 값에 스테이지 적용
    fn apply(&self, index: usize, value: StageValue) -> DdlxResult<StageValue>;
}

/// 순서가 고정된 스테이지 체인
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    /// 주어진 순서대로 스테이지 연결
    pub fn compose(stages: Vec<Box<dyn Stage>>) -> Self {
        Self { stages }
    }

    /// DDL 최적화용 4단계 파이프라인
    pub fn optimized_ddl(
        template: PromptTemplate,
        generator: Arc<dyn TextGenerator>,
        sink: Arc<dyn DiagnosticSink>,
    ) -> Self {
        Self::compose(vec![
            Box::new(RenderStage::new(template)),
            Box::new(TraceStage::new(Arc::clone(&sink), TracePoint::Prompt)),
            Box::new(GenerateStage::new(generator)),
            Box::new(TraceStage::new(sink, TracePoint::Result)),
        ])
    }

    /// 스테이지 이름 목록
    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// 레코드 하나를 모든 스테이지에 통과시킴
    ///
    /// 실패한 스테이지의 에러는 `DdlxError::BatchProcessing`으로 변환됩니다.
    pub fn run(&self, index: usize, value: StageValue) -> DdlxResult<StageValue> {
        let mut current = value;
        for stage in &self.stages {
            current = stage
                .apply(index, current)
                .map_err(|e| DdlxError::BatchProcessing {
                    index,
                    stage: stage.name().to_string(),
                    message: e.to_string(),
                })?;
        }
        Ok(current)
    }

    /// 레코드를 입력으로 실행하고 최종 텍스트 반환
    pub fn run_record(&self, index: usize, record: DdlRecord) -> DdlxResult<String> {
        self.run(index, StageValue::Record(record))?
            .into_text()
            .map_err(|e| DdlxError::BatchProcessing {
                index,
                stage: "output".to_string(),
                message: e.to_string(),
            })
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.stage_names())
            .finish()
    }
}
