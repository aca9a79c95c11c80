//! DDL Optimizer — 배치 단위 DDL 최적화
//!
//! DDL 문장마다 `{context, sql_statement}` 레코드를 만들고,
//! Render → TracePrompt → Generate → TraceResult 파이프라인을 적용합니다.
//!
//! 한 레코드라도 실패하면 배치 전체를 버리고 빈 결과를 반환합니다.

use crate::config::{ExecutionMode, OptimizerConfig};
use crate::diagnostics::{DiagnosticEvent, DiagnosticSink, TracingSink};
use crate::error::{DdlxError, DdlxResult};
use crate::generation::TextGenerator;
use crate::pipeline::Pipeline;
use crate::prompt::{PromptProvider, PromptTemplate};
use crate::record::build_records;
use crate::script::DdlScript;
use rayon::ThreadPoolBuilder;
use rayon::prelude::*;
use std::sync::Arc;
use std::time::Instant;

/// 배치 DDL 최적화기
pub struct DdlOptimizer {
    generator: Arc<dyn TextGenerator>,
    prompts: Arc<dyn PromptProvider>,
    sink: Arc<dyn DiagnosticSink>,
    config: OptimizerConfig,
    thread_pool: Option<Arc<rayon::ThreadPool>>,
}

impl DdlOptimizer {
    /// 생성 백엔드와 프롬프트 제공자로 생성 (순차 실행, `TracingSink`)
    pub fn new(generator: Arc<dyn TextGenerator>, prompts: Arc<dyn PromptProvider>) -> Self {
        Self {
            generator,
            prompts,
            sink: Arc::new(TracingSink),
            config: OptimizerConfig::default(),
            thread_pool: None,
        }
    }

    /// 진단 이벤트 수신자 교체
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    /// 설정 적용. 병렬 모드면 전용 스레드 풀을 만듭니다.
    pub fn with_config(mut self, config: OptimizerConfig) -> DdlxResult<Self> {
        config.validate()?;

        self.thread_pool = match config.execution {
            ExecutionMode::Sequential => None,
            mode @ ExecutionMode::Parallel { .. } => {
                let pool = ThreadPoolBuilder::new()
                    .num_threads(mode.thread_count())
                    .thread_name(|i| format!("ddlx-optimizer-{}", i))
                    .build()
                    .map_err(|e| {
                        DdlxError::Config(format!("Failed to create thread pool: {}", e))
                    })?;
                Some(Arc::new(pool))
            }
        };
        self.config = config;
        Ok(self)
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// 병렬 실행 시 스레드 수 (순차 실행이면 1)
    pub fn thread_count(&self) -> usize {
        self.thread_pool
            .as_ref()
            .map_or(1, |pool| pool.current_num_threads())
    }

    /// 배치 최적화
    ///
    /// 입력 순서대로 최적화된 DDL을 반환합니다. 문장 목록이나 컨텍스트가
    /// 없거나 비어 있으면 즉시 빈 목록을 반환합니다. 어느 스테이지든 실패하면
    /// 실패 메시지 하나를 진단 수신자에 보내고 빈 목록을 반환합니다.
    pub fn optimize<S: AsRef<str>>(
        &self,
        ddl_statements: Option<&[S]>,
        context: Option<&str>,
    ) -> Vec<String> {
        match self.try_optimize(ddl_statements, context) {
            Ok(results) => results,
            Err(e) => {
                self.report_failure(&e);
                Vec::new()
            }
        }
    }

    /// 배치 최적화 (에러 경계를 `Result`로 노출)
    ///
    /// 스테이지 실패는 모두 `DdlxError::BatchProcessing`으로 반환되며
    /// 진단 수신자에 실패 이벤트를 보내지 않습니다.
    pub fn try_optimize<S: AsRef<str>>(
        &self,
        ddl_statements: Option<&[S]>,
        context: Option<&str>,
    ) -> DdlxResult<Vec<String>> {
        // 빈 컨텍스트도 없는 컨텍스트와 같이 취급
        let (statements, context) = match (ddl_statements, context) {
            (Some(s), Some(c)) if !s.is_empty() && !c.is_empty() => (s, c),
            _ => {
                tracing::debug!("empty DDL batch or context, skipping optimization");
                return Ok(Vec::new());
            }
        };

        let start = Instant::now();
        let template = self.template().map_err(|e| DdlxError::BatchProcessing {
            index: 0,
            stage: "render".to_string(),
            message: e.to_string(),
        })?;
        let pipeline = Pipeline::optimized_ddl(
            template,
            Arc::clone(&self.generator),
            Arc::clone(&self.sink),
        );
        let records = build_records(statements, context);
        let count = records.len();

        let results = match &self.thread_pool {
            Some(pool) => pool.install(|| {
                records
                    .into_par_iter()
                    .enumerate()
                    .map(|(i, record)| pipeline.run_record(i, record))
                    .collect::<DdlxResult<Vec<_>>>()
            }),
            None => records
                .into_iter()
                .enumerate()
                .map(|(i, record)| pipeline.run_record(i, record))
                .collect::<DdlxResult<Vec<_>>>(),
        }?;

        tracing::debug!(
            records = count,
            threads = self.thread_count(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "DDL batch optimized"
        );
        Ok(results)
    }

    /// 스크립트를 문장 단위로 나눈 뒤 DDL 문장만 최적화
    ///
    /// 파싱 실패도 배치 실패와 같이 빈 목록을 반환합니다.
    pub fn optimize_script(&self, script: &str, context: Option<&str>) -> Vec<String> {
        match DdlScript::split_ddl(script) {
            Ok(statements) => self.optimize(Some(statements.as_slice()), context),
            Err(e) => {
                self.report_failure(&e);
                Vec::new()
            }
        }
    }

    fn template(&self) -> DdlxResult<PromptTemplate> {
        match &self.config.prompt_override {
            Some(source) => Ok(PromptTemplate::new(source.as_str())),
            None => self.prompts.optimized_ddl_prompt(),
        }
    }

    fn report_failure(&self, err: &DdlxError) {
        let event = DiagnosticEvent::BatchFailed {
            message: format!("DDL optimization failed: {}", err),
        };
        if let Err(sink_err) = self.sink.record(event) {
            tracing::warn!(error = %sink_err, "diagnostic sink rejected batch failure report");
        }
    }
}
