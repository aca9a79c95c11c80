//! # DDLX — Batch DDL Optimization
//!
//! DDLX는 DDL 문장 목록과 공유 컨텍스트를 받아 문장마다 프롬프트를 렌더링하고,
//! 텍스트 생성 백엔드를 호출해 최적화된 DDL을 입력 순서대로 돌려줍니다.
//!
//! ## 빠른 시작
//!
//! ```rust
//! use ddlx_core::{DdlOptimizer, DefaultPrompts, FnGenerator};
//! use std::sync::Arc;
//!
//! let optimizer = DdlOptimizer::new(
//!     Arc::new(FnGenerator::new("echo", |prompt| Ok(prompt.to_uppercase()))),
//!     Arc::new(DefaultPrompts::new().with_optimized_ddl("{{sql_statement}}")),
//! );
//!
//! let ddl = ["create table users (id int)"];
//! let optimized = optimizer.optimize(Some(&ddl[..]), Some("postgres 16, OLTP"));
//! assert_eq!(optimized, vec!["CREATE TABLE USERS (ID INT)".to_string()]);
//! ```
//!
//! ## 처리 파이프라인
//!
//! ```text
//! DDL 문장 + 컨텍스트 → DdlRecord
//!     → Render → TracePrompt → Generate → TraceResult → 결과
//! ```
//!
//! 한 레코드라도 실패하면 배치 전체 결과를 버리고 빈 목록을 반환합니다.
//!
//! ## 모듈 구조
//!
//! - [`optimizer`] — 배치 최적화기 ([`DdlOptimizer`])
//! - [`pipeline`] — 스테이지 체인
//! - [`prompt`] — 프롬프트 템플릿과 제공자
//! - [`generation`] — 텍스트 생성 백엔드
//! - [`diagnostics`] — 진단 이벤트 수신자
//! - [`config`] — 실행 설정
//! - [`script`] — DDL 스크립트 분할

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod generation;
pub mod optimizer;
pub mod pipeline;
pub mod prompt;
pub mod record;
pub mod script;

// Logging utilities
pub mod logging;

// Re-export commonly used types
pub use config::{ExecutionMode, OptimizerConfig};
pub use diagnostics::{DiagnosticEvent, DiagnosticSink, MemorySink, TracingSink};
pub use error::{DdlxError, DdlxResult};
pub use generation::{FnGenerator, TextGenerator};
pub use optimizer::DdlOptimizer;
pub use prompt::{DefaultPrompts, PromptProvider, PromptTemplate};
pub use record::DdlRecord;
pub use script::DdlScript;
