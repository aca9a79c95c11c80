//! 배치 입력 레코드
//!
//! DDL 문장 하나당 `{context, sql_statement}` 레코드 하나가 만들어집니다.

use serde::{Deserialize, Serialize};

/// 파이프라인 한 번에 공급되는 문장 단위 입력
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DdlRecord {
    /// 배치 전체가 공유하는 컨텍스트
    pub context: String,
    /// 최적화 대상 DDL 문장
    pub sql_statement: String,
}

impl DdlRecord {
    pub fn new(context: impl Into<String>, sql_statement: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            sql_statement: sql_statement.into(),
        }
    }
}

/// 문장마다 같은 컨텍스트를 공유하는 레코드 생성 (입력 순서 유지)
pub fn build_records<S: AsRef<str>>(statements: &[S], context: &str) -> Vec<DdlRecord> {
    statements
        .iter()
        .map(|ddl| DdlRecord::new(context, ddl.as_ref()))
        .collect()
}
