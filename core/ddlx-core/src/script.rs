//! DDL 스크립트 분할 — sqlparser-rs
//!
//! 여러 문장이 담긴 마이그레이션 스크립트를 문장 단위 문자열로 나눕니다.
//! 최적화 자체는 SQL을 파싱하거나 검증하지 않습니다.

use crate::error::{DdlxError, DdlxResult};
use sqlparser::ast::Statement;
use sqlparser::dialect::GenericDialect;
use sqlparser::parser::Parser;

/// 파싱된 SQL 스크립트
#[derive(Debug, Clone)]
pub struct DdlScript {
    statements: Vec<Statement>,
}

impl DdlScript {
    /// SQL 스크립트 파싱
    pub fn parse(sql: &str) -> DdlxResult<Self> {
        let dialect = GenericDialect {};
        let statements = Parser::parse_sql(&dialect, sql).map_err(|e| DdlxError::SqlParse {
            message: e.to_string(),
            sql: sql.to_string(),
        })?;
        Ok(Self { statements })
    }

    /// 스크립트를 DDL 문장 문자열 목록으로 분할 (DML 등은 제외)
    pub fn split_ddl(sql: &str) -> DdlxResult<Vec<String>> {
        Ok(Self::parse(sql)?.ddl_statements())
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// 모든 문장을 SQL 문자열로
    pub fn to_sql_strings(&self) -> Vec<String> {
        self.statements.iter().map(|s| s.to_string()).collect()
    }

    /// 스키마 정의 문장만 SQL 문자열로 (입력 순서 유지)
    pub fn ddl_statements(&self) -> Vec<String> {
        self.statements
            .iter()
            .filter(|s| is_ddl(s))
            .map(|s| s.to_string())
            .collect()
    }
}

/// 스키마를 정의/변경하는 문장인지 판단
pub fn is_ddl(statement: &Statement) -> bool {
    matches!(
        statement,
        Statement::CreateTable { .. }
            | Statement::CreateIndex { .. }
            | Statement::CreateView { .. }
            | Statement::CreateSchema { .. }
            | Statement::CreateSequence { .. }
            | Statement::AlterTable { .. }
            | Statement::AlterIndex { .. }
            | Statement::AlterView { .. }
            | Statement::Drop { .. }
    )
}
