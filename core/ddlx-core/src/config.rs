//! Optimizer 설정
//!
//! 우선순위: 기본값 → 설정 파일(JSON) → 환경 변수

use crate::error::{DdlxError, DdlxResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

/// 실행 모드 환경 변수 (`sequential` | `parallel`)
pub const ENV_EXECUTION: &str = "DDLX_EXECUTION";
/// 병렬 스레드 수 환경 변수
pub const ENV_THREADS: &str = "DDLX_THREADS";
/// 프롬프트 템플릿 override 환경 변수
pub const ENV_PROMPT_TEMPLATE: &str = "DDLX_PROMPT_TEMPLATE";

/// 자동 스레드 수 상한
const MAX_AUTO_THREADS: usize = 16;

/// 레코드 처리 방식
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum ExecutionMode {
    /// 레코드를 하나씩 순서대로 처리
    #[default]
    Sequential,
    /// rayon 스레드 풀에서 레코드를 독립적으로 처리
    Parallel {
        /// `None`이면 논리 CPU 수 (최대 16)
        #[serde(default)]
        threads: Option<usize>,
    },
}

impl ExecutionMode {
    /// 실제로 사용할 스레드 수
    pub fn thread_count(&self) -> usize {
        match self {
            ExecutionMode::Sequential => 1,
            ExecutionMode::Parallel { threads: Some(n) } => *n,
            ExecutionMode::Parallel { threads: None } => num_cpus::get().min(MAX_AUTO_THREADS),
        }
    }

    fn parse_mode(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "sequential" => Some(ExecutionMode::Sequential),
            "parallel" => Some(ExecutionMode::Parallel { threads: None }),
            _ => None,
        }
    }
}

/// Optimizer 설정
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// 레코드 처리 방식
    pub execution: ExecutionMode,
    /// 프롬프트 제공자의 템플릿 대신 사용할 템플릿
    pub prompt_override: Option<String>,
}

impl OptimizerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// 병렬 모드 설정
    pub fn with_parallel(mut self, threads: Option<usize>) -> Self {
        self.execution = ExecutionMode::Parallel { threads };
        self
    }

    /// 프롬프트 템플릿 override
    pub fn with_prompt_override(mut self, template: impl Into<String>) -> Self {
        self.prompt_override = Some(template.into());
        self
    }

    /// 기본값에 환경 변수 적용
    pub fn from_env() -> DdlxResult<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// 환경 변수 값으로 덮어쓰기
    pub fn apply_env(&mut self) -> DdlxResult<()> {
        self.apply_vars(|key| env::var(key).ok())
    }

    /// 모든 값을 읽고 검증한 뒤 한 번에 반영 (실패 시 `self`는 그대로)
    ///
    /// `DDLX_THREADS`만 있으면 병렬 모드로 간주하고,
    /// `DDLX_EXECUTION=sequential`과 함께 쓰면 에러입니다.
    fn apply_vars(&mut self, var: impl Fn(&str) -> Option<String>) -> DdlxResult<()> {
        let mode = var(ENV_EXECUTION)
            .map(|value| {
                ExecutionMode::parse_mode(&value).ok_or_else(|| {
                    DdlxError::Config(format!(
                        "{}: unknown execution mode '{}'",
                        ENV_EXECUTION, value
                    ))
                })
            })
            .transpose()?;

        let threads = var(ENV_THREADS)
            .map(|value| {
                value.trim().parse::<usize>().map_err(|_| {
                    DdlxError::Config(format!("{}: not a number '{}'", ENV_THREADS, value))
                })
            })
            .transpose()?;

        let execution = match (mode, threads) {
            (Some(ExecutionMode::Sequential), Some(_)) => {
                return Err(DdlxError::Config(format!(
                    "{} is set but {} is 'sequential'",
                    ENV_THREADS, ENV_EXECUTION
                )));
            }
            (_, Some(n)) => ExecutionMode::Parallel { threads: Some(n) },
            (Some(mode), None) => mode,
            (None, None) => self.execution,
        };

        let candidate = Self {
            execution,
            prompt_override: var(ENV_PROMPT_TEMPLATE).or_else(|| self.prompt_override.clone()),
        };
        candidate.validate()?;

        *self = candidate;
        Ok(())
    }

    /// JSON 설정 파일에서 로드
    pub fn load_from_file(path: impl AsRef<Path>) -> DdlxResult<Self> {
        let json = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    /// JSON 설정 파일로 저장
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> DdlxResult<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, json)?;
        Ok(())
    }

    /// 설정 값 검증
    pub fn validate(&self) -> DdlxResult<()> {
        if let ExecutionMode::Parallel { threads: Some(0) } = self.execution {
            return Err(DdlxError::InvalidArguments(
                "Thread count must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_default_is_sequential() {
        let config = OptimizerConfig::default();
        assert_eq!(config.execution, ExecutionMode::Sequential);
        assert_eq!(config.execution.thread_count(), 1);
        assert!(config.prompt_override.is_none());
    }

    #[test]
    fn test_auto_thread_count_capped() {
        let mode = ExecutionMode::Parallel { threads: None };
        let count = mode.thread_count();
        assert!(count >= 1 && count <= 16);
    }

    #[test]
    fn test_apply_vars_parallel_mode() {
        let mut config = OptimizerConfig::new();
        config
            .apply_vars(vars(&[(ENV_EXECUTION, "Parallel")]))
            .unwrap();
        assert_eq!(config.execution, ExecutionMode::Parallel { threads: None });
    }

    #[test]
    fn test_apply_vars_threads_imply_parallel() {
        let mut config = OptimizerConfig::new();
        config.apply_vars(vars(&[(ENV_THREADS, "4")])).unwrap();
        assert_eq!(config.execution, ExecutionMode::Parallel { threads: Some(4) });
        assert_eq!(config.execution.thread_count(), 4);
    }

    #[test]
    fn test_apply_vars_prompt_override() {
        let mut config = OptimizerConfig::new();
        config
            .apply_vars(vars(&[(ENV_PROMPT_TEMPLATE, "{{sql_statement}}")]))
            .unwrap();
        assert_eq!(config.prompt_override.as_deref(), Some("{{sql_statement}}"));
    }

    #[test]
    fn test_apply_vars_rejects_bad_values() {
        let mut config = OptimizerConfig::new();
        assert!(matches!(
            config.apply_vars(vars(&[(ENV_EXECUTION, "turbo")])),
            Err(DdlxError::Config(_))
        ));
        assert!(matches!(
            config.apply_vars(vars(&[(ENV_THREADS, "many")])),
            Err(DdlxError::Config(_))
        ));
        assert!(matches!(
            config.apply_vars(vars(&[(ENV_THREADS, "0")])),
            Err(DdlxError::InvalidArguments(_))
        ));
    }

    #[test]
    fn test_apply_vars_sequential_with_threads_conflicts() {
        let mut config = OptimizerConfig::new();
        let err = config
            .apply_vars(vars(&[(ENV_EXECUTION, "sequential"), (ENV_THREADS, "4")]))
            .unwrap_err();
        assert!(matches!(err, DdlxError::Config(_)));
        assert_eq!(config, OptimizerConfig::new());
    }

    #[test]
    fn test_apply_vars_error_leaves_config_unchanged() {
        let original = OptimizerConfig::new().with_prompt_override("-- {{sql_statement}}");

        let mut config = original.clone();
        assert!(config
            .apply_vars(vars(&[
                (ENV_EXECUTION, "parallel"),
                (ENV_THREADS, "abc"),
                (ENV_PROMPT_TEMPLATE, "{{context}}"),
            ]))
            .is_err());
        assert_eq!(config, original);

        let mut config = original.clone();
        assert!(config.apply_vars(vars(&[(ENV_THREADS, "0")])).is_err());
        assert_eq!(config, original);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_apply_vars_keeps_unset_values() {
        let mut config = OptimizerConfig::new()
            .with_parallel(Some(2))
            .with_prompt_override("{{sql_statement}}");
        config.apply_vars(vars(&[])).unwrap();
        assert_eq!(config.execution, ExecutionMode::Parallel { threads: Some(2) });
        assert_eq!(config.prompt_override.as_deref(), Some("{{sql_statement}}"));
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("ddlx.json");

        let config = OptimizerConfig::new()
            .with_parallel(Some(2))
            .with_prompt_override("-- {{context}}\n{{sql_statement}}");
        config.save_to_file(&path).unwrap();

        let loaded = OptimizerConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ddlx.json");
        fs::write(&path, r#"{"execution": {"mode": "parallel"}}"#).unwrap();

        let loaded = OptimizerConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded.execution, ExecutionMode::Parallel { threads: None });
        assert!(loaded.prompt_override.is_none());
    }

    #[test]
    fn test_load_rejects_zero_threads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ddlx.json");
        fs::write(&path, r#"{"execution": {"mode": "parallel", "threads": 0}}"#).unwrap();

        assert!(OptimizerConfig::load_from_file(&path).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = OptimizerConfig::load_from_file(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, DdlxError::Io { .. }));
    }
}
