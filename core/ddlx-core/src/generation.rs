//! Generation backend
//!
//! 렌더링된 프롬프트 → 생성 텍스트 변환 인터페이스

use crate::error::DdlxResult;

/// 텍스트 생성 백엔드 (모델 호출)
pub trait TextGenerator: Send + Sync {
    /// 프롬프트로부터 텍스트 생성
    fn generate(&self, prompt: &str) -> DdlxResult<String>;

    /// 백엔드 이름
    fn name(&self) -> &str;
}

/// 클로저 기반 생성기
pub struct FnGenerator {
    name: String,
    func: Box<dyn Fn(&str) -> DdlxResult<String> + Send + Sync>,
}

impl FnGenerator {
    /// 새 클로저 생성기
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&str) -> DdlxResult<String> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Box::new(func),
        }
    }
}

impl TextGenerator for FnGenerator {
    fn generate(&self, prompt: &str) -> DdlxResult<String> {
        (self.func)(prompt)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for FnGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnGenerator").field("name", &self.name).finish()
    }
}
