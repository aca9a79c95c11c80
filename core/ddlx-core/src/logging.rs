//! tracing subscriber 초기화
//!
//! DDLX 로그 레벨:
//! - `error` — 배치 실패 보고 (`TracingSink`)
//! - `warn` — 진단 수신자가 실패 보고를 거부한 경우
//! - `debug` — 배치 크기, 스레드 수, 소요 시간, 입력 가드로 건너뛴 배치
//! - `trace` — 레코드별 렌더링된 프롬프트와 생성 결과, 백엔드 호출
//!
//! `logging` feature가 꺼져 있으면 모든 함수는 아무 일도 하지 않습니다.

#[cfg(feature = "logging")]
use tracing_subscriber::{EnvFilter, fmt};

/// `RUST_LOG`가 없으면 `ddlx_core=info`로 초기화
///
/// ```rust
/// ddlx_core::logging::init();
/// ```
#[cfg(feature = "logging")]
pub fn init() {
    init_with_level("info")
}

/// `RUST_LOG`가 없으면 `ddlx_core=<level>`로 초기화
///
/// 프롬프트와 생성 결과까지 보려면 `"trace"`를 사용합니다.
/// 이미 전역 subscriber가 있으면 무시됩니다.
#[cfg(feature = "logging")]
pub fn init_with_level(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("ddlx_core={}", level)));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(true)
        .try_init();
}

/// 테스트용: `ddlx_core=trace`, test writer 출력
#[cfg(feature = "logging")]
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("ddlx_core=trace"))
        .with_test_writer()
        .try_init();
}

#[cfg(not(feature = "logging"))]
pub fn init() {}

#[cfg(not(feature = "logging"))]
pub fn init_with_level(_level: &str) {}

#[cfg(not(feature = "logging"))]
pub fn init_test() {}
