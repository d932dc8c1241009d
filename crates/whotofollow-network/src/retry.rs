//! 재시도 정책.
//!
//! exponential backoff: 1s → 2s → 4s (최대 30s)

use std::future::Future;
use std::time::Duration;
use tracing::warn;
use whotofollow_core::error::CoreError;

/// 기본 재시도 횟수
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// 재시도 가능한 에러인지 판별
pub fn is_retryable(error: &CoreError) -> bool {
    matches!(
        error,
        CoreError::Network(_) | CoreError::ServiceUnavailable(_) | CoreError::RateLimit { .. }
    )
}

/// 재시도 정책
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// 최초 시도 이후 최대 재시도 횟수
    pub max_retries: u32,
    /// 첫 재시도 대기 시간
    pub base_delay: Duration,
    /// 대기 시간 상한 (RateLimit 대기에도 적용)
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    pub fn with_max_retries(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }

    /// 재시도가 포함된 요청 실행
    pub async fn execute<F, Fut, T>(&self, operation: F) -> Result<T, CoreError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, CoreError>>,
    {
        let mut delay = self.base_delay;
        let mut attempt = 0;

        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    if !is_retryable(&e) || attempt >= self.max_retries {
                        return Err(e);
                    }

                    // RateLimit의 경우 서버 지정 대기 시간 사용
                    let wait = match &e {
                        CoreError::RateLimit { retry_after_secs } => {
                            Duration::from_secs(*retry_after_secs).min(self.max_delay)
                        }
                        _ => delay,
                    };

                    warn!(
                        "요청 실패 (시도 {}/{}): {e}, {wait:?} 후 재시도",
                        attempt + 1,
                        self.max_retries + 1
                    );

                    tokio::time::sleep(wait).await;
                    delay = (delay * 2).min(self.max_delay);
                    attempt += 1;
                }
            }
        }
    }
}
