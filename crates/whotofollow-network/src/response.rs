//! 응답 상태 코드 확인 및 에러 매핑.

use tracing::warn;
use whotofollow_core::error::CoreError;

/// Retry-After 헤더가 없을 때 기본 대기 시간 (초)
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// 전송 단계 에러 매핑
pub fn map_send_error(context: &str, error: reqwest::Error) -> CoreError {
    if error.is_timeout() {
        CoreError::Network(format!("{context}: 타임아웃: {error}"))
    } else {
        CoreError::Network(format!("{context}: {error}"))
    }
}

/// 응답 상태 코드 확인 및 에러 매핑
///
/// GitHub는 한도 소진 시 403 + `x-ratelimit-remaining: 0`을 반환한다.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, CoreError> {
    let status = resp.status();

    if status.is_success() {
        return Ok(resp);
    }

    let rate_limit_wait = rate_limit_wait_secs(resp.headers());
    let text = resp.text().await.unwrap_or_else(|e| {
        warn!("응답 본문 읽기 실패: {e}");
        String::new()
    });

    match status.as_u16() {
        401 => Err(CoreError::Auth(format!("인증 실패: {text}"))),
        403 => match rate_limit_wait {
            Some(retry_after_secs) => Err(CoreError::RateLimit { retry_after_secs }),
            None => Err(CoreError::Auth(format!("접근 거부: {text}"))),
        },
        404 => Err(CoreError::NotFound {
            resource_type: "API".to_string(),
            id: text,
        }),
        429 => Err(CoreError::RateLimit {
            retry_after_secs: rate_limit_wait.unwrap_or(DEFAULT_RETRY_AFTER_SECS),
        }),
        503 => Err(CoreError::ServiceUnavailable(text)),
        _ => Err(CoreError::Internal(format!("API 에러 ({status}): {text}"))),
    }
}

/// 한도 초과 응답이면 대기 시간(초) 계산
///
/// `retry-after`가 우선이고, 없으면 `x-ratelimit-remaining: 0`일 때
/// `x-ratelimit-reset`(epoch 초)까지 남은 시간을 사용한다.
fn rate_limit_wait_secs(headers: &reqwest::header::HeaderMap) -> Option<u64> {
    let header_u64 = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
    };

    if let Some(secs) = header_u64("retry-after") {
        return Some(secs);
    }

    if header_u64("x-ratelimit-remaining") == Some(0) {
        let now = chrono::Utc::now().timestamp().max(0) as u64;
        let wait = header_u64("x-ratelimit-reset")
            .map(|reset| reset.saturating_sub(now).max(1))
            .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
        return Some(wait);
    }

    None
}
