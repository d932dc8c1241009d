//! GitHub 사용자 목록 클라이언트.
//!
//! `UserSource` 포트 구현. `GET /users?since=N` + 관대한 디코딩 + 재시도 로직.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use std::time::Duration;
use tracing::debug;
use whotofollow_core::config::GithubConfig;
use whotofollow_core::error::CoreError;
use whotofollow_core::models::user::UserBatch;
use whotofollow_core::ports::user_source::UserSource;

use crate::response::{check_response, map_send_error};
use crate::retry::RetryPolicy;

/// GitHub REST API 미디어 타입
const GITHUB_ACCEPT: &str = "application/vnd.github+json";

/// GitHub REST API 버전 헤더
const GITHUB_API_VERSION: &str = "2022-11-28";

/// User-Agent와 타임아웃만 설정된 reqwest 클라이언트 생성
///
/// 인증 헤더는 넣지 않는다. 아바타처럼 응답 본문이 가리키는 임의 호스트로도
/// 요청하는 클라이언트가 공유하기 때문이다.
pub(crate) fn build_http_client(
    github: &GithubConfig,
    timeout: Duration,
) -> Result<reqwest::Client, CoreError> {
    build_client(github, timeout, HeaderMap::new())
}

/// GitHub REST API 전용 클라이언트 (미디어 타입, API 버전 기본 헤더)
fn build_api_client(github: &GithubConfig, timeout: Duration) -> Result<reqwest::Client, CoreError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_ACCEPT));
    headers.insert(
        "x-github-api-version",
        HeaderValue::from_static(GITHUB_API_VERSION),
    );
    build_client(github, timeout, headers)
}

fn build_client(
    github: &GithubConfig,
    timeout: Duration,
    headers: HeaderMap,
) -> Result<reqwest::Client, CoreError> {
    reqwest::Client::builder()
        .user_agent(github.user_agent.clone())
        .default_headers(headers)
        .timeout(timeout)
        .build()
        .map_err(|e| CoreError::Network(format!("HTTP 클라이언트 빌드 실패: {e}")))
}

/// 설정된 토큰의 `Authorization: Bearer` 값 (없거나 비어 있으면 None)
fn bearer_value(github: &GithubConfig) -> Result<Option<HeaderValue>, CoreError> {
    let Some(token) = github.token.as_deref().filter(|t| !t.trim().is_empty()) else {
        return Ok(None);
    };
    let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
        .map_err(|e| CoreError::Config(format!("잘못된 토큰 값: {e}")))?;
    value.set_sensitive(true);
    Ok(Some(value))
}

/// GitHub 사용자 목록 클라이언트: `UserSource` 포트 구현
pub struct GithubUserClient {
    client: reqwest::Client,
    base_url: String,
    /// API 요청에만 붙이는 인증 헤더
    auth: Option<HeaderValue>,
    retry: RetryPolicy,
}

impl GithubUserClient {
    /// 새 클라이언트 생성
    pub fn new(github: &GithubConfig, timeout: Duration) -> Result<Self, CoreError> {
        Ok(Self {
            client: build_api_client(github, timeout)?,
            base_url: github.base_url.trim_end_matches('/').to_string(),
            auth: bearer_value(github)?,
            retry: RetryPolicy::with_max_retries(github.max_retries),
        })
    }

    /// 재시도 정책 교체
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn users_url(&self, since: u64) -> String {
        format!("{}/users?since={}", self.base_url, since)
    }
}

#[async_trait]
impl UserSource for GithubUserClient {
    async fn fetch_users(&self, since: u64) -> Result<UserBatch, CoreError> {
        if since == 0 {
            return Err(CoreError::validation("since", "커서는 양의 정수여야 함"));
        }

        let url = self.users_url(since);
        let url = url.as_str();
        let client = &self.client;
        let auth = self.auth.as_ref();
        debug!("사용자 목록 요청: since={since}");

        self.retry
            .execute(|| async move {
                let mut request = client.get(url);
                if let Some(auth) = auth {
                    request = request.header(AUTHORIZATION, auth.clone());
                }
                let resp = request
                    .send()
                    .await
                    .map_err(|e| map_send_error("사용자 목록 요청 실패", e))?;

                let resp = check_response(resp).await?;
                let body = resp
                    .text()
                    .await
                    .map_err(|e| CoreError::Network(format!("응답 본문 수신 실패: {e}")))?;

                let decoded = UserBatch::decode_lenient(&body)
                    .map_err(|e| CoreError::Internal(format!("사용자 목록 파싱 실패: {e}")))?;

                if decoded.dropped > 0 {
                    debug!("디코딩 실패 항목 제외: {}개", decoded.dropped);
                }
                debug!("사용자 목록 수신: since={since}, {}명", decoded.batch.len());
                Ok(decoded.batch)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn test_config(base_url: &str) -> GithubConfig {
        GithubConfig {
            base_url: base_url.to_string(),
            ..GithubConfig::default()
        }
    }

    fn fast_retry(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(5),
        }
    }

    fn client_for(server: &mockito::ServerGuard, max_retries: u32) -> GithubUserClient {
        GithubUserClient::new(&test_config(&server.url()), Duration::from_secs(5))
            .unwrap()
            .with_retry_policy(fast_retry(max_retries))
    }

    #[test]
    fn client_creation_trims_base_url() {
        let client = GithubUserClient::new(
            &test_config("https://api.github.com/"),
            Duration::from_secs(10),
        )
        .unwrap();
        assert_eq!(client.base_url, "https://api.github.com");
        assert_eq!(client.users_url(42), "https://api.github.com/users?since=42");
        assert_eq!(client.retry.max_retries, 2);
    }

    #[tokio::test]
    async fn fetch_users_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/users")
            .match_query(Matcher::UrlEncoded("since".into(), "42".into()))
            .match_header("accept", GITHUB_ACCEPT)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[
                    {"id":43,"login":"alice","avatar_url":"http://a/43.png"},
                    {"id":44,"login":"bob","avatar_url":"http://a/44.png"}
                ]"#,
            )
            .create_async()
            .await;

        let batch = client_for(&server, 0).fetch_users(42).await.unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.as_slice()[0].name, "alice");
        assert_eq!(batch.as_slice()[1].id, 44);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn malformed_entries_are_dropped() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/users")
            .match_query(Matcher::UrlEncoded("since".into(), "7".into()))
            .with_status(200)
            .with_body(
                r#"[
                    {"id":8,"login":"keep","avatar_url":"http://a/8.png"},
                    {"id":9,"avatar_url":"http://a/9.png"}
                ]"#,
            )
            .create_async()
            .await;

        let batch = client_for(&server, 0).fetch_users(7).await.unwrap();
        assert_eq!(batch.len(), 1);
        assert!(batch.contains_id(8));
    }

    #[tokio::test]
    async fn non_array_body_fails() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/users")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"message":"unexpected"}"#)
            .create_async()
            .await;

        let result = client_for(&server, 0).fetch_users(1).await;
        assert!(matches!(result, Err(CoreError::Internal(_))));
    }

    #[tokio::test]
    async fn zero_cursor_rejected_without_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/users")
            .match_query(Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let result = client_for(&server, 0).fetch_users(0).await;
        assert!(matches!(result, Err(CoreError::Validation { .. })));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn token_sent_as_bearer() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/users")
            .match_query(Matcher::Any)
            .match_header("authorization", "Bearer ghp_test")
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let config = GithubConfig {
            token: Some("ghp_test".to_string()),
            ..test_config(&server.url())
        };
        let client = GithubUserClient::new(&config, Duration::from_secs(5)).unwrap();

        let batch = client.fetch_users(1).await.unwrap();
        assert!(batch.is_empty());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn service_unavailable_is_retried() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/users")
            .match_query(Matcher::Any)
            .with_status(503)
            .with_body("Service Unavailable")
            .expect(3)
            .create_async()
            .await;

        let result = client_for(&server, 2).fetch_users(5).await;
        assert!(matches!(result, Err(CoreError::ServiceUnavailable(_))));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn not_found_is_not_retried() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/users")
            .match_query(Matcher::Any)
            .with_status(404)
            .with_body("Not Found")
            .expect(1)
            .create_async()
            .await;

        let result = client_for(&server, 3).fetch_users(5).await;
        assert!(matches!(result, Err(CoreError::NotFound { .. })));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn exhausted_quota_is_rate_limit() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/users")
            .match_query(Matcher::Any)
            .with_status(403)
            .with_header("x-ratelimit-remaining", "0")
            .with_header("retry-after", "30")
            .with_body("API rate limit exceeded")
            .create_async()
            .await;

        let result = client_for(&server, 0).fetch_users(5).await;
        assert!(matches!(
            result,
            Err(CoreError::RateLimit {
                retry_after_secs: 30
            })
        ));
    }

    #[tokio::test]
    async fn forbidden_without_quota_headers_is_auth() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/users")
            .match_query(Matcher::Any)
            .with_status(403)
            .with_body("Forbidden")
            .create_async()
            .await;

        let result = client_for(&server, 0).fetch_users(5).await;
        assert!(matches!(result, Err(CoreError::Auth(_))));
    }

    #[tokio::test]
    async fn transport_failure_is_network_error() {
        // 닫힌 포트로 연결 → 즉시 거부
        let client = GithubUserClient::new(&test_config("http://127.0.0.1:1"), Duration::from_secs(2))
            .unwrap()
            .with_retry_policy(fast_retry(0));

        let result = client.fetch_users(5).await;
        assert!(matches!(result, Err(CoreError::Network(_))));
    }
}
