//! 아바타 다운로드 클라이언트.
//!
//! `AvatarLoader` 포트 구현. 실패는 재시도하지 않는다 (자리표시자 유지).

use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;
use whotofollow_core::config::GithubConfig;
use whotofollow_core::error::CoreError;
use whotofollow_core::models::avatar::Avatar;
use whotofollow_core::ports::avatar_loader::AvatarLoader;

use crate::github_client::build_http_client;
use crate::response::{check_response, map_send_error};

/// HTTP 아바타 로더: `AvatarLoader` 포트 구현
pub struct HttpAvatarLoader {
    client: reqwest::Client,
    size_px: u32,
}

impl HttpAvatarLoader {
    /// 새 아바타 로더 생성
    pub fn new(github: &GithubConfig, timeout: Duration, size_px: u32) -> Result<Self, CoreError> {
        Ok(Self {
            client: build_http_client(github, timeout)?,
            size_px,
        })
    }
}

/// 크기 파라미터(`s`)를 붙인 아바타 URL
fn sized_url(url: &str, size: u32) -> String {
    if url.contains('?') {
        format!("{url}&s={size}")
    } else {
        format!("{url}?s={size}")
    }
}

#[async_trait]
impl AvatarLoader for HttpAvatarLoader {
    async fn load(&self, avatar_url: &str) -> Result<Avatar, CoreError> {
        let url = sized_url(avatar_url, self.size_px);

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| map_send_error("아바타 요청 실패", e))?;
        let resp = check_response(resp).await?;

        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| CoreError::Network(format!("아바타 본문 수신 실패: {e}")))?;

        debug!("아바타 수신: {url} ({}B)", bytes.len());
        Ok(Avatar {
            url,
            content_type,
            bytes: bytes.to_vec(),
        })
    }
}
