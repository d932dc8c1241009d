//! 애플리케이션 설정 구조체.
//!
//! GitHub API 연결, 제안 행 개수와 커서 범위, 아바타 로딩 설정을 정의한다.
//! `ConfigManager`를 통해 JSON 파일에서 로드하고 CLI 인자로 덮어쓴다.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::CoreError;

/// 최상위 애플리케이션 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// GitHub API 연결 설정
    #[serde(default)]
    pub github: GithubConfig,
    /// 제안 엔진 설정
    #[serde(default)]
    pub suggestion: SuggestionConfig,
    /// 아바타 로딩 설정
    #[serde(default)]
    pub avatar: AvatarConfig,
}

// ============================================================
// GitHub 설정
// ============================================================

/// GitHub API 연결 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubConfig {
    /// API 기본 URL
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// 요청 타임아웃 (밀리초)
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// 재시도 가능한 에러의 최대 재시도 횟수
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// User-Agent 헤더 (GitHub API 필수)
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// 개인 액세스 토큰 (선택, 한도 상향용)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_ms: default_request_timeout_ms(),
            max_retries: default_max_retries(),
            user_agent: default_user_agent(),
            token: None,
        }
    }
}

// ============================================================
// 제안 엔진 설정
// ============================================================

/// 제안 엔진 설정: 행 개수와 무작위 커서 범위
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionConfig {
    /// 표시 행 개수
    #[serde(default = "default_row_count")]
    pub row_count: usize,
    /// 커서 최소값 (포함)
    #[serde(default = "default_cursor_min")]
    pub cursor_min: u64,
    /// 커서 최대값 (포함)
    #[serde(default = "default_cursor_max")]
    pub cursor_max: u64,
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            row_count: default_row_count(),
            cursor_min: default_cursor_min(),
            cursor_max: default_cursor_max(),
        }
    }
}

// ============================================================
// 아바타 설정
// ============================================================

/// 아바타 로딩 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvatarConfig {
    /// 아바타 다운로드 활성화
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// 요청 크기 (px, `?s=` 파라미터)
    #[serde(default = "default_avatar_size_px")]
    pub size_px: u32,
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            size_px: default_avatar_size_px(),
        }
    }
}

// ============================================================
// AppConfig impl
// ============================================================

impl AppConfig {
    /// 기본 설정값 반환
    pub fn default_config() -> Self {
        Self {
            github: GithubConfig::default(),
            suggestion: SuggestionConfig::default(),
            avatar: AvatarConfig::default(),
        }
    }

    /// 설정값 검증
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.github.base_url.trim().is_empty() {
            return Err(CoreError::validation("github.base_url", "비어 있음"));
        }
        if self.github.request_timeout_ms == 0 {
            return Err(CoreError::validation(
                "github.request_timeout_ms",
                "0보다 커야 함",
            ));
        }
        if self.suggestion.row_count == 0 {
            return Err(CoreError::validation(
                "suggestion.row_count",
                "1 이상이어야 함",
            ));
        }
        if self.suggestion.cursor_min == 0 {
            return Err(CoreError::validation(
                "suggestion.cursor_min",
                "커서는 양의 정수여야 함",
            ));
        }
        if self.suggestion.cursor_min > self.suggestion.cursor_max {
            return Err(CoreError::validation(
                "suggestion.cursor_max",
                format!(
                    "cursor_min({}) > cursor_max({})",
                    self.suggestion.cursor_min, self.suggestion.cursor_max
                ),
            ));
        }
        Ok(())
    }

    /// GitHub 요청 타임아웃을 Duration으로 반환
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.github.request_timeout_ms)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::default_config()
    }
}

// ============================================================
// 기본값 함수
// ============================================================

fn default_true() -> bool {
    true
}

fn default_base_url() -> String {
    "https://api.github.com".to_string()
}
fn default_request_timeout_ms() -> u64 {
    10_000
}
fn default_max_retries() -> u32 {
    2
}
fn default_user_agent() -> String {
    concat!("whotofollow/", env!("CARGO_PKG_VERSION")).to_string()
}
fn default_row_count() -> usize {
    3
}
fn default_cursor_min() -> u64 {
    1
}
fn default_cursor_max() -> u64 {
    1000
}
fn default_avatar_size_px() -> u32 {
    80
}
