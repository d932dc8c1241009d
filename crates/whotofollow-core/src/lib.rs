//! # whotofollow-core
//!
//! WhoToFollow 도메인 모델, 포트(trait) 정의, 에러 타입.
//! 모든 크레이트가 공유하는 핵심 타입과 인터페이스를 제공한다.
//!
//! ## 구조
//!
//! - [`models`]: 도메인 데이터 구조체 (사용자, 배치, 행 상태)
//! - [`ports`]: Hexagonal Architecture 포트 인터페이스 (async_trait)
//! - [`error`]: 핵심 에러 타입 (thiserror)
//! - [`config`]: 애플리케이션 설정 구조체
//! - [`config_manager`]: 설정 파일 관리 (로드/저장)

pub mod config;
pub mod config_manager;
pub mod error;
pub mod models;
pub mod ports;

#[cfg(test)]
mod tests {
    use crate::models::row::RowState;
    use crate::models::user::User;

    #[test]
    fn user_serde_uses_github_field_names() {
        let user = User {
            id: 7,
            name: "octocat".to_string(),
            avatar_url: "https://avatars.githubusercontent.com/u/7".to_string(),
        };

        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["login"], "octocat");
        assert_eq!(json["avatar_url"], "https://avatars.githubusercontent.com/u/7");

        let back: User = serde_json::from_value(json).unwrap();
        assert_eq!(back, user);
    }

    #[test]
    fn row_state_serde_tagged() {
        let json = serde_json::to_string(&RowState::Empty).unwrap();
        assert_eq!(json, r#"{"state":"empty"}"#);
    }

    #[test]
    fn config_defaults() {
        let config = crate::config::AppConfig::default_config();
        assert_eq!(config.github.base_url, "https://api.github.com");
        assert_eq!(config.suggestion.row_count, 3);
        assert_eq!(config.suggestion.cursor_min, 1);
        assert_eq!(config.suggestion.cursor_max, 1000);
        assert!(config.avatar.enabled);
    }
}
