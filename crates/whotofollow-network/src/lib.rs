//! # whotofollow-network
//!
//! GitHub REST 네트워크 어댑터.
//! `UserSource` / `AvatarLoader` 포트를 reqwest로 구현하며,
//! 상태 코드별 에러 매핑과 지수 백오프 재시도를 담당한다.
//!
//! ## 사용 예시
//!
//! ```rust,ignore
//! use whotofollow_network::github_client::GithubUserClient;
//! use whotofollow_network::avatar_client::HttpAvatarLoader;
//!
//! let users = GithubUserClient::new(&config.github, config.request_timeout())?;
//! let avatars = HttpAvatarLoader::new(&config.github, config.request_timeout(), 80)?;
//! ```

pub mod avatar_client;
pub mod github_client;
pub mod response;
pub mod retry;
