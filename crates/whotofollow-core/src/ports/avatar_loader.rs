//! 아바타 로더 포트.
//!
//! 구현: `whotofollow-network` crate (reqwest)

use async_trait::async_trait;

use crate::error::CoreError;
use crate::models::avatar::Avatar;

/// 아바타 이미지 다운로드
#[async_trait]
pub trait AvatarLoader: Send + Sync {
    /// 아바타 URL에서 이미지 바이트 다운로드
    async fn load(&self, avatar_url: &str) -> Result<Avatar, CoreError>;
}
