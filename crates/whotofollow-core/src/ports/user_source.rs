//! 사용자 조회 포트.
//!
//! 구현: `whotofollow-network` crate (reqwest)

use async_trait::async_trait;

use crate::error::CoreError;
use crate::models::user::UserBatch;

/// 커서 기반 사용자 목록 조회
#[async_trait]
pub trait UserSource: Send + Sync {
    /// `since` 이후 ID의 사용자 한 페이지 조회
    ///
    /// `since`는 양의 정수여야 한다. 개별 항목 디코딩 실패는 결과에서 제외될 뿐
    /// 에러가 아니며, 전송 실패만 `Err`로 반환한다.
    async fn fetch_users(&self, since: u64) -> Result<UserBatch, CoreError>;
}
