//! 행 뷰 포트.
//!
//! 구현: `whotofollow-app` crate (콘솔 렌더러). 제안 엔진은 UI API를 직접
//! 호출하지 않고, 행 태스크가 소유한 프레젠터만 이 trait을 호출한다.

use crate::models::avatar::Avatar;
use crate::models::row::{RowId, UserCardView};

/// 한 행의 시각 요소 (이름, 아바타, 닫기 버튼)
///
/// 호출은 항상 해당 행을 소유한 태스크에서 순서대로 일어난다.
pub trait RowView: Send {
    /// 모든 시각 요소 비우기
    fn clear(&mut self, row: RowId);

    /// 사용자 이름과 닫기 버튼 표시 (아바타는 자리표시자)
    fn show_user(&mut self, row: RowId, card: &UserCardView);

    /// 현재 표시 중인 사용자의 아바타 적용
    fn show_avatar(&mut self, row: RowId, user_id: u64, avatar: &Avatar);
}
