//! 행(row) 모델.
//!
//! 고정 위치의 추천 슬롯과 그 상태, UI 표시용 카드 데이터.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::user::User;

/// 행 식별자 (0부터 시작)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RowId(pub usize);

impl RowId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row#{}", self.0)
    }
}

/// 행 상태: 비어 있거나 사용자 한 명을 표시 중
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "user", rename_all = "snake_case")]
pub enum RowState {
    /// 할당된 사용자 없음
    #[default]
    Empty,
    /// 사용자 표시 중
    Showing(User),
}

impl RowState {
    /// 표시 중인 사용자
    pub fn user(&self) -> Option<&User> {
        match self {
            RowState::Empty => None,
            RowState::Showing(user) => Some(user),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, RowState::Empty)
    }
}

impl From<Option<User>> for RowState {
    fn from(user: Option<User>) -> Self {
        user.map_or(RowState::Empty, RowState::Showing)
    }
}

/// UI 표시용 사용자 카드
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserCardView {
    /// GitHub 사용자 ID
    pub user_id: u64,
    /// 표시 이름 (login)
    pub name: String,
    /// 아바타 이미지 URL
    pub avatar_url: String,
    /// 프로필 페이지 URL
    pub profile_url: String,
    /// 닫기(dismiss) 버튼 표시 여부
    pub dismiss_visible: bool,
}
