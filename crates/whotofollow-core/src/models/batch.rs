//! 배치 스냅샷과 조회 상태.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::user::UserBatch;

/// "최신 배치" 슬롯에 저장되는 불변 스냅샷
///
/// 버전 0은 초기 빈 배치. 완료된 조회마다 1씩 증가한다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchSnapshot {
    /// 단조 증가 버전
    pub version: u64,
    /// 조회에 사용한 커서 (초기 스냅샷은 None)
    pub cursor: Option<u64>,
    /// 사용자 목록
    pub users: UserBatch,
    /// 조회 완료 시각
    pub fetched_at: Option<DateTime<Utc>>,
}

impl BatchSnapshot {
    /// 초기 빈 스냅샷
    pub fn initial() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

/// 사용자 조회 상태
///
/// "조회 실패"를 "빈 결과"와 구분해서 노출한다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FetchStatus {
    /// 아직 조회한 적 없음
    #[default]
    Idle,
    /// 조회 진행 중
    InFlight { generation: u64, cursor: u64 },
    /// 조회 성공 및 게시 완료
    Completed {
        generation: u64,
        version: u64,
        users: usize,
    },
    /// 조회 실패 (행 상태는 유지)
    Failed { generation: u64, message: String },
    /// 더 최신 새로고침에 밀려 결과 폐기 (조회 완료 처리의 반환값, 상태 채널에는 게시하지 않음)
    Superseded { generation: u64 },
}

impl FetchStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, FetchStatus::Failed { .. })
    }
}
