//! 공유 "최신 배치" 슬롯.
//!
//! 완료된 조회마다 한 번 교체되는 버전 있는 불변 스냅샷.
//! 읽는 쪽은 `Arc`만 복제하므로 부분적으로 갱신된 값을 볼 수 없다.

use chrono::Utc;
use std::sync::Arc;
use tokio::sync::watch;
use whotofollow_core::models::batch::BatchSnapshot;
use whotofollow_core::models::user::UserBatch;

/// 최신 배치 슬롯 (단일 쓰기, 다중 읽기)
#[derive(Debug)]
pub struct BatchSlot {
    tx: watch::Sender<Arc<BatchSnapshot>>,
}

impl BatchSlot {
    /// 버전 0의 빈 배치로 초기화
    pub fn new() -> Self {
        let (tx, _) = watch::channel(Arc::new(BatchSnapshot::initial()));
        Self { tx }
    }

    /// 새 배치 게시 (버전 +1)
    pub fn publish(&self, cursor: u64, users: UserBatch) -> Arc<BatchSnapshot> {
        let version = self.tx.borrow().version + 1;
        let snapshot = Arc::new(BatchSnapshot {
            version,
            cursor: Some(cursor),
            users,
            fetched_at: Some(Utc::now()),
        });
        self.tx.send_replace(snapshot.clone());
        snapshot
    }

    /// 현재 최신 스냅샷
    pub fn latest(&self) -> Arc<BatchSnapshot> {
        self.tx.borrow().clone()
    }

    /// 스냅샷 변경 구독
    pub fn subscribe(&self) -> watch::Receiver<Arc<BatchSnapshot>> {
        self.tx.subscribe()
    }
}

impl Default for BatchSlot {
    fn default() -> Self {
        Self::new()
    }
}
