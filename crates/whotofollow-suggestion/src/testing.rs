//! 테스트 공용 헬퍼 (mock 포트 구현).

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::Semaphore;
use whotofollow_core::error::CoreError;
use whotofollow_core::models::avatar::Avatar;
use whotofollow_core::models::row::{RowId, UserCardView};
use whotofollow_core::models::user::{User, UserBatch};
use whotofollow_core::ports::avatar_loader::AvatarLoader;
use whotofollow_core::ports::row_view::RowView;
use whotofollow_core::ports::user_source::UserSource;

pub(crate) fn user(id: u64) -> User {
    User {
        id,
        name: format!("user{id}"),
        avatar_url: format!("http://avatars/{id}"),
    }
}

pub(crate) fn batch_of(ids: &[u64]) -> UserBatch {
    ids.iter().copied().map(user).collect()
}

/// 뷰 호출 기록 (row index, user id)
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ViewCall {
    Clear(usize),
    ShowUser(usize, u64),
    ShowAvatar(usize, u64),
}

#[derive(Clone, Default)]
pub(crate) struct RecordingView {
    calls: Arc<Mutex<Vec<ViewCall>>>,
}

impl RecordingView {
    pub(crate) fn calls(&self) -> Vec<ViewCall> {
        self.calls.lock().clone()
    }
}

impl RowView for RecordingView {
    fn clear(&mut self, row: RowId) {
        self.calls.lock().push(ViewCall::Clear(row.index()));
    }

    fn show_user(&mut self, row: RowId, card: &UserCardView) {
        self.calls
            .lock()
            .push(ViewCall::ShowUser(row.index(), card.user_id));
    }

    fn show_avatar(&mut self, row: RowId, user_id: u64, _avatar: &Avatar) {
        self.calls
            .lock()
            .push(ViewCall::ShowAvatar(row.index(), user_id));
    }
}

struct Step {
    result: Result<UserBatch, CoreError>,
    gate: Option<Arc<Semaphore>>,
}

/// 미리 정한 순서대로 응답하는 사용자 조회 mock
///
/// 스크립트가 소진되면 빈 배치를 돌려준다.
#[derive(Default)]
pub(crate) struct ScriptedSource {
    script: Mutex<VecDeque<Step>>,
    cursors: Mutex<Vec<u64>>,
}

impl ScriptedSource {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn then_ok(self, ids: &[u64]) -> Self {
        self.push(Ok(batch_of(ids)), None);
        self
    }

    pub(crate) fn then_err(self, error: CoreError) -> Self {
        self.push(Err(error), None);
        self
    }

    /// 게이트가 열릴 때까지 응답을 보류하는 단계 추가
    pub(crate) fn then_gated_ok(&self, ids: &[u64]) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        self.push(Ok(batch_of(ids)), Some(gate.clone()));
        gate
    }

    /// 호출된 커서 목록
    pub(crate) fn cursors(&self) -> Vec<u64> {
        self.cursors.lock().clone()
    }

    fn push(&self, result: Result<UserBatch, CoreError>, gate: Option<Arc<Semaphore>>) {
        self.script.lock().push_back(Step { result, gate });
    }
}

#[async_trait]
impl UserSource for ScriptedSource {
    async fn fetch_users(&self, since: u64) -> Result<UserBatch, CoreError> {
        self.cursors.lock().push(since);
        let step = self.script.lock().pop_front();
        let Some(step) = step else {
            return Ok(UserBatch::empty());
        };

        if let Some(gate) = step.gate {
            let _permit = gate
                .acquire()
                .await
                .map_err(|e| CoreError::Internal(e.to_string()))?;
        }
        step.result
    }
}

/// 게이트로 완료 시점을 조절하는 아바타 로더 mock
pub(crate) struct GatedAvatarLoader {
    gate: Arc<Semaphore>,
    fail: bool,
}

impl GatedAvatarLoader {
    /// 즉시 완료
    pub(crate) fn open() -> Self {
        Self {
            gate: Arc::new(Semaphore::new(Semaphore::MAX_PERMITS)),
            fail: false,
        }
    }

    /// `gate()`에 허가를 추가해야 완료
    pub(crate) fn closed() -> Self {
        Self {
            gate: Arc::new(Semaphore::new(0)),
            fail: false,
        }
    }

    /// 즉시 실패
    pub(crate) fn failing() -> Self {
        Self {
            fail: true,
            ..Self::open()
        }
    }

    pub(crate) fn gate(&self) -> Arc<Semaphore> {
        self.gate.clone()
    }
}

#[async_trait]
impl AvatarLoader for GatedAvatarLoader {
    async fn load(&self, avatar_url: &str) -> Result<Avatar, CoreError> {
        let _permit = self
            .gate
            .acquire()
            .await
            .map_err(|e| CoreError::Internal(e.to_string()))?;
        if self.fail {
            return Err(CoreError::Network(format!("{avatar_url} 연결 실패")));
        }
        Ok(Avatar {
            url: avatar_url.to_string(),
            content_type: Some("image/png".to_string()),
            bytes: vec![0x89, b'P', b'N', b'G'],
        })
    }
}
