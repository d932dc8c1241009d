//! 행 상태 머신과 행 태스크.
//!
//! 행마다 하나의 FIFO 이벤트 큐를 두어 새로고침/닫기/배치 갱신을
//! 도착 순서대로 처리한다. 나중에 처리된 이벤트가 항상 이긴다.

use rand::Rng;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::debug;
use whotofollow_core::models::batch::BatchSnapshot;
use whotofollow_core::models::row::{RowId, RowState};

use crate::picker::pick_random;
use crate::presenter::{AvatarCompletion, RowPresenter};

/// 행 이벤트
#[derive(Debug, Clone)]
pub enum RowEvent {
    /// 전역 새로고침 → 즉시 비움
    Refresh,
    /// 이 행의 닫기 → 최신 배치에서 다시 선택
    Dismiss,
    /// 새 배치 게시 (최신 닫기와 새 배치의 결합)
    BatchUpdated(Arc<BatchSnapshot>),
}

/// 행 하나의 순수 상태 머신
pub struct RowMachine<R> {
    row: RowId,
    state: RowState,
    /// 닫기 이벤트를 한 번이라도 받았는지 (결합 조건)
    dismissed: bool,
    rng: R,
}

impl<R: Rng> RowMachine<R> {
    pub fn new(row: RowId, rng: R) -> Self {
        Self {
            row,
            state: RowState::Empty,
            dismissed: false,
            rng,
        }
    }

    pub fn row(&self) -> RowId {
        self.row
    }

    pub fn state(&self) -> &RowState {
        &self.state
    }

    /// 이벤트 적용. 새 상태를 내보내야 하면 `Some`.
    ///
    /// 닫기 이벤트를 받기 전의 배치 갱신은 결합할 대상이 없으므로 무시된다.
    pub fn apply(&mut self, event: &RowEvent, latest: &BatchSnapshot) -> Option<&RowState> {
        match event {
            RowEvent::Refresh => {
                self.state = RowState::Empty;
            }
            RowEvent::Dismiss => {
                self.dismissed = true;
                self.state = pick_random(&latest.users, &mut self.rng).into();
            }
            RowEvent::BatchUpdated(snapshot) => {
                if !self.dismissed {
                    return None;
                }
                self.state = pick_random(&snapshot.users, &mut self.rng).into();
            }
        }
        Some(&self.state)
    }
}

/// 행 태스크: 상태 머신, 프레젠터, 뷰를 단독 소유
pub(crate) struct RowTask<R> {
    pub(crate) machine: RowMachine<R>,
    pub(crate) presenter: RowPresenter,
    pub(crate) events: mpsc::UnboundedReceiver<RowEvent>,
    pub(crate) avatars: mpsc::UnboundedReceiver<AvatarCompletion>,
    pub(crate) batch: watch::Receiver<Arc<BatchSnapshot>>,
    pub(crate) state_tx: watch::Sender<RowState>,
}

impl<R: Rng + Send + 'static> RowTask<R> {
    /// 이벤트 큐가 닫힐 때까지 처리
    pub(crate) async fn run(mut self) {
        let row = self.machine.row();
        debug!("{row} 태스크 시작");

        loop {
            tokio::select! {
                event = self.events.recv() => {
                    let Some(event) = event else { break };
                    self.handle_event(event);
                }
                Some(done) = self.avatars.recv() => {
                    self.presenter.apply_avatar(done);
                }
            }
        }

        debug!("{row} 태스크 종료");
    }

    fn handle_event(&mut self, event: RowEvent) {
        let row = self.machine.row();
        let latest = self.batch.borrow().clone();
        let Some(state) = self.machine.apply(&event, &latest).cloned() else {
            return;
        };

        match &state {
            RowState::Empty => self.presenter.clear(),
            RowState::Showing(user) => self.presenter.present(user),
        }
        debug!(
            "{row} ← {}: user={:?}",
            event_name(&event),
            state.user().map(|u| u.id)
        );
        self.state_tx.send_replace(state);
    }
}

fn event_name(event: &RowEvent) -> &'static str {
    match event {
        RowEvent::Refresh => "refresh",
        RowEvent::Dismiss => "dismiss",
        RowEvent::BatchUpdated(_) => "batch",
    }
}
