//! 행 프레젠터.
//!
//! RowState → 행 뷰 반영. 아바타는 백그라운드 태스크에서 받고,
//! 완료 결과는 행 태스크의 큐로 되돌아와 현재 할당과 일치할 때만 적용된다.

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use whotofollow_core::error::CoreError;
use whotofollow_core::models::avatar::Avatar;
use whotofollow_core::models::row::{RowId, UserCardView};
use whotofollow_core::models::user::User;
use whotofollow_core::ports::avatar_loader::AvatarLoader;
use whotofollow_core::ports::row_view::RowView;

/// User → UserCardView 변환
pub fn present_card(user: &User) -> UserCardView {
    UserCardView {
        user_id: user.id,
        name: user.name.clone(),
        avatar_url: user.avatar_url.clone(),
        profile_url: user.profile_url(),
        dismiss_visible: true,
    }
}

/// 아바타 로딩 완료 통지
#[derive(Debug)]
pub struct AvatarCompletion {
    /// 로딩을 시작한 할당 토큰
    pub assignment: u64,
    /// 대상 사용자 ID
    pub user_id: u64,
    /// 다운로드 결과
    pub result: Result<Avatar, CoreError>,
}

/// 행 프레젠터: `clear()` / `present(user)`
pub struct RowPresenter {
    row: RowId,
    view: Box<dyn RowView>,
    avatar_loader: Option<Arc<dyn AvatarLoader>>,
    /// 현재 할당 토큰 (clear/present마다 증가)
    assignment: u64,
    inflight: Option<JoinHandle<()>>,
    completions: mpsc::UnboundedSender<AvatarCompletion>,
}

impl RowPresenter {
    /// 새 프레젠터와 아바타 완료 수신기 생성
    pub fn new(
        row: RowId,
        view: Box<dyn RowView>,
        avatar_loader: Option<Arc<dyn AvatarLoader>>,
    ) -> (Self, mpsc::UnboundedReceiver<AvatarCompletion>) {
        let (completions, rx) = mpsc::unbounded_channel();
        let presenter = Self {
            row,
            view,
            avatar_loader,
            assignment: 0,
            inflight: None,
            completions,
        };
        (presenter, rx)
    }

    /// 현재 할당 토큰
    pub fn assignment(&self) -> u64 {
        self.assignment
    }

    /// 행 비우기 (진행 중인 아바타 로딩 취소)
    pub fn clear(&mut self) {
        self.reassign();
        self.view.clear(self.row);
    }

    /// 사용자 표시 후 아바타 로딩 시작
    pub fn present(&mut self, user: &User) {
        let assignment = self.reassign();
        self.view.show_user(self.row, &present_card(user));

        let Some(loader) = self.avatar_loader.clone() else {
            return;
        };

        let tx = self.completions.clone();
        let user_id = user.id;
        let url = user.avatar_url.clone();
        self.inflight = Some(tokio::spawn(async move {
            let result = loader.load(&url).await;
            // 수신 측이 닫혔으면 행이 이미 종료된 것
            let _ = tx.send(AvatarCompletion {
                assignment,
                user_id,
                result,
            });
        }));
    }

    /// 아바타 완료 반영. 지난 할당의 결과면 폐기하고 false.
    pub fn apply_avatar(&mut self, done: AvatarCompletion) -> bool {
        if done.assignment != self.assignment {
            debug!(
                "{} 지난 할당의 아바타 폐기: assignment={} (현재 {})",
                self.row, done.assignment, self.assignment
            );
            return false;
        }

        self.inflight = None;
        match done.result {
            Ok(avatar) => {
                self.view.show_avatar(self.row, done.user_id, &avatar);
                true
            }
            Err(e) => {
                warn!("{} 아바타 로딩 실패: user={}: {e}", self.row, done.user_id);
                false
            }
        }
    }

    /// 새 할당 토큰 발급 + 이전 로딩 중단
    fn reassign(&mut self) -> u64 {
        if let Some(handle) = self.inflight.take() {
            handle.abort();
        }
        self.assignment += 1;
        self.assignment
    }
}

impl Drop for RowPresenter {
    fn drop(&mut self) {
        if let Some(handle) = self.inflight.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{user, GatedAvatarLoader, RecordingView, ViewCall};

    #[test]
    fn card_from_user() {
        let card = present_card(&user(3));
        assert_eq!(card.user_id, 3);
        assert_eq!(card.name, "user3");
        assert_eq!(card.profile_url, "https://github.com/user3");
        assert!(card.dismiss_visible);
    }

    #[tokio::test]
    async fn present_without_loader_shows_user_only() {
        let view = RecordingView::default();
        let (mut presenter, _rx) = RowPresenter::new(RowId(0), Box::new(view.clone()), None);

        presenter.present(&user(1));
        presenter.clear();

        assert_eq!(
            view.calls(),
            vec![ViewCall::ShowUser(0, 1), ViewCall::Clear(0)]
        );
    }

    #[tokio::test]
    async fn avatar_applied_for_current_assignment() {
        let view = RecordingView::default();
        let loader = GatedAvatarLoader::open();
        let (mut presenter, mut rx) =
            RowPresenter::new(RowId(1), Box::new(view.clone()), Some(Arc::new(loader)));

        presenter.present(&user(9));
        let done = rx.recv().await.unwrap();
        assert_eq!(done.assignment, presenter.assignment());
        assert!(presenter.apply_avatar(done));

        assert_eq!(
            view.calls(),
            vec![ViewCall::ShowUser(1, 9), ViewCall::ShowAvatar(1, 9)]
        );
    }

    #[tokio::test]
    async fn late_avatar_for_previous_assignment_is_discarded() {
        let view = RecordingView::default();
        let (mut presenter, _rx) = RowPresenter::new(RowId(0), Box::new(view.clone()), None);

        presenter.present(&user(1));
        let stale = presenter.assignment();
        presenter.present(&user(2));

        let late = AvatarCompletion {
            assignment: stale,
            user_id: 1,
            result: Ok(Avatar {
                url: "http://a/1".to_string(),
                content_type: None,
                bytes: vec![1],
            }),
        };
        assert!(!presenter.apply_avatar(late));
        assert!(!view
            .calls()
            .iter()
            .any(|c| matches!(c, ViewCall::ShowAvatar(..))));
    }

    #[tokio::test]
    async fn clear_cancels_inflight_load() {
        let view = RecordingView::default();
        let loader = GatedAvatarLoader::closed();
        let gate = loader.gate();
        let (mut presenter, mut rx) =
            RowPresenter::new(RowId(0), Box::new(view.clone()), Some(Arc::new(loader)));

        presenter.present(&user(4));
        presenter.clear();
        gate.add_permits(1);

        // 중단된 태스크는 완료를 보내지 않는다
        let received =
            tokio::time::timeout(std::time::Duration::from_millis(100), rx.recv()).await;
        assert!(received.is_err());
        assert_eq!(view.calls(), vec![ViewCall::ShowUser(0, 4), ViewCall::Clear(0)]);
    }

    #[tokio::test]
    async fn failed_avatar_keeps_placeholder() {
        let view = RecordingView::default();
        let loader = GatedAvatarLoader::failing();
        let (mut presenter, mut rx) =
            RowPresenter::new(RowId(2), Box::new(view.clone()), Some(Arc::new(loader)));

        presenter.present(&user(5));
        let done = rx.recv().await.unwrap();
        assert!(!presenter.apply_avatar(done));
        assert_eq!(view.calls(), vec![ViewCall::ShowUser(2, 5)]);
    }
}
