//! 제안 엔진.
//!
//! 새로고침 → 커서 샘플링 → 사용자 조회 → 최신 배치 게시 → 행별 재선택.
//! 각 행은 자기 이벤트 큐를 가진 태스크 하나가 처리한다.

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_stream::wrappers::WatchStream;
use tracing::{debug, info, warn};
use whotofollow_core::config::SuggestionConfig;
use whotofollow_core::error::CoreError;
use whotofollow_core::models::avatar::Avatar;
use whotofollow_core::models::batch::{BatchSnapshot, FetchStatus};
use whotofollow_core::models::row::{RowId, RowState, UserCardView};
use whotofollow_core::models::user::UserBatch;
use whotofollow_core::ports::avatar_loader::AvatarLoader;
use whotofollow_core::ports::row_view::RowView;
use whotofollow_core::ports::user_source::UserSource;

use crate::batch_slot::BatchSlot;
use crate::cursor::CursorSampler;
use crate::presenter::RowPresenter;
use crate::row::{RowEvent, RowMachine, RowTask};

type ViewFactory = Box<dyn FnMut(RowId) -> Box<dyn RowView>>;

/// 엔진 빌더
pub struct EngineBuilder {
    config: SuggestionConfig,
    user_source: Arc<dyn UserSource>,
    avatar_loader: Option<Arc<dyn AvatarLoader>>,
    views: Option<ViewFactory>,
    seed: Option<u64>,
}

impl EngineBuilder {
    /// 아바타 로더 지정 (없으면 아바타 로딩 비활성화)
    pub fn avatar_loader(mut self, loader: Arc<dyn AvatarLoader>) -> Self {
        self.avatar_loader = Some(loader);
        self
    }

    /// 행별 뷰 생성 함수 지정
    pub fn views<F>(mut self, factory: F) -> Self
    where
        F: FnMut(RowId) -> Box<dyn RowView> + 'static,
    {
        self.views = Some(Box::new(factory));
        self
    }

    /// 고정 시드 (커서와 행별 선택이 재현 가능해진다)
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// 행 태스크를 띄우고 초기 새로고침 + 행별 닫기를 재생한다.
    ///
    /// tokio 런타임 안에서 호출해야 한다.
    pub fn start(self) -> Result<SuggestionEngine, CoreError> {
        let Self {
            config,
            user_source,
            avatar_loader,
            views,
            seed,
        } = self;

        if config.row_count == 0 {
            return Err(CoreError::validation("row_count", "행은 1개 이상이어야 함"));
        }
        let sampler = match seed {
            Some(seed) => CursorSampler::seeded(config.cursor_min, config.cursor_max, seed)?,
            None => CursorSampler::from_config(&config)?,
        };
        let mut views = views
            .unwrap_or_else(|| Box::new(|_: RowId| -> Box<dyn RowView> { Box::new(NullView) }));

        let slot = BatchSlot::new();
        let mut rows = Vec::with_capacity(config.row_count);
        for index in 0..config.row_count {
            let id = RowId(index);
            let rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(index as u64 + 1)),
                None => StdRng::from_os_rng(),
            };
            let (presenter, avatars) = RowPresenter::new(id, views(id), avatar_loader.clone());
            let (events_tx, events) = mpsc::unbounded_channel();
            let (state_tx, state_rx) = watch::channel(RowState::Empty);

            let task = RowTask {
                machine: RowMachine::new(id, rng),
                presenter,
                events,
                avatars,
                batch: slot.subscribe(),
                state_tx,
            };
            rows.push(RowHandle {
                id,
                events: events_tx,
                state_rx,
                task: Mutex::new(Some(tokio::spawn(task.run()))),
            });
        }

        let (status_tx, _) = watch::channel(FetchStatus::Idle);
        let inner = Arc::new(EngineInner {
            rows,
            slot,
            user_source,
            sampler: Mutex::new(sampler),
            generation: Mutex::new(0),
            status_tx,
            fetch_task: Mutex::new(None),
            stopped: AtomicBool::new(false),
        });

        inner.refresh()?;
        for row in &inner.rows {
            let _ = row.events.send(RowEvent::Dismiss);
        }

        info!(
            "제안 엔진 시작: rows={}, cursor=[{}, {}], avatars={}",
            config.row_count,
            config.cursor_min,
            config.cursor_max,
            avatar_loader.is_some()
        );
        Ok(SuggestionEngine { inner })
    }
}

/// 제안 엔진: 고정된 수의 행과 공유 최신 배치
pub struct SuggestionEngine {
    inner: Arc<EngineInner>,
}

impl SuggestionEngine {
    /// 빌더 생성
    pub fn builder(config: &SuggestionConfig, user_source: Arc<dyn UserSource>) -> EngineBuilder {
        EngineBuilder {
            config: config.clone(),
            user_source,
            avatar_loader: None,
            views: None,
            seed: None,
        }
    }

    /// 전역 새로고침: 모든 행 비움 + 새 배치 조회
    pub fn refresh(&self) -> Result<(), CoreError> {
        self.inner.refresh()
    }

    /// 한 행 닫기 → 최신 배치에서 다시 선택
    pub fn dismiss(&self, row: RowId) -> Result<(), CoreError> {
        self.inner.ensure_running()?;
        let handle = self.inner.row(row)?;
        handle
            .events
            .send(RowEvent::Dismiss)
            .map_err(|_| CoreError::EngineStopped)
    }

    pub fn row_count(&self) -> usize {
        self.inner.rows.len()
    }

    pub fn row_ids(&self) -> impl Iterator<Item = RowId> + '_ {
        self.inner.rows.iter().map(|r| r.id)
    }

    /// 행의 현재 상태
    pub fn row_state(&self, row: RowId) -> Result<RowState, CoreError> {
        Ok(self.inner.row(row)?.state_rx.borrow().clone())
    }

    /// 행 상태 변경 구독
    pub fn subscribe_row(&self, row: RowId) -> Result<watch::Receiver<RowState>, CoreError> {
        Ok(self.inner.row(row)?.state_rx.clone())
    }

    /// 행 상태 스트림 (현재 값부터 시작, 종료 시 끝남)
    pub fn row_states(&self, row: RowId) -> Result<WatchStream<RowState>, CoreError> {
        Ok(WatchStream::new(self.subscribe_row(row)?))
    }

    /// 현재 최신 배치
    pub fn latest_batch(&self) -> Arc<BatchSnapshot> {
        self.inner.slot.latest()
    }

    /// 현재 조회 상태
    pub fn fetch_status(&self) -> FetchStatus {
        self.inner.status_tx.borrow().clone()
    }

    /// 조회 상태 변경 구독
    pub fn subscribe_fetch_status(&self) -> watch::Receiver<FetchStatus> {
        self.inner.status_tx.subscribe()
    }

    pub fn is_stopped(&self) -> bool {
        self.inner.stopped.load(Ordering::SeqCst)
    }

    /// 행 태스크와 진행 중인 조회 중단. 여러 번 호출해도 안전.
    pub fn shutdown(&self) {
        self.inner.shutdown();
    }
}

impl Drop for SuggestionEngine {
    fn drop(&mut self) {
        self.inner.shutdown();
    }
}

struct RowHandle {
    id: RowId,
    events: mpsc::UnboundedSender<RowEvent>,
    state_rx: watch::Receiver<RowState>,
    task: Mutex<Option<JoinHandle<()>>>,
}

struct EngineInner {
    rows: Vec<RowHandle>,
    slot: BatchSlot,
    user_source: Arc<dyn UserSource>,
    sampler: Mutex<CursorSampler>,
    /// 새로고침 세대. 세대 증가와 팬아웃, 게시 판단은 이 락 안에서만 한다.
    generation: Mutex<u64>,
    status_tx: watch::Sender<FetchStatus>,
    fetch_task: Mutex<Option<JoinHandle<()>>>,
    stopped: AtomicBool,
}

impl EngineInner {
    fn ensure_running(&self) -> Result<(), CoreError> {
        if self.stopped.load(Ordering::SeqCst) {
            return Err(CoreError::EngineStopped);
        }
        Ok(())
    }

    fn row(&self, row: RowId) -> Result<&RowHandle, CoreError> {
        self.rows
            .get(row.index())
            .ok_or_else(|| CoreError::NotFound {
                resource_type: "Row".to_string(),
                id: row.index().to_string(),
            })
    }

    fn refresh(self: &Arc<Self>) -> Result<(), CoreError> {
        let cursor = self.sampler.lock().next_cursor();

        let mut generation = self.generation.lock();
        self.ensure_running()?;
        *generation += 1;
        let current = *generation;

        for row in &self.rows {
            let _ = row.events.send(RowEvent::Refresh);
        }
        self.status_tx.send_replace(FetchStatus::InFlight {
            generation: current,
            cursor,
        });

        let inner = Arc::clone(self);
        let task = tokio::spawn(async move {
            let result = inner.user_source.fetch_users(cursor).await;
            if let FetchStatus::Superseded { generation: stale } =
                inner.complete_fetch(current, cursor, result)
            {
                debug!("조회 완료 후 폐기됨: generation={stale}");
            }
        });
        if let Some(previous) = self.fetch_task.lock().replace(task) {
            previous.abort();
        }
        drop(generation);

        debug!("새로고침: generation={current}, since={cursor}");
        Ok(())
    }

    /// 조회 결과 처리. 최신 세대일 때만 게시하고, 처리 결과를 돌려준다.
    ///
    /// `Superseded`는 반환값과 로그로만 남는다. 상태 채널은 더 최신 세대의
    /// 상태를 유지해야 하므로 덮어쓰지 않는다.
    fn complete_fetch(
        &self,
        generation: u64,
        cursor: u64,
        result: Result<UserBatch, CoreError>,
    ) -> FetchStatus {
        let latest = self.generation.lock();
        if *latest != generation || self.stopped.load(Ordering::SeqCst) {
            debug!("지난 조회 결과 폐기: generation={generation} (현재 {})", *latest);
            return FetchStatus::Superseded { generation };
        }

        let status = match result {
            Ok(users) => {
                let count = users.len();
                let snapshot = self.slot.publish(cursor, users);
                for row in &self.rows {
                    let _ = row.events.send(RowEvent::BatchUpdated(snapshot.clone()));
                }
                info!(
                    "배치 게시: version={}, since={cursor}, users={count}",
                    snapshot.version
                );
                FetchStatus::Completed {
                    generation,
                    version: snapshot.version,
                    users: count,
                }
            }
            Err(e) => {
                warn!("사용자 조회 실패: since={cursor}: {e}");
                FetchStatus::Failed {
                    generation,
                    message: e.to_string(),
                }
            }
        };
        self.status_tx.send_replace(status.clone());
        status
    }

    fn shutdown(&self) {
        if self.stopped.swap(true, Ordering::SeqCst) {
            return;
        }

        {
            let _generation = self.generation.lock();
            if let Some(task) = self.fetch_task.lock().take() {
                task.abort();
            }
        }
        for row in &self.rows {
            if let Some(task) = row.task.lock().take() {
                task.abort();
            }
        }
        info!("제안 엔진 종료");
    }
}

/// 아무것도 그리지 않는 기본 뷰
struct NullView;

impl RowView for NullView {
    fn clear(&mut self, _row: RowId) {}
    fn show_user(&mut self, _row: RowId, _card: &UserCardView) {}
    fn show_avatar(&mut self, _row: RowId, _user_id: u64, _avatar: &Avatar) {}
}
