//! 콘솔 행 뷰.
//!
//! `RowView` 포트를 표준 출력(또는 임의의 writer)에 한 줄씩 그리는 구현.
//! 행 번호는 사용자에게 1부터 보여준다.

use parking_lot::Mutex;
use std::io::Write;
use std::sync::Arc;
use tracing::warn;
use whotofollow_core::models::avatar::Avatar;
use whotofollow_core::models::row::{RowId, UserCardView};
use whotofollow_core::ports::row_view::RowView;

/// 여러 행이 공유하는 출력 대상
pub type SharedWriter = Arc<Mutex<Box<dyn Write + Send>>>;

/// 표준 출력 writer
pub fn stdout_writer() -> SharedWriter {
    Arc::new(Mutex::new(Box::new(std::io::stdout())))
}

/// 콘솔 행 뷰 (행마다 하나)
pub struct ConsoleView {
    out: SharedWriter,
    /// 현재 표시 중인 카드
    current: Option<UserCardView>,
}

impl ConsoleView {
    pub fn new(out: SharedWriter) -> Self {
        Self { out, current: None }
    }

    fn line(&self, row: RowId, text: &str) {
        let mut out = self.out.lock();
        let result = writeln!(out, "[{}] {text}", row.index() + 1).and_then(|_| out.flush());
        if let Err(e) = result {
            warn!("{row} 출력 실패: {e}");
        }
    }
}

impl RowView for ConsoleView {
    fn clear(&mut self, row: RowId) {
        self.current = None;
        self.line(row, "(비어 있음)");
    }

    fn show_user(&mut self, row: RowId, card: &UserCardView) {
        let dismiss = if card.dismiss_visible {
            format!("  [닫기: d {}]", row.index() + 1)
        } else {
            String::new()
        };
        self.line(
            row,
            &format!(
                "{} (#{}) {}{dismiss}",
                card.name, card.user_id, card.profile_url
            ),
        );
        self.current = Some(card.clone());
    }

    fn show_avatar(&mut self, row: RowId, user_id: u64, avatar: &Avatar) {
        let Some(card) = self.current.as_ref().filter(|c| c.user_id == user_id) else {
            return;
        };
        let text = format!(
            "{} 아바타 {} bytes ({})",
            card.name,
            avatar.bytes.len(),
            avatar.content_type.as_deref().unwrap_or("unknown")
        );
        self.line(row, &text);
    }
}
