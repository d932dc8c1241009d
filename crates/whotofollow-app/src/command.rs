//! 콘솔 명령 파싱.

use whotofollow_core::error::CoreError;
use whotofollow_core::models::row::RowId;

/// 콘솔 명령
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `r`: 전역 새로고침
    Refresh,
    /// `d <n>` 또는 `<n>`: n번째 행 닫기 (1부터)
    Dismiss(RowId),
    /// `s`: 상태 출력
    Status,
    /// `h` / `?`: 도움말
    Help,
    /// `q`: 종료
    Quit,
}

impl Command {
    /// 한 줄 입력 파싱. 빈 줄은 `None`.
    pub fn parse(line: &str) -> Result<Option<Self>, CoreError> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Ok(None);
        };
        let rest = words.next();
        if words.next().is_some() {
            return Err(CoreError::validation("command", format!("인자가 너무 많음: {line}")));
        }

        let command = match (head.to_ascii_lowercase().as_str(), rest) {
            ("r" | "refresh", None) => Command::Refresh,
            ("s" | "status", None) => Command::Status,
            ("h" | "help" | "?", None) => Command::Help,
            ("q" | "quit" | "exit", None) => Command::Quit,
            ("d" | "dismiss", Some(n)) => Command::Dismiss(parse_row(n)?),
            ("d" | "dismiss", None) => {
                return Err(CoreError::validation("command", "닫을 행 번호가 필요함"));
            }
            (n, None) if n.chars().all(|c| c.is_ascii_digit()) => Command::Dismiss(parse_row(n)?),
            _ => {
                return Err(CoreError::validation("command", format!("알 수 없는 명령: {line}")));
            }
        };
        Ok(Some(command))
    }
}

/// 1부터 시작하는 행 번호 → RowId
fn parse_row(text: &str) -> Result<RowId, CoreError> {
    let n: usize = text
        .parse()
        .map_err(|_| CoreError::validation("row", format!("행 번호가 아님: {text}")))?;
    if n == 0 {
        return Err(CoreError::validation("row", "행 번호는 1부터 시작"));
    }
    Ok(RowId(n - 1))
}

/// 도움말 텍스트
pub const HELP: &str = "\
명령:
  r          새로고침 (모든 행 비우고 새 배치 조회)
  d <n>, <n> n번째 행 닫기
  s          상태 출력
  h          도움말
  q          종료";
