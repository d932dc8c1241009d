//! # whotofollow-suggestion
//!
//! 제안 파이프라인.
//! 전역 새로고침 이벤트, 행별 닫기(dismiss) 이벤트, 공유 "최신 배치" 슬롯을
//! 행마다 하나의 순서 있는 이벤트 큐로 병합하고, 각 행이 표시할 사용자를 결정한다.
//! 아바타 로딩은 할당 토큰으로 취소/폐기한다.

pub mod batch_slot;
pub mod cursor;
pub mod engine;
pub mod picker;
pub mod presenter;
pub mod row;

#[cfg(test)]
pub(crate) mod testing;
