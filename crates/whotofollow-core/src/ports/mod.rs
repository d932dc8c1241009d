//! 포트 인터페이스 (trait).
//!
//! Hexagonal Architecture의 포트 레이어.
//! `whotofollow-network`가 조회 포트를 구현하고, 앱 crate가 행 뷰를 구현하며,
//! `whotofollow-app`에서 `Arc<dyn T>` / `Box<dyn T>`로 와이어링한다.

pub mod avatar_loader;
pub mod row_view;
pub mod user_source;
