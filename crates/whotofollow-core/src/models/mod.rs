//! WhoToFollow 도메인 모델.
//!
//! GitHub 사용자, 배치 스냅샷, 행 상태 등 크레이트 간 공유 데이터 구조체.

pub mod avatar;
pub mod batch;
pub mod row;
pub mod user;
