//! 무작위 사용자 선택.

use rand::seq::IndexedRandom;
use rand::Rng;
use whotofollow_core::models::user::{User, UserBatch};

/// 배치에서 균등 분포로 한 명 선택 (빈 배치면 None)
pub fn pick_random<R: Rng + ?Sized>(batch: &UserBatch, rng: &mut R) -> Option<User> {
    batch.as_slice().choose(rng).cloned()
}
