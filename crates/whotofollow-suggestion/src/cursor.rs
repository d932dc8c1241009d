//! 무작위 커서 샘플러.
//!
//! 커서는 이어받기 토큰이 아니라 `[min, max]` 범위의 샘플링 시드다.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use whotofollow_core::config::SuggestionConfig;
use whotofollow_core::error::CoreError;

/// `since` 커서 샘플러
pub struct CursorSampler {
    min: u64,
    max: u64,
    rng: StdRng,
}

impl CursorSampler {
    /// 범위를 검증하고 샘플러 생성 (OS 엔트로피로 시드)
    pub fn new(min: u64, max: u64) -> Result<Self, CoreError> {
        Self::with_rng(min, max, StdRng::from_os_rng())
    }

    /// 고정 시드 샘플러 (재현 가능한 테스트용)
    pub fn seeded(min: u64, max: u64, seed: u64) -> Result<Self, CoreError> {
        Self::with_rng(min, max, StdRng::seed_from_u64(seed))
    }

    pub fn from_config(config: &SuggestionConfig) -> Result<Self, CoreError> {
        Self::new(config.cursor_min, config.cursor_max)
    }

    fn with_rng(min: u64, max: u64, rng: StdRng) -> Result<Self, CoreError> {
        if min == 0 {
            return Err(CoreError::validation("cursor_min", "커서는 양의 정수여야 함"));
        }
        if min > max {
            return Err(CoreError::validation(
                "cursor_max",
                format!("cursor_min({min}) > cursor_max({max})"),
            ));
        }
        Ok(Self { min, max, rng })
    }

    /// 다음 커서
    pub fn next_cursor(&mut self) -> u64 {
        self.rng.random_range(self.min..=self.max)
    }
}
