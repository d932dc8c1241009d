//! GitHub 사용자 모델.
//!
//! `GET /users?since=N` 응답의 각 항목과, 한 번의 조회 결과인 배치.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// GitHub 사용자 (불변)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct User {
    /// GitHub 사용자 ID
    pub id: u64,
    /// 로그인 이름 (`login` 필드)
    #[serde(rename = "login")]
    pub name: String,
    /// 아바타 이미지 URL
    pub avatar_url: String,
}

impl User {
    /// GitHub 프로필 페이지 URL
    pub fn profile_url(&self) -> String {
        format!("https://github.com/{}", self.name)
    }
}

/// 관대한 디코딩 결과
#[derive(Debug, Clone, Default)]
pub struct LenientDecode {
    /// 디코딩에 성공한 사용자들
    pub batch: UserBatch,
    /// 디코딩 실패로 버려진 항목 수
    pub dropped: usize,
}

/// 한 번의 조회 결과 (순서 유지)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserBatch {
    users: Vec<User>,
}

impl UserBatch {
    pub fn new(users: Vec<User>) -> Self {
        Self { users }
    }

    /// 빈 배치
    pub fn empty() -> Self {
        Self::default()
    }

    /// JSON 배열 본문을 항목별로 디코딩한다.
    ///
    /// 본문이 배열이 아니면 전체 실패. 배열 안에서 디코딩에 실패한 항목은
    /// 에러 없이 제외되고 `dropped`에만 집계된다.
    pub fn decode_lenient(body: &str) -> Result<LenientDecode, CoreError> {
        let values: Vec<serde_json::Value> = serde_json::from_str(body)?;
        Ok(Self::from_values(values))
    }

    /// 이미 파싱된 JSON 값 목록에서 사용자 추출
    pub fn from_values(values: Vec<serde_json::Value>) -> LenientDecode {
        let total = values.len();
        let users: Vec<User> = values
            .into_iter()
            .filter_map(|v| serde_json::from_value(v).ok())
            .collect();
        let dropped = total - users.len();

        LenientDecode {
            batch: Self { users },
            dropped,
        }
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn as_slice(&self) -> &[User] {
        &self.users
    }

    pub fn iter(&self) -> impl Iterator<Item = &User> {
        self.users.iter()
    }

    /// ID로 소속 여부 확인
    pub fn contains_id(&self, id: u64) -> bool {
        self.users.iter().any(|u| u.id == id)
    }

    pub fn into_vec(self) -> Vec<User> {
        self.users
    }
}

impl FromIterator<User> for UserBatch {
    fn from_iter<I: IntoIterator<Item = User>>(iter: I) -> Self {
        Self {
            users: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a UserBatch {
    type Item = &'a User;
    type IntoIter = std::slice::Iter<'a, User>;

    fn into_iter(self) -> Self::IntoIter {
        self.users.iter()
    }
}
