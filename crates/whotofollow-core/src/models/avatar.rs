//! 아바타 이미지.

use std::fmt;

/// 다운로드한 아바타 이미지 (디코딩 전 원본 바이트)
#[derive(Clone, PartialEq, Eq)]
pub struct Avatar {
    /// 요청 URL
    pub url: String,
    /// 응답 Content-Type
    pub content_type: Option<String>,
    /// 이미지 바이트
    pub bytes: Vec<u8>,
}

impl fmt::Debug for Avatar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Avatar")
            .field("url", &self.url)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}
