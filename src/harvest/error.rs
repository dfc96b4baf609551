//! 외부 수집기 에러

/// 피드/분할기 호출 에러
#[derive(Debug)]
pub enum HarvestError {
    /// HTTP 전송 실패
    Http(reqwest::Error),
    /// 200이 아닌 응답
    Status(u16),
    /// 응답 형식 오류
    Format(String),
}

impl std::fmt::Display for HarvestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HarvestError::Http(e) => write!(f, "요청 실패: {}", e),
            HarvestError::Status(code) => write!(f, "요청 실패, 상태 코드: {}", code),
            HarvestError::Format(s) => write!(f, "응답 형식 오류: {}", s),
        }
    }
}

impl std::error::Error for HarvestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HarvestError::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for HarvestError {
    fn from(e: reqwest::Error) -> Self {
        HarvestError::Http(e)
    }
}

impl From<serde_json::Error> for HarvestError {
    fn from(e: serde_json::Error) -> Self {
        HarvestError::Format(e.to_string())
    }
}
