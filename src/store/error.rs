//! 사전 저장소 에러

/// 저장소 읽기/쓰기 에러
#[derive(Debug)]
pub enum StoreError {
    /// 파일 입출력 실패
    Io(std::io::Error),
    /// 필드 수가 2 또는 3이 아닌 줄
    MalformedLine { line_no: usize, line: String },
    /// SQLite 실패
    Sqlite(rusqlite::Error),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "파일 입출력 오류: {}", e),
            StoreError::MalformedLine { line_no, line } => {
                write!(f, "잘못된 사전 줄 ({}행): {:?}", line_no, line)
            }
            StoreError::Sqlite(e) => write!(f, "SQLite 오류: {}", e),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(e) => Some(e),
            StoreError::Sqlite(e) => Some(e),
            StoreError::MalformedLine { .. } => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io(e)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Sqlite(e)
    }
}
