//! 코드 변환 에러

/// 음절 하나를 변환할 때의 에러
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// 영문자가 아닌 문자가 있거나 길이가 1~6 범위 밖
    InvalidInput(String),
    /// 운모가 매핑 표에 없음
    UnmappedCluster { syllable: String, cluster: String },
}

impl std::fmt::Display for CodecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CodecError::InvalidInput(s) => write!(f, "잘못된 음절 입력: {:?}", s),
            CodecError::UnmappedCluster { syllable, cluster } => {
                write!(f, "매핑 없는 운모 {:?} (음절 {:?})", cluster, syllable)
            }
        }
    }
}

impl std::error::Error for CodecError {}

/// 단어 하나를 변환할 때의 에러
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// 빈 단어
    EmptyWord,
    /// 발음을 얻지 못한 글자
    MissingReading { word: String, position: usize, ch: char },
    /// 음절 변환 실패
    Syllable { word: String, source: CodecError },
}

impl std::fmt::Display for EncodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EncodeError::EmptyWord => write!(f, "빈 단어"),
            EncodeError::MissingReading { word, position, ch } => {
                write!(f, "'{}'의 {}번째 글자 '{}'에 발음 없음", word, position + 1, ch)
            }
            EncodeError::Syllable { word, source } => {
                write!(f, "'{}' 변환 실패: {}", word, source)
            }
        }
    }
}

impl std::error::Error for EncodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EncodeError::Syllable { source, .. } => Some(source),
            _ => None,
        }
    }
}
