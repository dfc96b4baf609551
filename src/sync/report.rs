//! 동기화 결과 보고

use crate::core::EncodeError;
use crate::store::StoreError;

/// 동기화 중 발생한 실패
#[derive(Debug)]
pub enum SyncFailure {
    /// 단어 코드 변환 실패 (해당 단어만 건너뜀)
    Encode { word: String, error: EncodeError },
    /// 기존 사전 읽기 실패 (실행 중단, 아무것도 쓰지 않음)
    Load(StoreError),
    /// 미러 시딩 실패
    Seed(StoreError),
    /// 새 항목 기록 실패
    Commit(StoreError),
}

impl std::fmt::Display for SyncFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncFailure::Encode { error, .. } => write!(f, "{}", error),
            SyncFailure::Load(e) => write!(f, "사전 읽기 실패: {}", e),
            SyncFailure::Seed(e) => write!(f, "미러 시딩 실패: {}", e),
            SyncFailure::Commit(e) => write!(f, "새 항목 기록 실패: {}", e),
        }
    }
}

/// 한 번의 동기화 결과
#[derive(Debug, Default)]
pub struct SyncReport {
    /// 검토한 후보 단어 수 (중복 제거 후)
    pub considered: usize,
    /// 코드 변환 실패로 건너뛴 수
    pub skipped: usize,
    /// 이미 사전에 있던 수
    pub already_present: usize,
    /// 새로 기록한 수
    pub written: usize,
    /// 미러를 최초 시딩했는지
    pub seeded_mirror: bool,
    pub failures: Vec<SyncFailure>,
}

impl SyncReport {
    /// 저장소 단계 실패 없이 끝났는지 (단어별 변환 실패는 정상 범주)
    pub fn is_success(&self) -> bool {
        !self
            .failures
            .iter()
            .any(|f| !matches!(f, SyncFailure::Encode { .. }))
    }

    /// 건너뛴 단어 목록
    pub fn skipped_words(&self) -> impl Iterator<Item = &str> {
        self.failures.iter().filter_map(|f| match f {
            SyncFailure::Encode { word, .. } => Some(word.as_str()),
            _ => None,
        })
    }
}

impl std::fmt::Display for SyncReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "후보 {}개, 기존 {}개, 건너뜀 {}개, 신규 기록 {}개",
            self.considered, self.already_present, self.skipped, self.written
        )
    }
}
