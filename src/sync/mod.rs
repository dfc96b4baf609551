//! 사전 동기화
//!
//! 후보 단어 집합을 기존 사전과 비교하여 새 단어만 코드로 변환하고
//! 저장소에 기록합니다:
//!
//! 1. 텍스트 사전 읽기 (없으면 빈 사전)
//! 2. 사전에 없는 후보만 변환. 변환 실패는 로그 후 건너뜀
//! 3. 미러가 시딩되지 않았으면 기존 사전 전체로 한 번 시딩
//! 4. 새 항목을 미러에 upsert
//! 5. 새 항목을 날짜 주석과 함께 텍스트 사전에 추가
//!
//! 같은 후보로 두 번 실행하면 두 번째는 새 항목이 0개입니다.

mod report;

use std::collections::BTreeSet;

use crate::core::{PhoneticAnnotator, WordEncoder};
use crate::store::{Dictionary, DictionaryEntry, DictionaryStore};

pub use report::{SyncFailure, SyncReport};

/// 새 항목 기본 가중치
pub const DEFAULT_WEIGHT: &str = "1";

/// 사전 동기화기
#[derive(Debug)]
pub struct Synchronizer<A> {
    encoder: WordEncoder<A>,
    store: DictionaryStore,
    default_weight: String,
}

impl<A: PhoneticAnnotator> Synchronizer<A> {
    pub fn new(encoder: WordEncoder<A>, store: DictionaryStore) -> Self {
        Self {
            encoder,
            store,
            default_weight: DEFAULT_WEIGHT.to_string(),
        }
    }

    /// 가중치 설정
    pub fn with_default_weight(mut self, weight: impl Into<String>) -> Self {
        self.default_weight = weight.into();
        self
    }

    pub fn store(&self) -> &DictionaryStore {
        &self.store
    }

    /// 후보 단어를 사전에 반영
    ///
    /// 실패는 모두 보고서에 담기며 패닉이나 에러로 빠져나가지 않음
    pub fn synchronize<I, S>(&self, candidates: I) -> SyncReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut report = SyncReport::default();

        let existing = match self.store.load() {
            Ok(dict) => dict,
            Err(e) => {
                log::error!("기존 사전 읽기 실패, 이번 실행 중단: {}", e);
                report.failures.push(SyncFailure::Load(e));
                return report;
            }
        };

        // 결정적 순서 + 중복 제거
        let candidates: BTreeSet<String> = candidates
            .into_iter()
            .map(|w| w.as_ref().to_string())
            .collect();
        report.considered = candidates.len();

        let new_entries = self.collect_new_entries(&candidates, &existing, &mut report);

        match self.store.ensure_mirror_seeded(&existing) {
            Ok(seeded) => report.seeded_mirror = seeded,
            Err(e) => {
                log::error!("미러 시딩 실패, 새 항목 기록 생략: {}", e);
                report.failures.push(SyncFailure::Seed(e));
                return report;
            }
        }

        match self.store.commit(&new_entries) {
            Ok(()) => {
                report.written = new_entries.len();
                log::info!("{}개 새 항목을 사전에 추가", report.written);
            }
            Err(e) => report.failures.push(SyncFailure::Commit(e)),
        }

        report
    }

    fn collect_new_entries(
        &self,
        candidates: &BTreeSet<String>,
        existing: &Dictionary,
        report: &mut SyncReport,
    ) -> Dictionary {
        let mut new_entries = Dictionary::new();

        for word in candidates {
            if existing.contains(word) {
                report.already_present += 1;
                continue;
            }

            match self.encoder.encode(word) {
                Ok(codes) => {
                    let code = codes.concat();
                    log::debug!("{} -> {}", word, code);
                    new_entries.insert(DictionaryEntry::new(
                        word.as_str(),
                        code,
                        Some(self.default_weight.clone()),
                    ));
                }
                Err(error) => {
                    log::warn!("'{}' 건너뜀: {}", word, error);
                    report.skipped += 1;
                    report.failures.push(SyncFailure::Encode {
                        word: word.clone(),
                        error,
                    });
                }
            }
        }

        new_entries
    }
}
