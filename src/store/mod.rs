//! 사용자 사전 저장소
//!
//! 같은 사전을 두 가지 형태로 보관합니다:
//!
//! 1. **텍스트 파일**: 입력기 엔진이 읽는 원본. 평상시에는 추가만 함
//! 2. **SQLite 미러**: 조회/백업용 사본. 단어 기준 upsert
//!
//! 동기화 코드는 [`DictionaryStore`] 하나만 보고, 두 백엔드는
//! [`DictionaryBackend`] 인터페이스 뒤에 숨깁니다. 기록은 두 단계로,
//! 모든 백엔드가 준비된 뒤에만 확정합니다.
//!
//! ```no_run
//! use rime_harvest::store::{Dictionary, DictionaryEntry, DictionaryStore};
//!
//! let store = DictionaryStore::new("rime_user_dict.txt", "rime_user_dict.db");
//! let existing = store.load().unwrap();
//!
//! let mut new_entries = Dictionary::new();
//! new_entries.insert(DictionaryEntry::new("中国", "vsgo", Some("1".into())));
//! store.commit(&new_entries).unwrap();
//! # let _ = existing;
//! ```

mod dictionary;
mod error;
mod mirror;
mod text_file;

use std::path::PathBuf;

pub use dictionary::{Dictionary, DictionaryEntry};
pub use error::StoreError;
pub use mirror::{PendingMirrorWrite, SqliteMirror};
pub use text_file::{parse_dictionary, AppendUndo, UserDictFile};

/// 기록했지만 아직 확정하지 않은 변경
pub trait PendingWrite {
    /// 변경 확정
    fn commit(self: Box<Self>) -> Result<(), StoreError>;

    /// 변경 취소 (기록 이전 상태로 복구)
    fn rollback(self: Box<Self>);
}

/// 사전 백엔드 공통 인터페이스
pub trait DictionaryBackend {
    /// 로그용 이름
    fn name(&self) -> &'static str;

    /// 새 항목을 기록하되 확정은 미룸. 실패하면 이전 상태가 그대로 남아야 함
    fn stage(&self, entries: &Dictionary) -> Result<Box<dyn PendingWrite>, StoreError>;
}

impl PendingWrite for AppendUndo {
    /// 추가는 이미 디스크에 반영됨
    fn commit(self: Box<Self>) -> Result<(), StoreError> {
        Ok(())
    }

    fn rollback(self: Box<Self>) {
        if let Err(e) = self.undo() {
            log::error!("텍스트 사전 복구 실패: {}", e);
        }
    }
}

impl PendingWrite for PendingMirrorWrite {
    fn commit(self: Box<Self>) -> Result<(), StoreError> {
        (*self).commit()
    }

    fn rollback(self: Box<Self>) {
        (*self).rollback()
    }
}

impl DictionaryBackend for UserDictFile {
    fn name(&self) -> &'static str {
        "텍스트 사전"
    }

    /// 날짜 주석과 함께 추가 (교체하지 않음: 사람이 남긴 주석/수정 보존)
    fn stage(&self, entries: &Dictionary) -> Result<Box<dyn PendingWrite>, StoreError> {
        Ok(Box::new(self.append(entries, true)?))
    }
}

impl DictionaryBackend for SqliteMirror {
    fn name(&self) -> &'static str {
        "SQLite 미러"
    }

    fn stage(&self, entries: &Dictionary) -> Result<Box<dyn PendingWrite>, StoreError> {
        Ok(Box::new(SqliteMirror::stage(self, entries)?))
    }
}

/// 모든 백엔드에 기록을 준비한 뒤 순서대로 확정
///
/// 준비 단계에서 하나라도 실패하면 준비된 변경을 모두 취소하고,
/// 확정 단계에서 실패하면 아직 확정하지 않은 변경을 취소
fn commit_all(backends: &[&dyn DictionaryBackend], entries: &Dictionary) -> Result<(), StoreError> {
    let mut staged: Vec<(&'static str, Box<dyn PendingWrite>)> = Vec::with_capacity(backends.len());
    for backend in backends {
        match backend.stage(entries) {
            Ok(pending) => staged.push((backend.name(), pending)),
            Err(e) => {
                log::error!("{} 기록 실패: {}", backend.name(), e);
                rollback_all(staged);
                return Err(e);
            }
        }
    }

    let mut staged = staged.into_iter();
    while let Some((name, pending)) = staged.next() {
        if let Err(e) = pending.commit() {
            log::error!("{} 확정 실패: {}", name, e);
            rollback_all(staged);
            return Err(e);
        }
        log::debug!("{} 기록 완료: {}개", name, entries.len());
    }
    Ok(())
}

fn rollback_all(staged: impl IntoIterator<Item = (&'static str, Box<dyn PendingWrite>)>) {
    for (name, pending) in staged {
        log::warn!("{} 변경 취소", name);
        pending.rollback();
    }
}

/// 텍스트 파일 + SQLite 미러를 묶은 저장소
#[derive(Debug, Clone)]
pub struct DictionaryStore {
    file: UserDictFile,
    mirror: SqliteMirror,
}

impl DictionaryStore {
    pub fn new(dict_path: impl Into<PathBuf>, db_path: impl Into<PathBuf>) -> Self {
        Self {
            file: UserDictFile::new(dict_path),
            mirror: SqliteMirror::new(db_path),
        }
    }

    pub fn file(&self) -> &UserDictFile {
        &self.file
    }

    pub fn mirror(&self) -> &SqliteMirror {
        &self.mirror
    }

    /// 준비 순서: 미러 트랜잭션, 텍스트 파일 추가.
    /// 확정 순서도 같음 (파일 추가는 확정할 것이 없으므로 미러 커밋 실패 시 파일만 되돌림)
    fn backends(&self) -> [&dyn DictionaryBackend; 2] {
        [&self.mirror, &self.file]
    }

    /// 현재 사전 읽기 (텍스트 파일 기준)
    pub fn load(&self) -> Result<Dictionary, StoreError> {
        self.file.load()
    }

    /// 미러가 아직 시딩되지 않았으면 기존 사전 전체로 한 번 시딩
    ///
    /// 시딩했으면 true
    pub fn ensure_mirror_seeded(&self, existing: &Dictionary) -> Result<bool, StoreError> {
        if self.mirror.is_seeded() {
            return Ok(false);
        }
        log::info!("미러 최초 시딩: {}개 항목", existing.len());
        self.mirror.seed(existing)?;
        Ok(true)
    }

    /// 새 항목을 두 백엔드에 함께 기록. 빈 배치는 아무것도 쓰지 않음
    ///
    /// 실패하면 두 백엔드 모두 이전 상태로 남음
    pub fn commit(&self, entries: &Dictionary) -> Result<(), StoreError> {
        if entries.is_empty() {
            return Ok(());
        }
        commit_all(&self.backends(), entries)
    }
}
