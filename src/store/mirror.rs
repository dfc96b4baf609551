//! SQLite 색인 미러
//!
//! 단일 테이블 `rime_user_dict(word PRIMARY KEY, code, weight)`.
//! 최초 시딩 여부는 `PRAGMA user_version`으로 기록합니다.

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection};

use super::dictionary::{Dictionary, DictionaryEntry};
use super::error::StoreError;

const CREATE_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS rime_user_dict (
    word TEXT PRIMARY KEY,
    code TEXT,
    weight TEXT
)";

const UPSERT_SQL: &str =
    "INSERT OR REPLACE INTO rime_user_dict (word, code, weight) VALUES (?1, ?2, ?3)";

/// 시딩 완료 표시 값
const SEEDED_VERSION: i64 = 1;

/// 사전의 SQLite 미러
#[derive(Debug, Clone)]
pub struct SqliteMirror {
    path: PathBuf,
}

impl SqliteMirror {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(&self) -> Result<Connection, StoreError> {
        let conn = Connection::open(&self.path)?;
        conn.execute(CREATE_TABLE_SQL, [])?;
        Ok(conn)
    }

    /// 최초 시딩이 끝났는지 확인 (파일이 없으면 false)
    pub fn is_seeded(&self) -> bool {
        if !self.path.is_file() {
            return false;
        }
        let version = Connection::open(&self.path).and_then(|conn| {
            conn.pragma_query_value(None, "user_version", |row| row.get::<_, i64>(0))
        });
        match version {
            Ok(v) => v >= SEEDED_VERSION,
            Err(e) => {
                log::error!("미러 버전 확인 실패: {}", e);
                false
            }
        }
    }

    /// 항목 전체 upsert (단어 기준, 마지막 쓰기 우선). 하나의 트랜잭션
    pub fn save(&self, dict: &Dictionary) -> Result<(), StoreError> {
        self.stage(dict)?.commit()
    }

    /// 기존 사전으로 최초 시딩, 시딩 표시도 같은 트랜잭션에서 기록
    pub fn seed(&self, dict: &Dictionary) -> Result<(), StoreError> {
        self.begin(dict, true)?.commit()
    }

    /// 트랜잭션을 열고 upsert까지만 수행. 확정은 [`PendingMirrorWrite::commit`]
    pub fn stage(&self, dict: &Dictionary) -> Result<PendingMirrorWrite, StoreError> {
        self.begin(dict, false)
    }

    fn begin(&self, dict: &Dictionary, mark_seeded: bool) -> Result<PendingMirrorWrite, StoreError> {
        let conn = self.open()?;
        conn.execute_batch("BEGIN IMMEDIATE")?;
        let pending = PendingMirrorWrite { conn };
        if let Err(e) = pending.upsert(dict, mark_seeded) {
            pending.rollback();
            return Err(e);
        }
        Ok(pending)
    }

    /// 모든 행 읽기. SQL 실패는 로그만 남기고 빈 사전 반환
    pub fn load(&self) -> Dictionary {
        match self.try_load() {
            Ok(dict) => dict,
            Err(e) => {
                log::error!("미러 읽기 실패: {}", e);
                Dictionary::new()
            }
        }
    }

    fn try_load(&self) -> Result<Dictionary, StoreError> {
        if !self.path.is_file() {
            return Ok(Dictionary::new());
        }
        let conn = Connection::open(&self.path)?;
        let mut stmt = conn.prepare("SELECT word, code, weight FROM rime_user_dict ORDER BY rowid")?;
        let rows = stmt.query_map([], |row| {
            Ok(DictionaryEntry {
                word: row.get(0)?,
                code: row.get(1)?,
                weight: row.get(2)?,
            })
        })?;

        let mut dict = Dictionary::new();
        for row in rows {
            dict.insert(row?);
        }
        Ok(dict)
    }
}

/// 열려 있는 미러 트랜잭션
///
/// 커밋하지 않고 버리면 연결이 닫히면서 롤백됨
#[derive(Debug)]
pub struct PendingMirrorWrite {
    conn: Connection,
}

impl PendingMirrorWrite {
    fn upsert(&self, dict: &Dictionary, mark_seeded: bool) -> Result<(), StoreError> {
        let mut stmt = self.conn.prepare(UPSERT_SQL)?;
        for entry in dict {
            stmt.execute(params![entry.word, entry.code, entry.weight])?;
        }
        if mark_seeded {
            self.conn.pragma_update(None, "user_version", SEEDED_VERSION)?;
        }
        Ok(())
    }

    pub fn commit(self) -> Result<(), StoreError> {
        self.conn.execute_batch("COMMIT")?;
        Ok(())
    }

    pub fn rollback(self) {
        if let Err(e) = self.conn.execute_batch("ROLLBACK") {
            log::error!("미러 롤백 실패: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample() -> Dictionary {
        [
            DictionaryEntry::new("中国", "vsgo", Some("1".into())),
            DictionaryEntry::new("吸睛", "xijk", None),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let mirror = SqliteMirror::new(dir.path().join("dict.db"));
        mirror.save(&sample()).unwrap();
        assert_eq!(mirror.load(), sample());
    }

    #[test]
    fn test_upsert_last_write_wins() {
        let dir = tempdir().unwrap();
        let mirror = SqliteMirror::new(dir.path().join("dict.db"));
        mirror.save(&sample()).unwrap();

        let update: Dictionary = [DictionaryEntry::new("中国", "vsgo", Some("9".into()))]
            .into_iter()
            .collect();
        mirror.save(&update).unwrap();

        let loaded = mirror.load();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.get("中国").unwrap().weight.as_deref(), Some("9"));
    }

    #[test]
    fn test_seed_marker() {
        let dir = tempdir().unwrap();
        let mirror = SqliteMirror::new(dir.path().join("dict.db"));
        assert!(!mirror.is_seeded());

        // 일반 저장만으로는 시딩 표시가 생기지 않음
        mirror.save(&sample()).unwrap();
        assert!(!mirror.is_seeded());

        mirror.seed(&Dictionary::new()).unwrap();
        assert!(mirror.is_seeded());
    }

    #[test]
    fn test_load_missing_table_is_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("other.db");
        Connection::open(&path)
            .unwrap()
            .execute("CREATE TABLE unrelated (x INTEGER)", [])
            .unwrap();
        assert!(SqliteMirror::new(&path).load().is_empty());
    }

    /// 특정 단어의 삽입을 거부하는 트리거 설치
    fn reject_word(mirror: &SqliteMirror, word: &str) {
        mirror
            .open()
            .unwrap()
            .execute_batch(&format!(
                "CREATE TRIGGER reject_word BEFORE INSERT ON rime_user_dict
                 WHEN NEW.word = '{}'
                 BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
                word
            ))
            .unwrap();
    }

    #[test]
    fn test_failed_save_keeps_previous_rows() {
        let dir = tempdir().unwrap();
        let mirror = SqliteMirror::new(dir.path().join("dict.db"));
        mirror.save(&sample()).unwrap();
        reject_word(&mirror, "坏词");

        // 앞 항목은 upsert 된 뒤 두 번째 항목에서 실패
        let batch: Dictionary = [
            DictionaryEntry::new("中国", "vsgo", Some("9".into())),
            DictionaryEntry::new("双创", "ulil", None),
            DictionaryEntry::new("坏词", "hdci", None),
        ]
        .into_iter()
        .collect();
        assert!(matches!(mirror.save(&batch), Err(StoreError::Sqlite(_))));
        assert_eq!(mirror.load(), sample());
    }

    #[test]
    fn test_failed_seed_leaves_marker_unset() {
        let dir = tempdir().unwrap();
        let mirror = SqliteMirror::new(dir.path().join("dict.db"));
        mirror.save(&Dictionary::new()).unwrap();
        reject_word(&mirror, "吸睛");

        assert!(mirror.seed(&sample()).is_err());
        assert!(!mirror.is_seeded());
        assert!(mirror.load().is_empty());
    }

    #[test]
    fn test_staged_write_rolls_back() {
        let dir = tempdir().unwrap();
        let mirror = SqliteMirror::new(dir.path().join("dict.db"));
        mirror.stage(&sample()).unwrap().rollback();
        assert!(mirror.load().is_empty());

        // 확정 없이 버려도 반영되지 않음
        drop(mirror.stage(&sample()).unwrap());
        assert!(mirror.load().is_empty());

        mirror.stage(&sample()).unwrap().commit().unwrap();
        assert_eq!(mirror.load(), sample());
    }
}
