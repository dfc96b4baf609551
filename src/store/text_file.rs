//! Rime 사용자 사전 텍스트 파일
//!
//! UTF-8, 한 줄에 한 항목: `word\tcode` 또는 `word\tcode\tweight`.
//! `#`로 시작하는 줄과 빈 줄은 무시합니다.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use tempfile::NamedTempFile;

use super::dictionary::{Dictionary, DictionaryEntry};
use super::error::StoreError;

/// 날짜 주석 형식
const DATE_MARKER_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 사전 텍스트 파일 핸들러
#[derive(Debug, Clone)]
pub struct UserDictFile {
    path: PathBuf,
}

impl UserDictFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// 사전 파일 읽기 (파일 없으면 빈 사전)
    pub fn load(&self) -> Result<Dictionary, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::info!("사전 파일 없음, 빈 사전으로 시작: {}", self.path.display());
                return Ok(Dictionary::new());
            }
            Err(e) => return Err(e.into()),
        };
        parse_dictionary(&content)
    }

    /// 파일 전체를 원자적으로 교체 (임시 파일 작성 후 rename)
    pub fn replace(&self, dict: &Dictionary) -> Result<(), StoreError> {
        let parent = parent_dir(&self.path);
        fs::create_dir_all(parent)?;

        let temp_file = NamedTempFile::new_in(parent)?;
        {
            let mut writer = BufWriter::new(temp_file.as_file());
            for entry in dict {
                writeln!(writer, "{}", entry.to_line())?;
            }
            writer.flush()?;
        }
        temp_file.as_file().sync_all()?;
        temp_file.persist(&self.path).map_err(|e| StoreError::Io(e.error))?;
        Ok(())
    }

    /// 파일 끝에 항목 추가 (기존 줄은 건드리지 않음)
    ///
    /// 배치 전체를 한 번에 쓰고, 실패하면 추가 이전 상태로 되돌려
    /// 일부만 기록된 상태가 남지 않게 함. 반환된 [`AppendUndo`]로
    /// 성공한 추가도 나중에 취소할 수 있음
    pub fn append(
        &self,
        entries: &Dictionary,
        with_date_marker: bool,
    ) -> Result<AppendUndo, StoreError> {
        if entries.is_empty() && !with_date_marker {
            return Ok(AppendUndo::new(&self.path, Prior::Untouched));
        }

        let existed = self.path.exists();
        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&self.path)?;
        let original_len = file.metadata()?.len();
        let undo = AppendUndo::new(
            &self.path,
            if existed {
                Prior::Len(original_len)
            } else {
                Prior::Missing
            },
        );

        let mut batch = String::new();
        // 마지막 줄에 개행이 없으면 새 항목이 그 줄에 붙지 않도록 보정
        if original_len > 0 && !ends_with_newline(&mut file, original_len)? {
            batch.push('\n');
        }
        if with_date_marker {
            batch.push_str(&format!("\n# Added on {}\n", Local::now().format(DATE_MARKER_FORMAT)));
        }
        for entry in entries {
            batch.push_str(&entry.to_line());
            batch.push('\n');
        }

        write_batch(&file, &file, batch.as_bytes(), &undo)?;
        Ok(undo)
    }
}

/// 추가 직전 파일 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Prior {
    /// 아무것도 쓰지 않았음
    Untouched,
    /// 파일이 없었음
    Missing,
    /// 원래 길이
    Len(u64),
}

/// [`UserDictFile::append`] 되돌리기 핸들
#[derive(Debug)]
pub struct AppendUndo {
    path: PathBuf,
    prior: Prior,
}

impl AppendUndo {
    fn new(path: &Path, prior: Prior) -> Self {
        Self {
            path: path.to_path_buf(),
            prior,
        }
    }

    /// 파일을 추가 이전 상태로 복구 (새로 만든 파일이면 삭제)
    pub fn undo(&self) -> Result<(), StoreError> {
        match self.prior {
            Prior::Untouched => Ok(()),
            Prior::Missing => match fs::remove_file(&self.path) {
                Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
                _ => Ok(()),
            },
            Prior::Len(len) => {
                let file = OpenOptions::new().write(true).open(&self.path)?;
                file.set_len(len)?;
                file.sync_data()?;
                Ok(())
            }
        }
    }
}

/// 배치를 한 번에 기록. 실패하면 `undo`로 추가 이전 상태 복구
fn write_batch(
    mut writer: impl Write,
    file: &File,
    batch: &[u8],
    undo: &AppendUndo,
) -> Result<(), StoreError> {
    let written = writer
        .write_all(batch)
        .and_then(|_| writer.flush())
        .and_then(|_| file.sync_data());
    if let Err(e) = written {
        if let Err(rollback) = undo.undo() {
            log::error!("추가 실패 후 복구 실패: {}", rollback);
        }
        return Err(e.into());
    }
    Ok(())
}

/// 사전 텍스트 파싱
pub fn parse_dictionary(content: &str) -> Result<Dictionary, StoreError> {
    let mut dict = Dictionary::new();

    for (i, raw) in content.lines().enumerate() {
        // 필드 값은 그대로 보존 (가중치 공백 포함)
        let line = raw.trim_end_matches('\r');
        if line.starts_with('#') || line.trim().is_empty() {
            continue;
        }

        let parts: Vec<&str> = line.split('\t').collect();
        let entry = match parts.as_slice() {
            [word, code] => DictionaryEntry::new(*word, *code, None),
            [word, code, weight] => DictionaryEntry::new(*word, *code, Some(weight.to_string())),
            _ => {
                return Err(StoreError::MalformedLine {
                    line_no: i + 1,
                    line: line.to_string(),
                })
            }
        };
        dict.insert(entry);
    }

    Ok(dict)
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}

fn ends_with_newline(file: &mut File, len: u64) -> std::io::Result<bool> {
    let mut last = [0u8; 1];
    file.seek(SeekFrom::Start(len - 1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
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
    fn test_parse_skips_comments_and_blanks() {
        let content = "# Rime user dict\n\n中国\tvsgo\t1\n  \n吸睛\txijk\n";
        let dict = parse_dictionary(content).unwrap();
        assert_eq!(dict, sample());
    }

    #[test]
    fn test_parse_malformed_line() {
        let content = "中国\tvsgo\n坏行\n";
        let err = parse_dictionary(content).unwrap_err();
        assert!(matches!(
            err,
            StoreError::MalformedLine { line_no: 2, ref line } if line == "坏行"
        ));

        let too_many = "中国\tvsgo\t1\textra\n";
        assert!(matches!(
            parse_dictionary(too_many),
            Err(StoreError::MalformedLine { line_no: 1, .. })
        ));
    }

    #[test]
    fn test_parse_crlf() {
        let dict = parse_dictionary("中国\tvsgo\t1\r\n").unwrap();
        assert_eq!(dict.get("中国").unwrap().weight.as_deref(), Some("1"));
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let file = UserDictFile::new(dir.path().join("missing.txt"));
        assert!(!file.exists());
        assert!(file.load().unwrap().is_empty());
    }

    #[test]
    fn test_replace_then_load_round_trip() {
        let dir = tempdir().unwrap();
        let file = UserDictFile::new(dir.path().join("dict.txt"));
        file.replace(&sample()).unwrap();
        assert_eq!(file.load().unwrap(), sample());

        let content = fs::read_to_string(file.path()).unwrap();
        assert_eq!(content, "中国\tvsgo\t1\n吸睛\txijk\n");
    }

    #[test]
    fn test_append_keeps_existing_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dict.txt");
        let before = "# 수동 주석\n中国\tvsgo\t1\n";
        fs::write(&path, before).unwrap();

        let file = UserDictFile::new(&path);
        let new: Dictionary = [DictionaryEntry::new("吸睛", "xijk", Some("1".into()))]
            .into_iter()
            .collect();
        file.append(&new, true).unwrap();

        let after = fs::read_to_string(&path).unwrap();
        assert!(after.starts_with(before));
        assert!(after.contains("\n# Added on "));
        assert!(after.ends_with("吸睛\txijk\t1\n"));

        let dict = file.load().unwrap();
        assert_eq!(dict.len(), 2);
        assert!(dict.contains("吸睛"));
    }

    #[test]
    fn test_append_without_trailing_newline() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dict.txt");
        fs::write(&path, "中国\tvsgo").unwrap();

        let file = UserDictFile::new(&path);
        let new: Dictionary = [DictionaryEntry::new("吸睛", "xijk", None)].into_iter().collect();
        file.append(&new, false).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "中国\tvsgo\n吸睛\txijk\n");
    }

    #[test]
    fn test_append_creates_file() {
        let dir = tempdir().unwrap();
        let file = UserDictFile::new(dir.path().join("new.txt"));
        file.append(&sample(), false).unwrap();
        assert_eq!(file.load().unwrap(), sample());
    }

    #[test]
    fn test_append_empty_without_marker_is_noop() {
        let dir = tempdir().unwrap();
        let file = UserDictFile::new(dir.path().join("none.txt"));
        file.append(&Dictionary::new(), false).unwrap();
        assert!(!file.exists());
    }

    #[test]
    fn test_weight_kept_verbatim() {
        let dir = tempdir().unwrap();
        let file = UserDictFile::new(dir.path().join("dict.txt"));
        let dict: Dictionary = [
            DictionaryEntry::new("中国", "vsgo", Some("1 ".into())),
            DictionaryEntry::new("吸睛", "xijk", Some(String::new())),
            DictionaryEntry::new("双创", "ulil", None),
        ]
        .into_iter()
        .collect();

        file.replace(&dict).unwrap();
        assert_eq!(file.load().unwrap(), dict);
    }

    /// 지정한 바이트 수만큼 쓴 뒤 실패하는 writer
    struct FailAfter<'a> {
        inner: &'a File,
        budget: usize,
    }

    impl Write for FailAfter<'_> {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if self.budget == 0 {
                return Err(std::io::Error::new(ErrorKind::Other, "디스크 가득 참"));
            }
            let mut inner = self.inner;
            let n = inner.write(&buf[..buf.len().min(self.budget)])?;
            self.budget -= n;
            Ok(n)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    const BATCH: &str = "吸睛\txijk\t1\n双创\tulil\t1\n";

    #[test]
    fn test_partial_write_restores_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dict.txt");
        let before = "# 수동 주석\n中国\tvsgo\t1\n";
        fs::write(&path, before).unwrap();

        let file = OpenOptions::new().append(true).open(&path).unwrap();
        let undo = AppendUndo::new(&path, Prior::Len(before.len() as u64));
        let writer = FailAfter {
            inner: &file,
            budget: 5,
        };

        let result = write_batch(writer, &file, BATCH.as_bytes(), &undo);
        assert!(matches!(result, Err(StoreError::Io(_))));
        assert_eq!(fs::read_to_string(&path).unwrap(), before);
    }

    #[test]
    fn test_partial_write_removes_new_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("new.txt");
        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&path)
            .unwrap();
        let undo = AppendUndo::new(&path, Prior::Missing);
        let writer = FailAfter {
            inner: &file,
            budget: 3,
        };

        assert!(write_batch(writer, &file, BATCH.as_bytes(), &undo).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_undo_after_append() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dict.txt");
        let before = "中国\tvsgo\t1\n";
        fs::write(&path, before).unwrap();

        let file = UserDictFile::new(&path);
        let undo = file.append(&sample(), true).unwrap();
        assert_ne!(fs::read_to_string(&path).unwrap(), before);

        undo.undo().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), before);
    }

    #[test]
    fn test_undo_after_append_to_new_file() {
        let dir = tempdir().unwrap();
        let file = UserDictFile::new(dir.path().join("new.txt"));
        let undo = file.append(&sample(), true).unwrap();
        assert!(file.exists());

        undo.undo().unwrap();
        assert!(!file.exists());
    }
}
