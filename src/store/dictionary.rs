//! 사용자 사전 자료구조

use std::collections::HashMap;

/// 사전 항목 하나: 단어, 쌍병 코드, 선택적 가중치
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryEntry {
    pub word: String,
    pub code: String,
    pub weight: Option<String>,
}

impl DictionaryEntry {
    pub fn new(word: impl Into<String>, code: impl Into<String>, weight: Option<String>) -> Self {
        Self {
            word: word.into(),
            code: code.into(),
            weight,
        }
    }

    /// 사전 파일 한 줄 (`word\tcode[\tweight]`, 개행 제외)
    ///
    /// 가중치는 그대로 기록 (빈 문자열이면 탭만 남음). 다시 읽어도 같은 항목
    pub fn to_line(&self) -> String {
        match self.weight.as_deref() {
            Some(weight) => format!("{}\t{}\t{}", self.word, self.code, weight),
            None => format!("{}\t{}", self.word, self.code),
        }
    }
}

/// 단어 -> 항목 매핑
///
/// 삽입 순서를 유지하며, 같은 단어를 다시 넣으면 제자리에서 덮어씀
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dictionary {
    entries: Vec<DictionaryEntry>,
    index: HashMap<String, usize>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// 항목 추가, 기존 항목이 있으면 교체 후 이전 항목 반환
    pub fn insert(&mut self, entry: DictionaryEntry) -> Option<DictionaryEntry> {
        match self.index.get(&entry.word) {
            Some(&i) => Some(std::mem::replace(&mut self.entries[i], entry)),
            None => {
                self.index.insert(entry.word.clone(), self.entries.len());
                self.entries.push(entry);
                None
            }
        }
    }

    pub fn get(&self, word: &str) -> Option<&DictionaryEntry> {
        self.index.get(word).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, word: &str) -> bool {
        self.index.contains_key(word)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 삽입 순서대로 순회
    pub fn iter(&self) -> std::slice::Iter<'_, DictionaryEntry> {
        self.entries.iter()
    }
}

impl FromIterator<DictionaryEntry> for Dictionary {
    fn from_iter<I: IntoIterator<Item = DictionaryEntry>>(iter: I) -> Self {
        let mut dict = Dictionary::new();
        for entry in iter {
            dict.insert(entry);
        }
        dict
    }
}

impl<'a> IntoIterator for &'a Dictionary {
    type Item = &'a DictionaryEntry;
    type IntoIter = std::slice::Iter<'a, DictionaryEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
