//! 후보 단어 필터
//!
//! 분할기가 내놓은 토큰 중 사전에 넣을 만한 한자 단어만 남깁니다.

use std::collections::HashSet;
use std::sync::LazyLock;

/// 이 글자가 들어간 토큰은 허사 조합으로 보고 제외
pub static FUNCTION_CHARS: LazyLock<HashSet<char>> = LazyLock::new(|| {
    ['的', '了', '和', '或', '与', '在', '更', '这', '是', '不']
        .into_iter()
        .collect()
});

/// 수사 "一"로 시작하는 토큰은 제외 (一个, 一次 ...)
const EXCLUDED_PREFIX: char = '一';

/// CJK 통합 한자 기본 영역 (U+4E00 ~ U+9FA5)
pub fn is_basic_hanzi(ch: char) -> bool {
    ('\u{4e00}'..='\u{9fa5}').contains(&ch)
}

/// 후보 필터 설정
#[derive(Debug, Clone)]
pub struct CandidateFilter {
    pub min_len: usize,
    pub max_len: usize,
}

impl Default for CandidateFilter {
    fn default() -> Self {
        Self {
            min_len: 2,
            max_len: 8,
        }
    }
}

impl CandidateFilter {
    pub fn new(min_len: usize, max_len: usize) -> Self {
        Self { min_len, max_len }
    }

    /// 토큰을 정리하고 통과하면 단어 반환
    ///
    /// 간격점(·)과 공백 제거 후, 전부 한자이고 길이가 범위 안이며
    /// 허사 글자가 없는 토큰만 통과. 숫자/영문/문장부호는 한자 검사에서 걸러짐
    pub fn accept(&self, token: &str) -> Option<String> {
        let word: String = token
            .chars()
            .filter(|&c| c != '·' && !c.is_whitespace())
            .collect();

        let len = word.chars().count();
        if len < self.min_len || len > self.max_len {
            return None;
        }
        if !word.chars().all(is_basic_hanzi) {
            return None;
        }
        if word.chars().any(|c| FUNCTION_CHARS.contains(&c)) {
            return None;
        }
        if word.starts_with(EXCLUDED_PREFIX) {
            return None;
        }

        Some(word)
    }
}
