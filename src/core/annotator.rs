//! 한자 발음(병음) 주석기

use pinyin::ToPinyinMulti;

/// 글자 하나의 발음: 첫 번째 발음 + 나머지 다음자(多音字) 발음
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reading {
    pub primary: String,
    pub alternates: Vec<String>,
}

impl Reading {
    /// 다음자가 없는 발음
    pub fn single(primary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            alternates: Vec::new(),
        }
    }
}

/// 단어를 글자 단위 발음 목록으로 변환하는 외부 주석기
///
/// 반환 목록은 글자 순서와 같고, 발음을 모르는 글자는 None
pub trait PhoneticAnnotator {
    fn annotate(&self, word: &str) -> Vec<Option<Reading>>;
}

/// `pinyin` 크레이트 기반 주석기 (성조 없는 병음)
#[derive(Debug, Default, Clone, Copy)]
pub struct PinyinAnnotator;

impl PinyinAnnotator {
    pub fn new() -> Self {
        Self
    }
}

/// ü는 음절 알파벳 밖이므로 입력기 관례대로 치환.
/// üe(lüe, nüe)는 운모 ue로 치고, 나머지 ü는 v
fn normalize_plain(plain: &str) -> String {
    plain.replace("üe", "ue").replace('ü', "v")
}

impl PhoneticAnnotator for PinyinAnnotator {
    fn annotate(&self, word: &str) -> Vec<Option<Reading>> {
        word.to_pinyin_multi()
            .map(|multi| -> Option<Reading> {
                let mut readings = multi?.into_iter().map(|p| normalize_plain(p.plain()));
                let primary = readings.next()?;
                Some(Reading {
                    primary,
                    alternates: readings.collect(),
                })
            })
            .collect()
    }
}
