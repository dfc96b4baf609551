//! 단어 -> 쌍병 코드 통합 변환기

use super::annotator::PhoneticAnnotator;
use super::error::EncodeError;
use super::shorthand_mapper::encode_syllable;

/// 단어를 글자별 쌍병 코드 목록으로 변환
///
/// 다음자는 주석기가 첫 번째로 준 발음만 사용.
/// 한 글자라도 실패하면 단어 전체가 실패 (부분 변환 없음)
#[derive(Debug, Clone)]
pub struct WordEncoder<A> {
    annotator: A,
}

impl<A: PhoneticAnnotator> WordEncoder<A> {
    pub fn new(annotator: A) -> Self {
        Self { annotator }
    }

    /// 글자 순서대로 2글자 코드 목록 반환
    pub fn encode(&self, word: &str) -> Result<Vec<String>, EncodeError> {
        if word.is_empty() {
            return Err(EncodeError::EmptyWord);
        }

        let readings = self.annotator.annotate(word);
        let chars: Vec<char> = word.chars().collect();

        let mut codes = Vec::with_capacity(chars.len());
        for (position, &ch) in chars.iter().enumerate() {
            // 주석기가 글자 수보다 적게 돌려주면 해당 글자는 발음 없음
            let reading = readings
                .get(position)
                .and_then(|r| r.as_ref())
                .ok_or_else(|| EncodeError::MissingReading {
                    word: word.to_string(),
                    position,
                    ch,
                })?;

            let code = encode_syllable(&reading.primary).map_err(|source| EncodeError::Syllable {
                word: word.to_string(),
                source,
            })?;
            codes.push(code);
        }

        Ok(codes)
    }

    /// 코드 목록을 이어붙인 단어 코드 (길이 = 2 * 글자 수)
    pub fn encode_joined(&self, word: &str) -> Result<String, EncodeError> {
        Ok(self.encode(word)?.concat())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::annotator::Reading;
    use crate::core::error::CodecError;
    use std::collections::HashMap;

    /// 고정 발음 표를 쓰는 테스트용 주석기
    struct TableAnnotator(HashMap<char, Vec<&'static str>>);

    impl TableAnnotator {
        /// 발음은 공백으로 구분, 첫 번째가 기본 발음
        fn new(entries: &[(char, &'static str)]) -> Self {
            Self(
                entries
                    .iter()
                    .map(|(c, r)| (*c, r.split_whitespace().collect()))
                    .collect(),
            )
        }
    }

    impl PhoneticAnnotator for TableAnnotator {
        fn annotate(&self, word: &str) -> Vec<Option<Reading>> {
            word.chars()
                .map(|c| {
                    self.0.get(&c).map(|r| Reading {
                        primary: r[0].to_string(),
                        alternates: r[1..].iter().map(|s| s.to_string()).collect(),
                    })
                })
                .collect()
        }
    }

    fn encoder() -> WordEncoder<TableAnnotator> {
        WordEncoder::new(TableAnnotator::new(&[
            ('中', "zhong"),
            ('国', "guo"),
            ('行', "xing hang"),
            ('昂', "ang"),
        ]))
    }

    #[test]
    fn test_encode_word() {
        assert_eq!(encoder().encode("中国").unwrap(), vec!["vs", "go"]);
        assert_eq!(encoder().encode_joined("中国").unwrap(), "vsgo");
    }

    #[test]
    fn test_heteronym_uses_first_reading() {
        // xing -> x + ing(k)
        assert_eq!(encoder().encode_joined("行").unwrap(), "xk");
    }

    #[test]
    fn test_missing_reading() {
        let err = encoder().encode("中文").unwrap_err();
        assert_eq!(
            err,
            EncodeError::MissingReading {
                word: "中文".to_string(),
                position: 1,
                ch: '文',
            }
        );
    }

    #[test]
    fn test_unmapped_syllable_fails_whole_word() {
        let err = encoder().encode("中昂").unwrap_err();
        assert!(matches!(
            err,
            EncodeError::Syllable {
                source: CodecError::UnmappedCluster { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_empty_word() {
        assert_eq!(encoder().encode(""), Err(EncodeError::EmptyWord));
    }
}
