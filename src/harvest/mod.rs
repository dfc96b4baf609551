//! 새 단어 수집 (외부 협력자)
//!
//! 피드에서 문장을 받아 분할기로 나누고, 필터를 통과한 토큰만
//! 후보 단어 집합으로 모읍니다. 분할 품질과 네트워크 재시도는 다루지 않습니다.

mod error;
mod feed;
mod filter;
mod segmenter;

use std::collections::BTreeSet;

pub use error::HarvestError;
pub use feed::{extract_sentences, parse_page, FeedConfig, FeedItem, RebangFeed};
pub use filter::{is_basic_hanzi, CandidateFilter, FUNCTION_CHARS};
pub use segmenter::{parse_reply, LlmSegmenter, LocalSegmenter};

/// 문장 목록 공급원
pub trait WordSource {
    fn fetch(&self) -> Result<Vec<String>, HarvestError>;
}

/// 문장 -> 토큰 분할기
pub trait Segmenter {
    fn split(&self, sentence: &str) -> Result<Vec<String>, HarvestError>;
}

/// 모든 문장을 분할하고 필터를 통과한 단어만 모음
///
/// 분할에 실패한 문장은 로그 후 건너뜀
pub fn collect_candidates<S: Segmenter + ?Sized>(
    sentences: &[String],
    segmenter: &S,
    filter: &CandidateFilter,
) -> BTreeSet<String> {
    let mut candidates = BTreeSet::new();

    for sentence in sentences {
        match segmenter.split(sentence) {
            Ok(tokens) => {
                candidates.extend(tokens.iter().filter_map(|token| filter.accept(token)));
            }
            Err(e) => log::error!("문장 분할 실패 ({}): {}", sentence, e),
        }
    }

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 공백 기준 분할, "失败"가 들어간 문장은 에러
    struct WhitespaceSegmenter;

    impl Segmenter for WhitespaceSegmenter {
        fn split(&self, sentence: &str) -> Result<Vec<String>, HarvestError> {
            if sentence.contains("失败") {
                return Err(HarvestError::Status(500));
            }
            Ok(sentence.split_whitespace().map(str::to_string).collect())
        }
    }

    #[test]
    fn test_collect_candidates() {
        let sentences = vec![
            "揭秘 星鸣特攻 的 暴死".to_string(),
            "国货之光 1k出头 揭秘".to_string(),
            "请求 失败".to_string(),
        ];
        let candidates =
            collect_candidates(&sentences, &WhitespaceSegmenter, &CandidateFilter::default());

        let words: Vec<&str> = candidates.iter().map(String::as_str).collect();
        assert_eq!(words, vec!["国货之光", "揭秘", "星鸣特攻", "暴死"]);
    }
}
