//! 발음 코드 생성: 음절 -> 쌍병 코드, 단어 -> 이어붙인 코드

mod annotator;
mod encoder;
mod error;
mod shorthand_mapper;

pub use annotator::{PhoneticAnnotator, PinyinAnnotator, Reading};
pub use encoder::WordEncoder;
pub use error::{CodecError, EncodeError};
pub use shorthand_mapper::{encode_syllable, map_cluster, MAX_SYLLABLE_LEN};
