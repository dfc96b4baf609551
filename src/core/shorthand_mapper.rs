//! 전병(全拼) 음절 -> 소학 쌍병(小鹤双拼) 2글자 코드 매핑

use super::error::CodecError;

/// 음절 최대 길이 (zhuang, shuang 등)
pub const MAX_SYLLABLE_LEN: usize = 6;

/// 성모/운모 클러스터 하나를 쌍병 키로 변환
/// 표에 없는 클러스터는 None 반환
pub fn map_cluster(cluster: &str) -> Option<char> {
    match cluster {
        // 단독 모음
        "a" => Some('a'),
        "o" => Some('o'),
        "u" => Some('u'),
        "i" => Some('i'),
        "e" => Some('e'),

        // 권설 성모
        "sh" => Some('u'),
        "ch" => Some('i'),
        "zh" => Some('v'),

        // 운모
        "iu" => Some('q'),
        "uan" => Some('r'),
        "ue" => Some('t'),
        "un" => Some('y'),
        "uo" => Some('o'),
        "ie" => Some('p'),
        "iong" => Some('s'),
        "ong" => Some('s'),
        "ai" => Some('d'),
        "en" => Some('f'),
        "eng" => Some('g'),
        "ang" => Some('h'),
        "an" => Some('j'),
        "ing" => Some('k'),
        "uai" => Some('k'),
        "iang" => Some('l'),
        "uang" => Some('l'),
        "ou" => Some('z'),
        "ia" => Some('x'),
        "ua" => Some('x'),
        "ao" => Some('c'),
        "ui" => Some('v'),
        "in" => Some('b'),
        "iao" => Some('n'),
        "ian" => Some('m'),
        "ei" => Some('w'),

        _ => None,
    }
}

/// 전병 음절 하나를 2글자 쌍병 코드로 변환
///
/// 1. 공백 제거 후 영문자만, 길이 1~6 허용
/// 2. 1글자: 두 번 반복 (a -> aa)
/// 3. 2글자: 그대로 (xi -> xi)
/// 4. 3글자 이상: 앞 2글자가 표에 있으면 2글자 성모, 아니면 1글자 성모.
///    나머지 운모는 반드시 표에 있어야 함
///
/// # Examples
/// ```
/// use rime_harvest::core::encode_syllable;
/// assert_eq!(encode_syllable("shuang").unwrap(), "ul");
/// assert_eq!(encode_syllable("guo").unwrap(), "go");
/// ```
pub fn encode_syllable(input: &str) -> Result<String, CodecError> {
    let syllable: String = input.chars().filter(|c| !c.is_whitespace()).collect();

    if !syllable.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(CodecError::InvalidInput(input.to_string()));
    }
    if syllable.is_empty() || syllable.len() > MAX_SYLLABLE_LEN {
        return Err(CodecError::InvalidInput(input.to_string()));
    }
    let syllable = syllable.to_ascii_lowercase();

    match syllable.len() {
        1 => Ok(syllable.repeat(2)),
        2 => Ok(syllable),
        _ => {
            // ASCII만 남았으므로 바이트 인덱스로 분할 가능
            let (initial, rest) = match map_cluster(&syllable[..2]) {
                Some(key) => (key, &syllable[2..]),
                None => (syllable.as_bytes()[0] as char, &syllable[1..]),
            };
            let final_key = map_cluster(rest).ok_or_else(|| CodecError::UnmappedCluster {
                syllable: syllable.clone(),
                cluster: rest.to_string(),
            })?;

            let mut code = String::with_capacity(2);
            code.push(initial);
            code.push(final_key);
            Ok(code)
        }
    }
}
