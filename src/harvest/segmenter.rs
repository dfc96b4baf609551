//! 문장 분할기
//!
//! - [`LocalSegmenter`]: 사전 기반 일반 분할기 (오프라인)
//! - [`LlmSegmenter`]: 채팅 완성 API에 분할을 요청

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use super::error::HarvestError;
use super::Segmenter;

/// 로컬 사전 기반 분할기
pub struct LocalSegmenter;

impl LocalSegmenter {
    /// 생성할 때마다 분할 사전을 초기화
    pub fn new() -> Self {
        chinese_segmenter::initialize();
        Self
    }
}

impl Default for LocalSegmenter {
    fn default() -> Self {
        Self::new()
    }
}

impl Segmenter for LocalSegmenter {
    fn split(&self, sentence: &str) -> Result<Vec<String>, HarvestError> {
        Ok(chinese_segmenter::tokenize(sentence)
            .into_iter()
            .map(|token| token.to_string())
            .collect())
    }
}

const SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// 분할 예시를 담은 사용자 프롬프트
fn user_prompt(sentence: &str) -> String {
    format!(
        "样例输入 \"2.5亿美元打造游戏史首个变性黑人！揭秘《星鸣特攻》究竟是如何“正确”地走向暴死的\" \
         样例输出 ['2.5亿美元', '打造', '游戏史', '首个', '变性', '黑人', '揭秘', '星鸣特攻', '究竟', '如何', '正确地', '走向', '暴死']  \
         参考输入输出对后面这句话进行拆分  {}",
        sentence
    )
}

#[derive(Serialize, Debug)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Serialize, Debug)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
}

#[derive(Deserialize, Debug)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize, Debug)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize, Debug)]
struct ChatReply {
    content: String,
}

/// 모델 응답 `['a', 'b', ...]` 파싱
pub fn parse_reply(content: &str) -> Vec<String> {
    let inner = content.trim().trim_start_matches('[').trim_end_matches(']');
    inner
        .split(", ")
        .map(|phrase| phrase.trim().trim_matches(|c: char| c == '\'' || c == '"'))
        .filter(|phrase| !phrase.is_empty())
        .map(str::to_string)
        .collect()
}

/// 채팅 완성 API 기반 분할기
pub struct LlmSegmenter {
    client: Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl LlmSegmenter {
    pub fn new(
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            api_url: api_url.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }
}

impl Segmenter for LlmSegmenter {
    fn split(&self, sentence: &str) -> Result<Vec<String>, HarvestError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt(sentence),
                },
            ],
            stream: false,
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()?;
        if !response.status().is_success() {
            return Err(HarvestError::Status(response.status().as_u16()));
        }

        let reply: ChatResponse = response.json()?;
        let choice = reply
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| HarvestError::Format("choices 필드가 비어 있습니다".into()))?;
        Ok(parse_reply(&choice.message.content))
    }
}
