//! 인기 검색어 피드 수집
//!
//! 응답 형식:
//! ```json
//! { "data": { "total_page": 3, "list": "[{\"title\": \"...\", \"desc\": \"...\"}]" } }
//! ```
//! `list`는 JSON 배열을 담은 문자열입니다.

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use super::error::HarvestError;
use super::WordSource;

/// 피드 설정
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct FeedConfig {
    #[serde(default = "default_feed_url")]
    pub url: String,
    #[serde(default = "default_tab")]
    pub tab: String,
    #[serde(default = "default_sub_tab")]
    pub sub_tab: String,
}

fn default_feed_url() -> String {
    "https://api.rebang.today/v1/items".to_string()
}

fn default_tab() -> String {
    "top".to_string()
}

fn default_sub_tab() -> String {
    "today".to_string()
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: default_feed_url(),
            tab: default_tab(),
            sub_tab: default_sub_tab(),
        }
    }
}

#[derive(Deserialize, Debug)]
struct FeedResponse {
    data: FeedPage,
}

#[derive(Deserialize, Debug)]
struct FeedPage {
    #[serde(default = "default_total_page")]
    total_page: u32,
    list: String,
}

fn default_total_page() -> u32 {
    1
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct FeedItem {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub desc: Option<String>,
}

/// 응답 본문 한 페이지 파싱: (전체 페이지 수, 항목 목록)
pub fn parse_page(body: &str) -> Result<(u32, Vec<FeedItem>), HarvestError> {
    let response: FeedResponse = serde_json::from_str(body)?;
    let items: Vec<FeedItem> = serde_json::from_str(&response.data.list)?;
    Ok((response.data.total_page, items))
}

/// 항목에서 문장 추출: 모든 제목 다음에 모든 설명, 앞뒤 공백 제거
pub fn extract_sentences(items: &[FeedItem]) -> Vec<String> {
    let titles = items.iter().filter_map(|item| item.title.as_deref());
    let descs = items.iter().filter_map(|item| item.desc.as_deref());
    titles
        .chain(descs)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// rebang.today 인기 목록 피드
pub struct RebangFeed {
    client: Client,
    config: FeedConfig,
}

impl RebangFeed {
    pub fn new(config: FeedConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn fetch_page(&self, page: u32) -> Result<String, HarvestError> {
        let mut query: Vec<(&str, String)> = vec![
            ("tab", self.config.tab.clone()),
            ("sub_tab", self.config.sub_tab.clone()),
            ("version", "1".to_string()),
        ];
        if page > 1 {
            query.push(("page", page.to_string()));
        }

        let response = self
            .client
            .get(&self.config.url)
            .query(&query)
            .header("accept", "application/json")
            .header("referer", "https://rebang.today/")
            .send()?;

        if !response.status().is_success() {
            return Err(HarvestError::Status(response.status().as_u16()));
        }
        Ok(response.text()?)
    }
}

impl WordSource for RebangFeed {
    /// 첫 페이지 실패는 에러, 이후 페이지 실패는 로그 후 건너뜀
    fn fetch(&self) -> Result<Vec<String>, HarvestError> {
        let (total_page, mut items) = parse_page(&self.fetch_page(1)?)?;

        for page in 2..=total_page {
            match self.fetch_page(page).and_then(|body| parse_page(&body)) {
                Ok((_, more)) => items.extend(more),
                Err(e) => log::error!("{}페이지 요청 실패: {}", page, e),
            }
        }

        Ok(extract_sentences(&items))
    }
}
