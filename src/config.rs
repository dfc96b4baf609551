//! 설정 파일 로드/저장 (JSON)

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::harvest::FeedConfig;

/// 설정 파일 경로를 지정하는 환경 변수
pub const CONFIG_PATH_ENV: &str = "RIME_HARVEST_CONFIG";

/// 문장 분할 방식
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SplitMode {
    /// 로컬 사전 기반 분할기
    #[default]
    #[serde(alias = "jieba")]
    Local,
    /// 채팅 완성 API
    #[serde(alias = "deepseek")]
    Llm,
}

/// 설정 로드/검증 에러
#[derive(Debug)]
pub enum ConfigError {
    /// 파일 읽기 실패
    Io(std::io::Error),
    /// JSON 파싱 실패
    Parse(String),
    /// 필수 자격 증명 없음
    MissingCredential(&'static str),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "설정 파일 읽기 오류: {}", e),
            ConfigError::Parse(s) => write!(f, "설정 파일 파싱 오류: {}", s),
            ConfigError::MissingCredential(name) => write!(f, "{} 값이 비어 있습니다", name),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

/// 수집기 설정
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct HarvestConfig {
    /// Rime 사용자 사전 텍스트 파일
    #[serde(default = "default_user_dict_path")]
    pub user_dict_path: PathBuf,
    /// SQLite 미러 파일
    #[serde(default = "default_user_dict_db_path")]
    pub user_dict_db_path: PathBuf,
    #[serde(default)]
    pub split_words_mode: SplitMode,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub llm_api_url: Option<String>,
    #[serde(default)]
    pub llm_api_key: Option<String>,
    #[serde(default = "default_llm_model")]
    pub llm_model: String,
    /// env_logger 기본 필터 (RUST_LOG가 우선)
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// 새 항목 가중치
    #[serde(default = "default_weight")]
    pub default_weight: String,
    #[serde(default = "default_min_word_len")]
    pub min_word_len: usize,
    #[serde(default = "default_max_word_len")]
    pub max_word_len: usize,
}

fn default_user_dict_path() -> PathBuf {
    PathBuf::from("rime_user_dict.txt")
}

fn default_user_dict_db_path() -> PathBuf {
    PathBuf::from("rime_user_dict.db")
}

fn default_llm_model() -> String {
    "deepseek-chat".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_weight() -> String {
    crate::sync::DEFAULT_WEIGHT.to_string()
}

fn default_min_word_len() -> usize {
    2
}

fn default_max_word_len() -> usize {
    8
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            user_dict_path: default_user_dict_path(),
            user_dict_db_path: default_user_dict_db_path(),
            split_words_mode: SplitMode::default(),
            feed: FeedConfig::default(),
            llm_api_url: None,
            llm_api_key: None,
            llm_model: default_llm_model(),
            log_level: default_log_level(),
            default_weight: default_weight(),
            min_word_len: default_min_word_len(),
            max_word_len: default_max_word_len(),
        }
    }
}

impl HarvestConfig {
    /// 환경 변수 LLM_API_URL / LLM_API_KEY로 덮어쓰기 (CI 비밀값 경로)
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("LLM_API_URL") {
            self.llm_api_url = Some(url);
        }
        if let Ok(key) = std::env::var("LLM_API_KEY") {
            self.llm_api_key = Some(key);
        }
    }

    /// 실행 전 필수값 확인. LLM 모드에는 URL과 키가 있어야 함
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.split_words_mode == SplitMode::Llm {
            if is_blank(&self.llm_api_url) {
                return Err(ConfigError::MissingCredential("LLM_API_URL"));
            }
            if is_blank(&self.llm_api_key) {
                return Err(ConfigError::MissingCredential("LLM_API_KEY"));
            }
        }
        if self.min_word_len == 0 || self.min_word_len > self.max_word_len {
            return Err(ConfigError::Parse(format!(
                "단어 길이 범위가 잘못됨: {}..={}",
                self.min_word_len, self.max_word_len
            )));
        }
        Ok(())
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

/// 설정 파일 경로: $RIME_HARVEST_CONFIG 또는 ./config.json
pub fn config_path() -> PathBuf {
    std::env::var(CONFIG_PATH_ENV)
        .ok()
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.json"))
}

/// 설정 파일 로드 (파일 없으면 기본값, 파싱 실패는 에러)
pub fn load_config(path: &Path) -> Result<HarvestConfig, ConfigError> {
    match fs::read_to_string(path) {
        Ok(content) => {
            serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(HarvestConfig::default()),
        Err(e) => Err(e.into()),
    }
}

/// 설정 파일 저장
pub fn save_config(path: &Path, config: &HarvestConfig) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let json =
        serde_json::to_string_pretty(config).map_err(|e| ConfigError::Parse(e.to_string()))?;
    fs::write(path, json)?;
    Ok(())
}
