//! rime-harvest - 인기 검색어에서 새 단어를 모아 Rime 사용자 사전에 추가

use rime_harvest::config::{config_path, load_config, SplitMode};
use rime_harvest::harvest::{
    collect_candidates, CandidateFilter, LlmSegmenter, LocalSegmenter, RebangFeed, Segmenter,
    WordSource,
};
use rime_harvest::sync::SyncFailure;
use rime_harvest::{DictionaryStore, PinyinAnnotator, Synchronizer, WordEncoder};
use std::process;

fn main() {
    // 설정 로드 (사전을 건드리기 전에 실패하면 종료)
    let path = config_path();
    let mut config = match load_config(&path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}: {}", path.display(), e);
            process::exit(1);
        }
    };
    config.apply_env_overrides();

    // 로깅 초기화 (RUST_LOG가 없으면 설정값 사용)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    if let Err(e) = config.validate() {
        log::error!("설정 오류: {}", e);
        process::exit(1);
    }

    // 피드에서 문장 수집 (실패 시 빈 목록으로 진행)
    let feed = RebangFeed::new(config.feed.clone());
    let sentences = feed.fetch().unwrap_or_else(|e| {
        log::error!("피드 수집 실패: {}", e);
        Vec::new()
    });
    for (index, sentence) in sentences.iter().enumerate() {
        log::info!("{} {}", index + 1, sentence);
    }

    let segmenter: Box<dyn Segmenter> = match config.split_words_mode {
        SplitMode::Local => Box::new(LocalSegmenter::new()),
        SplitMode::Llm => Box::new(LlmSegmenter::new(
            config.llm_api_url.clone().unwrap_or_default(),
            config.llm_api_key.clone().unwrap_or_default(),
            config.llm_model.clone(),
        )),
    };
    let filter = CandidateFilter::new(config.min_word_len, config.max_word_len);
    let candidates = collect_candidates(&sentences, segmenter.as_ref(), &filter);
    log::info!("후보 단어 {}개", candidates.len());

    let synchronizer = Synchronizer::new(
        WordEncoder::new(PinyinAnnotator::new()),
        DictionaryStore::new(&config.user_dict_path, &config.user_dict_db_path),
    )
    .with_default_weight(config.default_weight.clone());

    let report = synchronizer.synchronize(&candidates);
    let skipped: Vec<&str> = report.skipped_words().collect();
    if !skipped.is_empty() {
        log::info!("변환 불가로 건너뛴 단어: {}", skipped.join(", "));
    }
    if report.is_success() {
        log::info!("이번 실행 종료: {}", report);
    } else {
        // 단어별 변환 실패는 이미 경고로 남김
        for failure in report
            .failures
            .iter()
            .filter(|f| !matches!(f, SyncFailure::Encode { .. }))
        {
            log::error!("{}", failure);
        }
        log::error!("이번 실행 종료 (저장 실패 포함): {}", report);
    }
}
