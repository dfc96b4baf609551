pub mod config;
pub mod core;
pub mod harvest;
pub mod store;
pub mod sync;

pub use crate::core::{encode_syllable, PinyinAnnotator, WordEncoder};
pub use store::{Dictionary, DictionaryEntry, DictionaryStore};
pub use sync::{SyncReport, Synchronizer};
