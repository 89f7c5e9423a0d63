//! # tmem
//!
//! A local-first translation memory engine with segment-level reuse.
//!
//! tmem wraps an external machine-translation backend with a persistence
//! layer that remembers every translated document and segment. Documents
//! are deduplicated by content hash, segments are matched against the
//! memory by textual similarity, and the backend is only called when
//! nothing similar enough has been translated before.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────┐   ┌──────────────┐   ┌──────────┐
//! │ Segmenter │──▶│ Reuse Engine │──▶│  SQLite   │
//! │ sentences │   │ match/policy │   │ versioned │
//! └───────────┘   └──────┬───────┘   └──────────┘
//!                        │ cache miss
//!                        ▼
//!                 ┌──────────────┐
//!                 │  Translator  │
//!                 │  (external)  │
//!                 └──────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! tmem init                               # create database
//! tmem translate report.md --pair fr-en   # translate a document
//! tmem text "Bonjour le monde" --pair fr-en
//! tmem history                            # what was translated, when
//! tmem stats                              # reuse and revision rates
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`hash`] | Content-addressing digests |
//! | [`segment`] | Sentence-boundary segmentation |
//! | [`matcher`] | Similarity scoring and ranking |
//! | [`store`] | SQLite persistence: documents, translations, segments |
//! | [`translator`] | Translation backend abstraction |
//! | [`engine`] | Reuse-vs-translate orchestration |
//! | [`progress`] | Progress reporting |
//! | [`migrate`] | Schema migrations |

pub mod config;
pub mod engine;
pub mod get;
pub mod hash;
pub mod history;
pub mod matcher;
pub mod migrate;
pub mod models;
pub mod progress;
pub mod segment;
pub mod similar;
pub mod stats;
pub mod store;
pub mod translate_cmd;
pub mod translator;
