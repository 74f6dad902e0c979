//! Legal Digest
//!
//! A small HTTP service that turns legal documents into a structured digest
//! (key points, risks, recommendations) using a hosted LLM.
//!
//! # Architecture
//!
//! - **Server**: Axum router with two independent JSON handlers
//! - **Extraction**: extension-dispatched PDF / OCR / plain text extractors
//! - **Summarization**: short-input heuristics, URL fetching and one
//!   completion call per request
//!
//! # Modules
//!
//! - [`api`]: HTTP handlers and error bodies
//! - [`config`]: layered configuration (defaults, file, env, CLI)
//! - [`extraction`]: scratch storage and text extractors
//! - [`llm`]: completion driver trait and provider implementations
//! - [`summarize`]: the summarize pipeline and digest schema

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::unused_async)]

pub mod api;
pub mod config;
pub mod extraction;
pub mod llm;
pub mod server;
pub mod summarize;

use anyhow::Context;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::extraction::{ExtractorRegistry, ScratchDir};
use crate::llm::CompletionDriver;
use crate::summarize::{Summarizer, UrlFetcher};

/// Application state shared across all handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Global Configuration
    pub config: Arc<AppConfig>,
    /// Scratch directory for in-flight uploads.
    pub scratch: ScratchDir,
    /// Extension-dispatched text extractors.
    pub extractors: Arc<ExtractorRegistry>,
    /// Summarize pipeline (URL fetcher + completion driver).
    pub summarizer: Arc<Summarizer>,
}

impl AppState {
    /// Build the state with the default extractors for `config`.
    pub fn new(config: Arc<AppConfig>, driver: Arc<dyn CompletionDriver>) -> anyhow::Result<Self> {
        let extractors = ExtractorRegistry::from_config(&config.extraction);
        Self::with_extractors(config, extractors, driver)
    }

    /// Build the state around an explicit extractor registry.
    pub fn with_extractors(
        config: Arc<AppConfig>,
        extractors: ExtractorRegistry,
        driver: Arc<dyn CompletionDriver>,
    ) -> anyhow::Result<Self> {
        let scratch = ScratchDir::create(&config.uploads.dir).with_context(|| {
            format!(
                "Failed to create upload directory {}",
                config.uploads.dir.display()
            )
        })?;

        let fetcher = UrlFetcher::new(config.summarize.fetch_timeout())
            .context("Failed to build URL fetch client")?;
        let summarizer = Summarizer::new(driver, fetcher, config.summarize.min_chars);

        Ok(Self {
            config,
            scratch,
            extractors: Arc::new(extractors),
            summarizer: Arc::new(summarizer),
        })
    }
}
