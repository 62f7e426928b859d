//! Network boundary: page fetching and model calls feeding the synchronous
//! reconciliation code.

use anyhow::{Context, Result};
use futures::future::join_all;
use tracing::{info, warn};

use crate::environment::ModelSettings;
use crate::error::EngineError;
use crate::llm::{GenerationRequest, ModelClient, RawModelResponse, ResponseShape};
use crate::llm::{DEFAULT_MAX_OUTPUT_TOKENS, DEFAULT_TEMPERATURE};
use crate::prompt::{common_table_prompt, json_extraction_prompt, text_block_extraction_prompt};
use crate::reconcile::{ReconciliationReport, Reconciler};
use crate::spec::types::{CommonSpecEntry, ConfigKeySet, SpecificationRecord};
use crate::{TARGET_LLM_REQUEST, TARGET_WEB_REQUEST};

/// Supplies page text for a URL. HTML has already been reduced to text.
#[allow(async_fn_in_trait)]
pub trait PageSource {
    async fn fetch_text(&self, url: &str) -> Result<String>;
}

pub struct SpecPipeline<C: ModelClient, P: PageSource> {
    client: C,
    pages: P,
    reconciler: Reconciler,
    temperature: f32,
    max_output_tokens: u32,
}

impl<C: ModelClient, P: PageSource> SpecPipeline<C, P> {
    pub fn new(client: C, pages: P) -> Self {
        Self {
            client,
            pages,
            reconciler: Reconciler::default(),
            temperature: DEFAULT_TEMPERATURE,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
        }
    }

    pub fn with_reconciler(mut self, reconciler: Reconciler) -> Self {
        self.reconciler = reconciler;
        self
    }

    pub fn with_settings(mut self, settings: &ModelSettings) -> Self {
        self.temperature = settings.temperature;
        self.max_output_tokens = settings.max_output_tokens;
        self
    }

    pub fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }

    fn request(&self, prompt: &str, shape: ResponseShape) -> GenerationRequest {
        GenerationRequest::new(prompt)
            .temperature(self.temperature)
            .max_output_tokens(self.max_output_tokens)
            .response_shape(shape)
    }

    /// Fetch every URL concurrently. Failed or empty pages are logged and
    /// skipped; the result keeps the order of `urls`.
    pub async fn fetch_pages(&self, urls: &[String]) -> Vec<String> {
        let results = join_all(urls.iter().map(|url| self.pages.fetch_text(url))).await;

        urls.iter()
            .zip(results)
            .filter_map(|(url, result)| match result {
                Ok(text) if !text.trim().is_empty() => Some(text),
                Ok(_) => {
                    warn!(target: TARGET_WEB_REQUEST, "Page {} returned no text", url);
                    None
                }
                Err(e) => {
                    warn!(target: TARGET_WEB_REQUEST, "Failed to fetch page {}: {:#}", url, e);
                    None
                }
            })
            .collect()
    }

    /// Ask the model for a specification bundle in both output formats at
    /// once and keep the first usable answer, JSON first.
    ///
    /// Upstream failures degrade to an empty bundle; a configuration error is
    /// returned since retrying cannot help.
    pub async fn extract(&self, product: &str, pages: &[String]) -> Result<ConfigKeySet, EngineError> {
        let json_request = self.request(&json_extraction_prompt(product, pages), ResponseShape::Json);
        let text_request = self.request(&text_block_extraction_prompt(product, pages), ResponseShape::Text);

        let (json_response, text_response) = tokio::join!(
            self.client.generate(&json_request),
            self.client.generate(&text_request)
        );

        let json_bundle = self.bundle_from(json_response)?;
        let text_bundle = self.bundle_from(text_response)?;

        match json_bundle.or(text_bundle) {
            Some(bundle) => Ok(bundle),
            None => {
                warn!(target: TARGET_LLM_REQUEST, "No specification bundle recovered for '{}'", product);
                Ok(ConfigKeySet::empty())
            }
        }
    }

    fn bundle_from(
        &self,
        response: Result<RawModelResponse, EngineError>,
    ) -> Result<Option<ConfigKeySet>, EngineError> {
        match response {
            Ok(response) => Ok(self.reconciler.extract_bundle(&response)),
            Err(EngineError::Upstream { status, message }) => {
                warn!(
                    target: TARGET_LLM_REQUEST,
                    "Extraction call failed (status {}): {}", status, message
                );
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Fetch pages, extract the second source's bundle and reconcile it with
    /// the Stage-1 specifications.
    pub async fn run(
        &self,
        product: &str,
        urls: &[String],
        stage1: &[SpecificationRecord],
    ) -> Result<ReconciliationReport> {
        let pages = self.fetch_pages(urls).await;
        info!(
            target: TARGET_WEB_REQUEST,
            "Fetched {}/{} page(s) for '{}'",
            pages.len(),
            urls.len(),
            product
        );

        let bundle = self
            .extract(product, &pages)
            .await
            .with_context(|| format!("Failed to extract specifications for '{}'", product))?;

        Ok(self.reconciler.reconcile(stage1, &bundle))
    }

    /// Ask the model for a common-spec table and parse it against Stage 1.
    /// An upstream failure yields no entries.
    pub async fn second_pass(
        &self,
        stage1: &[SpecificationRecord],
        stage2: &[SpecificationRecord],
    ) -> Result<Vec<CommonSpecEntry>, EngineError> {
        let request = self.request(&common_table_prompt(stage1, stage2), ResponseShape::Text);
        match self.client.generate(&request).await {
            Ok(response) => Ok(self.reconciler.second_pass(stage1, &response.text())),
            Err(EngineError::Upstream { status, message }) => {
                warn!(
                    target: TARGET_LLM_REQUEST,
                    "Common-spec call failed (status {}): {}", status, message
                );
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }
}
