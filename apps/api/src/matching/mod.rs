//! Match Engine — scores a resume against a job description and asks the
//! generation service for the keyword gap and improvement suggestions.
//!
//! The engine is constructed per analysis request with injected service
//! seams (`TextEmbedder` / `TextGenerator`), never ambient globals. Its three
//! operations are independent; `analyze` runs them as concurrent tasks under
//! one shared timeout budget.

pub mod handlers;
pub mod prompts;

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::errors::AppError;
use crate::matching::prompts::{
    render_prompt, KEYWORD_TEMPERATURE, MISSING_KEYWORDS_PROMPT_TEMPLATE,
    SUGGESTIONS_PROMPT_TEMPLATE, SUGGESTION_TEMPERATURE,
};
use crate::openai::{TextEmbedder, TextGenerator, UpstreamError};

/// Guards against division by zero when either embedding is degenerate.
const COSINE_EPSILON: f64 = 1e-8;

/// Keyword list cap — the prompt asks for at most this many terms, and the
/// parser enforces it regardless of what the model returns.
const MAX_MISSING_KEYWORDS: usize = 10;

/// One analysis outcome. Immutable, per-request, never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct MatchResult {
    /// 0–100 percentage, rounded to 2 decimal places. Not clamped — an
    /// out-of-range value would be a pass-through of unexpected upstream
    /// vectors, which we surface rather than defend against.
    pub score: f64,
    /// Ordered, at most 10 entries. Empty means no missing keywords.
    pub missing_keywords: Vec<String>,
    /// Free-form markdown from the generation service.
    pub suggestions: String,
}

pub struct MatchEngine {
    embedder: Arc<dyn TextEmbedder>,
    generator: Arc<dyn TextGenerator>,
    timeout: Duration,
}

impl MatchEngine {
    pub fn new(
        embedder: Arc<dyn TextEmbedder>,
        generator: Arc<dyn TextGenerator>,
        timeout: Duration,
    ) -> Self {
        Self {
            embedder,
            generator,
            timeout,
        }
    }

    /// Embeds both texts with the same model and maps their cosine similarity
    /// to a percentage rounded to 2 decimal places.
    pub async fn compute_score(&self, resume_text: &str, job_text: &str) -> Result<f64, AppError> {
        let (resume_vector, job_vector) = tokio::try_join!(
            self.embedder.embed(resume_text),
            self.embedder.embed(job_text)
        )?;

        let similarity = cosine_similarity(&resume_vector, &job_vector);
        Ok(round_two_places(similarity * 100.0))
    }

    /// Asks the generation service for up to 10 job-description terms missing
    /// from the resume. Returns the raw response: a comma-separated list or
    /// the literal "None".
    pub async fn find_missing_keywords(
        &self,
        resume_text: &str,
        job_text: &str,
    ) -> Result<String, AppError> {
        let prompt = render_prompt(MISSING_KEYWORDS_PROMPT_TEMPLATE, resume_text, job_text);
        let response = self.generator.complete(&prompt, KEYWORD_TEMPERATURE).await?;
        Ok(response)
    }

    /// Asks the generation service for markdown-formatted resume-alignment
    /// suggestions.
    pub async fn generate_suggestions(
        &self,
        resume_text: &str,
        job_text: &str,
    ) -> Result<String, AppError> {
        let prompt = render_prompt(SUGGESTIONS_PROMPT_TEMPLATE, resume_text, job_text);
        let response = self
            .generator
            .complete(&prompt, SUGGESTION_TEMPERATURE)
            .await?;
        Ok(response)
    }

    /// Full analysis: the three operations issued concurrently under one
    /// shared timeout budget. All-or-nothing — if any operation fails, the
    /// whole analysis fails; no partial results are assembled.
    pub async fn analyze(&self, resume_text: &str, job_text: &str) -> Result<MatchResult, AppError> {
        let work = async {
            tokio::try_join!(
                self.compute_score(resume_text, job_text),
                self.find_missing_keywords(resume_text, job_text),
                self.generate_suggestions(resume_text, job_text)
            )
        };

        let (score, raw_keywords, suggestions) = tokio::time::timeout(self.timeout, work)
            .await
            .map_err(|_| UpstreamError::Timeout {
                secs: self.timeout.as_secs(),
            })??;

        Ok(MatchResult {
            score,
            missing_keywords: parse_keyword_list(&raw_keywords),
            suggestions,
        })
    }
}

/// Cosine similarity of two embedding vectors, accumulated in f64.
/// `dot(r, j) / (||r|| * ||j|| + ε)` — ε keeps a degenerate zero vector from
/// dividing by zero.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() {
        // Both vectors come from the same embedding model, so this means
        // the provider broke its fixed-dimension contract. The score is
        // still computed over the shared prefix (pass-through semantics),
        // but the break is made visible.
        tracing::warn!(
            "embedding dimensions differ: {} vs {} — provider contract break",
            a.len(),
            b.len()
        );
    }

    let mut dot = 0.0_f64;
    let mut norm_a = 0.0_f64;
    let mut norm_b = 0.0_f64;

    for (x, y) in a.iter().zip(b.iter()) {
        let (x, y) = (*x as f64, *y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    dot / (norm_a.sqrt() * norm_b.sqrt() + COSINE_EPSILON)
}

fn round_two_places(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Parses the generation service's keyword response into an ordered list.
/// "None" (any case), empty, or whitespace-only all mean no missing keywords.
pub fn parse_keyword_list(raw: &str) -> Vec<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
        return Vec::new();
    }

    trimmed
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .take(MAX_MISSING_KEYWORDS)
        .map(String::from)
        .collect()
}
