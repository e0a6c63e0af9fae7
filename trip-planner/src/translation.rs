//! Translation collaborator
//!
//! The remote translation service is opaque: given text and a target
//! language it returns translated text or fails. Callers can tell a missing
//! or rejected credential apart from any other service failure.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

/// Language the app translates into unless told otherwise
pub const DEFAULT_TARGET_LANGUAGE: &str = "Traditional Chinese";

/// Translation failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranslationError {
    /// No credential configured, or the service rejected it
    #[error("Translation credential missing or invalid")]
    MissingCredential,

    /// Any other service failure
    #[error("Translation service error: {0}")]
    Service(String),

    /// Nothing to translate
    #[error("Nothing to translate")]
    EmptyInput,
}

/// Text to translate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationRequest {
    /// Input text
    pub text: String,

    /// Source language, detected by the service when absent
    pub source_language: Option<String>,

    /// Target language
    pub target_language: String,
}

impl TranslationRequest {
    /// Request a translation into the default target language
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source_language: None,
            target_language: DEFAULT_TARGET_LANGUAGE.to_string(),
        }
    }

    /// Set source language
    pub fn with_source(mut self, language: impl Into<String>) -> Self {
        self.source_language = Some(language.into());
        self
    }

    /// Set target language
    pub fn with_target(mut self, language: impl Into<String>) -> Self {
        self.target_language = language.into();
        self
    }
}

/// Remote text translation
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate the request's text
    async fn translate(&self, request: &TranslationRequest) -> Result<String, TranslationError>;
}

/// Completed translation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationRecord {
    /// Record ID
    pub id: Uuid,

    /// Input text
    pub original: String,

    /// Translated text
    pub translated: String,

    /// When the translation completed
    pub timestamp: DateTime<Utc>,
}

/// Translation history, newest first
#[derive(Debug, Default)]
pub struct TranslationLog {
    records: Vec<TranslationRecord>,
}

impl TranslationLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Translate and record the result
    ///
    /// Blank input is rejected without calling the service. Failures are
    /// returned and leave the history untouched.
    pub async fn translate(
        &mut self,
        translator: &dyn Translator,
        request: TranslationRequest,
    ) -> Result<&TranslationRecord, TranslationError> {
        if request.text.trim().is_empty() {
            return Err(TranslationError::EmptyInput);
        }

        let translated = translator.translate(&request).await.map_err(|e| {
            warn!(error = %e, "Translation failed");
            e
        })?;

        info!(
            target_language = %request.target_language,
            chars = request.text.chars().count(),
            "Translation completed"
        );

        self.records.insert(
            0,
            TranslationRecord {
                id: Uuid::new_v4(),
                original: request.text,
                translated,
                timestamp: Utc::now(),
            },
        );

        Ok(&self.records[0])
    }

    /// Records, newest first
    pub fn records(&self) -> &[TranslationRecord] {
        &self.records
    }

    /// Delete one record; returns whether it existed
    pub fn remove(&mut self, id: Uuid) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        self.records.len() != before
    }

    /// Delete all records
    pub fn clear(&mut self) {
        self.records.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct UppercaseTranslator {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Translator for UppercaseTranslator {
        async fn translate(&self, request: &TranslationRequest) -> Result<String, TranslationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(request.text.to_uppercase())
        }
    }

    struct FailingTranslator(TranslationError);

    #[async_trait]
    impl Translator for FailingTranslator {
        async fn translate(&self, _request: &TranslationRequest) -> Result<String, TranslationError> {
            Err(self.0.clone())
        }
    }

    fn uppercase() -> UppercaseTranslator {
        UppercaseTranslator {
            calls: AtomicUsize::new(0),
        }
    }

    #[test]
    fn test_request_defaults() {
        let request = TranslationRequest::new("sumimasen").with_source("Japanese");
        assert_eq!(request.target_language, DEFAULT_TARGET_LANGUAGE);
        assert_eq!(request.source_language.as_deref(), Some("Japanese"));

        let request = TranslationRequest::new("where is the station").with_target("Japanese");
        assert_eq!(request.target_language, "Japanese");
        assert_eq!(request.source_language, None);
    }

    #[tokio::test]
    async fn test_records_newest_first() {
        let translator = uppercase();
        let mut log = TranslationLog::new();

        log.translate(&translator, TranslationRequest::new("first")).await.unwrap();
        let record = log
            .translate(&translator, TranslationRequest::new("second"))
            .await
            .unwrap();
        assert_eq!(record.translated, "SECOND");

        let originals: Vec<_> = log.records().iter().map(|r| r.original.as_str()).collect();
        assert_eq!(originals, vec!["second", "first"]);
    }

    #[tokio::test]
    async fn test_blank_input_skips_service() {
        let translator = uppercase();
        let mut log = TranslationLog::new();

        let result = log.translate(&translator, TranslationRequest::new("   ")).await;

        assert_eq!(result.unwrap_err(), TranslationError::EmptyInput);
        assert_eq!(translator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failures_distinguishable_and_not_recorded() {
        let mut log = TranslationLog::new();

        let missing = FailingTranslator(TranslationError::MissingCredential);
        let result = log.translate(&missing, TranslationRequest::new("hello")).await;
        assert_eq!(result.unwrap_err(), TranslationError::MissingCredential);

        let broken = FailingTranslator(TranslationError::Service("timeout".to_string()));
        let result = log.translate(&broken, TranslationRequest::new("hello")).await;
        assert!(matches!(result, Err(TranslationError::Service(_))));

        assert!(log.records().is_empty());
    }

    #[tokio::test]
    async fn test_remove_and_clear() {
        let translator = uppercase();
        let mut log = TranslationLog::new();

        let id = log
            .translate(&translator, TranslationRequest::new("eki"))
            .await
            .unwrap()
            .id;
        log.translate(&translator, TranslationRequest::new("kippu")).await.unwrap();

        assert!(log.remove(id));
        assert!(!log.remove(id));
        assert_eq!(log.records().len(), 1);

        log.clear();
        assert!(log.records().is_empty());
    }
}
