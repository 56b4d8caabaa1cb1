//! Configurable mock provider shared by generator and describer tests.

use super::provider::{
    LlmProvider, LlmResponse, StructuredRequest, StructuredResponse, VisionRequest,
};
use crate::error::CaptionError;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

type StructuredFn = Box<dyn Fn() -> Result<serde_json::Value, CaptionError> + Send + Sync>;
type VisionFn = Box<dyn Fn() -> Result<String, CaptionError> + Send + Sync>;

/// Mock provider returning canned results for each capability.
pub(crate) struct MockProvider {
    structured_fn: StructuredFn,
    vision_fn: VisionFn,
    /// Tracks how many times either capability was called.
    pub call_count: Arc<AtomicU32>,
    /// Last structured request seen, for request-shape assertions.
    pub last_structured: Arc<Mutex<Option<StructuredRequest>>>,
    /// Last vision request seen.
    pub last_vision: Arc<Mutex<Option<VisionRequest>>>,
}

impl MockProvider {
    fn new(structured_fn: StructuredFn, vision_fn: VisionFn) -> Self {
        Self {
            structured_fn,
            vision_fn,
            call_count: Arc::new(AtomicU32::new(0)),
            last_structured: Arc::new(Mutex::new(None)),
            last_vision: Arc::new(Mutex::new(None)),
        }
    }

    pub fn structured(value: serde_json::Value) -> Self {
        Self::new(
            Box::new(move || Ok(value.clone())),
            Box::new(|| Err(CaptionError::provider("vision not mocked"))),
        )
    }

    pub fn describing(text: &str) -> Self {
        let text = text.to_string();
        Self::new(
            Box::new(|| Err(CaptionError::provider("structured not mocked"))),
            Box::new(move || Ok(text.clone())),
        )
    }

    pub fn failing(status_code: Option<u16>, message: &str) -> Self {
        let message = message.to_string();
        let vision_message = message.clone();
        Self::new(
            Box::new(move || {
                Err(CaptionError::Provider {
                    message: message.clone(),
                    status_code,
                })
            }),
            Box::new(move || {
                Err(CaptionError::Provider {
                    message: vision_message.clone(),
                    status_code,
                })
            }),
        )
    }

    pub fn calls(&self) -> u32 {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate_structured(
        &self,
        request: &StructuredRequest,
    ) -> Result<StructuredResponse, CaptionError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        *self.last_structured.lock().unwrap() = Some(request.clone());
        let value = (self.structured_fn)()?;
        Ok(StructuredResponse {
            value,
            model: "mock-v1".to_string(),
            tokens_used: Some(42),
            latency_ms: 10,
        })
    }

    async fn describe(&self, request: &VisionRequest) -> Result<LlmResponse, CaptionError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        *self.last_vision.lock().unwrap() = Some(request.clone());
        let text = (self.vision_fn)()?;
        Ok(LlmResponse {
            text,
            model: "mock-v1".to_string(),
            tokens_used: Some(42),
            latency_ms: 10,
        })
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(60)
    }
}
