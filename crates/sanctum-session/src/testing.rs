//! Scripted transport for slot tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use sanctum_core::{
    ImageArtifact, ImageUpload, Interpretation, MediaType, OcrKind, OcrReading, PreviewRegistry,
    SubmissionResult,
};
use sanctum_sdk::{AnalysisTransport, InterpretRequest};

type Scripted<T> = Mutex<VecDeque<(Duration, SubmissionResult<T>)>>;

/// Replays queued responses, each after its own latency, and records every call.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    readings: Scripted<OcrReading>,
    interpretations: Scripted<Interpretation>,
    ocr_calls: Mutex<Vec<(OcrKind, ImageUpload)>>,
    interpret_calls: Mutex<Vec<InterpretRequest>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_reading(&self, latency: Duration, result: SubmissionResult<OcrReading>) {
        self.readings.lock().unwrap().push_back((latency, result));
    }

    pub(crate) fn push_interpretation(
        &self,
        latency: Duration,
        result: SubmissionResult<Interpretation>,
    ) {
        self.interpretations.lock().unwrap().push_back((latency, result));
    }

    pub(crate) fn ocr_calls(&self) -> Vec<(OcrKind, ImageUpload)> {
        self.ocr_calls.lock().unwrap().clone()
    }

    pub(crate) fn interpret_calls(&self) -> Vec<InterpretRequest> {
        self.interpret_calls.lock().unwrap().clone()
    }
}

fn next<T>(queue: &Scripted<T>) -> (Duration, SubmissionResult<T>) {
    queue.lock().unwrap().pop_front().unwrap_or((
        Duration::ZERO,
        SubmissionResult::Failure {
            reason: "no scripted response".to_string(),
        },
    ))
}

#[async_trait]
impl AnalysisTransport for ScriptedTransport {
    async fn recognize(&self, kind: OcrKind, image: ImageUpload) -> SubmissionResult<OcrReading> {
        self.ocr_calls.lock().unwrap().push((kind, image));
        let (latency, result) = next(&self.readings);
        tokio::time::sleep(latency).await;
        result
    }

    async fn interpret(&self, request: InterpretRequest) -> SubmissionResult<Interpretation> {
        self.interpret_calls.lock().unwrap().push(request);
        let (latency, result) = next(&self.interpretations);
        tokio::time::sleep(latency).await;
        result
    }
}

pub(crate) fn failure<T>(reason: &str) -> SubmissionResult<T> {
    SubmissionResult::Failure {
        reason: reason.to_string(),
    }
}

pub(crate) fn jpeg(registry: &PreviewRegistry, name: &str) -> ImageArtifact {
    ImageArtifact::new(
        name.to_string(),
        MediaType::Jpeg,
        vec![0xFF, 0xD8, 0xFF],
        registry.allocate(),
    )
}
