//! WASM-target tests for studio-core.
//!
//! Runs the codec, retry policy, history store, and session controller
//! under wasm32-unknown-unknown via `wasm-pack test --node`.

use wasm_bindgen_test::*;

use studio_core::client::GenerationClient;
use studio_core::codec;
use studio_core::event_bus::EventBus;
use studio_core::history::HistoryStore;
use studio_core::ports::*;
use studio_core::retry::RetryPolicy;
use studio_core::session::{SessionController, SubmitOutcome, SubmitPhase};
use studio_types::event::StudioEvent;
use studio_types::image::*;
use studio_types::{StorageError, StudioError};

use async_trait::async_trait;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

// ─── Mocks ───────────────────────────────────────────────

struct QuotaStorage {
    data: RefCell<HashMap<String, String>>,
    limit: usize,
}

impl StoragePort for QuotaStorage {
    fn get(&self, key: &str) -> studio_types::Result<Option<String>> {
        Ok(self.data.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if value.len() > self.limit {
            return Err(StorageError::QuotaExceeded { bytes: value.len() });
        }
        self.data.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> studio_types::Result<()> {
        self.data.borrow_mut().remove(key);
        Ok(())
    }

    fn backend_name(&self) -> &str {
        "quota"
    }
}

/// Fails `failures` times, then returns an image.
struct FlakyModel {
    failures: usize,
    calls: Cell<usize>,
}

#[async_trait(?Send)]
impl ImageModelPort for FlakyModel {
    async fn generate_content(&self, _req: ImageRequest) -> studio_types::Result<ImageResponse> {
        let n = self.calls.get() + 1;
        self.calls.set(n);
        if n <= self.failures {
            return Err(StudioError::Network("503".to_string()));
        }
        Ok(ImageResponse {
            candidates: vec![Candidate {
                parts: vec![ResponsePart::InlineImage(ImagePayload::new("QUJD", "image/png"))],
            }],
        })
    }

    fn model_name(&self) -> &str {
        "flaky"
    }
}

struct NoDelay;

#[async_trait(?Send)]
impl DelayPort for NoDelay {
    async fn sleep(&self, _ms: u64) {}
}

fn controller(model: Rc<FlakyModel>, limit: usize) -> (SessionController, EventBus) {
    let bus = EventBus::new();
    let delay: Rc<dyn DelayPort> = Rc::new(NoDelay);
    let client = Rc::new(GenerationClient::with_model(
        model,
        RetryPolicy::new(3, 200),
        delay.clone(),
    ));
    let storage = Rc::new(QuotaStorage {
        data: RefCell::new(HashMap::new()),
        limit,
    });
    let store = HistoryStore::new(storage, "studio:history", 20);
    let controller = SessionController::new(client, store, delay, bus.clone());
    controller.start();
    (controller, bus)
}

// ─── Tests ───────────────────────────────────────────────

#[wasm_bindgen_test]
fn codec_roundtrip() {
    let payload = ImagePayload::new("iVBORw0KGgo=", "image/png");
    let decoded = codec::decode_data_uri(&codec::encode(&payload)).unwrap();
    assert_eq!(decoded.payload, payload);
}

#[wasm_bindgen_test]
fn retry_policy_backoff() {
    let policy = RetryPolicy::new(3, 200);
    assert_eq!(policy.backoff(0), 200);
    assert_eq!(policy.backoff(1), 400);
}

#[wasm_bindgen_test]
async fn submit_retries_then_succeeds() {
    let model = Rc::new(FlakyModel {
        failures: 2,
        calls: Cell::new(0),
    });
    let (controller, bus) = controller(model.clone(), 100_000);

    let outcome = controller.submit("a lighthouse").await.unwrap();
    assert!(matches!(outcome, SubmitOutcome::Completed { saved: true, .. }));
    assert_eq!(model.calls.get(), 3);
    assert_eq!(controller.view().phase, SubmitPhase::Success);
    assert!(bus
        .drain()
        .iter()
        .any(|e| matches!(e, StudioEvent::ImageReady { .. })));
}

#[wasm_bindgen_test]
async fn submit_with_tiny_quota_warns() {
    let model = Rc::new(FlakyModel {
        failures: 0,
        calls: Cell::new(0),
    });
    let (controller, _bus) = controller(model, 10);

    let outcome = controller.submit("a lighthouse").await.unwrap();
    assert!(matches!(outcome, SubmitOutcome::Completed { saved: false, .. }));
    let view = controller.view();
    assert!(view.history.is_empty());
    assert!(view.warning.is_some());
    assert!(view.result_uri.is_some());
}
