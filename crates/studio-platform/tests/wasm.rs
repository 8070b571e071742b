//! WASM-target tests for studio-platform (Node.js runtime).
//!
//! Covers MemoryStorage, quota classification and Gemini response
//! handling under wasm32-unknown-unknown via `wasm-pack test --node`.
//!
//! localStorage and the file chooser itself require a browser and are
//! not exercised here; selection listeners run on a bare `EventTarget`.

use wasm_bindgen_test::*;

use std::rc::Rc;
use studio_core::history::HistoryStore;
use studio_core::ports::{ImageRequest, StoragePort};
use studio_platform::file::PendingSelection;
use studio_platform::gemini::{build_image_body, parse_response, GeminiProvider, MISSING_API_KEY};
use studio_platform::storage::{local::is_quota_error, MemoryStorage};
use studio_types::{
    config::ModelConfig, history::HistoryRecord, image::ImagePayload, StorageError, StudioError,
};

// ─── MemoryStorage Tests ─────────────────────────────────

#[wasm_bindgen_test]
fn memory_storage_backend_name() {
    let storage = MemoryStorage::new();
    assert_eq!(storage.backend_name(), "memory");
}

#[wasm_bindgen_test]
fn memory_storage_get_missing() {
    let storage = MemoryStorage::new();
    assert!(storage.get("nonexistent").unwrap().is_none());
}

#[wasm_bindgen_test]
fn memory_storage_overwrite() {
    let storage = MemoryStorage::new();
    storage.set("key", "v1").unwrap();
    storage.set("key", "v2").unwrap();
    assert_eq!(storage.get("key").unwrap(), Some("v2".to_string()));
}

#[wasm_bindgen_test]
fn memory_storage_delete() {
    let storage = MemoryStorage::new();
    storage.set("key", "val").unwrap();
    storage.delete("key").unwrap();
    assert!(storage.get("key").unwrap().is_none());
}

#[wasm_bindgen_test]
fn memory_storage_quota_rejects_oversized_write() {
    let storage = MemoryStorage::with_quota(16);
    storage.set("k", "small").unwrap();
    let err = storage.set("k", &"x".repeat(64)).unwrap_err();
    assert!(err.is_capacity());
    assert_eq!(err, StorageError::QuotaExceeded { bytes: 64 });
    // The failed write leaves the previous value in place
    assert_eq!(storage.get("k").unwrap(), Some("small".to_string()));
}

#[wasm_bindgen_test]
fn memory_storage_quota_counts_replaced_value_once() {
    let storage = MemoryStorage::with_quota(12);
    storage.set("k", "0123456789").unwrap();
    storage.set("k", "9876543210").unwrap();
    assert_eq!(storage.get("k").unwrap(), Some("9876543210".to_string()));
}

#[wasm_bindgen_test]
fn history_store_prunes_against_memory_quota() {
    let record = |n: usize| HistoryRecord {
        id: format!("r{}", n),
        image_uri: format!("data:image/png;base64,{}", "A".repeat(40 + n)),
        prompt: format!("prompt {}", n),
        created_at: n as i64,
    };
    let storage = Rc::new(MemoryStorage::with_quota(400));
    let mut store = HistoryStore::new(storage.clone(), "studio:history", 20);
    let mut last = None;
    for n in 0..10 {
        last = Some(store.append(record(n)));
    }
    let outcome = last.unwrap();
    assert!(outcome.error.is_none());
    assert!(outcome.pruned > 0);
    assert_eq!(store.records()[0].id, "r9");

    let persisted: Vec<HistoryRecord> =
        serde_json::from_str(&storage.get("studio:history").unwrap().unwrap()).unwrap();
    assert_eq!(persisted, store.records());
}

// ─── Quota classification ────────────────────────────────

#[wasm_bindgen_test]
fn quota_error_names_and_codes() {
    assert!(is_quota_error("QuotaExceededError", 0));
    assert!(is_quota_error("NS_ERROR_DOM_QUOTA_REACHED", 0));
    assert!(is_quota_error("", 22));
    assert!(is_quota_error("", 1014));
    assert!(!is_quota_error("SecurityError", 18));
}

// ─── Gemini Tests ────────────────────────────────────────

#[wasm_bindgen_test]
fn gemini_requires_api_key() {
    let err = GeminiProvider::new(ModelConfig::default()).err().unwrap();
    assert_eq!(err, StudioError::Config(MISSING_API_KEY.to_string()));
}

#[wasm_bindgen_test]
fn gemini_edit_body_puts_image_before_prompt() {
    let body = build_image_body(&ImageRequest {
        prompt: "make it snow".to_string(),
        image: Some(ImagePayload::new("QUJD", "image/png")),
    });
    let parts = &body["contents"][0]["parts"];
    assert_eq!(parts[0]["inlineData"]["mimeType"], "image/png");
    assert_eq!(parts[0]["inlineData"]["data"], "QUJD");
    assert_eq!(parts[1]["text"], "make it snow");
    assert_eq!(body["generationConfig"]["responseModalities"][0], "IMAGE");
}

#[wasm_bindgen_test]
fn gemini_parse_finds_first_inline_image() {
    let text = r#"{
        "candidates": [{
            "content": {
                "parts": [
                    {"text": "Here you go"},
                    {"inlineData": {"mimeType": "image/png", "data": "iVBORw0K"}}
                ]
            }
        }]
    }"#;
    let response = parse_response(text).unwrap();
    assert_eq!(response.text(), "Here you go");
    assert_eq!(
        response.into_first_image(),
        Some(ImagePayload::new("iVBORw0K", "image/png"))
    );
}

#[wasm_bindgen_test]
fn gemini_parse_without_image() {
    let text = r#"{"candidates": [{"content": {"parts": [{"text": "blocked"}]}}]}"#;
    assert!(parse_response(text).unwrap().into_first_image().is_none());

    let empty = parse_response(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#).unwrap();
    assert!(empty.candidates.is_empty());
}

#[wasm_bindgen_test]
fn gemini_parse_rejects_garbage() {
    assert!(matches!(
        parse_response("<html>"),
        Err(StudioError::Serialization(_))
    ));
}

// ─── File Selection Tests ────────────────────────────────

fn fire(target: &web_sys::EventTarget, name: &str) {
    let event = web_sys::Event::new(name).unwrap();
    target.dispatch_event(&event).unwrap();
}

#[wasm_bindgen_test]
async fn selection_resolves_on_change() {
    let target = web_sys::EventTarget::new().unwrap();
    let pending = PendingSelection::listen(&target).unwrap();
    fire(&target, "change");
    assert!(pending.wait().await);
}

#[wasm_bindgen_test]
async fn selection_cancel_then_late_events_are_harmless() {
    let target = web_sys::EventTarget::new().unwrap();
    let pending = PendingSelection::listen(&target).unwrap();
    fire(&target, "cancel");
    fire(&target, "change");
    assert!(!pending.wait().await);

    // Listeners are gone; further events reach nothing
    fire(&target, "change");
    fire(&target, "cancel");
}

#[wasm_bindgen_test]
fn selection_dropped_unresolved_detaches() {
    let target = web_sys::EventTarget::new().unwrap();
    drop(PendingSelection::listen(&target).unwrap());
    fire(&target, "change");
}
