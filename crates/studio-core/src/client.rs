//! Generation client: retrying wrapper around the remote image model.
//!
//! The model handle is built on first use by an injected factory, so a
//! missing API key only fails the call that needs it.

use std::cell::OnceCell;
use std::rc::Rc;

use studio_types::{image::ImagePayload, Result, StudioError};

use crate::ports::{DelayPort, ImageModelPort, ImageRequest};
use crate::retry::{retrying, RetryPolicy};

pub const GENERATE_FAILURE: &str =
    "Failed to generate the image. The prompt may have been blocked or an API error occurred.";
pub const EDIT_FAILURE: &str =
    "Failed to edit the image. The prompt may have been blocked or an API error occurred.";

/// Builds the connection handle on first use.
pub type ModelFactory = Box<dyn Fn() -> Result<Rc<dyn ImageModelPort>>>;

pub struct GenerationClient {
    factory: ModelFactory,
    handle: OnceCell<Rc<dyn ImageModelPort>>,
    policy: RetryPolicy,
    delay: Rc<dyn DelayPort>,
}

impl GenerationClient {
    pub fn new(factory: ModelFactory, policy: RetryPolicy, delay: Rc<dyn DelayPort>) -> Self {
        Self {
            factory,
            handle: OnceCell::new(),
            policy,
            delay,
        }
    }

    /// Client around an already-built model (tests, previews).
    pub fn with_model(
        model: Rc<dyn ImageModelPort>,
        policy: RetryPolicy,
        delay: Rc<dyn DelayPort>,
    ) -> Self {
        Self::new(Box::new(move || Ok(model.clone())), policy, delay)
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Whether the model handle has been built yet.
    pub fn is_connected(&self) -> bool {
        self.handle.get().is_some()
    }

    pub async fn generate(&self, prompt: &str) -> Result<ImagePayload> {
        self.call(prompt, None, GENERATE_FAILURE).await
    }

    pub async fn edit(&self, prompt: &str, source: &ImagePayload) -> Result<ImagePayload> {
        self.call(prompt, Some(source.clone()), EDIT_FAILURE).await
    }

    fn handle(&self) -> Result<Rc<dyn ImageModelPort>> {
        if let Some(model) = self.handle.get() {
            return Ok(model.clone());
        }
        let model = (self.factory)()?;
        log::info!("Image model ready: {}", model.model_name());
        Ok(self.handle.get_or_init(|| model).clone())
    }

    async fn call(
        &self,
        prompt: &str,
        image: Option<ImagePayload>,
        failure: &str,
    ) -> Result<ImagePayload> {
        if prompt.trim().is_empty() {
            return Err(StudioError::Validation("Please enter a prompt.".to_string()));
        }

        // A configuration problem is not transient; report it without retrying.
        let model = self.handle().map_err(|e| {
            log::error!("Image model unavailable: {}", e);
            StudioError::Generation(e.to_string())
        })?;

        let request = ImageRequest {
            prompt: prompt.to_string(),
            image,
        };

        retrying(&self.policy, self.delay.as_ref(), "Image request", |_| {
            let model = model.clone();
            let request = request.clone();
            async move {
                model
                    .generate_content(request)
                    .await?
                    .into_first_image()
                    .ok_or(StudioError::NoImageData)
            }
        })
        .await
        .map_err(|e| {
            log::error!("Image request failed after {} attempts: {}", self.policy.max_attempts, e);
            StudioError::Generation(failure.to_string())
        })
    }
}
