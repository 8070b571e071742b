use async_trait::async_trait;
use gloo_timers::future::TimeoutFuture;
use studio_core::ports::DelayPort;

/// Delay backed by `setTimeout`. `sleep(0)` yields one macrotask so the
/// browser can paint before the caller continues.
pub struct TimerDelay;

#[async_trait(?Send)]
impl DelayPort for TimerDelay {
    async fn sleep(&self, ms: u64) {
        let ms = u32::try_from(ms).unwrap_or(u32::MAX);
        TimeoutFuture::new(ms).await;
    }
}
