//! Browser adapters for the studio-core ports.

pub mod storage;
pub mod gemini;
pub mod timer;
pub mod file;
pub mod download;
pub mod inspire;

pub use gemini::GeminiProvider;
pub use timer::TimerDelay;
