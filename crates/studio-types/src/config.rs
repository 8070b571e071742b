use serde::{Deserialize, Serialize};

/// Top-level studio configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct StudioConfig {
    pub model: ModelConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub retry: RetryConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub api_key: String,
    pub api_base: Option<String>,
    pub image_model: String,
    pub text_model: String,
}

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base: None,
            image_model: "gemini-2.5-flash-image".to_string(),
            text_model: "gemini-2.5-flash".to_string(),
        }
    }
}

impl ModelConfig {
    pub fn base_url(&self) -> &str {
        self.api_base
            .as_deref()
            .filter(|b| !b.trim().is_empty())
            .unwrap_or(DEFAULT_API_BASE)
            .trim_end_matches('/')
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryConfig {
    pub max_items: usize,
    pub storage_key: String,
    pub backend: StorageBackendType,
}

pub const DEFAULT_MAX_HISTORY_ITEMS: usize = 20;
pub const DEFAULT_HISTORY_KEY: &str = "studio:history";

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_items: DEFAULT_MAX_HISTORY_ITEMS,
            storage_key: DEFAULT_HISTORY_KEY.to_string(),
            backend: StorageBackendType::Auto,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageBackendType {
    /// localStorage when available, memory otherwise
    Auto,
    Memory,
    LocalStorage,
}

impl StorageBackendType {
    pub fn all() -> &'static [StorageBackendType] {
        &[
            StorageBackendType::Auto,
            StorageBackendType::Memory,
            StorageBackendType::LocalStorage,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            StorageBackendType::Auto => "Auto-detect",
            StorageBackendType::Memory => "Memory",
            StorageBackendType::LocalStorage => "localStorage",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 200,
        }
    }
}
