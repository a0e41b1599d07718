//! Language-model formatting interface.
//!
//! A formatter takes a parsed [`Document`] and produces Markdown, usually by
//! sending a prompt built from the document to a hosted completion API.
//! Hosted adapters live outside this crate; [`MarkdownFormatter`] is the
//! local implementation backed by the built-in renderer.

mod prompt;

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::Document;
use crate::render::{self, RenderOptions};

pub use prompt::{build_compact_prompt, build_prompt, SYSTEM_PROMPT};

/// Default completion budget.
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.3;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Converts a document to Markdown.
pub trait Formatter {
    /// Provider identifier (e.g., "anthropic").
    fn name(&self) -> &str;

    /// Check that the formatter is usable before any document is sent.
    fn validate(&self) -> Result<()>;

    /// Format a document.
    fn format(&self, doc: &Document, options: &FormatOptions) -> Result<FormatResult>;
}

/// Per-request formatting options.
#[derive(Debug, Clone, PartialEq)]
pub struct FormatOptions {
    /// System prompt override; `None` uses [`SYSTEM_PROMPT`]
    pub prompt: Option<String>,

    /// Maximum completion tokens
    pub max_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,
}

impl FormatOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// The system prompt to send.
    pub fn system_prompt(&self) -> &str {
        self.prompt
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .unwrap_or(SYSTEM_PROMPT)
    }
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            prompt: None,
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

/// Formatted output and accounting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatResult {
    /// Generated Markdown
    pub markdown: String,

    /// Model that produced the output
    pub model: String,

    /// Token accounting reported by the provider
    pub usage: TokenUsage,
}

/// Token accounting for one request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub total_tokens: u32,
}

impl TokenUsage {
    pub fn new(input_tokens: u32, output_tokens: u32) -> Self {
        Self {
            input_tokens,
            output_tokens,
            total_tokens: input_tokens + output_tokens,
        }
    }
}

/// Connection settings handed to a provider at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// API key; empty means "read from the environment"
    pub api_key: String,

    /// Model name; empty means the provider default
    pub model: String,

    /// Endpoint override
    pub base_url: Option<String>,

    /// Request timeout
    pub timeout: Duration,
}

impl ProviderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = key.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The configured key, else the value of `env_var`.
    pub fn resolve_api_key(&self, env_var: &str) -> Result<String> {
        if !self.api_key.is_empty() {
            return Ok(self.api_key.clone());
        }
        std::env::var(env_var)
            .ok()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| Error::Format(format!("API key not configured (set {env_var})")))
    }

    /// The configured model, else `default`.
    pub fn model_or<'a>(&'a self, default: &'a str) -> &'a str {
        if self.model.is_empty() {
            default
        } else {
            &self.model
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: String::new(),
            base_url: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Formatter that renders locally with the built-in Markdown renderer.
#[derive(Debug, Clone, Default)]
pub struct MarkdownFormatter {
    options: RenderOptions,
}

impl MarkdownFormatter {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }
}

impl Formatter for MarkdownFormatter {
    fn name(&self) -> &str {
        "builtin"
    }

    fn validate(&self) -> Result<()> {
        Ok(())
    }

    fn format(&self, doc: &Document, _options: &FormatOptions) -> Result<FormatResult> {
        Ok(FormatResult {
            markdown: render::to_markdown(doc, &self.options)?,
            model: self.name().to_string(),
            usage: TokenUsage::default(),
        })
    }
}
