//! Settings management for CLI set/unset commands.
//!
//! Each configuration key has a [`SettingHandler`]; the [`SettingRegistry`]
//! looks them up by key and lists them for `mcpdeck set` without arguments.

pub mod error;

use std::collections::HashMap;

pub use error::SettingError;

use crate::core::config::data::{Config, DEFAULT_BASE_URL};
use crate::core::config::resolve::validate_base_url;

/// Trait for handling a configuration setting.
///
/// Handlers edit an in-memory [`Config`]; persisting it is the caller's job.
pub trait SettingHandler: Send + Sync {
    /// Returns the configuration key this handler manages.
    fn key(&self) -> &'static str;

    /// Set the value from the words following the key. Returns the success message.
    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError>;

    /// Clear the value. Returns the success message.
    fn unset(&self, config: &mut Config) -> String;

    /// Format the current value for display in `mcpdeck set` output.
    fn format(&self, config: &Config) -> String;
}

pub struct BaseUrlHandler;

impl SettingHandler for BaseUrlHandler {
    fn key(&self) -> &'static str {
        "base-url"
    }

    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError> {
        let input = single_arg(
            args,
            "To set the backend URL, provide it:",
            "mcpdeck set base-url http://localhost:8000",
        )?;
        let normalized = validate_base_url(&input).map_err(|err| SettingError::InvalidValue {
            key: self.key(),
            input: input.clone(),
            reason: err.to_string(),
        })?;
        config.base_url = Some(normalized.clone());
        Ok(format!("✅ Set base-url to: {normalized}"))
    }

    fn unset(&self, config: &mut Config) -> String {
        config.base_url = None;
        format!("✅ Unset base-url (will use default: {DEFAULT_BASE_URL})")
    }

    fn format(&self, config: &Config) -> String {
        match &config.base_url {
            Some(url) => format!("  base-url: {url}"),
            None => format!("  base-url: {DEFAULT_BASE_URL} (default)"),
        }
    }
}

pub struct TokenHandler;

impl SettingHandler for TokenHandler {
    fn key(&self) -> &'static str {
        "token"
    }

    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError> {
        let token = single_arg(
            args,
            "To set a bearer token, provide it:",
            "mcpdeck set token dapi0123456789",
        )?;
        let display = mask_token(&token);
        config.token = Some(token);
        Ok(format!("✅ Set token to: {display}"))
    }

    fn unset(&self, config: &mut Config) -> String {
        config.token = None;
        "✅ Unset token".to_string()
    }

    fn format(&self, config: &Config) -> String {
        match &config.token {
            Some(token) => format!("  token: {}", mask_token(token)),
            None => "  token: (unset)".to_string(),
        }
    }
}

pub struct TimeoutHandler;

impl SettingHandler for TimeoutHandler {
    fn key(&self) -> &'static str {
        "timeout"
    }

    fn set(&self, args: &[String], config: &mut Config) -> Result<String, SettingError> {
        let input = single_arg(
            args,
            "To set a request timeout, provide it in seconds (0 disables it):",
            "mcpdeck set timeout 30",
        )?;
        let secs: u64 = input.parse().map_err(|_| SettingError::InvalidValue {
            key: self.key(),
            input: input.clone(),
            reason: "expected a whole number of seconds".to_string(),
        })?;
        config.timeout_secs = Some(secs);
        Ok(format!("✅ Set timeout to: {secs}s"))
    }

    fn unset(&self, config: &mut Config) -> String {
        config.timeout_secs = None;
        "✅ Unset timeout (requests will not time out)".to_string()
    }

    fn format(&self, config: &Config) -> String {
        match config.timeout_secs {
            Some(0) | None => "  timeout: none".to_string(),
            Some(secs) => format!("  timeout: {secs}s"),
        }
    }
}

/// Registry of all available setting handlers.
pub struct SettingRegistry {
    handlers: HashMap<&'static str, Box<dyn SettingHandler>>,
    /// Keys in display order for `mcpdeck set` output.
    display_order: Vec<&'static str>,
}

impl SettingRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            handlers: HashMap::new(),
            display_order: Vec::new(),
        };
        registry.register(Box::new(BaseUrlHandler));
        registry.register(Box::new(TokenHandler));
        registry.register(Box::new(TimeoutHandler));
        registry
    }

    fn register(&mut self, handler: Box<dyn SettingHandler>) {
        let key = handler.key();
        self.display_order.push(key);
        self.handlers.insert(key, handler);
    }

    pub fn get(&self, key: &str) -> Result<&dyn SettingHandler, SettingError> {
        self.handlers
            .get(key)
            .map(|handler| handler.as_ref())
            .ok_or_else(|| SettingError::UnknownKey(key.to_string()))
    }

    pub fn keys_display_order(&self) -> &[&'static str] {
        &self.display_order
    }

    /// Every key with its current value, one per line.
    pub fn format_all(&self, config: &Config) -> String {
        self.display_order
            .iter()
            .filter_map(|key| self.handlers.get(key))
            .map(|handler| handler.format(config))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for SettingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn single_arg(
    args: &[String],
    hint: &'static str,
    example: &'static str,
) -> Result<String, SettingError> {
    let value = args.join(" ");
    let value = value.trim();
    if value.is_empty() {
        return Err(SettingError::MissingArgs { hint, example });
    }
    Ok(value.to_string())
}

/// Show only the last four characters of a secret.
fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{tail}")
}
