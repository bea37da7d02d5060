use serde_json::{Map, Value};

use parley_types::{Thread, ThreadExecutionSettings, UsageCounters};

use crate::error::{Result, StoreError};

/// Per-thread execution overrides, edited as raw text at the UI boundary.
///
/// The parse boundary is strict: malformed structured input is rejected and
/// the previous valid value retained, so corrupt data never reaches the
/// network layer. The same applies to numeric fields: invalid input is an
/// error, not a silent zero.
#[derive(Debug, Default)]
pub struct ThreadSettingsStore {
    settings: ThreadExecutionSettings,
}

fn parse_object(raw: &str) -> Result<Map<String, Value>> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| StoreError::InvalidJson(e.to_string()))?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(StoreError::NotAnObject),
    }
}

impl ThreadSettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn settings(&self) -> &ThreadExecutionSettings {
        &self.settings
    }

    /// Populate from thread metadata when a thread becomes active.
    pub fn activate(&mut self, thread: &Thread) {
        self.settings.thread_id = thread.id.clone();
        self.settings.thread_title = thread.title.clone();
    }

    /// Back to defaults when no thread is active.
    pub fn reset(&mut self) {
        self.settings = ThreadExecutionSettings::default();
    }

    pub fn set_streaming_response(&mut self, enabled: bool) {
        self.settings.streaming_response = enabled;
    }

    pub fn set_recursion_limit(&mut self, limit: u32) {
        self.settings.recursion_limit = limit;
    }

    /// Parse a recursion limit from form input. Invalid input is rejected and
    /// the previous value retained.
    pub fn set_recursion_limit_str(&mut self, raw: &str) -> Result<()> {
        let limit: u32 = raw
            .trim()
            .parse()
            .map_err(|_| StoreError::InvalidNumber(raw.to_string()))?;
        self.settings.recursion_limit = limit;
        Ok(())
    }

    /// Replace the config bag from a raw JSON document.
    pub fn set_config_json(&mut self, raw: &str) -> Result<()> {
        self.settings.config = parse_object(raw)?;
        Ok(())
    }

    /// Replace the init-state bag from a raw JSON document.
    pub fn set_init_state_json(&mut self, raw: &str) -> Result<()> {
        self.settings.init_state = parse_object(raw)?;
        Ok(())
    }

    pub fn set_config_key(&mut self, key: impl Into<String>, value: Value) {
        self.settings.config.insert(key.into(), value);
    }

    pub fn remove_config_key(&mut self, key: &str) {
        self.settings.config.remove(key);
    }

    pub fn set_init_state_key(&mut self, key: impl Into<String>, value: Value) {
        self.settings.init_state.insert(key.into(), value);
    }

    pub fn remove_init_state_key(&mut self, key: &str) {
        self.settings.init_state.remove(key);
    }

    /// Read-only usage counters reported by the backend.
    pub fn set_usage(&mut self, usage: UsageCounters) {
        self.settings.usage = usage;
    }
}
