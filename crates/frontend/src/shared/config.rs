//! Настройки клиента производственного списка

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::api_utils;

pub const DEFAULT_PAGE_SIZE: u64 = 25;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Overrides the window-derived backend address
    pub api_base_url: Option<String>,
    pub page_size: u64,
    /// Size of the user list loaded for the responsible pickers
    pub users_page_size: u64,
    pub filter_change_debounce_ms: u64,
    pub chosen_filters_debounce_ms: u64,
    pub search_debounce_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: None,
            page_size: DEFAULT_PAGE_SIZE,
            users_page_size: 50,
            filter_change_debounce_ms: 1000,
            chosen_filters_debounce_ms: 500,
            search_debounce_ms: 300,
        }
    }
}

impl ClientConfig {
    pub fn api_base(&self) -> String {
        self.api_base_url
            .clone()
            .unwrap_or_else(api_utils::api_base)
    }

    pub fn filter_change_debounce(&self) -> Duration {
        Duration::from_millis(self.filter_change_debounce_ms)
    }

    pub fn chosen_filters_debounce(&self) -> Duration {
        Duration::from_millis(self.chosen_filters_debounce_ms)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    /// Same settings without any debounce delay
    pub fn without_debounce(mut self) -> Self {
        self.filter_change_debounce_ms = 0;
        self.chosen_filters_debounce_ms = 0;
        self.search_debounce_ms = 0;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.page_size, 25);
        assert_eq!(config.filter_change_debounce(), Duration::from_millis(1000));
        assert_eq!(config.chosen_filters_debounce(), Duration::from_millis(500));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"api_base_url":"http://backend:3000","page_size":50}"#).unwrap();
        assert_eq!(config.api_base(), "http://backend:3000");
        assert_eq!(config.page_size, 50);
        assert_eq!(config.search_debounce_ms, 300);
    }
}
