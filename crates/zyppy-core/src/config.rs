//! Client configuration model.

use serde::{Deserialize, Serialize};

/// Settings the client reads at startup.
///
/// Every field has a default aimed at local development, so an empty or
/// missing config file is always valid.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL of the backend REST API, including the `/api` prefix
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Origin handed to the checkout endpoint; the hosted payment page
    /// builds its return redirects from it
    #[serde(default = "default_origin_url")]
    pub origin_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            origin_url: default_origin_url(),
        }
    }
}

fn default_api_base_url() -> String {
    "http://localhost:8000/api".to_string()
}

fn default_origin_url() -> String {
    "http://localhost:3000".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_yields_defaults() {
        let config: ClientConfig = toml::from_str("").unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let config: ClientConfig =
            toml::from_str("api_base_url = \"https://api.zyppy.example/api\"").unwrap();
        assert_eq!(config.api_base_url, "https://api.zyppy.example/api");
        assert_eq!(config.origin_url, default_origin_url());
    }
}
