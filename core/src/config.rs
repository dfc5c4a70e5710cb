//! Client configuration: where to send requests and which credentials to add.

use url::Url;

use crate::error::ApiError;

pub const DEFAULT_BASE_URL: &str = "https://api.instagram.com/v1/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Always ends in `/` so relative joins keep the version segment.
    pub base_url: Url,
    pub access_token: Option<String>,
    pub client_id: Option<String>,
    pub user_agent: String,
}

impl ClientConfig {
    pub fn authenticated(access_token: &str) -> Self {
        Self {
            access_token: Some(access_token.to_string()),
            ..Self::default()
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, ApiError> {
        self.base_url = parse_base_url(base_url)?;
        Ok(self)
    }

    pub fn with_client_id(mut self, client_id: &str) -> Self {
        self.client_id = Some(client_id.to_string());
        self
    }

    pub fn with_user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = user_agent.to_string();
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("DEFAULT_BASE_URL is a valid URL"),
            access_token: None,
            client_id: None,
            user_agent: concat!("relationships-core/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ApiError> {
    if raw.ends_with('/') {
        Ok(Url::parse(raw)?)
    } else {
        Ok(Url::parse(&format!("{raw}/"))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_targets_instagram_v1() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url.as_str(), DEFAULT_BASE_URL);
        assert!(config.access_token.is_none());
        assert!(config.user_agent.starts_with("relationships-core/"));
    }

    #[test]
    fn base_url_gains_trailing_slash() {
        let config = ClientConfig::default()
            .with_base_url("http://localhost:3000/v1")
            .unwrap();
        assert_eq!(config.base_url.as_str(), "http://localhost:3000/v1/");
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = ClientConfig::default().with_base_url("not a url").unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl(_)));
    }

    #[test]
    fn authenticated_keeps_defaults() {
        let config = ClientConfig::authenticated("token").with_client_id("abc");
        assert_eq!(config.access_token.as_deref(), Some("token"));
        assert_eq!(config.client_id.as_deref(), Some("abc"));
        assert_eq!(config.base_url.as_str(), DEFAULT_BASE_URL);
    }
}
