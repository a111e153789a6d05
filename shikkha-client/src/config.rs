use http::Uri;

use crate::error::{ClientError, Result};

fn default_api_base() -> Uri {
    Uri::from_static("http://localhost:5000")
}

fn default_token_key() -> String {
    "token".to_string()
}

fn default_login_route() -> String {
    "/login".to_string()
}

/// Configuration of the frontend. A single instance is created at startup and shared by every
/// request through [`crate::ApiClient`].
#[derive(serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    /// Base URI of the REST backend. Endpoint paths are appended to it.
    #[serde(with = "parse_uri", default = "default_api_base")]
    pub api_base: Uri,

    /// Local storage key holding the bearer token.
    #[serde(default = "default_token_key")]
    pub token_key: String,

    /// Route the user is sent to when no credential is stored.
    #[serde(default = "default_login_route")]
    pub login_route: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            token_key: default_token_key(),
            login_route: default_login_route(),
        }
    }
}

impl ClientConfig {
    /// Builds the configuration from the `SHIKKHA_API_BASE` and `SHIKKHA_TOKEN_KEY` variables
    /// present when the site was compiled.
    pub fn from_build_env() -> Result<Self> {
        Self::from_values(option_env!("SHIKKHA_API_BASE"), option_env!("SHIKKHA_TOKEN_KEY"))
    }

    /// Parses a JSON document. Missing fields take their default value.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| ClientError::Config(e.to_string()))
    }

    fn from_values(api_base: Option<&str>, token_key: Option<&str>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(api_base) = api_base.filter(|v| !v.is_empty()) {
            config.api_base = api_base
                .parse()
                .map_err(|e| ClientError::Config(format!("{api_base} is an invalid URI: {e}")))?;
        }
        if let Some(token_key) = token_key.filter(|v| !v.is_empty()) {
            config.token_key = token_key.to_string();
        }
        Ok(config)
    }

    /// Full URL of an endpoint path, e.g. `/api/courses/intro-js`.
    pub fn endpoint(&self, path: &str) -> String {
        let base = self.api_base.to_string();
        format!(
            "{}/{}",
            base.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

mod parse_uri {
    use http::Uri;

    pub fn deserialize<'de, D: serde::Deserializer<'de>>(
        d: D,
    ) -> std::result::Result<Uri, D::Error> {
        d.deserialize_str(Visitor {})
    }

    struct Visitor {}

    impl<'de> serde::de::Visitor<'de> for Visitor {
        type Value = Uri;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            writeln!(formatter, "A valid URI")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            v.try_into()
                .map_err(|e| E::custom(format!("{v} is an invalid URI: {e}")))
        }
    }
}
