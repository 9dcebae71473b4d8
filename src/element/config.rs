use crate::error::{ElementError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";

const ENV_REGISTRY_HOST: &str = "ELEMENT_BLOCK_REGISTRY_URI";
const ENV_LOGIN_URL: &str = "ELEMENT_LOGIN_URL";
const ENV_AUDIENCE: &str = "ELEMENT_AUTH0_AUDIENCE";
const ENV_CLIENT_ID: &str = "ELEMENT_AUTH0_CLIENT_ID";

/// Endpoints and tool settings, read from `config.json` in the user config
/// directory and overridable through `ELEMENT_*` environment variables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ElementConfig {
    /// Base URL of the block registry
    pub registry_host: String,

    /// Identity provider token endpoint
    pub login_url: String,
    pub auth_audience: String,
    pub auth_client_id: String,
    pub grant_type: String,
    pub realm: String,
    pub scope: String,

    /// Repository cloned by `element new`
    pub boilerplate_url: String,

    /// Command run to build a block before publishing
    pub build_command: Vec<String>,

    /// Echo request URLs and response bodies (`--verbose`)
    #[serde(skip)]
    pub verbose: bool,

    /// Upload whatever is in `dist/` without building first (`--skip-build`)
    #[serde(skip)]
    pub skip_build: bool,
}

impl Default for ElementConfig {
    fn default() -> Self {
        Self {
            registry_host: "https://btr.v2-prod.volusion.com".to_string(),
            login_url: "https://material.auth0.com/oauth/token".to_string(),
            auth_audience: "https://api.material.com/".to_string(),
            auth_client_id: "wklYa7h557v4NT4XZsH3epPYzKEtkPrZ".to_string(),
            grant_type: "http://auth0.com/oauth/grant-type/password-realm".to_string(),
            realm: "Username-Password-Authentication".to_string(),
            scope: "openid profile".to_string(),
            boilerplate_url: "git@github.com:Volusion/element-BlockStarter.git".to_string(),
            build_command: vec!["npm".to_string(), "run".to_string(), "build".to_string()],
            verbose: false,
            skip_build: false,
        }
    }
}

impl ElementConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(ElementError::Io)?;
        let config: ElementConfig =
            serde_json::from_str(&content).map_err(ElementError::Serialization)?;
        Ok(config)
    }

    /// Apply `ELEMENT_*` overrides from the process environment.
    pub fn with_env(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`; empty values are ignored.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(v) = get(ENV_REGISTRY_HOST) {
            self.registry_host = v;
        }
        if let Some(v) = get(ENV_LOGIN_URL) {
            self.login_url = v;
        }
        if let Some(v) = get(ENV_AUDIENCE) {
            self.auth_audience = v;
        }
        if let Some(v) = get(ENV_CLIENT_ID) {
            self.auth_client_id = v;
        }
        self
    }

    pub fn with_flags(mut self, verbose: bool, skip_build: bool) -> Self {
        self.verbose = verbose;
        self.skip_build = skip_build;
        self
    }

    /// Registry URL for `path`, without doubling the slash between them.
    pub fn registry_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.registry_host.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
