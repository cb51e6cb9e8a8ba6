use anyhow::Result;
use std::path::Path;

use crate::api::ApiClient;
use crate::config::Config;
use crate::form::ResultHandoff;
use crate::session::SessionState;
use crate::storage::Storage;

/// Everything a command needs, built once per invocation
pub struct AppContext {
    pub config: Config,
    storage: Storage,
}

impl AppContext {
    pub fn load(config_path: &Path, api_url: Option<String>) -> Result<Self> {
        let mut config = Config::load_from(config_path)?;

        if let Some(url) = api_url {
            tracing::debug!("Using API base URL {}", url);
            config.api.base_url = url;
        }

        let storage = Storage::init(&config)?;

        Ok(Self { config, storage })
    }

    pub fn session(&self) -> Result<SessionState> {
        SessionState::hydrate(self.storage.local()?, self.config.auth.email_matching)
    }

    pub fn api_client(&self) -> Result<ApiClient> {
        ApiClient::new(&self.config.api, self.storage.local()?)
    }

    pub fn handoff(&self) -> Result<ResultHandoff> {
        Ok(ResultHandoff::new(self.storage.session()?))
    }

    /// Drop everything scoped to the current session
    pub fn end_session(&self) -> Result<()> {
        self.storage.session()?.clear()
    }
}
