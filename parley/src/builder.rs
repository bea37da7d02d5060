//! High-level builder wiring settings, backend client, and stores together.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};

use parley_client::{AgentBackend, HttpBackend};
use parley_store::{ChatSession, SettingsStore, VerificationSequencer};
use parley_types::Settings;

/// Everything a frontend needs, wired together.
pub struct Playground {
    pub backend: Arc<dyn AgentBackend>,
    pub session: ChatSession,
    pub verifier: VerificationSequencer,
    pub settings: SettingsStore,
}

/// Builder for [`Playground`].
///
/// Connection details come from the persisted settings record by default;
/// explicit `backend_url`/`auth_token` calls override what was hydrated
/// without persisting anything.
///
/// # Example
///
/// ```rust,no_run
/// use parley::prelude::*;
///
/// # fn main() -> anyhow::Result<()> {
/// let playground = PlaygroundBuilder::new()
///     .backend_url("https://agents.example.com")
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct PlaygroundBuilder {
    settings_path: Option<PathBuf>,
    name: Option<String>,
    backend_url: Option<String>,
    auth_token: Option<String>,
}

impl PlaygroundBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Where the settings record lives (default:
    /// `<config dir>/parley/settings.json`).
    pub fn settings_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.settings_path = Some(path.into());
        self
    }

    /// Display name shown in the frontend.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Backend base URL, overriding the persisted record.
    pub fn backend_url(mut self, url: impl Into<String>) -> Self {
        self.backend_url = Some(url.into());
        self
    }

    /// Bearer token sent with every request.
    pub fn auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub fn build(self) -> Result<Playground> {
        let settings_store = match self.settings_path {
            Some(path) => SettingsStore::open(path),
            None => SettingsStore::open_default(),
        };

        let mut settings = settings_store.settings().clone();
        if let Some(name) = self.name {
            settings.name = name;
        }
        if let Some(url) = self.backend_url {
            settings.backend_url = url;
        }
        if let Some(token) = self.auth_token {
            settings.auth_token = Some(token);
        }

        if !settings.is_backend_configured() {
            bail!("backend URL is not configured; set one in settings or via backend_url()");
        }

        let backend: Arc<dyn AgentBackend> = Arc::new(
            HttpBackend::new(&settings.backend_url, settings.auth_token.as_deref())
                .context("invalid backend configuration")?,
        );

        Ok(Playground {
            session: ChatSession::new(Arc::clone(&backend)),
            verifier: VerificationSequencer::new(),
            settings: settings_store,
            backend,
        })
    }
}

impl Playground {
    /// Rebuild the backend from freshly saved settings (settings-form
    /// submit). Conversation state survives the swap; the verification
    /// state does not, since it describes the old backend.
    pub fn reconfigure(&mut self, settings: Settings) -> Result<()> {
        self.settings
            .set(settings.clone())
            .context("could not persist settings")?;

        let backend: Arc<dyn AgentBackend> = Arc::new(
            HttpBackend::new(&settings.backend_url, settings.auth_token.as_deref())
                .context("invalid backend configuration")?,
        );
        self.backend = Arc::clone(&backend);
        self.session = self.session.with_backend(backend);
        self.verifier.reset();
        Ok(())
    }
}
