//! Shared application state handed to every handler

use super::render::Renderer;
use super::session::CookieSettings;
use crate::adapters::database::PortalStore;
use crate::config::PortalConfig;
use crate::core::admin::DoctorManagement;
use crate::core::auth::{PasswordHasher, RoleResolver};
use crate::core::profile::ProfileUpdater;
use crate::core::registration::RegistrationFlow;
use crate::core::session::SessionManager;
use crate::domain::Result;
use std::sync::Arc;
use std::time::Duration;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub store: Arc<dyn PortalStore + Send + Sync>,
    pub resolver: RoleResolver,
    pub sessions: SessionManager,
    pub registration: RegistrationFlow,
    pub profiles: ProfileUpdater,
    pub doctors: DoctorManagement,
    pub renderer: Renderer,
    pub cookies: CookieSettings,
}

impl AppState {
    /// Wires the flows over `store` using the session and security sections of `config`
    ///
    /// # Errors
    ///
    /// Fails when the compiled-in templates do not parse.
    pub fn new(config: &PortalConfig, store: Arc<dyn PortalStore + Send + Sync>) -> Result<SharedState> {
        let hasher = PasswordHasher::from_config(&config.security);
        let max_age = Duration::from_secs(config.session.max_age_seconds);

        Ok(Arc::new(Self {
            resolver: RoleResolver::from_store(store.clone(), hasher),
            sessions: SessionManager::new(max_age),
            registration: RegistrationFlow::new(store.clone(), hasher),
            profiles: ProfileUpdater::new(store.clone(), hasher),
            doctors: DoctorManagement::new(store.clone(), hasher),
            renderer: Renderer::new()?,
            cookies: CookieSettings::from_config(&config.session),
            store,
        }))
    }
}
