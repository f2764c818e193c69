use actix_web::web;
use std::sync::Arc;

use crate::auth::{ProviderSessionLookup, SessionLookup};
use crate::config::Config;
use crate::onboarding::AccountOnboarding;
use crate::provider::IdentityProvider;
use crate::store::RecordStore;

/// The shared handles every worker's `App` is built from.
///
/// Cloning is cheap: each field is an `Arc` underneath.
#[derive(Clone)]
pub struct AppState {
    pub config: web::Data<Config>,
    pub onboarding: web::Data<AccountOnboarding>,
    pub store: web::Data<dyn RecordStore>,
    pub sessions: web::Data<dyn SessionLookup>,
}

impl AppState {
    /// Wires the onboarding flow and the session gate to the same identity provider.
    pub fn new(
        config: Config,
        identity: Arc<dyn IdentityProvider>,
        store: Arc<dyn RecordStore>,
    ) -> Self {
        let sessions: Arc<dyn SessionLookup> =
            Arc::new(ProviderSessionLookup::new(Arc::clone(&identity)));
        Self::with_sessions(config, identity, store, sessions)
    }

    pub fn with_sessions(
        config: Config,
        identity: Arc<dyn IdentityProvider>,
        store: Arc<dyn RecordStore>,
        sessions: Arc<dyn SessionLookup>,
    ) -> Self {
        let onboarding = AccountOnboarding::new(identity, Arc::clone(&store), config.policy);
        Self {
            config: web::Data::new(config),
            onboarding: web::Data::new(onboarding),
            store: web::Data::from(store),
            sessions: web::Data::from(sessions),
        }
    }

    /// Registers the shared handles and every route.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.config.clone())
            .app_data(self.onboarding.clone())
            .app_data(self.store.clone())
            .app_data(self.sessions.clone());
        crate::routes::config(cfg);
    }
}
