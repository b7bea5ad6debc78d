use axum::extract::FromRef;

use crate::credits_store::CreditsStore;
use crate::related::RelatedLookup;
use std::path::PathBuf;
use std::sync::Arc;

pub type GuardedCreditsStore = Arc<dyn CreditsStore>;
pub type GuardedRelatedLookup = Arc<dyn RelatedLookup>;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub per_page: usize,
    pub network_csv: Option<PathBuf>,
}

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub store: GuardedCreditsStore,
    pub related: GuardedRelatedLookup,
}

impl FromRef<ServerState> for GuardedCreditsStore {
    fn from_ref(input: &ServerState) -> Self {
        input.store.clone()
    }
}

impl FromRef<ServerState> for GuardedRelatedLookup {
    fn from_ref(input: &ServerState) -> Self {
        input.related.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
