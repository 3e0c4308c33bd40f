use std::sync::Arc;
use std::time::Duration;

use crate::clients::chat::ChatClient;
use crate::clients::revocation::{InMemoryRevocationCache, RedisRevocationCache, RevocationCache};
use crate::clients::storage::StorageClient;
use crate::config::Config;
use crate::db::Store;
use crate::services::{
    ArtifactService, AuthService, IdWorker, JwtAuthService, SeaOrmArtifactService,
    SeaOrmUserService, SeaOrmWizardService, UserService, WizardService,
};

/// Build a shared HTTP client with reasonable defaults for outbound calls.
/// Reused across all HTTP-based clients to enable connection pooling.
fn build_shared_http_client(timeout_seconds: u64) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .user_agent("Arcanum/1.0")
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build shared HTTP client: {e}"))
}

#[derive(Clone)]
pub struct SharedState {
    pub config: Config,

    pub store: Store,

    pub revocation: Arc<dyn RevocationCache>,

    pub auth_service: Arc<dyn AuthService>,

    pub user_service: Arc<dyn UserService>,

    pub wizard_service: Arc<dyn WizardService>,

    pub artifact_service: Arc<dyn ArtifactService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_url,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let revocation: Arc<dyn RevocationCache> = match &config.redis.url {
            Some(url) => Arc::new(RedisRevocationCache::connect(url).await?),
            None => Arc::new(InMemoryRevocationCache::new()),
        };

        let http_client = build_shared_http_client(config.ai.request_timeout_seconds)?;

        let chat = ChatClient::with_shared_client(
            http_client.clone(),
            config.ai.endpoint.clone(),
            config.ai.api_key.clone(),
        );
        let storage =
            StorageClient::with_shared_client(http_client, config.storage.endpoint.clone());

        let id_worker = Arc::new(IdWorker::new(config.general.instance_id));

        let auth_service = Arc::new(JwtAuthService::new(
            store.clone(),
            revocation.clone(),
            &config.security.jwt_secret,
            Duration::from_secs(config.security.token_ttl_seconds),
        )) as Arc<dyn AuthService>;

        let user_service = Arc::new(SeaOrmUserService::new(store.clone(), revocation.clone()))
            as Arc<dyn UserService>;

        let wizard_service =
            Arc::new(SeaOrmWizardService::new(store.clone())) as Arc<dyn WizardService>;

        let artifact_service = Arc::new(SeaOrmArtifactService::new(
            store.clone(),
            id_worker,
            chat,
            storage,
            config.ai.model.clone(),
        )) as Arc<dyn ArtifactService>;

        Ok(Self {
            config,
            store,
            revocation,
            auth_service,
            user_service,
            wizard_service,
            artifact_service,
        })
    }
}
