use crate::config::AppConfig;
use crate::db;
use crate::users::{
    repo::{PgUserRepository, UserRepository},
    UserService,
};
use std::sync::Arc;
use tracing::warn;

#[derive(Clone)]
pub struct AppState {
    pub users: UserService,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let pool = db::connect(&config.database).await?;
        if let Err(e) = db::migrate(&pool).await {
            warn!(error = %format!("{e:#}"), "migration failed; continuing");
        }

        let repo = Arc::new(PgUserRepository::new(pool)) as Arc<dyn UserRepository>;
        Ok(Self::from_parts(config, repo))
    }

    pub fn from_parts(config: Arc<AppConfig>, repo: Arc<dyn UserRepository>) -> Self {
        Self {
            users: UserService::new(repo),
            config,
        }
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        Self::fake_with(Arc::new(crate::users::repo::MemoryUserRepository::default()))
    }

    #[cfg(test)]
    pub fn fake_with(repo: Arc<dyn UserRepository>) -> Self {
        let mut config = AppConfig::from_lookup(|_| None).expect("default config");
        config.api_key = "test-key".into();
        Self::from_parts(Arc::new(config), repo)
    }
}
