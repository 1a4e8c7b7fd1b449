//! Admin Configuration Repository

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::AdminConfig;

const TABLE: &str = "admin";
const CONFIG_KEY: &str = "login";

#[derive(Clone)]
pub struct AdminRepository {
    base: BaseRepository,
}

impl AdminRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Load the admin login configuration, if provisioned
    pub async fn find(&self) -> RepoResult<Option<AdminConfig>> {
        let config: Option<AdminConfig> = self.base.db().select((TABLE, CONFIG_KEY)).await?;
        Ok(config)
    }

    /// Create or replace the admin login configuration
    pub async fn upsert(&self, config: AdminConfig) -> RepoResult<AdminConfig> {
        let stored: Option<AdminConfig> = self
            .base
            .db()
            .upsert((TABLE, CONFIG_KEY))
            .content(config)
            .await?;
        stored.ok_or_else(|| RepoError::Database("Failed to store admin config".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;

    #[tokio::test]
    async fn test_upsert_and_find() {
        let service = DbService::memory().await.unwrap();
        let repo = AdminRepository::new(service.db);

        assert!(repo.find().await.unwrap().is_none());

        let hash = AdminConfig::hash_password("rahasia").unwrap();
        repo.upsert(AdminConfig {
            password_hash: hash.clone(),
        })
        .await
        .unwrap();

        let stored = repo.find().await.unwrap().unwrap();
        assert_eq!(stored.password_hash, hash);
    }
}
