//! Store factory
//!
//! Creates the configured [`PortalStore`] implementation.

use crate::adapters::database::traits::PortalStore;
use crate::adapters::memory::InMemoryStore;
use crate::adapters::postgresql::adapter::PostgreSQLAdapter;
use crate::adapters::postgresql::client::PostgreSQLClient;
use crate::config::schema::{DatabaseTarget, PortalConfig};
use crate::domain::{PortalError, Result};
use std::sync::Arc;

/// Create a store based on the configuration
///
/// # Errors
///
/// Returns an error if the PostgreSQL section is missing or the pool cannot
/// be created.
pub async fn create_store(config: &PortalConfig) -> Result<Arc<dyn PortalStore + Send + Sync>> {
    match config.database_target {
        DatabaseTarget::PostgreSQL => {
            let pg_config = config.postgresql.as_ref().ok_or_else(|| {
                PortalError::Configuration(
                    "postgresql configuration is required when database_target = 'postgresql'"
                        .to_string(),
                )
            })?;

            tracing::info!("Creating PostgreSQL store");
            let client = PostgreSQLClient::new(pg_config.clone()).await?;
            let adapter = PostgreSQLAdapter::new(client);

            Ok(Arc::new(adapter) as Arc<dyn PortalStore + Send + Sync>)
        }
        DatabaseTarget::Memory => {
            tracing::warn!("Using in-memory store; data is lost on restart");
            Ok(Arc::new(InMemoryStore::new()) as Arc<dyn PortalStore + Send + Sync>)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_memory_store() {
        let store = create_store(&PortalConfig::in_memory()).await.unwrap();
        assert_eq!(store.backend_name(), "memory");
        assert!(store.test_connection().await.is_ok());
    }

    #[tokio::test]
    async fn test_missing_postgresql_section() {
        let mut config = PortalConfig::in_memory();
        config.database_target = DatabaseTarget::PostgreSQL;
        let err = create_store(&config).await.err().unwrap();
        assert!(matches!(err, PortalError::Configuration(_)));
    }
}
