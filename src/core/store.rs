use crate::core::{ConfigurationStore, Storage};
use crate::domain::model::{RateConfiguration, StoredConfiguration};
use crate::utils::error::{CommissionError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_salon_id};
use chrono::Utc;
use tokio::sync::Mutex;

/// Keeps one JSON document per salon (`salons/<id>.json`) in a [`Storage`].
pub struct RepositoryStore<S: Storage> {
    storage: S,
    tolerance: f64,
    // serialises read-check-write so version checks hold within this process
    write_lock: Mutex<()>,
}

impl<S: Storage> RepositoryStore<S> {
    pub fn new(storage: S, tolerance: f64) -> Self {
        Self {
            storage,
            tolerance,
            write_lock: Mutex::new(()),
        }
    }

    fn document_path(salon_id: &str) -> String {
        format!("salons/{}.json", salon_id)
    }

    async fn read_document(&self, salon_id: &str) -> Result<Option<StoredConfiguration>> {
        validate_salon_id(salon_id)?;
        let path = Self::document_path(salon_id);

        if !self.storage.exists(&path).await? {
            return Ok(None);
        }

        let data = self.storage.read_file(&path).await?;
        let stored: StoredConfiguration = serde_json::from_slice(&data)?;
        Ok(Some(stored))
    }
}

impl<S: Storage> ConfigurationStore for RepositoryStore<S> {
    async fn load(&self, salon_id: &str) -> Result<Option<StoredConfiguration>> {
        self.read_document(salon_id).await
    }

    async fn save(
        &self,
        salon_id: &str,
        name: &str,
        rates: RateConfiguration,
        expected_version: Option<u64>,
    ) -> Result<StoredConfiguration> {
        validate_salon_id(salon_id)?;
        validate_non_empty_string("name", name)?;
        rates.validate(self.tolerance)?;

        let _guard = self.write_lock.lock().await;

        let current_version = match self.read_document(salon_id).await {
            Ok(stored) => stored.map(|stored| stored.version).unwrap_or(0),
            // an unreadable document can still be replaced by a last-write-wins save
            Err(CommissionError::SerializationError(e)) if expected_version.is_none() => {
                tracing::warn!(
                    "⚠️ Overwriting unreadable configuration for salon {}: {}",
                    salon_id,
                    e
                );
                0
            }
            Err(e) => return Err(e),
        };

        if let Some(expected) = expected_version {
            if expected != current_version {
                tracing::warn!(
                    "Rejecting update for salon {}: expected version {}, found {}",
                    salon_id,
                    expected,
                    current_version
                );
                return Err(CommissionError::VersionConflict {
                    salon_id: salon_id.to_string(),
                    expected,
                    actual: current_version,
                });
            }
        }

        let stored = StoredConfiguration {
            salon_id: salon_id.to_string(),
            name: name.to_string(),
            version: current_version + 1,
            updated_at: Utc::now(),
            rates,
        };

        let json = serde_json::to_vec_pretty(&stored)?;
        self.storage
            .write_file(&Self::document_path(salon_id), &json)
            .await?;

        tracing::info!(
            "Saved commission configuration '{}' for salon {} (version {})",
            stored.name,
            salon_id,
            stored.version
        );
        Ok(stored)
    }
}
