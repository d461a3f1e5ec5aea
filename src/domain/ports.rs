use crate::domain::model::{Booking, RateConfiguration, SettlementResult, StoredConfiguration};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn exists(&self, path: &str) -> impl std::future::Future<Output = Result<bool>> + Send;
}

/// Persists the active rate configuration of each salon.
pub trait ConfigurationStore: Send + Sync {
    fn load(
        &self,
        salon_id: &str,
    ) -> impl std::future::Future<Output = Result<Option<StoredConfiguration>>> + Send;

    /// Overwrites the salon's configuration and bumps its version.
    ///
    /// `expected_version = None` means last write wins; `Some(v)` fails with
    /// `VersionConflict` unless the stored version is `v` (0 for "nothing stored yet").
    fn save(
        &self,
        salon_id: &str,
        name: &str,
        rates: RateConfiguration,
        expected_version: Option<u64>,
    ) -> impl std::future::Future<Output = Result<StoredConfiguration>> + Send;
}

pub trait SettlementSettings: Send + Sync {
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[String];
    fn skip_invalid_rows(&self) -> bool;
    fn tolerance(&self) -> f64;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<Booking>>;
    async fn transform(&self, bookings: Vec<Booking>) -> Result<SettlementResult>;
    async fn load(&self, result: SettlementResult) -> Result<Vec<String>>;
}
