use crate::core::Pipeline;
use crate::domain::model::SettlementTotals;
use crate::utils::error::Result;

/// Outcome of one settlement run.
#[derive(Debug, Clone)]
pub struct SettlementReport {
    pub totals: SettlementTotals,
    pub outputs: Vec<String>,
}

pub struct SettlementEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> SettlementEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<SettlementReport> {
        tracing::info!("Starting settlement run...");

        // Extract
        let bookings = self.pipeline.extract().await?;
        tracing::info!("Read {} bookings", bookings.len());

        // Transform
        let result = self.pipeline.transform(bookings).await?;
        tracing::info!(
            "Split {} bookings ({} skipped)",
            result.totals.bookings,
            result.totals.skipped
        );
        let totals = result.totals.clone();

        // Load
        let outputs = self.pipeline.load(result).await?;
        for output in &outputs {
            tracing::info!("Report saved to: {}", output);
        }

        Ok(SettlementReport { totals, outputs })
    }
}
