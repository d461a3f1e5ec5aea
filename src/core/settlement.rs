use crate::core::calculator::{format_amount, CommissionCalculator};
use crate::core::{Pipeline, SettlementSettings, Storage};
use crate::domain::model::{
    Booking, RateConfiguration, SettlementLine, SettlementResult, SettlementTotals,
};
use crate::utils::error::{CommissionError, Result};
use serde::Serialize;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

pub const CSV_FILENAME: &str = "settlement.csv";
pub const TSV_FILENAME: &str = "settlement.tsv";
pub const SUMMARY_FILENAME: &str = "summary.json";

const REPORT_HEADER: [&str; 5] = [
    "booking_id",
    "total_amount",
    "platform_fee",
    "salon_commission",
    "professional_earnings",
];

/// Splits every booking of an input CSV with one rate configuration.
///
/// Input and report paths are handed to the storage as configured, so the
/// storage should be rooted where those paths are meant to resolve.
pub struct SettlementPipeline<S: Storage, C: SettlementSettings> {
    storage: S,
    settings: C,
    rates: RateConfiguration,
    calculator: CommissionCalculator,
    malformed_rows: AtomicUsize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SettlementSummary<'a> {
    rates: &'a RateConfiguration,
    totals: &'a SettlementTotals,
    lines: &'a [SettlementLine],
}

impl<S: Storage, C: SettlementSettings> SettlementPipeline<S, C> {
    pub fn new(storage: S, settings: C, rates: RateConfiguration) -> Self {
        let calculator = CommissionCalculator::new(settings.tolerance());
        Self {
            storage,
            settings,
            rates,
            calculator,
            malformed_rows: AtomicUsize::new(0),
        }
    }

    fn reject_or_skip(&self, row: usize, reason: String) -> Result<()> {
        if self.settings.skip_invalid_rows() {
            tracing::warn!("Skipping row {}: {}", row, reason);
            Ok(())
        } else {
            Err(CommissionError::ProcessingError {
                message: format!("row {}: {}", row, reason),
            })
        }
    }

    fn reject_or_skip_booking(&self, booking_id: &str, error: CommissionError) -> Result<()> {
        if self.settings.skip_invalid_rows() {
            tracing::warn!("Skipping booking {}: {}", booking_id, error);
            Ok(())
        } else {
            Err(CommissionError::ProcessingError {
                message: format!("booking {}: {}", booking_id, error),
            })
        }
    }

    fn render_delimited(&self, result: &SettlementResult, delimiter: u8) -> Result<Vec<u8>> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_writer(Vec::new());

        writer.write_record(REPORT_HEADER)?;
        for line in &result.lines {
            let b = &line.breakdown;
            writer.write_record([
                line.booking_id.clone(),
                format_amount(b.total_amount),
                format_amount(b.platform_fee),
                format_amount(b.salon_commission),
                format_amount(b.professional_earnings),
            ])?;
        }

        writer
            .into_inner()
            .map_err(|e| CommissionError::ProcessingError {
                message: format!("Failed to flush report: {}", e),
            })
    }

    fn output_location(&self, filename: &str) -> String {
        Path::new(self.settings.output_path())
            .join(filename)
            .to_string_lossy()
            .into_owned()
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: SettlementSettings> Pipeline for SettlementPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<Booking>> {
        tracing::debug!("Reading bookings from: {}", self.settings.input_path());
        self.malformed_rows.store(0, Ordering::Relaxed);
        let data = self.storage.read_file(self.settings.input_path()).await?;

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(data.as_slice());

        let mut bookings = Vec::new();
        for (index, row) in reader.deserialize::<Booking>().enumerate() {
            match row {
                Ok(booking) => bookings.push(booking),
                Err(e) => {
                    // header is line 1
                    self.reject_or_skip(index + 2, e.to_string())?;
                    self.malformed_rows.fetch_add(1, Ordering::Relaxed);
                }
            }
        }

        Ok(bookings)
    }

    async fn transform(&self, bookings: Vec<Booking>) -> Result<SettlementResult> {
        // fail fast before touching any row
        self.rates.validate(self.calculator.tolerance())?;

        let mut totals = SettlementTotals {
            skipped: self.malformed_rows.load(Ordering::Relaxed),
            ..SettlementTotals::default()
        };
        let mut lines = Vec::with_capacity(bookings.len());

        for booking in bookings {
            match self.calculator.calculate(booking.amount, &self.rates) {
                Ok(breakdown) => {
                    totals.add(&breakdown);
                    lines.push(SettlementLine {
                        booking_id: booking.booking_id,
                        breakdown,
                    });
                }
                Err(e) => {
                    self.reject_or_skip_booking(&booking.booking_id, e)?;
                    totals.skipped += 1;
                }
            }
        }

        Ok(SettlementResult {
            rates: self.rates,
            lines,
            totals,
        })
    }

    async fn load(&self, result: SettlementResult) -> Result<Vec<String>> {
        let mut written = Vec::new();

        for format in self.settings.output_formats() {
            let (filename, data) = match format.as_str() {
                "csv" => (CSV_FILENAME, self.render_delimited(&result, b',')?),
                "tsv" => (TSV_FILENAME, self.render_delimited(&result, b'\t')?),
                "json" => {
                    let summary = SettlementSummary {
                        rates: &result.rates,
                        totals: &result.totals,
                        lines: &result.lines,
                    };
                    (SUMMARY_FILENAME, serde_json::to_vec_pretty(&summary)?)
                }
                other => {
                    return Err(CommissionError::InvalidConfigValueError {
                        field: "settlement.output_formats".to_string(),
                        value: other.to_string(),
                        reason: "Unsupported format".to_string(),
                    })
                }
            };

            let location = self.output_location(filename);
            tracing::debug!("Writing {} ({} bytes)", location, data.len());
            self.storage.write_file(&location, &data).await?;
            written.push(location);
        }

        Ok(written)
    }
}
