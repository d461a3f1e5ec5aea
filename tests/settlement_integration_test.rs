use anyhow::Result;
use salon_commission::core::settlement::{CSV_FILENAME, SUMMARY_FILENAME, TSV_FILENAME};
use salon_commission::{
    AppConfig, CommissionError, LocalStorage, RateConfiguration, SettlementEngine, SettlementJob,
    SettlementPipeline, Tier,
};
use tempfile::TempDir;

const BOOKINGS: &str = "booking_id,amount
bk-1001, 100.00
bk-1002, 250.50
bk-1003, 0
bk-1004, 80
";

fn write_bookings(dir: &TempDir, content: &str) -> Result<String> {
    let path = dir.path().join("bookings.csv");
    std::fs::write(&path, content)?;
    Ok(path.to_string_lossy().into_owned())
}

fn job(config: &AppConfig, input: String, output: &TempDir) -> SettlementJob {
    SettlementJob::from_config(
        config,
        input,
        Some(output.path().to_string_lossy().into_owned()),
    )
}

#[tokio::test]
async fn test_end_to_end_settlement_with_local_storage() -> Result<()> {
    let input_dir = TempDir::new()?;
    let output_dir = TempDir::new()?;
    let input = write_bookings(&input_dir, BOOKINGS)?;

    let config = AppConfig::default();
    let job = job(&config, input, &output_dir);
    let storage = LocalStorage::new(String::new());
    let pipeline = SettlementPipeline::new(storage, job, Tier::Elite.rates());

    let report = SettlementEngine::new(pipeline).run().await?;

    assert_eq!(report.totals.bookings, 4);
    assert_eq!(report.totals.skipped, 0);
    assert!((report.totals.total_amount - 430.5).abs() < 1e-9);
    assert!((report.totals.platform_fee - 43.05).abs() < 1e-9);
    assert_eq!(report.outputs.len(), 3);

    let csv = std::fs::read_to_string(output_dir.path().join(CSV_FILENAME))?;
    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("booking_id,total_amount,platform_fee,salon_commission,professional_earnings")
    );
    assert_eq!(lines.next(), Some("bk-1001,100.00,10.00,20.00,70.00"));
    assert_eq!(lines.next(), Some("bk-1002,250.50,25.05,50.10,175.35"));
    assert_eq!(lines.next(), Some("bk-1003,0.00,0.00,0.00,0.00"));

    let tsv = std::fs::read_to_string(output_dir.path().join(TSV_FILENAME))?;
    assert!(tsv.contains("bk-1004\t80.00\t8.00\t16.00\t56.00"));

    let summary: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(output_dir.path().join(SUMMARY_FILENAME))?)?;
    assert_eq!(summary["rates"]["professionalCommissionRate"], 0.7);
    assert_eq!(summary["totals"]["bookings"], 4);
    assert_eq!(summary["lines"][1]["bookingId"], "bk-1002");
    assert_eq!(summary["lines"][1]["totalAmount"], 250.5);
    Ok(())
}

#[tokio::test]
async fn test_settlement_only_writes_configured_formats() -> Result<()> {
    let input_dir = TempDir::new()?;
    let output_dir = TempDir::new()?;
    let input = write_bookings(&input_dir, BOOKINGS)?;

    let config = AppConfig::from_toml_str("[settlement]\noutput_formats = [\"json\"]\n")?;
    let job = job(&config, input, &output_dir);
    let storage = LocalStorage::new(String::new());
    let pipeline = SettlementPipeline::new(storage, job, Tier::Basic.rates());

    let report = SettlementEngine::new(pipeline).run().await?;

    assert_eq!(report.outputs.len(), 1);
    assert_eq!(
        std::path::Path::new(&report.outputs[0]),
        output_dir.path().join(SUMMARY_FILENAME)
    );
    assert!(output_dir.path().join(SUMMARY_FILENAME).exists());
    assert!(!output_dir.path().join(CSV_FILENAME).exists());
    Ok(())
}

#[tokio::test]
async fn test_settlement_skips_invalid_rows_when_configured() -> Result<()> {
    let input_dir = TempDir::new()?;
    let output_dir = TempDir::new()?;
    let input = write_bookings(
        &input_dir,
        "booking_id,amount\nbk-1,100\nbk-2,-20\nbk-3,twelve\nbk-4,50\n",
    )?;

    let config = AppConfig::from_toml_str("[settlement]\nskip_invalid_rows = true\n")?;
    let job = job(&config, input, &output_dir);
    let storage = LocalStorage::new(String::new());
    let pipeline = SettlementPipeline::new(storage, job, Tier::Premium.rates());

    let report = SettlementEngine::new(pipeline).run().await?;

    assert_eq!(report.totals.bookings, 2);
    assert_eq!(report.totals.skipped, 2);
    assert!((report.totals.total_amount - 150.0).abs() < 1e-9);
    Ok(())
}

#[tokio::test]
async fn test_engine_can_run_again_with_same_totals() -> Result<()> {
    let input_dir = TempDir::new()?;
    let output_dir = TempDir::new()?;
    let input = write_bookings(
        &input_dir,
        "booking_id,amount\nbk-1,100\nbk-2,n/a\nbk-3,40\n",
    )?;

    let config = AppConfig::from_toml_str("[settlement]\nskip_invalid_rows = true\n")?;
    let job = job(&config, input, &output_dir);
    let storage = LocalStorage::new(String::new());
    let pipeline = SettlementPipeline::new(storage, job, Tier::Basic.rates());
    let engine = SettlementEngine::new(pipeline);

    let first = engine.run().await?;
    let second = engine.run().await?;

    assert_eq!(first.totals.skipped, 1);
    assert_eq!(second.totals.skipped, 1);
    assert_eq!(second.totals.bookings, 2);
    assert_eq!(first.outputs, second.outputs);
    Ok(())
}

#[tokio::test]
async fn test_reported_outputs_are_the_written_files() -> Result<()> {
    let input_dir = TempDir::new()?;
    let output_dir = TempDir::new()?;
    let input = write_bookings(&input_dir, BOOKINGS)?;

    let config = AppConfig::default();
    let job = job(&config, input, &output_dir);
    let storage = LocalStorage::new(String::new());
    let pipeline = SettlementPipeline::new(storage, job, Tier::Premium.rates());

    let report = SettlementEngine::new(pipeline).run().await?;

    assert_eq!(report.outputs.len(), 3);
    for output in &report.outputs {
        let path = std::path::Path::new(output);
        assert!(path.is_file(), "{} missing", output);
        assert!(path.starts_with(output_dir.path()));
    }
    assert!(!input_dir.path().join(CSV_FILENAME).exists());
    Ok(())
}

#[tokio::test]
async fn test_settlement_refuses_inconsistent_rates() -> Result<()> {
    let input_dir = TempDir::new()?;
    let output_dir = TempDir::new()?;
    let input = write_bookings(&input_dir, BOOKINGS)?;

    let config = AppConfig::default();
    let job = job(&config, input, &output_dir);
    let storage = LocalStorage::new(String::new());
    let rates = RateConfiguration::from_percentages(10.0, 20.0, 60.0);
    let pipeline = SettlementPipeline::new(storage, job, rates);

    let err = SettlementEngine::new(pipeline).run().await.unwrap_err();
    assert!(matches!(err, CommissionError::InvalidConfiguration { .. }));
    assert!(!output_dir.path().join(CSV_FILENAME).exists());
    Ok(())
}

#[tokio::test]
async fn test_missing_input_file_is_io_error() -> Result<()> {
    let output_dir = TempDir::new()?;
    let missing = output_dir
        .path()
        .join("nope.csv")
        .to_string_lossy()
        .into_owned();

    let config = AppConfig::default();
    let job = job(&config, missing, &output_dir);
    let storage = LocalStorage::new(String::new());
    let pipeline = SettlementPipeline::new(storage, job, Tier::Basic.rates());

    let err = SettlementEngine::new(pipeline).run().await.unwrap_err();
    assert!(matches!(err, CommissionError::IoError(_)));
    Ok(())
}
