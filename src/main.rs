use clap::Parser;
use salon_commission::config::{Command, RateSource};
use salon_commission::utils::error::{ErrorSeverity, Result};
use salon_commission::utils::{logger, validation::Validate};
use salon_commission::{
    format_amount, AppConfig, CliConfig, CommissionBreakdown, CommissionCalculator,
    CommissionService, LocalStorage, RateConfiguration, RepositoryStore, SettlementEngine,
    SettlementJob, SettlementPipeline, StoredConfiguration, TierPresetCatalog,
};

type Service = CommissionService<RepositoryStore<LocalStorage>>;

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::debug!("CLI config: {:?}", cli);

    if let Err(e) = run(cli).await {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        std::process::exit(exit_code);
    }
}

async fn run(cli: CliConfig) -> Result<()> {
    let config = AppConfig::load_or_default(&cli.config)?;
    config.validate()?;
    tracing::debug!("Using configuration: {:?}", config);

    let calculator = CommissionCalculator::new(config.commission.tolerance);
    let store = RepositoryStore::new(
        LocalStorage::new(config.store.path.clone()),
        config.commission.tolerance,
    );
    let service = CommissionService::new(store, calculator, config.default_rates()?);

    match cli.command {
        Command::Presets => {
            for preset in TierPresetCatalog::list_presets() {
                println!("{:<8} {}", preset.tier.name(), preset.rates);
            }
        }
        Command::Calculate {
            amount,
            source,
            json,
        } => {
            let rates = resolve_rates(&service, &source).await?;
            let breakdown = service.calculator().calculate(amount, &rates)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&breakdown)?);
            } else {
                print_breakdown(&breakdown);
            }
        }
        Command::Show { salon } => {
            let stored = service.stored(&salon).await?;
            print_stored(&stored);
        }
        Command::Set {
            salon,
            rates,
            name,
            expected_version,
        } => {
            let stored = service
                .update_rates(&salon, &name, rates.to_rates(), expected_version)
                .await?;
            println!("✅ Saved");
            print_stored(&stored);
        }
        Command::ApplyPreset {
            salon,
            tier,
            expected_version,
        } => {
            let stored = service.apply_preset(&salon, &tier, expected_version).await?;
            println!("✅ Applied {} tier", stored.name);
            print_stored(&stored);
        }
        Command::Settle {
            input,
            source,
            output,
        } => {
            let rates = resolve_rates(&service, &source).await?;
            let job = SettlementJob::from_config(&config, input, output);
            job.validate()?;

            // job paths resolve against the working directory
            let storage = LocalStorage::new(String::new());
            let pipeline = SettlementPipeline::new(storage, job, rates);
            let report = SettlementEngine::new(pipeline).run().await?;

            println!("✅ Settled {} bookings", report.totals.bookings);
            if report.totals.skipped > 0 {
                println!("⚠️  Skipped {} invalid rows", report.totals.skipped);
            }
            println!(
                "   total {}  platform {}  salon {}  professional {}",
                format_amount(report.totals.total_amount),
                format_amount(report.totals.platform_fee),
                format_amount(report.totals.salon_commission),
                format_amount(report.totals.professional_earnings)
            );
            for path in &report.outputs {
                println!("📁 {}", path);
            }
        }
    }

    Ok(())
}

async fn resolve_rates(service: &Service, source: &RateSource) -> Result<RateConfiguration> {
    let custom = source.custom()?.map(|percentages| percentages.to_rates());
    service
        .resolve_rates(source.tier.as_deref(), source.salon.as_deref(), custom)
        .await
}

fn print_breakdown(breakdown: &CommissionBreakdown) {
    println!("Total amount:          {}", format_amount(breakdown.total_amount));
    println!(
        "Platform fee:          {} ({:.2}%)",
        format_amount(breakdown.platform_fee),
        breakdown.rates.platform_fee_rate * 100.0
    );
    println!(
        "Salon commission:      {} ({:.2}%)",
        format_amount(breakdown.salon_commission),
        breakdown.rates.salon_commission_rate * 100.0
    );
    println!(
        "Professional earnings: {} ({:.2}%)",
        format_amount(breakdown.professional_earnings),
        breakdown.rates.professional_commission_rate * 100.0
    );
}

fn print_stored(stored: &StoredConfiguration) {
    println!(
        "{} '{}' v{} (updated {})",
        stored.salon_id, stored.name, stored.version, stored.updated_at
    );
    println!("  {}", stored.rates);
}
