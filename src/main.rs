use anyhow::Context;
use clap::Parser;
use venue_map::utils::error::ErrorSeverity;
use venue_map::utils::{logger, validation::Validate};
use venue_map::{CliConfig, ScenarioConfig, ScenarioReplay};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_logger(logger::LogFormat::from_flag(cli.log_json), cli.verbose);

    tracing::info!("Starting venue-map");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = cli.validate() {
        tracing::error!("❌ Invalid arguments: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("📁 Loading scenario from: {}", cli.scenario);
    let mut config = match ScenarioConfig::from_file(&cli.scenario) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load scenario '{}': {}", cli.scenario, e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    cli.apply_overrides(&mut config);

    // 驗證情境
    if let Err(e) = config.validate() {
        tracing::error!("❌ Scenario validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    match ScenarioReplay::new(config).run().await {
        Ok(report) => {
            if cli.json {
                let json = serde_json::to_string_pretty(&report)
                    .context("failed to serialize replay report")?;
                println!("{}", json);
            } else {
                report.print_summary();
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Replay failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
