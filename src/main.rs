use clap::Parser;
use district_map::utils::{logger, validation::Validate};
use district_map::{BoundaryStore, CliConfig, HttpBoundarySource, LocalStorage, MapViewer};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting district-map");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }

    // 邊界資料在整個程序生命週期內只抓取一次
    let store = Arc::new(BoundaryStore::with_name_property(
        HttpBoundarySource::new(),
        config.name_property.clone(),
    ));
    let storage = LocalStorage::new(config.output_path.clone());
    let list_districts = config.list_districts;
    let viewer = MapViewer::new(store, storage, config);

    if list_districts {
        match viewer.districts().await {
            Ok(districts) if districts.is_empty() => {
                println!("No districts found (upload a table with --upload)");
            }
            Ok(districts) => {
                for district in districts {
                    println!("{}", district);
                }
            }
            Err(e) => {
                eprintln!("❌ {}", e.user_friendly_message());
                eprintln!("💡 {}", e.recovery_suggestion());
                std::process::exit(e.exit_code());
            }
        }
        return Ok(());
    }

    match viewer.run().await {
        Ok(report) => {
            for warning in &report.warnings {
                eprintln!("⚠️  {}", warning);
            }
            tracing::info!(
                "✅ Rendered {} boundaries and {} markers",
                report.boundary_count,
                report.marker_count
            );
            println!("✅ Map rendered successfully!");
            println!("📁 Output saved to: {}", report.output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Render failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = e.exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
