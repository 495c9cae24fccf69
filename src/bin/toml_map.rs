use clap::Parser;
use district_map::core::ConfigProvider;
use district_map::utils::{logger, validation::Validate};
use district_map::{BoundaryStore, HttpBoundarySource, LocalStorage, MapViewer, TomlConfig};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "toml-map")]
#[command(about = "Render the district map from a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "district-map.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,

    /// Dry run - show the configuration without fetching or rendering
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 初始化日誌
    if args.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🚀 Starting TOML-based district map");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    // 載入 TOML 配置
    let config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(e.exit_code());
        }
    };

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }

    tracing::info!("✅ Configuration loaded and validated successfully");

    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No fetching or rendering will occur");
        return Ok(());
    }

    let store = Arc::new(BoundaryStore::with_name_property(
        HttpBoundarySource::new(),
        config.name_property(),
    ));
    let storage = LocalStorage::new(config.output_path().to_string());
    let viewer = MapViewer::new(store, storage, config);

    match viewer.run().await {
        Ok(report) => {
            for warning in &report.warnings {
                eprintln!("⚠️  {}", warning);
            }
            tracing::info!("✅ Map rendered successfully!");
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

fn display_config_summary(config: &TomlConfig, args: &Args) {
    let options = config.render_options();

    println!("📋 Configuration Summary:");
    println!("  Boundaries: {}", config.boundary_url());
    println!("  Name property: {}", config.name_property());
    println!("  Upload: {}", config.upload_file().unwrap_or("(none)"));
    if !config.selected_districts().is_empty() {
        println!("  Districts: {}", config.selected_districts().join(", "));
    }
    println!(
        "  View: {} at ({}, {}) zoom {}",
        options.title, options.center.lat, options.center.lon, options.zoom
    );
    println!(
        "  Output: {}/{}",
        config.output_path(),
        config.output_file()
    );

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}
