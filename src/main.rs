use clap::Parser;
use cortex_links::adapters::yaml;
use cortex_links::config::{CliConfig, Command};
use cortex_links::core::{CatalogApi, ConfigProvider, HealthReport, ReferenceKind};
use cortex_links::utils::error::ErrorSeverity;
use cortex_links::utils::{logger, validation::Validate};
use cortex_links::{CatalogClient, CortexConfig, CortexError, EntityResolver, Result};
use std::sync::Arc;
use tokio::runtime::Handle;

fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::info!("Starting cortex-links");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let config = match load_config(&cli).and_then(|config| {
        config.validate()?;
        Ok(config)
    }) {
        Ok(config) => config,
        Err(e) => fail(e),
    };

    let runtime = match config.build_runtime() {
        Ok(runtime) => runtime,
        Err(e) => fail(e),
    };
    let handle = runtime.handle().clone();

    if let Err(e) = runtime.block_on(run(cli.command, config, handle)) {
        fail(e);
    }
}

fn fail(e: CortexError) -> ! {
    tracing::error!(
        "❌ cortex-links failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code)
}

/// Config file when it exists, otherwise `CORTEX_BASE_URL` from the environment.
fn load_config(cli: &CliConfig) -> Result<CortexConfig> {
    if cli.config.exists() {
        tracing::debug!("Loading configuration from {}", cli.config.display());
        CortexConfig::from_file(&cli.config)
    } else {
        tracing::debug!(
            "{} not found, using environment defaults",
            cli.config.display()
        );
        Ok(CortexConfig::new(
            std::env::var("CORTEX_BASE_URL").unwrap_or_default(),
        ))
    }
}

fn not_configured() -> CortexError {
    CortexError::invalid_configuration("cortex.base_url is not set")
}

fn build_resolver(
    config: &CortexConfig,
    client: CatalogClient,
    handle: Handle,
) -> EntityResolver {
    EntityResolver::new(
        Arc::new(client),
        Arc::new(config.clone()),
        config.credentials(),
        handle,
    )
    .with_cache_ttl(config.cache_ttl())
    .with_max_concurrent_fetches(config.runtime.max_concurrent_fetches)
}

fn print_report(label: &str, target: &str, report: &HealthReport) {
    let code = report
        .http_code
        .map(|c| format!(" (HTTP {})", c))
        .unwrap_or_default();
    let mark = if report.ok { "✅" } else { "❌" };
    println!("{} {} {}: {}{}", mark, label, target, report.message, code);
}

async fn run(command: Command, config: CortexConfig, handle: Handle) -> Result<()> {
    let client = CatalogClient::new(&config.http_settings())?;

    match command {
        Command::Health => {
            let base = config.base_url().ok_or_else(not_configured)?;
            let api_base = config.api_base().ok_or_else(not_configured)?;
            let token = config.credentials().token();

            let ui = client.check_health(&base, token.as_deref()).await;
            print_report("UI ", base.as_str(), &ui);
            let api = client.check_api_health(&api_base, token.as_deref()).await;
            print_report("API", api_base.as_str(), &api);
        }
        Command::Scan { file, resolve } => {
            let text = std::fs::read_to_string(&file)?;
            let references = yaml::classify_document(&text)?;
            tracing::info!("Found {} references in {}", references.len(), file.display());

            let resolver = build_resolver(&config, client, handle);
            let pending: Vec<_> = references
                .iter()
                .filter_map(|r| resolver.prefetch(r.kind, &r.value))
                .collect();
            for task in pending {
                if let Err(e) = task.await {
                    tracing::warn!("Prefetch task failed: {}", e);
                }
            }

            for reference in &references {
                println!(
                    "{:<28} {:<10} {}",
                    reference.position.path_display(),
                    reference.kind.to_string(),
                    resolver.label_for(reference.kind, &reference.value)
                );
                if resolve {
                    match resolver.request_for(reference.kind, &reference.value) {
                        Some(request) => match resolver.resolve_for_navigation(request).await {
                            Ok(url) => println!("    -> {}", url),
                            Err(e) => tracing::warn!("Resolution task failed: {}", e),
                        },
                        None => println!("    -> (Cortex base URL not configured)"),
                    }
                }
            }
        }
        Command::Resolve { kind, value } => {
            let resolver = build_resolver(&config, client, handle);
            let kind = ReferenceKind::from(kind);
            let request = resolver.request_for(kind, &value).ok_or_else(not_configured)?;
            match resolver.resolve_for_navigation(request).await {
                Ok(url) => println!("{}", url),
                Err(e) => tracing::warn!("Resolution task failed: {}", e),
            }
        }
        Command::Detect { dir } => {
            let files = yaml::find_cortex_yaml(&dir);
            if files.is_empty() {
                println!("No cortex.yaml found under {}", dir.display());
            }
            for path in files {
                let text = std::fs::read_to_string(&path)?;
                let tag = yaml::find_cortex_tag(&text)?;
                println!(
                    "{}: {}",
                    path.display(),
                    tag.as_deref().unwrap_or("(no x-cortex-tag)")
                );
            }
        }
    }

    Ok(())
}
