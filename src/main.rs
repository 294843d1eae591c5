use anyhow::Result;
use memsweep::config::{load_config, validate_config};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = load_config()?;
    validate_config(&config)?;

    // Initialize logging, RUST_LOG overriding the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!("Starting Memsweep v{}", env!("CARGO_PKG_VERSION"));

    #[cfg(not(windows))]
    {
        anyhow::bail!("Memsweep only supports the Windows platform");
    }

    #[cfg(windows)]
    {
        use memsweep::optimize::{Optimizer, TrimOptions};
        use memsweep::OptimizationReason;

        let capabilities = memsweep::detect();
        info!(
            supported = %capabilities.supported_areas(),
            is_64_bit = capabilities.is_64_bit,
            "detected OS capabilities"
        );

        let areas = config.areas();
        info!(requested = %areas, "selected areas");

        let trim = TrimOptions {
            exclusions: config.process_trim.exclusions.clone(),
            max_threads: config.process_trim.max_threads,
        };
        let optimizer = Optimizer::native(trim)
            .with_progress(Box::new(|percent, label| {
                info!(percent, area = label, "progress");
            }));

        // The engine runs synchronously; host it on a blocking worker
        let report = tokio::task::spawn_blocking(move || {
            optimizer.optimize(areas, OptimizationReason::Manual)
        })
        .await??;

        info!("{}", report.snapshot);
    }

    Ok(())
}
