use anyhow::{Context, Result};

use walkmap_core::cli::{config_path_from_args, init_logging, log_metrics};
use walkmap_core::{load_config, run_report, Metrics, TcxLoader};

fn main() -> Result<()> {
    init_logging();

    let cfg_path = config_path_from_args(std::env::args());
    let cfg = load_config(&cfg_path)
        .with_context(|| format!("kunne ikke laste konfig {}", cfg_path.display()))?;

    let metrics = Metrics::new()?;
    run_report(&cfg, &TcxLoader, &metrics)
        .with_context(|| format!("rapport for {} feilet", cfg.year))?;

    log_metrics(&metrics);
    Ok(())
}
