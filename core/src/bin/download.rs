use anyhow::{Context, Result};
use log::info;

use walkmap_core::cli::{config_path_from_args, init_logging, log_metrics};
use walkmap_core::{fetcher_for, load_config, run_download, save_config, Metrics};

fn main() -> Result<()> {
    init_logging();

    let cfg_path = config_path_from_args(std::env::args());
    let cfg = load_config(&cfg_path)
        .with_context(|| format!("kunne ikke laste konfig {}", cfg_path.display()))?;
    if !cfg_path.exists() {
        // Skriv ut default-konfigen så den kan redigeres til neste kjøring
        save_config(&cfg, &cfg_path).context("kunne ikke lagre default-konfig")?;
    }

    let metrics = Metrics::new()?;
    let fetcher = fetcher_for(&cfg.fetch);
    let manifest = run_download(&cfg, fetcher.as_ref(), &metrics).context("nedlasting feilet")?;

    info!(
        "✅ ferdig: {} av {} filer arkivert for {}",
        manifest.archived(),
        manifest.files.len(),
        manifest.year
    );
    log_metrics(&metrics);
    Ok(())
}
