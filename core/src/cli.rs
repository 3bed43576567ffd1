use std::path::PathBuf;

use log::debug;

use crate::config::DEFAULT_CONFIG_PATH;
use crate::metrics::Metrics;

/// env_logger med `info` som default (RUST_LOG overstyrer).
pub fn init_logging() {
    let env = env_logger::Env::default().default_filter_or("info");
    // Kan allerede være satt (tester); ignorer
    let _ = env_logger::Builder::from_env(env).try_init();
}

/// Første posisjonelle argument, ellers `walkmap.json`.
pub fn config_path_from_args<I: IntoIterator<Item = String>>(args: I) -> PathBuf {
    args.into_iter()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

pub fn log_metrics(metrics: &Metrics) {
    debug!("--- Run metrics ---\n{}", metrics.render());
}
