// core/src/acquire.rs
//! Nedlastingsjobben: manifest → fetcher → nedlastingsmappe → data/<år>/.

use log::{debug, info, warn};

use crate::archive::{
    await_downloads, relocate, save_download_manifest, snapshot, DownloadManifest, ExpectedFile,
};
use crate::config::Config;
use crate::error::{Result, WalkError};
use crate::fetch::Fetcher;
use crate::manifest::{export_url, filter_year, load_manifest};
use crate::metrics::{downloads_requested_total, files_archived_total, Metrics};

/// Ved feil fra fetcheren arkiveres det som allerede er hentet (og
/// `downloads.json` skrives) før feilen returneres.
pub fn run_download(cfg: &Config, fetcher: &dyn Fetcher, metrics: &Metrics) -> Result<DownloadManifest> {
    let records = load_manifest(&cfg.manifest_path)?;
    let matches = filter_year(&records, cfg.year);
    info!("🔎 {} av {} økter i {}", matches.len(), records.len(), cfg.year);

    let archive_dir = cfg.archive_dir();
    std::fs::create_dir_all(&cfg.download_dir).map_err(|e| WalkError::io(&cfg.download_dir, e))?;

    // Øyeblikksbilde før første forespørsel: det som ligger her nå er ikke vårt
    let before = snapshot(&cfg.download_dir)?;
    debug!("{} sporfiler fantes fra før i {}", before.len(), cfg.download_dir.display());

    let mut manifest = DownloadManifest::new(cfg.year);
    let mut failed: Option<WalkError> = None;
    for (i, record) in matches.iter().enumerate() {
        if i > 0 {
            std::thread::sleep(cfg.fetch.request_delay());
        }
        let url = export_url(&record.link);
        info!("⬇️ [{}/{}] {} ({})", i + 1, matches.len(), url, record.date_text);

        let mut entry = ExpectedFile::new(record.date_text.clone(), url);
        match fetcher.fetch(&entry.url, &cfg.download_dir) {
            Ok(path) => entry.downloaded = path,
            Err(e) => {
                // Stopp her, men arkiver det som allerede er hentet før feilen returneres
                warn!("⚠️ henting av {} feilet, stopper: {e}", entry.url);
                failed = Some(e);
                break;
            }
        }
        downloads_requested_total(metrics).inc();
        manifest.files.push(entry);
    }
    save_download_manifest(&manifest, &archive_dir)?;

    await_downloads(
        &mut manifest,
        &cfg.download_dir,
        &before,
        cfg.fetch.poll_interval(),
        cfg.fetch.poll_timeout(),
    )?;

    let moved = relocate(&mut manifest, &archive_dir)?;
    files_archived_total(metrics).inc_by(moved as u64);
    save_download_manifest(&manifest, &archive_dir)?;

    info!("📦 {moved} filer flyttet til {}", archive_dir.display());
    match failed {
        Some(e) => Err(e),
        None => Ok(manifest),
    }
}
