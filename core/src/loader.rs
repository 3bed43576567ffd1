use std::path::Path;

use log::{info, warn};

use crate::archive::list_track_files;
use crate::error::{Result, WalkError};
use crate::metrics::{tracks_loaded_total, tracks_skipped_total, Metrics};
use crate::models::{Track, TrackFile};

/// Grense mot filformatet. Prod: `TcxLoader`, test: egne stubber.
pub trait TrackLoader {
    fn load(&self, path: &Path) -> Result<Track>;
}

#[derive(Debug, Clone)]
pub struct LoadedTrack {
    pub file: TrackFile,
    pub track: Track,
}

/// Leser alle sporfiler i `archive_dir` i filnavn-rekkefølge.
///
/// Med `skip_malformed` logges og telles `Parse`-feil i stedet for å avbryte.
/// I/O-feil avbryter alltid.
pub fn load_year(
    loader: &dyn TrackLoader,
    archive_dir: &Path,
    skip_malformed: bool,
    metrics: &Metrics,
) -> Result<Vec<LoadedTrack>> {
    let files = list_track_files(archive_dir)?;
    let total = files.len();
    let mut out = Vec::with_capacity(total);

    for (i, path) in files.into_iter().enumerate() {
        info!("Loading track {} of {}", i + 1, total);
        match loader.load(&path) {
            Ok(track) => {
                tracks_loaded_total(metrics).inc();
                out.push(LoadedTrack {
                    file: TrackFile::new(path),
                    track,
                });
            }
            Err(e @ WalkError::Parse { .. }) if skip_malformed => {
                tracks_skipped_total(metrics).inc();
                warn!("⚠️ hopper over {}: {e}", path.display());
            }
            Err(e) => return Err(e),
        }
    }
    Ok(out)
}
