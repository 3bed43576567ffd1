// core/src/archive.rs
//! Overlevering mellom nedlasting og arkiv.
//!
//! Nedlastingsjobben skriver et `DownloadManifest` med én linje per forventet
//! fil. Flyttingen bruker manifestet og et øyeblikksbilde av nedlastingsmappen
//! tatt før første forespørsel, så filer som lå der fra før aldri flyttes.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime};

use chrono::{DateTime, Local};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{Result, WalkError};
use crate::storage::{load_json, save_json};

pub const DOWNLOAD_MANIFEST_NAME: &str = "downloads.json";
pub const TRACK_EXTENSION: &str = "tcx";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectedFile {
    pub workout_date: String,
    pub url: String,
    /// Sti i nedlastingsmappen (satt av fetcher eller polling)
    pub downloaded: Option<PathBuf>,
    /// Endelig sti i arkivet
    pub archived: Option<PathBuf>,
}

impl ExpectedFile {
    pub fn new(workout_date: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            workout_date: workout_date.into(),
            url: url.into(),
            downloaded: None,
            archived: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadManifest {
    pub year: i32,
    pub started_at: DateTime<Local>,
    pub files: Vec<ExpectedFile>,
}

impl DownloadManifest {
    pub fn new(year: i32) -> Self {
        Self {
            year,
            started_at: Local::now(),
            files: Vec::new(),
        }
    }

    pub fn pending(&self) -> usize {
        self.files.iter().filter(|f| f.downloaded.is_none()).count()
    }

    pub fn archived(&self) -> usize {
        self.files.iter().filter(|f| f.archived.is_some()).count()
    }
}

pub fn manifest_path(archive_dir: &Path) -> PathBuf {
    archive_dir.join(DOWNLOAD_MANIFEST_NAME)
}

pub fn save_download_manifest(manifest: &DownloadManifest, archive_dir: &Path) -> Result<()> {
    save_json(manifest, &manifest_path(archive_dir))
}

pub fn load_download_manifest(archive_dir: &Path) -> Result<DownloadManifest> {
    load_json(&manifest_path(archive_dir))
}

fn is_track_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .is_some_and(|e| e.eq_ignore_ascii_case(TRACK_EXTENSION))
}

/// Alle `.tcx`-filer i mappen, sortert på navn.
pub fn list_track_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(|e| WalkError::io(dir, e))? {
        let path = entry.map_err(|e| WalkError::io(dir, e))?.path();
        if is_track_file(&path) {
            out.push(path);
        }
    }
    out.sort();
    Ok(out)
}

/// Øyeblikksbilde av sporfiler som finnes før kjøringen starter.
/// En mappe som ikke finnes ennå gir et tomt bilde.
pub fn snapshot(dir: &Path) -> Result<BTreeSet<PathBuf>> {
    if !dir.exists() {
        return Ok(BTreeSet::new());
    }
    Ok(list_track_files(dir)?.into_iter().collect())
}

fn file_len(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

fn file_time(path: &Path) -> SystemTime {
    std::fs::metadata(path)
        .and_then(|m| m.created().or_else(|_| m.modified()))
        .unwrap_or(SystemTime::UNIX_EPOCH)
}

/// Fyller inn `downloaded` for oppføringer fetcheren ikke kunne navngi.
///
/// Nye filer (ikke i `before`, ikke allerede tatt) tildeles i rekkefølge
/// etter opprettelsestid. En fil regnes som ferdig når den ikke er tom og
/// størrelsen er uendret mellom to sjekker (nettleseren lager en tom
/// plassholder før innholdet skrives). Rekkefølgen er best-effort:
/// nettleseren gir ingen kobling mellom URL og filnavn.
pub fn await_downloads(
    manifest: &mut DownloadManifest,
    download_dir: &Path,
    before: &BTreeSet<PathBuf>,
    poll_interval: Duration,
    timeout: Option<Duration>,
) -> Result<()> {
    let expected = manifest.pending();
    if expected == 0 {
        return Ok(());
    }
    info!("⏳ venter på {expected} filer i {}", download_dir.display());

    let started = Instant::now();
    let mut last_sizes: BTreeMap<PathBuf, u64> = BTreeMap::new();
    loop {
        let claimed: BTreeSet<PathBuf> = manifest
            .files
            .iter()
            .filter_map(|f| f.downloaded.clone())
            .collect();

        // Kun filer som ikke er tomme og har samme størrelse som ved forrige sjekk
        let sizes: BTreeMap<PathBuf, u64> = list_track_files(download_dir)?
            .into_iter()
            .filter(|p| !before.contains(p) && !claimed.contains(p))
            .map(|p| {
                let len = file_len(&p);
                (p, len)
            })
            .collect();
        let mut fresh: Vec<PathBuf> = sizes
            .iter()
            .filter(|(p, len)| **len > 0 && last_sizes.get(*p) == Some(*len))
            .map(|(p, _)| p.clone())
            .collect();
        last_sizes = sizes;
        fresh.sort_by_key(|p| (file_time(p), p.clone()));

        let mut fresh = fresh.into_iter();
        for entry in manifest.files.iter_mut().filter(|f| f.downloaded.is_none()) {
            match fresh.next() {
                Some(path) => {
                    debug!("fant {} for {}", path.display(), entry.url);
                    entry.downloaded = Some(path);
                }
                None => break,
            }
        }

        let pending = manifest.pending();
        if pending == 0 {
            return Ok(());
        }
        if let Some(limit) = timeout {
            if started.elapsed() >= limit {
                return Err(WalkError::DownloadTimeout {
                    dir: download_dir.to_path_buf(),
                    expected,
                    found: expected - pending,
                });
            }
        }
        std::thread::sleep(poll_interval);
    }
}

/// Flytter alle nedlastede, ikke-arkiverte filer til `archive_dir`.
/// Eksisterende filer i arkivet overskrives aldri. Returnerer antall flyttet.
pub fn relocate(manifest: &mut DownloadManifest, archive_dir: &Path) -> Result<usize> {
    std::fs::create_dir_all(archive_dir).map_err(|e| WalkError::io(archive_dir, e))?;

    let mut moved = 0;
    for entry in manifest.files.iter_mut().filter(|f| f.archived.is_none()) {
        let Some(src) = entry.downloaded.clone() else {
            warn!("⚠️ ingen fil for {}, hopper over", entry.url);
            continue;
        };
        let Some(name) = src.file_name() else {
            continue;
        };
        let dest = unique_path(&archive_dir.join(name));
        move_file(&src, &dest)?;
        debug!("📦 {} → {}", src.display(), dest.display());
        entry.archived = Some(dest);
        moved += 1;
    }
    Ok(moved)
}

fn move_file(src: &Path, dest: &Path) -> Result<()> {
    if std::fs::rename(src, dest).is_ok() {
        return Ok(());
    }
    // rename feiler på tvers av filsystemer; kopier + slett
    std::fs::copy(src, dest).map_err(|e| WalkError::io(src, e))?;
    std::fs::remove_file(src).map_err(|e| WalkError::io(src, e))
}

/// `walk.tcx` → `walk-1.tcx`, `walk-2.tcx`, ... til navnet er ledig.
pub fn unique_path(path: &Path) -> PathBuf {
    if !path.exists() {
        return path.to_path_buf();
    }
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    let parent = path.parent().unwrap_or_else(|| Path::new(""));
    (1..)
        .map(|n| parent.join(format!("{stem}-{n}{ext}")))
        .find(|p| !p.exists())
        .unwrap_or_else(|| path.to_path_buf())
}
