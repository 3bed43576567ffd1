use std::cell::Cell;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use walkmap_core::archive::{
    await_downloads, load_download_manifest, relocate, snapshot, unique_path,
};
use walkmap_core::metrics::{downloads_requested_total, files_archived_total};
use walkmap_core::{
    run_download, Config, DownloadManifest, ExpectedFile, Fetcher, Metrics, Result, WalkError,
};

fn id_of(url: &str) -> String {
    url.trim_end_matches("/tcx").rsplit('/').next().unwrap().to_string()
}

/// Skriver filen og returnerer stien (som http-modus).
struct DirectFetcher;

impl Fetcher for DirectFetcher {
    fn fetch(&self, url: &str, download_dir: &Path) -> Result<Option<PathBuf>> {
        let path = download_dir.join(format!("{}.tcx", id_of(url)));
        fs::write(&path, url).unwrap();
        Ok(Some(path))
    }
}

/// Skriver filen, men sier ikke hvor (som nettleser-modus).
struct BrowserLikeFetcher;

impl Fetcher for BrowserLikeFetcher {
    fn fetch(&self, url: &str, download_dir: &Path) -> Result<Option<PathBuf>> {
        fs::write(download_dir.join(format!("workout_{}.tcx", id_of(url))), url).unwrap();
        Ok(None)
    }
}

/// Som `DirectFetcher`, men andre kall feiler (tjenesten svarer 503).
#[derive(Default)]
struct FailsOnSecondCall {
    calls: Cell<usize>,
}

impl Fetcher for FailsOnSecondCall {
    fn fetch(&self, url: &str, download_dir: &Path) -> Result<Option<PathBuf>> {
        self.calls.set(self.calls.get() + 1);
        if self.calls.get() == 2 {
            return Err(WalkError::Http {
                url: url.to_string(),
                message: "status 503".to_string(),
            });
        }
        DirectFetcher.fetch(url, download_dir)
    }
}

fn test_config(root: &Path) -> Config {
    let manifest_path = root.join("history.csv");
    let mut wtr = csv::Writer::from_path(&manifest_path).unwrap();
    wtr.write_record(["Workout Date", "Link"]).unwrap();
    wtr.write_record(["Dec. 27, 2024", "https://www.mapmyfitness.com/workout/101"])
        .unwrap();
    wtr.write_record(["Jan. 2, 2025", "https://www.mapmyfitness.com/workout/102"])
        .unwrap();
    wtr.write_record(["Feb. 14, 2024", "https://www.mapmyfitness.com/workout/103"])
        .unwrap();
    wtr.flush().unwrap();

    let mut cfg = Config::default();
    cfg.year = 2024;
    cfg.manifest_path = manifest_path;
    cfg.download_dir = root.join("Downloads");
    cfg.data_dir = root.join("data");
    cfg.fetch.request_delay_ms = 0;
    cfg.fetch.poll_interval_ms = 10;
    cfg.fetch.poll_timeout_secs = Some(5);
    cfg
}

#[test]
fn download_job_with_known_paths_archives_year_only() {
    let root = tempfile::tempdir().unwrap();
    let cfg = test_config(root.path());
    let metrics = Metrics::new().unwrap();

    let manifest = run_download(&cfg, &DirectFetcher, &metrics).expect("run_download");

    assert_eq!(manifest.files.len(), 2);
    assert_eq!(manifest.archived(), 2);
    let archive = cfg.archive_dir();
    assert!(archive.join("101.tcx").exists());
    assert!(archive.join("103.tcx").exists());
    assert!(!archive.join("102.tcx").exists());
    assert!(!cfg.download_dir.join("101.tcx").exists());

    assert_eq!(downloads_requested_total(&metrics).get(), 2);
    assert_eq!(files_archived_total(&metrics).get(), 2);

    // overleveringen ligger på disk
    let saved = load_download_manifest(&archive).expect("downloads.json");
    assert_eq!(saved.files, manifest.files);
}

#[test]
fn download_job_polls_for_unnamed_files_and_ignores_stale_ones() {
    let root = tempfile::tempdir().unwrap();
    let cfg = test_config(root.path());
    fs::create_dir_all(&cfg.download_dir).unwrap();
    // lå der fra før, med dagens dato: skal ikke flyttes
    fs::write(cfg.download_dir.join("stale.tcx"), "old").unwrap();

    let metrics = Metrics::new().unwrap();
    let manifest = run_download(&cfg, &BrowserLikeFetcher, &metrics).unwrap();

    assert_eq!(manifest.archived(), 2);
    assert!(cfg.download_dir.join("stale.tcx").exists());
    assert!(!cfg.archive_dir().join("stale.tcx").exists());
    assert!(cfg.archive_dir().join("workout_101.tcx").exists());
    assert!(cfg.archive_dir().join("workout_103.tcx").exists());
}

#[test]
fn polling_times_out_when_nothing_arrives() {
    let root = tempfile::tempdir().unwrap();
    let downloads = root.path().join("Downloads");
    fs::create_dir_all(&downloads).unwrap();

    let mut manifest = DownloadManifest::new(2024);
    manifest
        .files
        .push(ExpectedFile::new("Dec. 27, 2024", "https://x/workout/export/1/tcx"));

    let before = snapshot(&downloads).unwrap();
    let err = await_downloads(
        &mut manifest,
        &downloads,
        &before,
        Duration::from_millis(1),
        Some(Duration::ZERO),
    )
    .unwrap_err();

    assert!(matches!(
        err,
        WalkError::DownloadTimeout {
            expected: 1,
            found: 0,
            ..
        }
    ));
}

#[test]
fn relocate_never_overwrites_archive() {
    let root = tempfile::tempdir().unwrap();
    let downloads = root.path().join("Downloads");
    let archive = root.path().join("data").join("2024");
    fs::create_dir_all(&downloads).unwrap();
    fs::create_dir_all(&archive).unwrap();
    fs::write(archive.join("walk.tcx"), "first").unwrap();
    fs::write(downloads.join("walk.tcx"), "second").unwrap();

    let mut manifest = DownloadManifest::new(2024);
    let mut entry = ExpectedFile::new("Dec. 27, 2024", "https://x/workout/export/1/tcx");
    entry.downloaded = Some(downloads.join("walk.tcx"));
    manifest.files.push(entry);

    let moved = relocate(&mut manifest, &archive).unwrap();
    assert_eq!(moved, 1);
    assert_eq!(fs::read_to_string(archive.join("walk.tcx")).unwrap(), "first");
    assert_eq!(fs::read_to_string(archive.join("walk-1.tcx")).unwrap(), "second");
    assert_eq!(manifest.files[0].archived, Some(archive.join("walk-1.tcx")));

    // andre runde: allerede arkivert, ingenting flyttes
    assert_eq!(relocate(&mut manifest, &archive).unwrap(), 0);
}

#[test]
fn unique_path_counts_up() {
    let root = tempfile::tempdir().unwrap();
    let p = root.path().join("a.tcx");
    assert_eq!(unique_path(&p), p);
    fs::write(&p, "").unwrap();
    fs::write(root.path().join("a-1.tcx"), "").unwrap();
    assert_eq!(unique_path(&p), root.path().join("a-2.tcx"));
}

#[test]
fn failed_fetch_still_archives_what_was_fetched() {
    let root = tempfile::tempdir().unwrap();
    let cfg = test_config(root.path());
    let metrics = Metrics::new().unwrap();

    let err = run_download(&cfg, &FailsOnSecondCall::default(), &metrics).unwrap_err();
    assert!(matches!(err, WalkError::Http { .. }), "{err:?}");

    // 101 ble hentet før feilen: skal ligge i arkivet, ikke i nedlastingsmappen
    let archive = cfg.archive_dir();
    assert!(archive.join("101.tcx").exists());
    assert!(!cfg.download_dir.join("101.tcx").exists());
    assert_eq!(files_archived_total(&metrics).get(), 1);

    let saved = load_download_manifest(&archive).expect("downloads.json");
    assert_eq!(saved.files.len(), 1);
    assert_eq!(saved.files[0].archived, Some(archive.join("101.tcx")));
}

#[test]
fn empty_placeholder_is_not_claimed() {
    let root = tempfile::tempdir().unwrap();
    let downloads = root.path().join("Downloads");
    fs::create_dir_all(&downloads).unwrap();
    let before = snapshot(&downloads).unwrap();

    // nettleseren har bare laget en tom fil
    fs::write(downloads.join("workout_1.tcx"), "").unwrap();

    let mut manifest = DownloadManifest::new(2024);
    manifest
        .files
        .push(ExpectedFile::new("Dec. 27, 2024", "https://x/workout/export/1/tcx"));

    let err = await_downloads(
        &mut manifest,
        &downloads,
        &before,
        Duration::from_millis(5),
        Some(Duration::from_millis(100)),
    )
    .unwrap_err();

    assert!(matches!(err, WalkError::DownloadTimeout { found: 0, .. }));
    assert_eq!(manifest.files[0].downloaded, None);
}

#[test]
fn finished_file_is_claimed_once_size_is_stable() {
    let root = tempfile::tempdir().unwrap();
    let downloads = root.path().join("Downloads");
    fs::create_dir_all(&downloads).unwrap();
    let before = snapshot(&downloads).unwrap();

    let path = downloads.join("workout_1.tcx");
    fs::write(&path, "<TrainingCenterDatabase/>").unwrap();

    let mut manifest = DownloadManifest::new(2024);
    manifest
        .files
        .push(ExpectedFile::new("Dec. 27, 2024", "https://x/workout/export/1/tcx"));

    await_downloads(
        &mut manifest,
        &downloads,
        &before,
        Duration::from_millis(5),
        Some(Duration::from_secs(5)),
    )
    .expect("await_downloads");

    assert_eq!(manifest.files[0].downloaded, Some(path));
}
