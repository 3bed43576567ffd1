use std::fs;
use std::path::Path;

use chrono::DateTime;
use walkmap_core::metrics::{tracks_loaded_total, tracks_skipped_total};
use walkmap_core::render::{script_json, ChartJs};
use walkmap_core::report::{chartjs_for, leaflet_for};
use walkmap_core::{
    build_report_data, load_year, render_report, run_report, Config, GeoPoint, Metrics, Result,
    Track, TrackLoader, WalkError,
};

/// Spor bestemt av filnavnet; "broken" gir Parse-feil.
struct StubLoader;

impl TrackLoader for StubLoader {
    fn load(&self, path: &Path) -> Result<Track> {
        let stem = path.file_stem().unwrap().to_string_lossy().into_owned();
        let (start, duration_s) = match stem.as_str() {
            "a" => ("2024-03-15T10:00:00+00:00", 3600.0),
            "b" => ("2024-06-01T08:00:00+01:00", 5400.0),
            "still" => ("2024-06-02T08:00:00+01:00", 0.0),
            _ => return Err(WalkError::parse(path, "ugyldig innhold")),
        };
        Ok(Track {
            points: (0..20)
                .map(|i| GeoPoint::new(51.7 + i as f64 * 0.001, -1.25))
                .collect(),
            start_time: DateTime::parse_from_rfc3339(start).unwrap(),
            distance_m: 5000.0,
            duration_s,
        })
    }
}

fn setup(files: &[&str]) -> (tempfile::TempDir, Config) {
    let root = tempfile::tempdir().unwrap();
    let mut cfg = Config::default();
    cfg.data_dir = root.path().join("data");
    cfg.report.output_path = root.path().join("out").join("report.html");
    fs::create_dir_all(cfg.archive_dir()).unwrap();
    for f in files {
        fs::write(cfg.archive_dir().join(f), "").unwrap();
    }
    // ikke en sporfil
    fs::write(cfg.archive_dir().join("downloads.json"), "{}").unwrap();
    (root, cfg)
}

#[test]
fn report_contains_map_charts_and_total() {
    let (_root, cfg) = setup(&["a.tcx", "b.tcx"]);
    let metrics = Metrics::new().unwrap();

    let out = run_report(&cfg, &StubLoader, &metrics).expect("run_report");
    let html = fs::read_to_string(out).unwrap();

    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains(r#"href="w3.css""#));
    assert!(html.contains(r#"href="sidebar.css""#));
    assert!(html.contains(r##"href="#notes""##));
    assert!(html.contains(r##"href="#nerds""##));
    assert!(html.contains(&ChartJs::script_url()));
    assert!(html.contains("L.heatLayer("));
    // hover/popup bytter farge, lagkontroll og zoom til sporene
    assert!(html.contains("line.on('mouseover', raise);"));
    assert!(html.contains("line.on('popupclose',"));
    assert!(html.contains("e.target.setStyle(normal);"));
    assert!(html.contains("color: 'magenta'"));
    assert!(html.contains("L.control.layers("));
    assert!(html.contains("map.fitBounds(bounds, {padding: [30, 30]});"));
    assert!(html.contains("<b>10.0km</b>"));
    assert!(html.contains("id=\"monthPlot\""));
    assert!(html.contains("id=\"weekPlot\""));
    assert!(html.contains("max-width: 1200px;"));
    assert_eq!(html.matches("\"summary\":").count(), 2);
    assert!(html.contains("Description: a<br>"));
    assert_eq!(tracks_loaded_total(&metrics).get(), 2);
}

#[test]
fn empty_archive_is_an_empty_dataset_error() {
    let (_root, cfg) = setup(&[]);
    let metrics = Metrics::new().unwrap();

    let err = run_report(&cfg, &StubLoader, &metrics).unwrap_err();
    assert!(matches!(err, WalkError::EmptyDataset(_)), "{err:?}");
    assert!(!cfg.report.output_path.exists());
}

#[test]
fn malformed_track_aborts_unless_skipped() {
    let (_root, mut cfg) = setup(&["a.tcx", "broken.tcx"]);

    let metrics = Metrics::new().unwrap();
    let err = run_report(&cfg, &StubLoader, &metrics).unwrap_err();
    assert!(matches!(err, WalkError::Parse { .. }));

    cfg.report.skip_malformed = true;
    let metrics = Metrics::new().unwrap();
    run_report(&cfg, &StubLoader, &metrics).expect("skip_malformed");
    assert_eq!(tracks_loaded_total(&metrics).get(), 1);
    assert_eq!(tracks_skipped_total(&metrics).get(), 1);
}

#[test]
fn zero_duration_track_still_counts() {
    let (_root, cfg) = setup(&["a.tcx", "still.tcx"]);
    let metrics = Metrics::new().unwrap();
    let loaded = load_year(&StubLoader, &cfg.archive_dir(), false, &metrics).unwrap();

    let data = build_report_data(&loaded, &cfg.report, cfg.year).unwrap();
    assert!((data.total_km() - 10.0).abs() < 1e-9);
    assert!(data.map.tracks[1].summary.ends_with("Average Speed: n/a"));
}

#[test]
fn geometry_is_downsampled_with_configured_strides() {
    let (_root, cfg) = setup(&["a.tcx", "b.tcx"]);
    let metrics = Metrics::new().unwrap();
    let loaded = load_year(&StubLoader, &cfg.archive_dir(), false, &metrics).unwrap();

    let data = build_report_data(&loaded, &cfg.report, cfg.year).unwrap();
    // 20 punkter: stride 10 → 2 per spor, stride 2 → 10 per spor
    assert_eq!(data.map.heat.len(), 4);
    assert!(data.map.tracks.iter().all(|t| t.points.len() == 10));
}

#[test]
fn notes_are_inserted() {
    let (root, mut cfg) = setup(&["a.tcx"]);
    let notes = root.path().join("notes.html");
    fs::write(&notes, "<p>Ridgeway, Goring to Ivinghoe Beacon.</p>").unwrap();
    cfg.report.notes_path = Some(notes);

    let metrics = Metrics::new().unwrap();
    let loaded = load_year(&StubLoader, &cfg.archive_dir(), false, &metrics).unwrap();
    let data = build_report_data(&loaded, &cfg.report, cfg.year).unwrap();
    let html = render_report(
        &data,
        &cfg.report,
        Some(fs::read_to_string(cfg.report.notes_path.as_ref().unwrap()).unwrap()),
        &leaflet_for(&cfg.report),
        &chartjs_for(&cfg.report),
    )
    .unwrap();

    assert!(html.contains("<p>Ridgeway, Goring to Ivinghoe Beacon.</p>"));
}

#[test]
fn embedded_json_cannot_close_the_script_tag() {
    let json = script_json("</script><script>alert(1)</script>").unwrap();
    assert!(!json.contains("</script>"));
    assert!(json.contains("<\\/script>"));
}
