// core/src/report.rs
//! Rapportjobben: data/<år>/ → aggregering → kart + grafer → én HTML-fil.

use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::aggregate::{
    aggregate_by_month, aggregate_by_week, downsample_for_display, downsample_for_heatmap,
    DistanceSeries,
};
use crate::config::{Config, ReportConfig};
use crate::error::{Result, WalkError};
use crate::loader::{load_year, LoadedTrack, TrackLoader};
use crate::metrics::Metrics;
use crate::models::Track;
use crate::render::{
    render_page, ChartJs, ChartRenderer, ChartSpec, LeafletMap, MapData, MapRenderer, MapTrack,
    PageParts,
};
use crate::summary::TrackSummary;

/// Alt rapporten trenger, uten I/O.
#[derive(Debug, Clone)]
pub struct ReportData {
    pub year: i32,
    pub monthly: DistanceSeries,
    pub weekly: DistanceSeries,
    pub map: MapData,
}

impl ReportData {
    pub fn total_km(&self) -> f64 {
        self.monthly.total()
    }
}

/// Aggregerer innleste spor til serier og kartgeometri.
pub fn build_report_data(loaded: &[LoadedTrack], cfg: &ReportConfig, year: i32) -> Result<ReportData> {
    let tracks: Vec<Track> = loaded.iter().map(|l| l.track.clone()).collect();

    let mut map_tracks = Vec::with_capacity(loaded.len());
    for (i, l) in loaded.iter().enumerate() {
        debug!("Merging track {} of {}", i + 1, loaded.len());
        let label = l.file.label();
        if l.track.duration_s <= 0.0 {
            warn!("⚠️ {label}: varighet 0 s, viser uten snittfart");
        }
        map_tracks.push(MapTrack {
            points: downsample_for_display(&l.track, cfg.track_stride)?,
            summary: TrackSummary::from_track(&l.track, &label).to_string(),
        });
    }

    Ok(ReportData {
        year,
        monthly: aggregate_by_month(&tracks),
        weekly: aggregate_by_week(&tracks),
        map: MapData {
            heat: downsample_for_heatmap(&tracks, cfg.heatmap_stride)?,
            tracks: map_tracks,
        },
    })
}

pub fn leaflet_for(cfg: &ReportConfig) -> LeafletMap {
    LeafletMap {
        element_id: "walk-map".to_string(),
        width: cfg.map_width,
        height: cfg.map_height,
        popup_max_width: cfg.popup_max_width,
        center: cfg.map_center,
        zoom: cfg.map_zoom,
    }
}

pub fn chartjs_for(cfg: &ReportConfig) -> ChartJs {
    ChartJs {
        width: cfg.plot_width,
        height: cfg.plot_height,
    }
}

/// Setter sammen hele HTML-dokumentet.
pub fn render_report(
    data: &ReportData,
    cfg: &ReportConfig,
    notes_html: Option<String>,
    map: &dyn MapRenderer,
    charts: &dyn ChartRenderer,
) -> Result<String> {
    let month_chart = charts.render(&ChartSpec {
        id: "monthPlot",
        title: "Monthly Plot",
        x_label: "Month",
        bar_label: "Monthly Distance",
        series: &data.monthly,
    })?;
    let week_chart = charts.render(&ChartSpec {
        id: "weekPlot",
        title: "Weekly Plot",
        x_label: "Week Number",
        bar_label: "Weekly Distance",
        series: &data.weekly,
    })?;

    let parts = PageParts {
        year: data.year,
        total_km: data.total_km(),
        track_count: data.map.tracks.len(),
        notes_html,
        head: format!("{}\n        {}", map.head(), charts.head()),
        map_html: map.render(&data.map)?,
        charts_html: vec![month_chart, week_chart],
        content_width: cfg.plot_width.max(cfg.map_width),
    };
    Ok(render_page(&parts))
}

/// Én skriving til fast sti; ingen atomisk rename.
pub fn write_report(path: &Path, html: &str) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| WalkError::io(dir, e))?;
    }
    std::fs::write(path, html).map_err(|e| WalkError::io(path, e))
}

fn read_notes(cfg: &ReportConfig) -> Result<Option<String>> {
    match &cfg.notes_path {
        Some(p) => std::fs::read_to_string(p)
            .map(Some)
            .map_err(|e| WalkError::io(p, e)),
        None => Ok(None),
    }
}

/// Hele rapportjobben. Returnerer stien til den skrevne filen.
pub fn run_report(cfg: &Config, loader: &dyn TrackLoader, metrics: &Metrics) -> Result<PathBuf> {
    let archive_dir = cfg.archive_dir();
    info!("📂 leser spor fra {}", archive_dir.display());

    let loaded = load_year(loader, &archive_dir, cfg.report.skip_malformed, metrics)?;
    if loaded.is_empty() {
        return Err(WalkError::EmptyDataset(archive_dir));
    }

    let data = build_report_data(&loaded, &cfg.report, cfg.year)?;
    let html = render_report(
        &data,
        &cfg.report,
        read_notes(&cfg.report)?,
        &leaflet_for(&cfg.report),
        &chartjs_for(&cfg.report),
    )?;

    write_report(&cfg.report.output_path, &html)?;
    info!(
        "✅ rapport skrevet til {} ({} spor, {:.1} km)",
        cfg.report.output_path.display(),
        loaded.len(),
        data.total_km()
    );
    Ok(cfg.report.output_path.clone())
}
