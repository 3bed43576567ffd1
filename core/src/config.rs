use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::storage::{load_json, save_json};

pub const DEFAULT_CONFIG_PATH: &str = "walkmap.json";

/// Hvordan eksport-URL-en hentes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchMode {
    /// Direkte GET med ureq (evt. med session-cookie)
    Http,
    /// Åpner URL-en i systemets nettleser (bruker innlogget sesjon)
    Browser,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub mode: FetchMode,
    /// Pause mellom forespørsler (ms)
    pub request_delay_ms: u64,
    /// Hvor ofte nedlastingsmappen sjekkes (ms)
    pub poll_interval_ms: u64,
    /// Tidsavbrudd for polling (sek). None = vent for alltid.
    pub poll_timeout_secs: Option<u64>,
    /// Verdi for `Cookie`-headeren i http-modus
    pub cookie: Option<String>,
    /// Tidsavbrudd per HTTP-kall (sek)
    pub http_timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            mode: FetchMode::Http,
            request_delay_ms: 1000,
            poll_interval_ms: 500,
            poll_timeout_secs: Some(600),
            cookie: None,
            http_timeout_secs: 30,
        }
    }
}

impl FetchConfig {
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn poll_timeout(&self) -> Option<Duration> {
        self.poll_timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub output_path: PathBuf,
    /// Nedsampling for heatmap (holder filstørrelsen nede)
    pub heatmap_stride: usize,
    /// Nedsampling per spor-polyline
    pub track_stride: usize,
    pub map_width: u32,  // px
    pub map_height: u32, // px
    pub popup_max_width: u32, // px
    pub plot_width: u32,  // px
    pub plot_height: u32, // px
    /// Startsenter [lat, lon] før fitBounds
    pub map_center: [f64; 2],
    pub map_zoom: u8,
    /// Valgfri HTML-fil med egne notater som settes inn i Notes-seksjonen
    pub notes_path: Option<PathBuf>,
    /// Hopp over ødelagte filer (logges) i stedet for å avbryte
    pub skip_malformed: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from("report.html"),
            heatmap_stride: 10,
            track_stride: 2,
            map_width: 1200,
            map_height: 600,
            popup_max_width: 400,
            plot_width: 1200,
            plot_height: 600,
            map_center: [48.0, 5.0],
            map_zoom: 6,
            notes_path: None,
            skip_malformed: false,
        }
    }
}

/// All konfig for begge jobbene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub year: i32,
    /// CSV-eksport med "Workout Date" og "Link"
    pub manifest_path: PathBuf,
    /// Nettleserens/klientens nedlastingsmappe
    pub download_dir: PathBuf,
    /// Rot for arkivet; spor havner i `<data_dir>/<år>/`
    pub data_dir: PathBuf,
    pub fetch: FetchConfig,
    pub report: ReportConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            year: 2024,
            manifest_path: PathBuf::from("workout_history.csv"),
            download_dir: default_download_dir(),
            data_dir: PathBuf::from("data"),
            fetch: FetchConfig::default(),
            report: ReportConfig::default(),
        }
    }
}

impl Config {
    /// `<data_dir>/<år>/`
    pub fn archive_dir(&self) -> PathBuf {
        self.data_dir.join(self.year.to_string())
    }
}

fn default_download_dir() -> PathBuf {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(|home| PathBuf::from(home).join("Downloads"))
        .unwrap_or_else(|| PathBuf::from("Downloads"))
}

/// Leser konfig fra disk (JSON).
/// Hvis filen ikke finnes, returneres default-konfig.
pub fn load_config(path: &Path) -> Result<Config> {
    if path.exists() {
        let cfg: Config = load_json(path)?;
        info!("📂 Konfig lastet fra {} (år={})", path.display(), cfg.year);
        Ok(cfg)
    } else {
        warn!(
            "⚠️ Fant ikke konfig på {}, bruker default (år={})",
            path.display(),
            Config::default().year
        );
        Ok(Config::default())
    }
}

pub fn save_config(cfg: &Config, path: &Path) -> Result<()> {
    save_json(cfg, path)?;
    info!("✅ Konfig lagret til {}", path.display());
    Ok(())
}
