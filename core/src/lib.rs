//! walkmap: henter et års TCX-filer fra treningskontoen, aggregerer distanse
//! per måned/uke og skriver én statisk HTML-side med kart og grafer.

pub mod error;
pub mod models;
pub mod units;
pub mod storage;
pub mod config;
pub mod metrics;
pub mod cli;

// Jobb 1: nedlasting + arkiv
pub mod manifest;
pub mod fetch;
pub mod archive;
pub mod acquire;

// Jobb 2: innlesing → aggregering → rapport
pub mod loader;
pub mod tcx;
pub mod aggregate;
pub mod summary;
pub mod render;
pub mod report;

pub use error::{Result, WalkError};
pub use models::{GeoPoint, Track, TrackFile, WorkoutRecord};
pub use config::{load_config, save_config, Config, FetchConfig, FetchMode, ReportConfig};
pub use metrics::Metrics;

pub use manifest::{export_url, filter_year, load_manifest, read_manifest};
pub use fetch::{fetcher_for, BrowserFetcher, Fetcher, HttpFetcher};
pub use archive::{DownloadManifest, ExpectedFile};
pub use acquire::run_download;

pub use loader::{load_year, LoadedTrack, TrackLoader};
pub use tcx::TcxLoader;
pub use aggregate::{
    aggregate_by_month, aggregate_by_week, downsample_for_display, downsample_for_heatmap,
    BucketKind, DistanceSeries,
};
pub use summary::{summarize, TrackSummary};
pub use report::{build_report_data, render_report, run_report, write_report, ReportData};
