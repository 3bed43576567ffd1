use std::path::{Path, PathBuf};

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

/// Én GPS-posisjon. Serialiseres som `[lat, lon]` (Leaflet-format).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "[f64; 2]", from = "[f64; 2]")]
pub struct GeoPoint {
    pub lat: f64, // grader
    pub lon: f64, // grader
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl From<GeoPoint> for [f64; 2] {
    fn from(p: GeoPoint) -> Self {
        [p.lat, p.lon]
    }
}

impl From<[f64; 2]> for GeoPoint {
    fn from(a: [f64; 2]) -> Self {
        Self { lat: a[0], lon: a[1] }
    }
}

/// Ett innlest spor (tur). Punktene er tidsordnet; distanse og varighet >= 0.
#[derive(Debug, Clone)]
pub struct Track {
    pub points: Vec<GeoPoint>,
    /// Starttid med offset slik filen oppgir den (ingen tidssone-normalisering)
    pub start_time: DateTime<FixedOffset>,
    pub distance_m: f64, // meter
    pub duration_s: f64, // sekunder
}

impl Track {
    pub fn distance_km(&self) -> f64 {
        self.distance_m / 1000.0
    }

    pub fn month(&self) -> u32 {
        self.start_time.month()
    }

    pub fn iso_week(&self) -> u32 {
        self.start_time.iso_week().week()
    }
}

/// Rad fra manifestet (CSV-eksport fra treningskontoen).
#[derive(Debug, Clone, PartialEq)]
pub struct WorkoutRecord {
    /// Rå "Workout Date"-tekst
    pub date_text: String,
    /// Tolket dato hvis et av de kjente formatene passet
    pub date: Option<NaiveDate>,
    pub link: String,
}

impl WorkoutRecord {
    /// Bruker tolket dato når den finnes, ellers delstreng-treff på årstallet.
    pub fn in_year(&self, year: i32) -> bool {
        match self.date {
            Some(d) => d.year() == year,
            None => self.date_text.contains(&year.to_string()),
        }
    }
}

/// Arkivert sporfil under `data/<år>/`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct TrackFile {
    pub path: PathBuf,
}

impl TrackFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Filnavn uten `.tcx`, brukt som beskrivelse i popupen.
    pub fn label(&self) -> String {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        match name.strip_suffix(".tcx") {
            Some(stem) => stem.to_string(),
            None => name,
        }
    }
}
