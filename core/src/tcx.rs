// core/src/tcx.rs
//! TCX (Garmin Training Center XML) → `Track`.
//!
//! Bare feltene rapporten trenger leses; alt annet (puls, kadens,
//! Extensions) ignoreres av serde.

use std::path::Path;

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use log::debug;
use serde::Deserialize;

use crate::error::{Result, WalkError};
use crate::loader::TrackLoader;
use crate::models::{GeoPoint, Track};

#[derive(Debug, Deserialize)]
struct TrainingCenterDatabase {
    #[serde(rename = "Activities")]
    activities: Option<Activities>,
}

#[derive(Debug, Deserialize)]
struct Activities {
    #[serde(rename = "Activity", default)]
    activity: Vec<Activity>,
}

#[derive(Debug, Deserialize)]
struct Activity {
    #[serde(rename = "Id")]
    id: Option<String>,
    #[serde(rename = "Lap", default)]
    laps: Vec<Lap>,
}

#[derive(Debug, Deserialize)]
struct Lap {
    #[serde(rename = "@StartTime")]
    start_time: Option<String>,
    #[serde(rename = "TotalTimeSeconds")]
    total_time_seconds: Option<f64>,
    #[serde(rename = "DistanceMeters")]
    distance_meters: Option<f64>,
    #[serde(rename = "Track", default)]
    tracks: Vec<TcxTrack>,
}

#[derive(Debug, Deserialize)]
struct TcxTrack {
    #[serde(rename = "Trackpoint", default)]
    points: Vec<Trackpoint>,
}

#[derive(Debug, Deserialize)]
struct Trackpoint {
    #[serde(rename = "Time")]
    time: Option<String>,
    #[serde(rename = "Position")]
    position: Option<Position>,
    #[serde(rename = "DistanceMeters")]
    distance_meters: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Position {
    #[serde(rename = "LatitudeDegrees")]
    lat: f64,
    #[serde(rename = "LongitudeDegrees")]
    lon: f64,
}

/// RFC 3339 med offset som i filen; tidspunkt uten offset leses som UTC.
pub fn parse_time(s: &str) -> Option<DateTime<FixedOffset>> {
    let s = s.trim();
    DateTime::parse_from_rfc3339(s).ok().or_else(|| {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|n| n.and_utc().fixed_offset())
    })
}

/// Tolker TCX-innhold. `path` brukes kun i feilmeldinger.
pub fn parse_tcx(xml: &str, path: &Path) -> Result<Track> {
    let xml = xml.trim_start_matches('\u{feff}');
    let db: TrainingCenterDatabase =
        quick_xml::de::from_str(xml).map_err(|e| WalkError::parse(path, e))?;

    let activity = db
        .activities
        .and_then(|a| a.activity.into_iter().next())
        .ok_or_else(|| WalkError::parse(path, "ingen <Activity> i filen"))?;

    let mut timed: Vec<DateTime<FixedOffset>> = Vec::new();
    let mut points: Vec<(Option<DateTime<FixedOffset>>, GeoPoint)> = Vec::new();
    let mut max_tp_distance: Option<f64> = None;

    for tp in activity
        .laps
        .iter()
        .flat_map(|l| l.tracks.iter())
        .flat_map(|t| t.points.iter())
    {
        let time = tp.time.as_deref().and_then(parse_time);
        if let Some(t) = time {
            timed.push(t);
        }
        if let Some(d) = tp.distance_meters {
            max_tp_distance = Some(max_tp_distance.map_or(d, |m: f64| m.max(d)));
        }
        if let Some(pos) = &tp.position {
            points.push((time, GeoPoint::new(pos.lat, pos.lon)));
        }
    }

    // Tidsordne punktene når alle har tid (stabil sortering)
    if points.iter().all(|(t, _)| t.is_some()) {
        points.sort_by_key(|(t, _)| *t);
    }

    let first = timed.iter().min().copied();
    let last = timed.iter().max().copied();

    let start_time = first
        .or_else(|| {
            activity
                .laps
                .iter()
                .find_map(|l| l.start_time.as_deref().and_then(parse_time))
        })
        .or_else(|| activity.id.as_deref().and_then(parse_time))
        .ok_or_else(|| WalkError::parse(path, "mangler starttid"))?;

    let duration_s = match (first, last) {
        (Some(a), Some(b)) if b > a => (b - a).num_milliseconds() as f64 / 1000.0,
        _ => activity
            .laps
            .iter()
            .filter_map(|l| l.total_time_seconds)
            .sum(),
    };

    let lap_distances: Vec<f64> = activity
        .laps
        .iter()
        .filter_map(|l| l.distance_meters)
        .collect();
    let distance_m = if lap_distances.is_empty() {
        max_tp_distance.unwrap_or(0.0)
    } else {
        lap_distances.iter().sum()
    };

    debug!(
        "{}: {} punkter, {:.0} m, {:.0} s",
        path.display(),
        points.len(),
        distance_m,
        duration_s
    );

    Ok(Track {
        points: points.into_iter().map(|(_, p)| p).collect(),
        start_time,
        distance_m: distance_m.max(0.0),
        duration_s: duration_s.max(0.0),
    })
}

/// Leser `.tcx`-filer fra disk.
#[derive(Debug, Default, Clone, Copy)]
pub struct TcxLoader;

impl TrackLoader for TcxLoader {
    fn load(&self, path: &Path) -> Result<Track> {
        let xml = std::fs::read_to_string(path).map_err(|e| WalkError::io(path, e))?;
        parse_tcx(&xml, path)
    }
}
