// core/src/aggregate.rs
//! Aggregering av spor: distanse per måned/uke, kumulativ sum og
//! nedsampling av punkter til kart. Ingen I/O her.

use serde::Serialize;

use crate::error::{Result, WalkError};
use crate::models::{GeoPoint, Track};

pub const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];
pub const WEEKS_PER_YEAR: usize = 52;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BucketKind {
    Month,
    Week,
}

impl BucketKind {
    pub fn len(self) -> usize {
        match self {
            BucketKind::Month => MONTHS.len(),
            BucketKind::Week => WEEKS_PER_YEAR,
        }
    }

    /// Aksetekster: "Jan".."Dec" eller "1".."52".
    pub fn labels(self) -> Vec<String> {
        match self {
            BucketKind::Month => MONTHS.iter().map(|m| m.to_string()).collect(),
            BucketKind::Week => (1..=WEEKS_PER_YEAR).map(|w| w.to_string()).collect(),
        }
    }

    /// Bøtte-indeks for et spor.
    ///
    /// Uke 53 (ISO) legges i bøtte 52 (indeks 51). Det gjelder også
    /// 1.–3. januar i år der de hører til forrige års uke 53.
    fn index_of(self, track: &Track) -> usize {
        match self {
            BucketKind::Month => track.month() as usize - 1,
            BucketKind::Week => (track.iso_week() as usize).min(WEEKS_PER_YEAR) - 1,
        }
    }
}

/// Distanse (km) per bøtte + kumulativ serie i samme rekkefølge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistanceSeries {
    pub kind: BucketKind,
    pub buckets: Vec<f64>,
    pub cumulative: Vec<f64>,
}

impl DistanceSeries {
    /// Nullstilt serie med fast lengde (12 eller 52).
    pub fn zeroed(kind: BucketKind) -> Self {
        Self {
            kind,
            buckets: vec![0.0; kind.len()],
            cumulative: vec![0.0; kind.len()],
        }
    }

    pub fn total(&self) -> f64 {
        self.cumulative.last().copied().unwrap_or(0.0)
    }

    fn accumulate(kind: BucketKind, tracks: &[Track]) -> Self {
        let mut series = Self::zeroed(kind);
        for t in tracks {
            series.buckets[kind.index_of(t)] += t.distance_km();
        }

        let mut running = 0.0;
        for (cum, b) in series.cumulative.iter_mut().zip(series.buckets.iter()) {
            running += b;
            *cum = running;
        }
        series
    }
}

/// Månedsbøtter (jan→des) etter starttidens kalendermåned.
/// Forutsetter at kalleren allerede har filtrert til ett år.
pub fn aggregate_by_month(tracks: &[Track]) -> DistanceSeries {
    DistanceSeries::accumulate(BucketKind::Month, tracks)
}

/// Ukebøtter etter ISO-ukenummer (1–52, uke 53 → 52).
pub fn aggregate_by_week(tracks: &[Track]) -> DistanceSeries {
    DistanceSeries::accumulate(BucketKind::Week, tracks)
}

fn check_stride(stride: usize) -> Result<()> {
    if stride == 0 {
        return Err(WalkError::InvalidStride(stride));
    }
    Ok(())
}

/// Hvert `stride`-te punkt fra hvert spor, slått sammen i sporrekkefølge.
pub fn downsample_for_heatmap(tracks: &[Track], stride: usize) -> Result<Vec<GeoPoint>> {
    check_stride(stride)?;
    Ok(tracks
        .iter()
        .flat_map(|t| t.points.iter().step_by(stride).copied())
        .collect())
}

/// Som over, men for ett spor (én polyline per spor i kartet).
pub fn downsample_for_display(track: &Track, stride: usize) -> Result<Vec<GeoPoint>> {
    check_stride(stride)?;
    Ok(track.points.iter().step_by(stride).copied().collect())
}
