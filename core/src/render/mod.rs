//! Grenser mot kart- og grafbibliotekene (JS via CDN).
//!
//! Kjernen leverer bare serier og geometri; utseendet bestemmes her.

use serde::Serialize;

use crate::aggregate::DistanceSeries;
use crate::error::Result;
use crate::models::GeoPoint;

pub mod chartjs;
pub mod leaflet;
pub mod page;

pub use chartjs::ChartJs;
pub use leaflet::LeafletMap;
pub use page::{render_page, PageParts};

/// Ett spor i kartet: nedsamplet polyline + popup-tekst (HTML).
#[derive(Debug, Clone, Serialize)]
pub struct MapTrack {
    pub points: Vec<GeoPoint>,
    pub summary: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MapData {
    pub heat: Vec<GeoPoint>,
    pub tracks: Vec<MapTrack>,
}

/// Én graf: søyler per bøtte + kumulativ linje.
#[derive(Debug, Clone)]
pub struct ChartSpec<'a> {
    /// DOM-id for canvas
    pub id: &'a str,
    pub title: &'a str,
    pub x_label: &'a str,
    /// Legend-tekst for søylene ("Monthly Distance" osv.)
    pub bar_label: &'a str,
    pub series: &'a DistanceSeries,
}

pub trait MapRenderer {
    /// Stilark/skript som må ligge i `<head>`
    fn head(&self) -> String;
    fn render(&self, map: &MapData) -> Result<String>;
}

pub trait ChartRenderer {
    fn head(&self) -> String;
    fn render(&self, chart: &ChartSpec<'_>) -> Result<String>;
}

/// JSON trygt for innbygging i `<script>` (ingen `</script>`-utbrudd).
pub fn script_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}
