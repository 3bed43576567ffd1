// core/src/render/leaflet.rs
use super::{script_json, MapData, MapRenderer};
use crate::error::Result;

pub const LEAFLET_VERSION: &str = "1.9.4";
pub const LEAFLET_HEAT_VERSION: &str = "0.2.0";

// Hover/klikk: magenta + bringToFront; tilbake til svart når musen går ut
// (med mindre popupen er åpen) eller popupen lukkes.
const MAP_SCRIPT: &str = r#"
(function () {
    var map = L.map('{{ID}}').setView({{CENTER}}, {{ZOOM}});
    var base = L.tileLayer('https://tile.openstreetmap.org/{z}/{x}/{y}.png', {
        maxZoom: 19,
        attribution: '&copy; OpenStreetMap contributors'
    }).addTo(map);

    var heat = L.heatLayer({{HEAT}}, {minOpacity: 0.5, radius: 15}).addTo(map);

    var normal = {color: 'black', opacity: 1, weight: 2};
    var highlight = {color: 'magenta', opacity: 1, weight: 2};
    var tracks = L.featureGroup().addTo(map);

    {{TRACKS}}.forEach(function (t) {
        var line = L.polyline(t.points, normal)
            .bindTooltip(t.summary)
            .bindPopup(t.summary, {maxWidth: {{POPUP_MAX_WIDTH}}});

        function raise(e) {
            e.target.setStyle(highlight);
            e.target.bringToFront();
        }
        line.on('mouseover', raise);
        line.on('popupopen', raise);
        line.on('mouseout', function (e) {
            if (!e.target.isPopupOpen()) {
                e.target.setStyle(normal);
            }
        });
        line.on('popupclose', function (e) {
            e.target.setStyle(normal);
        });
        line.addTo(tracks);
    });

    L.control.layers({'OpenStreetMap': base}, {'Heat Map': heat, 'Tracks': tracks}).addTo(map);

    var bounds = tracks.getBounds();
    if (bounds.isValid()) {
        map.fitBounds(bounds, {padding: [30, 30]});
    }
})();
"#;

/// Leaflet + Leaflet.heat. Kartet får fast størrelse i px.
#[derive(Debug, Clone)]
pub struct LeafletMap {
    pub element_id: String,
    pub width: u32,
    pub height: u32,
    pub popup_max_width: u32,
    pub center: [f64; 2],
    pub zoom: u8,
}

impl MapRenderer for LeafletMap {
    fn head(&self) -> String {
        format!(
            r#"<link rel="stylesheet" href="https://unpkg.com/leaflet@{v}/dist/leaflet.css" crossorigin="">
        <script src="https://unpkg.com/leaflet@{v}/dist/leaflet.js" crossorigin=""></script>
        <script src="https://unpkg.com/leaflet.heat@{h}/dist/leaflet-heat.js"></script>"#,
            v = LEAFLET_VERSION,
            h = LEAFLET_HEAT_VERSION,
        )
    }

    fn render(&self, map: &MapData) -> Result<String> {
        let script = MAP_SCRIPT
            .replace("{{ID}}", &self.element_id)
            .replace("{{CENTER}}", &script_json(&self.center)?)
            .replace("{{ZOOM}}", &self.zoom.to_string())
            .replace("{{POPUP_MAX_WIDTH}}", &self.popup_max_width.to_string())
            .replace("{{HEAT}}", &script_json(&map.heat)?)
            .replace("{{TRACKS}}", &script_json(&map.tracks)?);

        Ok(format!(
            "<div id=\"{id}\" style=\"width: {w}px; height: {h}px;\"></div>\n<script>{script}</script>",
            id = self.element_id,
            w = self.width,
            h = self.height,
        ))
    }
}
