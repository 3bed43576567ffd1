// core/src/render/page.rs
use std::fmt::Write as _;

use crate::units::fmt_rounded;

/// Ferdig rendrede biter som settes sammen til én side.
#[derive(Debug, Clone, Default)]
pub struct PageParts {
    pub year: i32,
    /// Total distanse for året (km), vises i Notes
    pub total_km: f64,
    pub track_count: usize,
    /// Eget HTML-innhold til Notes-seksjonen
    pub notes_html: Option<String>,
    /// Alt som skal i `<head>` fra kart- og grafrenderer
    pub head: String,
    pub map_html: String,
    pub charts_html: Vec<String>,
    /// max(plot-bredde, kart-bredde) i px
    pub content_width: u32,
}

const NERDS: &str = r#"<h1 id="nerds">Info for Nerds</h1>
                <p>This section has a bit of info about how this page was made</p>
                <ul>
                    <li>Tracks are exported as Garmin TCX files from the tracking account and archived per year.</li>
                    <li>TCX files are parsed in Rust with quick-xml; only positions, times and distances are used.</li>
                    <li>The map uses <a href="https://leafletjs.com/" target="_blank">LeafletJS</a> with the
                        <a href="https://github.com/Leaflet/Leaflet.heat" target="_blank">Leaflet.heat</a> plugin.
                        Hovering a track highlights it and brings it to the front.</li>
                    <li>Plots are drawn with <a href="https://www.chartjs.org/" target="_blank">Chart.js</a>.</li>
                </ul>"#;

const USAGE: &str = r#"<p>Notes on functionality:</p>
                <ul>
                    <li>Hovering over a track on the map will give more information.</li>
                    <li>Hovering over a track will also bring it to the front of the map and highlight it.</li>
                    <li>Clicking a track will keep the popup visible.</li>
                    <li>The heat map or tracks can be hidden in the layer control at the top right of the map.</li>
                    <li>In the plot section, hovering over bars and lines will give more information.</li>
                </ul>"#;

pub fn render_page(parts: &PageParts) -> String {
    let mut html = String::with_capacity(
        parts.map_html.len() + parts.charts_html.iter().map(String::len).sum::<usize>() + 8192,
    );

    // write! til String feiler ikke
    let _ = write!(
        html,
        r##"<!DOCTYPE html>
<html>
    <head>
        <meta charset="utf-8">
        <title>Walks {year}</title>
        <link rel="stylesheet" href="w3.css">
        <link rel="stylesheet" href="sidebar.css">
        {head}
    </head>

    <style>
        .content {{
            max-width: {width}px;
            margin: auto;
        }}
    </style>

    <body>
        <!-- Side navigation -->
        <div class="sidenav">
          <a href="#notes">Notes</a>
          <a href="#map">Map</a>
          <a href="#plots">Plots</a>
          <a href="#nerds">For Nerds</a>
        </div>

        <div class="main content">
            <h1 id="notes">Notes</h1>
                <p>In {year} I logged <b>{total}km</b> of walking/hiking across {count} tracks.</p>
"##,
        year = parts.year,
        head = parts.head,
        width = parts.content_width,
        total = fmt_rounded(parts.total_km, 1),
        count = parts.track_count,
    );

    if let Some(notes) = &parts.notes_html {
        let _ = writeln!(html, "                {notes}");
    }
    let _ = writeln!(html, "                {USAGE}");

    let _ = writeln!(html, "            <h1 id=\"map\">Map of Walks</h1>");
    let _ = writeln!(html, "\t\t{}", parts.map_html);

    let _ = writeln!(html, "            <h1 id=\"plots\">Data Plots</h1>");
    for chart in &parts.charts_html {
        let _ = writeln!(html, "\t\t{chart}");
    }

    let _ = writeln!(html, "            {NERDS}");
    html.push_str("        </div>\n    </body>\n</html>\n");
    html
}
