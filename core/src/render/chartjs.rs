// core/src/render/chartjs.rs
use serde_json::{json, Value};

use super::{script_json, ChartRenderer, ChartSpec};
use crate::error::Result;
use crate::units::RoundTo;

pub const CHARTJS_VERSION: &str = "4.4.1";

/// Chart.js: søyler (venstre akse) + svart kumulativ linje (høyre akse).
#[derive(Debug, Clone)]
pub struct ChartJs {
    pub width: u32,
    pub height: u32,
}

impl ChartJs {
    pub fn script_url() -> String {
        format!("https://cdn.jsdelivr.net/npm/chart.js@{CHARTJS_VERSION}/dist/chart.umd.min.js")
    }

    fn config(chart: &ChartSpec<'_>) -> Value {
        let round = |xs: &[f64]| xs.iter().map(|x| x.round_to(2)).collect::<Vec<_>>();
        json!({
            "type": "bar",
            "data": {
                "labels": chart.series.kind.labels(),
                "datasets": [
                    {
                        "type": "bar",
                        "label": chart.bar_label,
                        "data": round(chart.series.buckets.as_slice()),
                        "yAxisID": "y",
                        "backgroundColor": "#1f77b4",
                        "barPercentage": 0.8,
                        "order": 2
                    },
                    {
                        "type": "line",
                        "label": "Cumulative Distance",
                        "data": round(chart.series.cumulative.as_slice()),
                        "yAxisID": "yCum",
                        "borderColor": "black",
                        "backgroundColor": "black",
                        "borderWidth": 2,
                        "pointRadius": 3,
                        "order": 1
                    }
                ]
            },
            "options": {
                "responsive": false,
                "interaction": { "mode": "index", "intersect": false },
                "plugins": {
                    "title": { "display": true, "text": chart.title },
                    "legend": { "position": "right" }
                },
                "scales": {
                    "x": { "title": { "display": true, "text": chart.x_label } },
                    "y": {
                        "position": "left",
                        "beginAtZero": true,
                        "title": { "display": true, "text": "Distance (km)" }
                    },
                    "yCum": {
                        "position": "right",
                        "beginAtZero": true,
                        "grid": { "drawOnChartArea": false },
                        "title": { "display": true, "text": "Cumulative Distance (km)" }
                    }
                }
            }
        })
    }
}

impl ChartRenderer for ChartJs {
    fn head(&self) -> String {
        format!(
            "<script src=\"{}\"\n            crossorigin=\"anonymous\">\n        </script>",
            Self::script_url()
        )
    }

    fn render(&self, chart: &ChartSpec<'_>) -> Result<String> {
        let config = script_json(&Self::config(chart))?;
        Ok(format!(
            "<canvas id=\"{id}\" width=\"{w}\" height=\"{h}\"></canvas>\n\
             <script>new Chart(document.getElementById('{id}'), {config});</script>",
            id = chart.id,
            w = self.width,
            h = self.height,
        ))
    }
}
