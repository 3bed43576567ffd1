use std::fmt;

use chrono::NaiveDate;

use crate::error::{Result, WalkError};
use crate::models::Track;
use crate::units::{fmt_rounded, m_to_km, RoundTo, SECS_PER_HOUR};

/// Oppsummering av ett spor, vist som tooltip/popup i kartet.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackSummary {
    pub label: String,
    pub date: NaiveDate,
    pub distance_km: f64,
    pub hours: u64,
    pub minutes: u64,
    /// Rest-sekunder, rundet til 1 desimal
    pub seconds: f64,
    /// None når varigheten er 0 (ingen snittfart)
    pub avg_speed_kmh: Option<f64>,
}

impl TrackSummary {
    /// Bygger oppsummeringen uten å feile; snittfart blir None ved varighet 0.
    pub fn from_track(track: &Track, label: &str) -> Self {
        let dur = track.duration_s.max(0.0);
        let hours = (dur / SECS_PER_HOUR).floor();
        let minutes = ((dur - hours * SECS_PER_HOUR) / 60.0).floor();
        let seconds = (dur - hours * SECS_PER_HOUR - minutes * 60.0).round_to(1);

        let distance_km = m_to_km(track.distance_m);
        let avg_speed_kmh = if dur > 0.0 {
            Some(distance_km / (dur / SECS_PER_HOUR))
        } else {
            None
        };

        Self {
            label: label.to_string(),
            date: track.start_time.date_naive(),
            distance_km,
            hours: hours as u64,
            minutes: minutes as u64,
            seconds,
            avg_speed_kmh,
        }
    }
}

/// HTML-tekst med `<br>` mellom linjene (Leaflet-popupen tolker HTML).
impl fmt::Display for TrackSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Description: {}<br>", escape_html(&self.label))?;
        write!(f, "Date: {}<br>", self.date.format("%d-%b-%Y"))?;
        write!(f, "Distance: {}km<br>", fmt_rounded(self.distance_km, 2))?;
        write!(
            f,
            "Duration: {}h:{}m:{}s<br>",
            self.hours,
            self.minutes,
            fmt_rounded(self.seconds, 1)
        )?;
        match self.avg_speed_kmh {
            Some(v) => write!(f, "Average Speed: {}kmph", fmt_rounded(v, 2)),
            None => write!(f, "Average Speed: n/a"),
        }
    }
}

/// Oppsummering som tekst. Feiler med `ZeroDuration` i stedet for å dele på 0.
pub fn summarize(track: &Track, label: &str) -> Result<String> {
    if track.duration_s <= 0.0 {
        return Err(WalkError::ZeroDuration {
            label: label.to_string(),
        });
    }
    Ok(TrackSummary::from_track(track, label).to_string())
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
