// core/src/manifest.rs
//! Leser manifestet (CSV-eksport av treningshistorikk) og bygger eksport-URL-er.

use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use log::{debug, info};

use crate::error::{Result, WalkError};
use crate::models::WorkoutRecord;

pub const DATE_COLUMN: &str = "Workout Date";
pub const LINK_COLUMN: &str = "Link";

// "Dec. 27, 2024", "June 3, 2024", "2024-12-27", "27/12/2024"
const DATE_FORMATS: [&str; 4] = ["%b %d, %Y", "%B %d, %Y", "%Y-%m-%d", "%d/%m/%Y"];

/// Tolker datoteksten tolerant; None hvis ingen kjente formater passer.
pub fn parse_workout_date(text: &str) -> Option<NaiveDate> {
    let cleaned = text.trim().replace('.', "").replace("Sept ", "Sep ");
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(&cleaned, fmt).ok())
}

/// Leser alle rader. Mangler en av kolonnene → `WalkError::Manifest`.
pub fn read_manifest<R: Read>(reader: R) -> Result<Vec<WorkoutRecord>> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = rdr.headers()?.clone();

    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| WalkError::Manifest(format!("mangler kolonne '{name}'")))
    };
    let date_idx = column(DATE_COLUMN)?;
    let link_idx = column(LINK_COLUMN)?;

    let mut records = Vec::new();
    for row in rdr.records() {
        let row = row?;
        let date_text = row.get(date_idx).unwrap_or_default().trim().to_string();
        let link = row.get(link_idx).unwrap_or_default().trim().to_string();
        if link.is_empty() {
            debug!("hopper over rad uten lenke ({date_text})");
            continue;
        }
        records.push(WorkoutRecord {
            date: parse_workout_date(&date_text),
            date_text,
            link,
        });
    }
    Ok(records)
}

pub fn load_manifest(path: &Path) -> Result<Vec<WorkoutRecord>> {
    let file = std::fs::File::open(path).map_err(|e| WalkError::io(path, e))?;
    let records = read_manifest(file)?;
    info!("📄 {} rader lest fra {}", records.len(), path.display());
    Ok(records)
}

pub fn filter_year(records: &[WorkoutRecord], year: i32) -> Vec<WorkoutRecord> {
    records.iter().filter(|r| r.in_year(year)).cloned().collect()
}

/// `.../workout/123` → `.../workout/export/123/tcx`
pub fn export_url(link: &str) -> String {
    let base = link.trim().trim_end_matches('/');
    format!("{}/tcx", base.replacen("/workout", "/workout/export", 1))
}

/// Siste ikke-tomme segment før `/tcx`, brukt som filnavn-fallback.
pub fn workout_id(url: &str) -> Option<&str> {
    url.trim_end_matches('/')
        .trim_end_matches("/tcx")
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty() && !s.contains(':'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_date_formats() {
        let d = NaiveDate::from_ymd_opt(2024, 12, 27).unwrap();
        assert_eq!(parse_workout_date("Dec. 27, 2024"), Some(d));
        assert_eq!(parse_workout_date("2024-12-27"), Some(d));
        assert_eq!(
            parse_workout_date("Sept. 5, 2024"),
            NaiveDate::from_ymd_opt(2024, 9, 5)
        );
        assert_eq!(parse_workout_date("sometime in 2024"), None);
    }
}
