use prometheus::{Encoder, IntCounter, Registry, TextEncoder};

use crate::error::Result;

/// Tellere for én kjøring (privat registry, logges ved slutten av jobben).
#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    downloads_requested: IntCounter,
    files_archived: IntCounter,
    tracks_loaded: IntCounter,
    tracks_skipped: IntCounter,
}

impl Metrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new_custom(Some("walkmap".into()), None)?;
        let counter = |name: &str, help: &str| -> Result<IntCounter> {
            let c = IntCounter::new(name, help)?;
            registry.register(Box::new(c.clone()))?;
            Ok(c)
        };

        let downloads_requested = counter(
            "downloads_requested_total",
            "Eksport-URL-er sendt til fetcher",
        )?;
        let files_archived = counter("files_archived_total", "Filer flyttet til arkivet")?;
        let tracks_loaded = counter("tracks_loaded_total", "Sporfiler lest inn")?;
        let tracks_skipped = counter("tracks_skipped_total", "Ødelagte sporfiler hoppet over")?;

        Ok(Self {
            registry,
            downloads_requested,
            files_archived,
            tracks_loaded,
            tracks_skipped,
        })
    }

    /// Tekstformat (Prometheus exposition) for logging.
    pub fn render(&self) -> String {
        let mut buf = Vec::new();
        if TextEncoder::new()
            .encode(&self.registry.gather(), &mut buf)
            .is_err()
        {
            return String::new();
        }
        String::from_utf8(buf).unwrap_or_default()
    }
}

pub fn downloads_requested_total(m: &Metrics) -> &IntCounter {
    &m.downloads_requested
}

pub fn files_archived_total(m: &Metrics) -> &IntCounter {
    &m.files_archived
}

pub fn tracks_loaded_total(m: &Metrics) -> &IntCounter {
    &m.tracks_loaded
}

pub fn tracks_skipped_total(m: &Metrics) -> &IntCounter {
    &m.tracks_skipped
}
