// core/src/fetch.rs
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use log::{debug, info};
use ureq::Agent;

use crate::archive::unique_path;
use crate::config::{FetchConfig, FetchMode};
use crate::error::{Result, WalkError};
use crate::manifest::workout_id;

/// Ekstern tjeneste som får en sporfil til å dukke opp i nedlastingsmappen.
///
/// Returnerer stien når den er kjent (http); `None` betyr at filen kommer
/// asynkront og må plukkes opp av pollingen i `archive`.
pub trait Fetcher {
    fn fetch(&self, url: &str, download_dir: &Path) -> Result<Option<PathBuf>>;
}

/// Direkte nedlasting – enkel blocking-versjon (ureq)
pub struct HttpFetcher {
    agent: Agent,
    cookie: Option<String>,
}

impl HttpFetcher {
    pub fn new(timeout: Duration, cookie: Option<String>) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self { agent, cookie }
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str, download_dir: &Path) -> Result<Option<PathBuf>> {
        let mut req = self.agent.get(url);
        if let Some(cookie) = &self.cookie {
            req = req.set("Cookie", cookie);
        }
        let resp = req.call().map_err(|e| WalkError::Http {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        let name = resp
            .header("Content-Disposition")
            .and_then(filename_from_disposition)
            .or_else(|| workout_id(url).map(|id| format!("{id}.tcx")))
            .unwrap_or_else(|| "workout.tcx".to_string());
        let name = if name.to_ascii_lowercase().ends_with(".tcx") {
            name
        } else {
            format!("{name}.tcx")
        };
        let target = unique_path(&download_dir.join(sanitize_filename(&name)));

        // Skriv til .part først så en halv fil aldri ser ut som en .tcx
        let partial = target.with_extension("tcx.part");
        let mut file = File::create(&partial).map_err(|e| WalkError::io(&partial, e))?;
        let bytes = std::io::copy(&mut resp.into_reader(), &mut file)
            .map_err(|e| WalkError::io(&partial, e))?;
        drop(file);
        std::fs::rename(&partial, &target).map_err(|e| WalkError::io(&target, e))?;

        debug!("⬇️ {url} → {} ({bytes} bytes)", target.display());
        Ok(Some(target))
    }
}

/// Åpner URL-en i systemets nettleser, som laster ned med innlogget sesjon.
#[derive(Debug, Default)]
pub struct BrowserFetcher;

impl Fetcher for BrowserFetcher {
    fn fetch(&self, url: &str, _download_dir: &Path) -> Result<Option<PathBuf>> {
        let mut cmd = if cfg!(target_os = "windows") {
            let mut c = Command::new("cmd");
            c.args(["/C", "start", ""]);
            c
        } else if cfg!(target_os = "macos") {
            Command::new("open")
        } else {
            Command::new("xdg-open")
        };
        cmd.arg(url).spawn().map_err(|e| WalkError::Http {
            url: url.to_string(),
            message: format!("kunne ikke åpne nettleser: {e}"),
        })?;
        info!("🌐 åpnet {url} i nettleser");
        Ok(None)
    }
}

pub fn fetcher_for(cfg: &FetchConfig) -> Box<dyn Fetcher> {
    match cfg.mode {
        FetchMode::Http => Box::new(HttpFetcher::new(
            Duration::from_secs(cfg.http_timeout_secs),
            cfg.cookie.clone(),
        )),
        FetchMode::Browser => Box::new(BrowserFetcher),
    }
}

/// `attachment; filename="walk 1.tcx"` → `walk 1.tcx`
pub fn filename_from_disposition(header: &str) -> Option<String> {
    header.split(';').map(str::trim).find_map(|part| {
        let value = part.strip_prefix("filename=")?;
        let value = value.trim_matches('"').trim();
        (!value.is_empty()).then(|| value.to_string())
    })
}

fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            _ => c,
        })
        .collect()
}
