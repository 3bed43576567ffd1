use std::path::PathBuf;

use thiserror::Error;

/// Felles feiltype for hele kjernen.
///
/// Skiller mellom ødelagt sporfil, tomt datasett og numeriske kanttilfeller,
/// slik at jobbene kan rapportere hva som faktisk gikk galt.
#[derive(Debug, Error)]
pub enum WalkError {
    #[error("I/O-feil på {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Sporfilen kunne ikke tolkes (ugyldig XML, mangler aktivitet osv.)
    #[error("kunne ikke lese spor {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("manifest-feil: {0}")]
    Manifest(String),

    #[error("CSV-feil: {0}")]
    Csv(#[from] csv::Error),

    /// Konfig/JSON med sti til feltet som feilet (serde_path_to_error)
    #[error("JSON-feil i {} ved '{field}': {message}", .path.display())]
    Json {
        path: PathBuf,
        field: String,
        message: String,
    },

    #[error("serialisering feilet: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("HTTP-feil for {url}: {message}")]
    Http { url: String, message: String },

    #[error("ugyldig stride {0} (må være >= 1)")]
    InvalidStride(usize),

    #[error("spor '{label}' har varighet 0 s, kan ikke beregne snittfart")]
    ZeroDuration { label: String },

    #[error("ingen spor funnet i {}", .0.display())]
    EmptyDataset(PathBuf),

    #[error("ventet på {expected} filer i {}, fant {found} før tidsavbrudd", .dir.display())]
    DownloadTimeout {
        dir: PathBuf,
        expected: usize,
        found: usize,
    },

    #[error("metrics: {0}")]
    Metrics(String),
}

impl From<prometheus::Error> for WalkError {
    fn from(e: prometheus::Error) -> Self {
        WalkError::Metrics(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, WalkError>;

impl WalkError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        WalkError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn parse(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        WalkError::Parse {
            path: path.into(),
            message: message.to_string(),
        }
    }
}
