// Taxonomía de errores del crate.
//
// - `CatalogError`: catálogo ausente o con forma inválida (fatal salvo `NotFound`)
// - `ScheduleError`: generación / lectura de horarios
// - `PlanError`: selección de un camino por PathGroup
// - `OracleError`: fallos del modelo remoto (nunca se reintentan)
// - `InputError`: entrada de usuario vacía
// - `ConfigError`, `SubmissionError`: entorno y registro del formulario web
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// El archivo no existe: recuperable (el llamador puede regenerarlo).
    #[error("catalog file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("duplicate key `{key}` in `{at}` (the earlier definition would be silently overwritten)")]
    DuplicateKey { key: String, at: String },

    #[error("invalid catalog structure at `{at}`: {reason}")]
    Structure { at: String, reason: String },

    #[error("unknown category `{0}`")]
    UnknownCategory(String),
}

impl CatalogError {
    pub(crate) fn structure(at: impl Into<String>, reason: impl Into<String>) -> Self {
        CatalogError::Structure { at: at.into(), reason: reason.into() }
    }

    /// True si el error significa "archivo ausente" (y no "archivo corrupto").
    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::NotFound { .. })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    #[error("schedule file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("sections_per_course must be at least 1")]
    InvalidSectionCount,

    #[error("course `{course}` asks for {requested} distinct sections but only {available} day/time combinations exist")]
    SlotsExhausted { course: String, requested: u32, available: usize },

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("no path chosen for requirement `{0}`")]
    MissingChoice(String),

    #[error("requirement `{group}` has no path named `{path}` (available: {available})")]
    UnknownPath { group: String, path: String, available: String },

    #[error("choice given for `{0}`, which is not a path requirement in this catalog")]
    UnknownGroup(String),
}

/// Fallos del oráculo remoto. El llamador sólo ve `None`, pero se registran
/// con su causa concreta.
#[derive(Debug, Clone, thiserror::Error)]
pub enum OracleError {
    #[error("authentication/permission failure: {0}")]
    Auth(String),

    #[error("transient service failure: {0}")]
    Transient(String),

    #[error("service produced no answer")]
    Empty,

    #[error("malformed service response: {0}")]
    Malformed(String),

    #[error("client configuration error: {0}")]
    Config(String),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InputError {
    #[error("{0} must not be blank")]
    Blank(&'static str),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value `{value}` for {key}: {reason}")]
    Invalid { key: String, value: String, reason: String },
}

/// Registro de envíos del formulario web.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("cannot access submission log {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("submission log {} is unreadable: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
