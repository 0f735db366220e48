// Configuración de la aplicación: variables de entorno (y `.env` si existe).
//
// Todas las claves tienen valor por defecto, así que un entorno vacío produce
// una configuración utilizable (salvo el token del servicio remoto).
use std::env;
use std::path::PathBuf;

use crate::error::ConfigError;

/// Créditos mínimos de una carga regular.
pub const MIN_CREDITS: u32 = 12;
/// Rango de créditos que se pide al modelo para la recomendación.
pub const TARGET_MIN_CREDITS: u32 = 16;
pub const TARGET_MAX_CREDITS: u32 = 18;

pub const DEFAULT_REGION: &str = "us-west-2";
pub const DEFAULT_KNOWLEDGE_BASE_ID: &str = "IIPMMYP0DR";
pub const DEFAULT_RETRIEVE_MODEL_ARN: &str =
    "arn:aws:bedrock:us-west-2::foundation-model/anthropic.claude-3-sonnet-20240229-v1:0";
pub const DEFAULT_FORMAT_MODEL_ID: &str =
    "arn:aws:bedrock:us-west-2:363793501045:inference-profile/us.meta.llama3-2-1b-instruct-v1:0";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub region: String,
    pub knowledge_base_id: String,
    pub retrieve_model_arn: String,
    pub format_model_id: String,
    /// Base URL de bedrock-agent-runtime (retrieveAndGenerate)
    pub agent_endpoint: String,
    /// Base URL de bedrock-runtime (invoke)
    pub runtime_endpoint: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    pub max_gen_len: u32,
    pub temperature: f64,
    pub top_p: f64,
    pub catalog_path: PathBuf,
    pub schedule_path: PathBuf,
    pub submissions_path: PathBuf,
    pub bind: String,
}

fn parse_num<T: std::str::FromStr>(key: &str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(v) => v.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
            key: key.to_string(),
            value: v.clone(),
            reason: e.to_string(),
        }),
    }
}

impl AppConfig {
    /// Lee `.env` (si existe) y luego el entorno del proceso.
    pub fn from_env() -> Result<AppConfig, ConfigError> {
        let _ = dotenv::dotenv();
        AppConfig::from_lookup(|k| env::var(k).ok())
    }

    /// Construye la configuración a partir de cualquier función clave -> valor.
    /// Los valores vacíos se tratan como ausentes.
    pub fn from_lookup<F>(lookup: F) -> Result<AppConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |k: &str| lookup(k).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let region = get("QUICKPLAN_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string());
        let agent_endpoint = get("QUICKPLAN_AGENT_ENDPOINT")
            .unwrap_or_else(|| format!("https://bedrock-agent-runtime.{}.amazonaws.com", region));
        let runtime_endpoint = get("QUICKPLAN_RUNTIME_ENDPOINT")
            .unwrap_or_else(|| format!("https://bedrock-runtime.{}.amazonaws.com", region));

        let timeout_secs = parse_num("QUICKPLAN_TIMEOUT_SECS", get("QUICKPLAN_TIMEOUT_SECS"), 120u64)?;
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "QUICKPLAN_TIMEOUT_SECS".into(),
                value: "0".into(),
                reason: "timeout must be at least one second".into(),
            });
        }
        let temperature = parse_num("QUICKPLAN_TEMPERATURE", get("QUICKPLAN_TEMPERATURE"), 1.0f64)?;
        let top_p = parse_num("QUICKPLAN_TOP_P", get("QUICKPLAN_TOP_P"), 0.1f64)?;
        if !(0.0..=1.0).contains(&top_p) {
            return Err(ConfigError::Invalid {
                key: "QUICKPLAN_TOP_P".into(),
                value: top_p.to_string(),
                reason: "must be between 0 and 1".into(),
            });
        }

        Ok(AppConfig {
            knowledge_base_id: get("QUICKPLAN_KNOWLEDGE_BASE_ID").unwrap_or_else(|| DEFAULT_KNOWLEDGE_BASE_ID.to_string()),
            retrieve_model_arn: get("QUICKPLAN_RETRIEVE_MODEL_ARN").unwrap_or_else(|| DEFAULT_RETRIEVE_MODEL_ARN.to_string()),
            format_model_id: get("QUICKPLAN_FORMAT_MODEL_ID").unwrap_or_else(|| DEFAULT_FORMAT_MODEL_ID.to_string()),
            api_key: get("QUICKPLAN_API_KEY").or_else(|| get("AWS_BEARER_TOKEN_BEDROCK")),
            max_gen_len: parse_num("QUICKPLAN_MAX_GEN_LEN", get("QUICKPLAN_MAX_GEN_LEN"), 512u32)?,
            catalog_path: PathBuf::from(get("QUICKPLAN_CATALOG_PATH").unwrap_or_else(|| "data/course_structure.json".into())),
            schedule_path: PathBuf::from(get("QUICKPLAN_SCHEDULE_PATH").unwrap_or_else(|| "data/class_schedule.json".into())),
            submissions_path: PathBuf::from(get("QUICKPLAN_SUBMISSIONS_PATH").unwrap_or_else(|| "submitted_data.json".into())),
            bind: get("QUICKPLAN_BIND").unwrap_or_else(|| "127.0.0.1:8080".into()),
            region,
            agent_endpoint,
            runtime_endpoint,
            timeout_secs,
            temperature,
            top_p,
        })
    }
}
