// Cliente de recomendaciones: arma los prompts, llama al oráculo y reduce
// cualquier fallo a `None` (registrando la causa).
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::oracle::RecommendationOracle;
use super::prompt::{build_format_prompt, build_schedule_prompt};
use crate::error::OracleError;
use crate::models::StudentProfile;

#[derive(Clone)]
pub struct RecommendationClient {
    oracle: Arc<dyn RecommendationOracle>,
}

impl RecommendationClient {
    pub fn new(oracle: Arc<dyn RecommendationOracle>) -> RecommendationClient {
        RecommendationClient { oracle }
    }

    /// Recomendación en texto libre. Errores con su clasificación.
    pub fn try_recommend(&self, profile: &StudentProfile) -> Result<String, OracleError> {
        let prompt = build_schedule_prompt(profile);
        debug!("recommendation prompt ({} chars)", prompt.len());
        let text = self.oracle.retrieve_and_generate(&prompt)?;
        if text.trim().is_empty() {
            return Err(OracleError::Empty);
        }
        Ok(text)
    }

    /// Pasa el texto al modelo de formato y devuelve una entrada por línea.
    pub fn try_reformat(&self, text: &str) -> Result<Vec<String>, OracleError> {
        if text.trim().is_empty() {
            return Err(OracleError::Empty);
        }
        let value = self.oracle.invoke_format_model(&build_format_prompt(text))?;
        parse_generation(&value)
    }

    pub fn recommend(&self, profile: &StudentProfile) -> Option<String> {
        match self.try_recommend(profile) {
            Ok(text) => Some(text),
            Err(e) => {
                log_failure("recommendation", &e);
                None
            }
        }
    }

    pub fn reformat(&self, text: &str) -> Option<Vec<String>> {
        match self.try_reformat(text) {
            Ok(lines) => Some(lines),
            Err(e) => {
                log_failure("reformat", &e);
                None
            }
        }
    }

    /// Flujo completo: recomendación + formato. `None` ante cualquier fallo.
    pub fn call_api(&self, profile: &StudentProfile) -> Option<Vec<String>> {
        info!(
            "requesting recommendations for {} ({} completed, {} current)",
            profile.name,
            profile.completed_courses.len(),
            profile.current_courses.len()
        );
        let text = self.recommend(profile)?;
        debug!("raw recommendation: {}", text);
        self.reformat(&text)
    }
}

fn log_failure(stage: &str, e: &OracleError) {
    match e {
        OracleError::Auth(_) | OracleError::Config(_) => error!("{} call failed: {}", stage, e),
        OracleError::Empty => warn!("{} call produced no answer", stage),
        _ => warn!("{} call failed: {}", stage, e),
    }
}

fn non_empty(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
        Value::Number(_) => true,
    }
}

/// Extrae las líneas generadas del cuerpo nativo del modelo. Se prueba
/// `generation`, luego `output` y luego `text`; una lista se toma elemento a
/// elemento. Líneas recortadas y sin vacías.
pub fn parse_generation(value: &Value) -> Result<Vec<String>, OracleError> {
    let generation = ["generation", "output", "text"]
        .iter()
        .filter_map(|k| value.get(*k))
        .find(|v| non_empty(v))
        .ok_or(OracleError::Empty)?;

    let lines: Vec<String> = match generation {
        Value::String(s) => s.lines().map(str::trim).filter(|l| !l.is_empty()).map(str::to_string).collect(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.trim().to_string(),
                other => other.to_string().trim().to_string(),
            })
            .filter(|l| !l.is_empty())
            .collect(),
        Value::Object(_) => return Err(OracleError::Malformed("generation is an object, expected text".into())),
        other => vec![other.to_string()],
    };
    if lines.is_empty() {
        return Err(OracleError::Empty);
    }
    Ok(lines)
}
