//! Oráculo de recomendaciones: el modelo remoto detrás de una interfaz.
//!
//! `RecommendationOracle` separa el transporte del resto del asesor para que
//! los tests usen implementaciones falsas. `BedrockOracle` habla con los dos
//! servicios HTTP:
//! - `POST {agent}/retrieveAndGenerate`: consulta a la base de conocimiento
//! - `POST {runtime}/model/{modelId}/invoke`: modelo de formato
//!
//! Un solo intento por llamada, sin reintentos. Los fallos se clasifican en
//! autenticación, transitorio, vacío o respuesta mal formada.

use reqwest::blocking::{Client, Response};
use reqwest::{StatusCode, Url};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

use crate::config::AppConfig;
use crate::error::OracleError;

pub trait RecommendationOracle: Send + Sync {
    /// Texto libre generado a partir de la base de conocimiento.
    fn retrieve_and_generate(&self, prompt: &str) -> Result<String, OracleError>;

    /// Cuerpo JSON nativo devuelto por el modelo de formato.
    fn invoke_format_model(&self, prompt: &str) -> Result<Value, OracleError>;
}

pub struct BedrockOracle {
    client: Client,
    agent_endpoint: String,
    runtime_endpoint: String,
    knowledge_base_id: String,
    retrieve_model_arn: String,
    format_model_id: String,
    api_key: Option<String>,
    max_gen_len: u32,
    temperature: f64,
    top_p: f64,
}

impl BedrockOracle {
    pub fn new(config: &AppConfig) -> Result<BedrockOracle, OracleError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| OracleError::Config(format!("failed to build HTTP client: {}", e)))?;
        Ok(BedrockOracle {
            client,
            agent_endpoint: config.agent_endpoint.trim_end_matches('/').to_string(),
            runtime_endpoint: config.runtime_endpoint.trim_end_matches('/').to_string(),
            knowledge_base_id: config.knowledge_base_id.clone(),
            retrieve_model_arn: config.retrieve_model_arn.clone(),
            format_model_id: config.format_model_id.clone(),
            api_key: config.api_key.clone(),
            max_gen_len: config.max_gen_len,
            temperature: config.temperature,
            top_p: config.top_p,
        })
    }

    fn api_key(&self) -> Result<&str, OracleError> {
        self.api_key
            .as_deref()
            .ok_or_else(|| OracleError::Auth("no API key configured (set QUICKPLAN_API_KEY or AWS_BEARER_TOKEN_BEDROCK)".into()))
    }

    fn post_json(&self, url: Url, body: &Value) -> Result<Value, OracleError> {
        let response = self
            .client
            .post(url.clone())
            .bearer_auth(self.api_key()?)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(body)
            .send()
            .map_err(classify_send_error)?;
        debug!("POST {} -> {}", url, response.status());
        read_json(response)
    }

    fn invoke_url(&self) -> Result<Url, OracleError> {
        let mut url = Url::parse(&self.runtime_endpoint)
            .map_err(|e| OracleError::Config(format!("bad runtime endpoint `{}`: {}", self.runtime_endpoint, e)))?;
        // el id del modelo es un ARN con '/', va como un solo segmento codificado
        url.path_segments_mut()
            .map_err(|_| OracleError::Config(format!("runtime endpoint `{}` cannot take a path", self.runtime_endpoint)))?
            .pop_if_empty()
            .push("model")
            .push(&self.format_model_id)
            .push("invoke");
        Ok(url)
    }

    fn retrieve_url(&self) -> Result<Url, OracleError> {
        let raw = format!("{}/retrieveAndGenerate", self.agent_endpoint);
        Url::parse(&raw).map_err(|e| OracleError::Config(format!("bad agent endpoint `{}`: {}", self.agent_endpoint, e)))
    }
}

impl RecommendationOracle for BedrockOracle {
    fn retrieve_and_generate(&self, prompt: &str) -> Result<String, OracleError> {
        let body = json!({
            "input": {"text": prompt},
            "retrieveAndGenerateConfiguration": {
                "type": "KNOWLEDGE_BASE",
                "knowledgeBaseConfiguration": {
                    "knowledgeBaseId": self.knowledge_base_id,
                    "modelArn": self.retrieve_model_arn,
                },
            },
        });
        let value = self.post_json(self.retrieve_url()?, &body)?;
        match value.get("output").and_then(|o| o.get("text")).and_then(Value::as_str) {
            Some(text) if !text.trim().is_empty() => Ok(text.to_string()),
            _ => Err(OracleError::Empty),
        }
    }

    fn invoke_format_model(&self, prompt: &str) -> Result<Value, OracleError> {
        let body = json!({
            "prompt": prompt,
            "max_gen_len": self.max_gen_len,
            "temperature": self.temperature,
            "top_p": self.top_p,
        });
        self.post_json(self.invoke_url()?, &body)
    }
}

fn classify_send_error(e: reqwest::Error) -> OracleError {
    if e.is_timeout() {
        OracleError::Transient(format!("request timed out: {}", e))
    } else if e.is_connect() || e.is_request() {
        OracleError::Transient(format!("connection failed: {}", e))
    } else {
        OracleError::Malformed(format!("request failed: {}", e))
    }
}

/// Clasificación por código HTTP.
pub fn classify_status(status: StatusCode, body: &str) -> Option<OracleError> {
    let detail = format!("HTTP {}: {}", status, body.trim());
    if status.is_success() {
        None
    } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        Some(OracleError::Auth(detail))
    } else if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        Some(OracleError::Transient(detail))
    } else {
        Some(OracleError::Malformed(detail))
    }
}

fn read_json(response: Response) -> Result<Value, OracleError> {
    let status = response.status();
    let text = response.text().map_err(classify_send_error)?;
    if let Some(err) = classify_status(status, &text) {
        return Err(err);
    }
    if text.trim().is_empty() {
        return Err(OracleError::Empty);
    }
    serde_json::from_str(&text).map_err(|e| OracleError::Malformed(format!("response is not JSON: {}", e)))
}
