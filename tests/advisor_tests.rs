use quickplan::advisor::{check_recommendations, RecommendationOracle};
use quickplan::catalog::builtin;
use quickplan::cli::{run_session, UNABLE_MESSAGE};
use quickplan::error::OracleError;
use quickplan::models::StudentProfile;
use quickplan::{AppConfig, RecommendationClient};
use serde_json::{json, Value};
use std::io::Cursor;
use std::sync::Arc;

/// Servicio remoto simulado: cada llamada responde con el resultado fijado.
struct FakeOracle {
    answer: Result<String, OracleError>,
    generation: Value,
}

impl RecommendationOracle for FakeOracle {
    fn retrieve_and_generate(&self, _prompt: &str) -> Result<String, OracleError> {
        self.answer.clone()
    }

    fn invoke_format_model(&self, _prompt: &str) -> Result<Value, OracleError> {
        Ok(self.generation.clone())
    }
}

fn session(answer: Result<String, OracleError>, generation: Value, input: &str) -> (i32, String) {
    let client = RecommendationClient::new(Arc::new(FakeOracle { answer, generation }));
    let catalog = builtin::computer_science_bs().unwrap();
    let mut out: Vec<u8> = Vec::new();
    let code = run_session(&mut Cursor::new(input.as_bytes()), &mut out, &client, Some(&catalog));
    (code, String::from_utf8(out).unwrap())
}

#[test]
fn test_fallo_remoto_sin_recomendacion_y_salida_uno() {
    for failure in [
        OracleError::Auth("AccessDeniedException".into()),
        OracleError::Transient("ThrottlingException".into()),
        OracleError::Empty,
    ] {
        let (code, out) = session(Err(failure), json!({"generation": "x"}), "Ada\nCPSC 1010\n\n\n");
        assert_eq!(code, 1);
        assert!(out.contains(UNABLE_MESSAGE));
        assert!(!out.contains("Recommended Schedule"));
    }
}

#[test]
fn test_formato_vacio_tambien_es_fallo() {
    let (code, out) = session(Ok("CPSC 1020".into()), json!({"generation": "   "}), "Ada\nCPSC 1010\n\n\n");
    assert_eq!(code, 1);
    assert!(out.contains(UNABLE_MESSAGE));
}

#[test]
fn test_sesion_con_verificacion_local() {
    let (code, out) = session(
        Ok("CPSC 1020 and CPSC 2120".into()),
        json!({"generation": "CPSC 1020 - MWF 9:05 AM - 9:55 AM\nCPSC 2120 - TTh 9:30 AM - 10:45 AM"}),
        "Ada\nCPSC 1010\n\nNo classes before 9am\n",
    );
    assert_eq!(code, 0);
    assert!(out.contains("1. CPSC 1020 - MWF 9:05 AM - 9:55 AM"));
    assert!(out.contains("2. CPSC 2120 - TTh 9:30 AM - 10:45 AM"));
    assert!(out.contains("CPSC 2120 requires CPSC 2070"));
    // sólo CPSC 1020 (4 créditos) queda aceptado
    assert!(out.contains("Credits in the accepted lines: 4"));
    assert!(out.contains("fewer than 12 credits is below a regular course load"));
}

#[test]
fn test_verificacion_usa_cursos_actuales() {
    let catalog = builtin::computer_science_bs().unwrap();
    let profile = StudentProfile::new("Ada", vec!["MATH 1060".into()], vec!["CPSC 2070".into()], None).unwrap();
    let report = check_recommendations(&["CPSC 2120 - Algorithms".to_string()], &profile, &catalog);
    assert!(report.is_clean());
    assert_eq!(report.credits, 4);
}

#[test]
fn test_configuracion_desde_funcion() {
    let cfg = AppConfig::from_lookup(|k: &str| match k {
        "QUICKPLAN_SUBMISSIONS_PATH" => Some("/tmp/log.json".to_string()),
        "QUICKPLAN_TEMPERATURE" => Some("0.5".to_string()),
        _ => None,
    })
    .unwrap();
    assert_eq!(cfg.submissions_path, std::path::PathBuf::from("/tmp/log.json"));
    assert_eq!(cfg.temperature, 0.5);
    assert_eq!(cfg.bind, "127.0.0.1:8080");
}
