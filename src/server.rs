// Formulario web del asesor.
//
// - GET  /      formulario vacío
// - POST /      registra el envío y muestra la recomendación en la página
// - GET  /help  descripción de los campos (JSON)
//
// Cada envío se guarda en el registro JSON `{nombre: {completed_courses,
// submitted_at}}`, reescrito entero; un envío posterior con el mismo nombre
// reemplaza al anterior.
use actix_web::{web, App, HttpResponse, HttpServer, Responder};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use std::fs::{self, create_dir_all};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

use crate::advisor::{check_recommendations, FilterReport, RecommendationClient};
use crate::catalog::CatalogStore;
use crate::error::SubmissionError;
use crate::models::{parse_course_list, StudentProfile};

/// Estado compartido por los workers.
#[derive(Clone)]
pub struct AppState {
    pub client: RecommendationClient,
    pub submissions_path: PathBuf,
    pub catalog: Option<CatalogStore>,
}

#[derive(Debug, Deserialize)]
pub struct SubmitForm {
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub user_classes: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub completed_courses: Vec<String>,
    pub submitted_at: DateTime<Utc>,
}

pub type SubmissionLog = BTreeMap<String, Submission>;

/// Lee el registro. Un archivo ausente o vacío es un registro vacío; uno
/// ilegible es un error (no se descarta en silencio).
pub fn load_submissions(path: &Path) -> Result<SubmissionLog, SubmissionError> {
    let text = match fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(SubmissionLog::new()),
        Err(source) => return Err(SubmissionError::Io { path: path.to_path_buf(), source }),
    };
    if text.trim().is_empty() {
        return Ok(SubmissionLog::new());
    }
    serde_json::from_str(&text).map_err(|source| SubmissionError::Corrupt { path: path.to_path_buf(), source })
}

/// Agrega (o reemplaza) el envío de `name` y reescribe el archivo completo.
pub fn record_submission(
    path: &Path,
    name: &str,
    completed_courses: Vec<String>,
    submitted_at: DateTime<Utc>,
) -> Result<SubmissionLog, SubmissionError> {
    let mut log = load_submissions(path)?;
    log.insert(name.to_string(), Submission { completed_courses, submitted_at });

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_dir_all(parent).map_err(|source| SubmissionError::Io { path: parent.to_path_buf(), source })?;
    }
    let text = serde_json::to_string_pretty(&log)
        .map_err(|source| SubmissionError::Corrupt { path: path.to_path_buf(), source })?;
    fs::write(path, text).map_err(|source| SubmissionError::Io { path: path.to_path_buf(), source })?;
    Ok(log)
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

/// Lo que muestra la página además del formulario.
#[derive(Debug, Default)]
pub struct PageView {
    pub submitted_name: Option<String>,
    pub submitted_courses: Option<String>,
    pub recommendation: Option<Vec<String>>,
    pub report: Option<FilterReport>,
    pub error: Option<String>,
}

pub fn render_page(view: &PageView) -> String {
    let mut body = String::new();
    body.push_str("<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>AI Advisor</title></head>\n<body>\n");
    body.push_str("<h1>AI Advisor - Student Schedule Planner</h1>\n");
    body.push_str("<form method=\"post\" action=\"/\">\n");
    body.push_str(&format!(
        "  <label>Name <input name=\"user_name\" value=\"{}\"></label>\n",
        escape_html(view.submitted_name.as_deref().unwrap_or(""))
    ));
    body.push_str(&format!(
        "  <label>Completed courses <input name=\"user_classes\" value=\"{}\" placeholder=\"CPSC 1010, ENGL 1030\"></label>\n",
        escape_html(view.submitted_courses.as_deref().unwrap_or(""))
    ));
    body.push_str("  <button type=\"submit\">Submit</button>\n</form>\n");

    if let Some(err) = &view.error {
        body.push_str(&format!("<p class=\"error\">{}</p>\n", escape_html(err)));
    }
    if let Some(name) = &view.submitted_name {
        if view.error.is_none() {
            body.push_str(&format!("<h2>Schedule Recommendations for {}</h2>\n", escape_html(name)));
            match &view.recommendation {
                Some(lines) if !lines.is_empty() => {
                    body.push_str("<ol>\n");
                    for line in lines {
                        body.push_str(&format!("  <li>{}</li>\n", escape_html(line)));
                    }
                    body.push_str("</ol>\n");
                }
                _ => body.push_str("<p>Unable to generate recommendations at this time.</p>\n"),
            }
        }
    }
    if let Some(report) = view.report.as_ref().filter(|r| !r.is_clean()) {
        body.push_str("<h3>Catalog checks</h3>\n<ul>\n");
        for check in &report.flagged {
            for issue in &check.issues {
                body.push_str(&format!("  <li>{}: {}</li>\n", escape_html(&check.line), escape_html(&issue.to_string())));
            }
        }
        body.push_str("</ul>\n");
    }
    body.push_str("</body>\n</html>\n");
    body
}

fn html(status: actix_web::http::StatusCode, view: &PageView) -> HttpResponse {
    HttpResponse::build(status).content_type("text/html; charset=utf-8").body(render_page(view))
}

async fn form_handler() -> impl Responder {
    html(actix_web::http::StatusCode::OK, &PageView::default())
}

/// POST / : nombre obligatorio, cursos separados por comas.
async fn submit_handler(state: web::Data<AppState>, form: web::Form<SubmitForm>) -> impl Responder {
    use actix_web::http::StatusCode;

    let form = form.into_inner();
    let mut view = PageView {
        submitted_name: Some(form.user_name.trim().to_string()).filter(|n| !n.is_empty()),
        submitted_courses: Some(form.user_classes.clone()),
        ..PageView::default()
    };

    let courses = parse_course_list(&form.user_classes);
    let profile = match StudentProfile::new(&form.user_name, courses.clone(), Vec::new(), None) {
        Ok(p) => p,
        Err(e) => {
            view.error = Some(format!("Invalid input: {}", e));
            return html(StatusCode::BAD_REQUEST, &view);
        }
    };

    if let Err(e) = record_submission(&state.submissions_path, &profile.name, courses, Utc::now()) {
        error!("failed to record submission for {}: {}", profile.name, e);
        view.error = Some(format!("Could not save your submission: {}", e));
        return html(StatusCode::INTERNAL_SERVER_ERROR, &view);
    }
    info!("recorded submission for {}", profile.name);

    // la llamada remota es bloqueante
    let client = state.client.clone();
    let p = profile.clone();
    let recommendation = match web::block(move || client.call_api(&p)).await {
        Ok(r) => r,
        Err(e) => {
            warn!("recommendation worker failed: {}", e);
            None
        }
    };

    if let (Some(lines), Some(catalog)) = (recommendation.as_ref(), state.catalog.as_ref()) {
        view.report = Some(check_recommendations(lines, &profile, catalog));
    }
    view.recommendation = recommendation;
    html(StatusCode::OK, &view)
}

async fn help_handler() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "description": "Formulario del asesor. POST / con campos de formulario `user_name` y `user_classes` (cursos aprobados separados por comas) devuelve la página con la recomendación.",
        "fields": {
            "user_name": "nombre del estudiante (obligatorio)",
            "user_classes": "cursos aprobados, p.ej. CPSC 1010, ENGL 1030"
        },
        "example": "user_name=Ada&user_classes=CPSC+1010%2C+ENGL+1030"
    }))
}

/// Rutas de la aplicación; usado por `run_server` y por los tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(form_handler))
        .route("/", web::post().to(submit_handler))
        .route("/help", web::get().to(help_handler));
}

pub async fn run_server(bind_addr: &str, state: AppState) -> std::io::Result<()> {
    let data = web::Data::new(state);
    info!("serving advisor form on http://{}", bind_addr);
    HttpServer::new(move || App::new().app_data(data.clone()).configure(configure))
        .bind(bind_addr)?
        .run()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn escape_basico() {
        assert_eq!(escape_html("<b>\"A&B\"</b>"), "&lt;b&gt;&quot;A&amp;B&quot;&lt;/b&gt;");
    }

    #[test]
    fn envio_posterior_reemplaza_al_anterior() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("submitted.json");
        let t1 = Utc.with_ymd_and_hms(2024, 9, 1, 10, 0, 0).unwrap();
        let t2 = Utc.with_ymd_and_hms(2024, 9, 2, 10, 0, 0).unwrap();

        record_submission(&path, "Ada", vec!["CPSC 1010".into()], t1).unwrap();
        record_submission(&path, "Grace", vec![], t1).unwrap();
        record_submission(&path, "Ada", vec!["CPSC 1010".into(), "CPSC 1020".into()], t2).unwrap();

        let log = load_submissions(&path).unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log["Ada"].completed_courses, vec!["CPSC 1010", "CPSC 1020"]);
        assert_eq!(log["Ada"].submitted_at, t2);
    }

    #[test]
    fn registro_ilegible_es_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("submitted.json");
        fs::write(&path, "{ not json").unwrap();
        let err = record_submission(&path, "Ada", vec![], Utc::now()).unwrap_err();
        assert!(matches!(err, SubmissionError::Corrupt { .. }));
        // no se sobrescribe
        assert_eq!(fs::read_to_string(&path).unwrap(), "{ not json");
    }

    #[test]
    fn pagina_escapa_la_recomendacion() {
        let view = PageView {
            submitted_name: Some("Ada".into()),
            recommendation: Some(vec!["<script>x</script>".into()]),
            ..PageView::default()
        };
        let page = render_page(&view);
        assert!(page.contains("<li>&lt;script&gt;x&lt;/script&gt;</li>"));
        assert!(page.contains("Schedule Recommendations for Ada"));
    }
}
