// Verificación local de las recomendaciones del modelo.
//
// El modelo recibe las reglas como texto y puede no cumplirlas; aquí se
// contrasta cada línea devuelta con el catálogo y con lo que el estudiante ya
// aprobó o cursa. No se reescribe nada: las líneas con problemas se separan
// y se informa por qué.
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, warn};

use crate::catalog::CatalogStore;
use crate::config::MIN_CREDITS;
use crate::models::{CourseCode, StudentProfile};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Issue {
    /// Ya aprobado o inscrito.
    AlreadyTaken { code: CourseCode },
    MissingPrereqs { course: CourseCode, missing: Vec<CourseCode> },
    /// No existe en el catálogo; `suggestion` es el código más parecido.
    UnknownCourse { code: CourseCode, suggestion: Option<CourseCode> },
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Issue::AlreadyTaken { code } => write!(f, "{} was already completed or is in progress", code),
            Issue::MissingPrereqs { course, missing } => {
                let list: Vec<&str> = missing.iter().map(CourseCode::as_str).collect();
                write!(f, "{} requires {}", course, list.join(", "))
            }
            Issue::UnknownCourse { code, suggestion: Some(s) } => {
                write!(f, "{} is not in the catalog (did you mean {}?)", code, s)
            }
            Issue::UnknownCourse { code, suggestion: None } => write!(f, "{} is not in the catalog", code),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecommendationCheck {
    pub line: String,
    pub codes: Vec<CourseCode>,
    pub issues: Vec<Issue>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterReport {
    /// Líneas sin problemas, en el orden original.
    pub accepted: Vec<String>,
    pub flagged: Vec<RecommendationCheck>,
    /// Créditos de los cursos del catálogo en las líneas aceptadas (cada
    /// curso una vez).
    pub credits: u32,
}

impl FilterReport {
    pub fn is_clean(&self) -> bool {
        self.flagged.is_empty()
    }

    /// Lo aceptado no llega a una carga regular (`MIN_CREDITS`).
    pub fn below_regular_load(&self) -> bool {
        self.credits < MIN_CREDITS
    }
}

/// Códigos de lo aprobado + inscrito. Acepta "CPSC 1010" o
/// "CPSC 1010 - Title"; lo que no parece un código se ignora.
pub fn taken_codes(profile: &StudentProfile) -> HashSet<CourseCode> {
    profile.taken_or_enrolled().filter_map(|c| CourseCode::from_course_name(c)).collect()
}

/// Revisa cada línea recomendada. Las líneas sin código (encabezados, notas)
/// pasan tal cual.
pub fn check_recommendations(lines: &[String], profile: &StudentProfile, catalog: &CatalogStore) -> FilterReport {
    let taken = taken_codes(profile);
    let graph = catalog.prereq_graph();
    let mut report = FilterReport::default();
    let mut counted: HashSet<CourseCode> = HashSet::new();

    for line in lines {
        let codes = CourseCode::find_all(line);
        let mut issues: Vec<Issue> = Vec::new();
        for code in &codes {
            if taken.contains(code) {
                issues.push(Issue::AlreadyTaken { code: code.clone() });
            } else if !graph.contains(code) {
                issues.push(Issue::UnknownCourse { code: code.clone(), suggestion: catalog.suggest_code(code.as_str()) });
            } else {
                let missing = graph.missing_for(code, &taken);
                if !missing.is_empty() {
                    issues.push(Issue::MissingPrereqs { course: code.clone(), missing });
                }
            }
        }

        if issues.is_empty() {
            for code in &codes {
                if counted.insert(code.clone()) {
                    report.credits += catalog.find_course(code).map(|c| c.credits).unwrap_or(0);
                }
            }
            report.accepted.push(line.clone());
        } else {
            debug!("flagged `{}`: {} issue(s)", line, issues.len());
            report.flagged.push(RecommendationCheck { line: line.clone(), codes, issues });
        }
    }

    if !report.flagged.is_empty() {
        warn!("{} of {} recommended lines failed local checks", report.flagged.len(), lines.len());
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::builtin;

    fn student(completed: &[&str], current: &[&str]) -> StudentProfile {
        StudentProfile::new(
            "Ada",
            completed.iter().map(|s| s.to_string()).collect(),
            current.iter().map(|s| s.to_string()).collect(),
            None,
        )
        .unwrap()
    }

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn acepta_cursos_elegibles_y_suma_creditos() {
        let catalog = builtin::computer_science_bs().unwrap();
        let report = check_recommendations(
            &lines(&["Here is your schedule:", "CPSC 2070 - MWF 9:05 AM", "MATH 1080 - TTh 8:00 AM"]),
            &student(&["MATH 1060"], &[]),
            &catalog,
        );
        assert!(report.is_clean());
        assert_eq!(report.accepted.len(), 3);
        assert_eq!(report.credits, 3 + 4);
        assert!(report.below_regular_load());
    }

    #[test]
    fn inscrito_cuenta_como_prerequisito() {
        let catalog = builtin::computer_science_bs().unwrap();
        let report = check_recommendations(&lines(&["CPSC 2120"]), &student(&[], &["cpsc2070"]), &catalog);
        assert!(report.is_clean());
    }

    #[test]
    fn marca_prerequisitos_faltantes() {
        let catalog = builtin::computer_science_bs().unwrap();
        let report = check_recommendations(&lines(&["CPSC 2120 - MWF 10:10 AM"]), &student(&["MATH 1060"], &[]), &catalog);
        assert_eq!(report.flagged.len(), 1);
        let issue = &report.flagged[0].issues[0];
        assert_eq!(
            issue,
            &Issue::MissingPrereqs {
                course: CourseCode::parse("CPSC 2120").unwrap(),
                missing: vec![CourseCode::parse("CPSC 2070").unwrap()],
            }
        );
        assert_eq!(issue.to_string(), "CPSC 2120 requires CPSC 2070");
        assert_eq!(report.credits, 0);
    }

    #[test]
    fn marca_ya_aprobados_y_desconocidos() {
        let catalog = builtin::computer_science_bs().unwrap();
        let report = check_recommendations(
            &lines(&["ENGL 1030", "CPSC 2121 - TTh 9:30 AM"]),
            &student(&["ENGL 1030 - Composition and Rhetoric"], &[]),
            &catalog,
        );
        assert!(report.accepted.is_empty());
        assert!(matches!(report.flagged[0].issues[0], Issue::AlreadyTaken { .. }));
        match &report.flagged[1].issues[0] {
            Issue::UnknownCourse { code, suggestion } => {
                assert_eq!(code.as_str(), "CPSC 2121");
                assert_eq!(suggestion.as_ref().map(CourseCode::as_str), Some("CPSC 2120"));
            }
            other => panic!("unexpected issue {:?}", other),
        }
    }

    #[test]
    fn carga_regular_desde_doce_creditos() {
        let catalog = builtin::computer_science_bs().unwrap();
        // 4 + 4 + 3 + 4 = 15
        let report = check_recommendations(
            &lines(&["MATH 1060", "MATH 1080", "ENGL 1030", "CPSC 1010"]),
            &student(&[], &[]),
            &catalog,
        );
        assert!(report.is_clean());
        assert_eq!(report.credits, 15);
        assert!(!report.below_regular_load());
    }

    #[test]
    fn curso_repetido_suma_una_vez() {
        let catalog = builtin::computer_science_bs().unwrap();
        let report = check_recommendations(&lines(&["MATH 1060 - MWF", "MATH 1060 - TTh"]), &student(&[], &[]), &catalog);
        assert_eq!(report.accepted.len(), 2);
        assert_eq!(report.credits, 4);
    }
}
