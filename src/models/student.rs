use serde::{Deserialize, Serialize};

use crate::error::InputError;

/// Datos del estudiante para una sesión de recomendación.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentProfile {
    pub name: String,
    pub completed_courses: Vec<String>,
    #[serde(default)]
    pub current_courses: Vec<String>,
    #[serde(default)]
    pub time_constraints: Option<String>,
}

impl StudentProfile {
    /// Construye el perfil rechazando un nombre vacío. Una restricción
    /// horaria en blanco se trata como ausente.
    pub fn new(
        name: &str,
        completed_courses: Vec<String>,
        current_courses: Vec<String>,
        time_constraints: Option<String>,
    ) -> Result<StudentProfile, InputError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(InputError::Blank("name"));
        }
        let time_constraints = time_constraints
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        Ok(StudentProfile { name: name.to_string(), completed_courses, current_courses, time_constraints })
    }

    /// Cursos aprobados + inscritos: lo que cuenta para los prerequisitos.
    pub fn taken_or_enrolled(&self) -> impl Iterator<Item = &String> {
        self.completed_courses.iter().chain(self.current_courses.iter())
    }
}

/// `"CPSC 1010, ENGL 1030"` -> `["CPSC 1010", "ENGL 1030"]`; vacíos descartados.
pub fn parse_course_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_course_list_descarta_vacios() {
        assert_eq!(parse_course_list("CPSC 1010, ENGL 1030"), vec!["CPSC 1010", "ENGL 1030"]);
        assert_eq!(parse_course_list(" , CPSC 1010,,  "), vec!["CPSC 1010"]);
        assert!(parse_course_list("").is_empty());
        assert!(parse_course_list("   ").is_empty());
    }

    #[test]
    fn new_rechaza_nombre_vacio() {
        assert_eq!(StudentProfile::new("  ", vec![], vec![], None), Err(InputError::Blank("name")));
    }

    #[test]
    fn new_normaliza_restriccion_en_blanco() {
        let p = StudentProfile::new(" Ada ", vec!["CPSC 1010".into()], vec![], Some("   ".into())).unwrap();
        assert_eq!(p.name, "Ada");
        assert_eq!(p.time_constraints, None);
        assert_eq!(p.taken_or_enrolled().count(), 1);
    }
}
