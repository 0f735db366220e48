// Estructuras de datos principales del catálogo
mod code;
mod schedule;
mod student;

pub use code::CourseCode;
pub use schedule::{DayPattern, ScheduledCourse, Section, TimeSlot};
pub use student::{parse_course_list, StudentProfile};

use serde::{Deserialize, Serialize};

/// Curso del catálogo. `course` es la identidad legible "CODE - Title".
/// Los datos de referencia nunca se mutan en tiempo de ejecución.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub course: String,
    pub credits: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semester: Option<String>,
    /// Códigos de prerequisitos, en el orden del catálogo.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prereq: Vec<String>,
}

impl Course {
    pub fn new(course: impl Into<String>, credits: u32) -> Course {
        Course { course: course.into(), credits, semester: None, prereq: Vec::new() }
    }

    pub fn with_semester(mut self, semester: impl Into<String>) -> Course {
        self.semester = Some(semester.into());
        self
    }

    pub fn with_prereq(mut self, prereq: &[&str]) -> Course {
        self.prereq = prereq.iter().map(|p| p.to_string()).collect();
        self
    }

    pub fn code(&self) -> Option<CourseCode> {
        CourseCode::from_course_name(&self.course)
    }

    /// Título sin el código; si no hay " - " devuelve el nombre completo.
    pub fn title(&self) -> &str {
        self.course.split_once(" - ").map(|(_, t)| t).unwrap_or(&self.course)
    }

    /// Prerequisitos parseados; los que no parecen código se ignoran
    /// (el validador ya los reporta al cargar).
    pub fn prereq_codes(&self) -> Vec<CourseCode> {
        self.prereq.iter().filter_map(|p| CourseCode::parse(p)).collect()
    }
}

/// Una secuencia con nombre (p.ej. "CPSC 1010/1020", o un par teoría/lab).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathOption {
    pub path_name: String,
    pub courses: Vec<Course>,
}

impl PathOption {
    pub fn credits(&self) -> u32 {
        self.courses.iter().map(|c| c.credits).sum()
    }
}

/// Requisito satisfecho por exactamente UNA de sus secuencias.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathGroup {
    /// Nombre del requisito ("Computer Science Path Requirement")
    pub course: String,
    pub credits: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semester: Option<String>,
    pub paths: Vec<PathOption>,
}

impl PathGroup {
    pub fn path(&self, name: &str) -> Option<&PathOption> {
        self.paths.iter().find(|p| p.path_name == name)
    }

    pub fn path_names(&self) -> Vec<&str> {
        self.paths.iter().map(|p| p.path_name.as_str()).collect()
    }
}

/// Variantes de forma que aparecen dentro de una lista de requisitos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RequirementEntry {
    /// Alternativas con nombre (`{course, credits, paths: [...]}`)
    Group(PathGroup),
    /// Secuencia suelta (`{path_name, courses: [...]}`), p.ej. teoría + laboratorio
    Sequence(PathOption),
    /// Curso real con código
    Course(Course),
    /// Marcador de requisito sin código ("Writing Requirement"): aporta
    /// créditos pero no es un curso hoja.
    Slot(Course),
}

impl RequirementEntry {
    /// Créditos que este elemento aporta a su categoría. Para un grupo se
    /// usan los créditos declarados (se cuenta un solo camino).
    pub fn credits(&self) -> u32 {
        match self {
            RequirementEntry::Group(g) => g.credits,
            RequirementEntry::Sequence(s) => s.credits(),
            RequirementEntry::Course(c) | RequirementEntry::Slot(c) => c.credits,
        }
    }

    /// Cursos hoja de este elemento, en orden. Se emiten TODAS las alternativas.
    pub fn leaves(&self) -> Vec<&Course> {
        match self {
            RequirementEntry::Group(g) => g.paths.iter().flat_map(|p| p.courses.iter()).collect(),
            RequirementEntry::Sequence(s) => s.courses.iter().collect(),
            RequirementEntry::Course(c) => vec![c],
            RequirementEntry::Slot(_) => Vec::new(),
        }
    }
}

/// Lista con nombre dentro de una categoría ("sophomore_year", "mathematics").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    pub name: String,
    pub entries: Vec<RequirementEntry>,
}

impl Bucket {
    pub fn new(name: impl Into<String>, entries: Vec<RequirementEntry>) -> Bucket {
        Bucket { name: name.into(), entries }
    }
}

/// Forma de una categoría del catálogo. Cada forma del archivo JSON es una
/// variante explícita.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequirementCategory {
    /// `{bucket: [entries]}`: requisitos por área o por año
    Buckets(Vec<Bucket>),
    /// `{"class_options": {bucket: [entries]}}`: menú de cursos elegibles
    ClassOptions(Vec<Bucket>),
    /// `{course, credits, paths: [...]}`: requisito de camino a nivel de categoría
    PathRequirement(PathGroup),
}

impl RequirementCategory {
    pub fn buckets(&self) -> &[Bucket] {
        match self {
            RequirementCategory::Buckets(b) | RequirementCategory::ClassOptions(b) => b,
            RequirementCategory::PathRequirement(_) => &[],
        }
    }

    /// Cursos hoja en orden de inserción.
    pub fn leaves(&self) -> Vec<&Course> {
        match self {
            RequirementCategory::Buckets(b) | RequirementCategory::ClassOptions(b) => {
                b.iter().flat_map(|bucket| bucket.entries.iter()).flat_map(|e| e.leaves()).collect()
            }
            RequirementCategory::PathRequirement(g) => g.paths.iter().flat_map(|p| p.courses.iter()).collect(),
        }
    }

    /// Créditos objetivo de la categoría. Un menú de opciones no tiene
    /// objetivo propio (sus cursos cubren marcadores de otras categorías).
    pub fn credit_target(&self) -> Option<u32> {
        match self {
            RequirementCategory::Buckets(b) => {
                Some(b.iter().flat_map(|bucket| bucket.entries.iter()).map(|e| e.credits()).sum())
            }
            RequirementCategory::ClassOptions(_) => None,
            RequirementCategory::PathRequirement(g) => Some(g.credits),
        }
    }

    /// Grupos de caminos contenidos (a cualquier profundidad).
    pub fn path_groups(&self) -> Vec<&PathGroup> {
        match self {
            RequirementCategory::PathRequirement(g) => vec![g],
            RequirementCategory::Buckets(b) | RequirementCategory::ClassOptions(b) => b
                .iter()
                .flat_map(|bucket| bucket.entries.iter())
                .filter_map(|e| match e {
                    RequirementEntry::Group(g) => Some(g),
                    _ => None,
                })
                .collect(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            RequirementCategory::Buckets(_) => "requirements",
            RequirementCategory::ClassOptions(_) => "class options",
            RequirementCategory::PathRequirement(_) => "path requirement",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_path_group() -> PathGroup {
        PathGroup {
            course: "Introduction to Computing Requirement".into(),
            credits: 8,
            semester: None,
            paths: vec![
                PathOption {
                    path_name: "A".into(),
                    courses: vec![Course::new("CPSC 1010 - Intro I", 4), Course::new("CPSC 1020 - Intro II", 4)],
                },
                PathOption {
                    path_name: "B".into(),
                    courses: vec![Course::new("CPSC 1060 - Programming", 4), Course::new("CPSC 1070 - Methodology", 4)],
                },
            ],
        }
    }

    #[test]
    fn group_emite_todas_las_alternativas() {
        let entry = RequirementEntry::Group(two_path_group());
        assert_eq!(entry.leaves().len(), 4);
        assert_eq!(entry.credits(), 8);
    }

    #[test]
    fn slot_aporta_creditos_pero_no_hojas() {
        let slot = RequirementEntry::Slot(Course::new("Writing Requirement", 3));
        assert!(slot.leaves().is_empty());
        assert_eq!(slot.credits(), 3);
    }

    #[test]
    fn credit_target_por_forma() {
        let buckets = RequirementCategory::Buckets(vec![Bucket::new(
            "first_year",
            vec![
                RequirementEntry::Course(Course::new("MATH 1060 - Calculus I", 4)),
                RequirementEntry::Group(two_path_group()),
                RequirementEntry::Slot(Course::new("Writing Requirement", 3)),
            ],
        )]);
        assert_eq!(buckets.credit_target(), Some(15));
        assert_eq!(buckets.leaves().len(), 5);
        assert_eq!(buckets.path_groups().len(), 1);

        let options = RequirementCategory::ClassOptions(vec![]);
        assert_eq!(options.credit_target(), None);
    }

    #[test]
    fn course_code_y_titulo() {
        let c = Course::new("CPSC 2120 - Algorithms and Data Structures", 4).with_prereq(&["CPSC 2070", "bogus"]);
        assert_eq!(c.code().unwrap().as_str(), "CPSC 2120");
        assert_eq!(c.title(), "Algorithms and Data Structures");
        assert_eq!(c.prereq_codes().len(), 1);
    }
}
