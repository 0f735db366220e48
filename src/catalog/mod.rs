//! Módulo `catalog`: el catálogo de requisitos del programa.
//!
//! Submódulos:
//! - `validate`: claves duplicadas, clasificación de formas e invariantes
//! - `io`: lectura/escritura del archivo JSON versionado
//! - `builtin`: catálogo embebido del BS en Computer Science
//! - `plan`: selección de un camino por requisito (plan de un estudiante)
//! - `prereq`: grafo de prerequisitos

pub mod builtin;
pub mod io;
pub mod plan;
pub mod prereq;
pub mod validate;

pub use io::{load_catalog, save_catalog, CATALOG_FORMAT_VERSION};
pub use plan::{plan_credits, PlanChoices, PlannedCourse};
pub use prereq::PrereqGraph;

use tracing::{debug, warn};

use crate::error::CatalogError;
use crate::models::{Course, CourseCode, PathGroup, RequirementCategory};

/// Catálogo validado. Inmutable una vez construido.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogStore {
    categories: Vec<(String, RequirementCategory)>,
}

impl CatalogStore {
    /// Construye y valida. Falla si hay nombres repetidos, grupos con menos de
    /// dos caminos, prerequisitos mal escritos o ciclos de prerequisitos.
    pub fn new(categories: Vec<(String, RequirementCategory)>) -> Result<CatalogStore, CatalogError> {
        validate::check_store(&categories)?;
        let store = CatalogStore { categories };

        let graph = store.prereq_graph();
        if let Some(code) = graph.find_cycle() {
            return Err(CatalogError::structure(
                code.to_string(),
                "prerequisite cycle: this course (transitively) requires itself",
            ));
        }
        for (course, pre) in graph.unknown_prereqs() {
            warn!("{} lists prerequisite {} which is not offered in this catalog", course, pre);
        }
        debug!("catalog ready: {} categories, {} leaf courses", store.categories.len(), store.leaf_count());
        Ok(store)
    }

    /// Categorías en orden de inserción.
    pub fn categories(&self) -> impl Iterator<Item = (&str, &RequirementCategory)> {
        self.categories.iter().map(|(n, c)| (n.as_str(), c))
    }

    pub fn category_names(&self) -> Vec<&str> {
        self.categories.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&RequirementCategory> {
        self.categories.iter().find(|(n, _)| n == name).map(|(_, c)| c)
    }

    pub fn category(&self, name: &str) -> Result<&RequirementCategory, CatalogError> {
        self.get(name).ok_or_else(|| CatalogError::UnknownCategory(name.to_string()))
    }

    /// Todos los cursos hoja, cada uno una vez, en orden estable. Las
    /// alternativas de un grupo se emiten todas; los marcadores de requisito
    /// no son hojas.
    pub fn leaves(&self) -> Vec<&Course> {
        self.categories.iter().flat_map(|(_, c)| c.leaves()).collect()
    }

    pub fn leaf_count(&self) -> usize {
        self.categories.iter().map(|(_, c)| c.leaves().len()).sum()
    }

    /// Suma de los objetivos de crédito de las categorías que lo tienen.
    pub fn credit_total(&self) -> u32 {
        self.categories.iter().filter_map(|(_, c)| c.credit_target()).sum()
    }

    pub fn path_groups(&self) -> Vec<&PathGroup> {
        self.categories.iter().flat_map(|(_, c)| c.path_groups()).collect()
    }

    /// Primer curso hoja con ese código.
    pub fn find_course(&self, code: &CourseCode) -> Option<&Course> {
        self.leaves().into_iter().find(|c| c.code().as_ref() == Some(code))
    }

    /// Códigos distintos de todos los cursos hoja, en orden de aparición.
    pub fn course_codes(&self) -> Vec<CourseCode> {
        let mut out: Vec<CourseCode> = Vec::new();
        for c in self.leaves() {
            if let Some(code) = c.code() {
                if !out.contains(&code) { out.push(code); }
            }
        }
        out
    }

    pub fn prereq_graph(&self) -> PrereqGraph {
        PrereqGraph::build(self.leaves())
    }

    /// Código del catálogo más parecido a `raw` (Jaro-Winkler), para sugerir
    /// correcciones de entrada. `None` si nada supera el umbral.
    pub fn suggest_code(&self, raw: &str) -> Option<CourseCode> {
        let needle = CourseCode::parse(raw).map(|c| c.to_string()).unwrap_or_else(|| raw.trim().to_uppercase());
        let mut best: Option<(f64, CourseCode)> = None;
        for code in self.course_codes() {
            let score = strsim::jaro_winkler(&needle, code.as_str());
            if score >= SUGGESTION_THRESHOLD && best.as_ref().is_none_or(|(s, _)| score > *s) {
                best = Some((score, code));
            }
        }
        best.map(|(_, c)| c)
    }
}

const SUGGESTION_THRESHOLD: f64 = 0.85;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Bucket, PathOption, RequirementEntry};

    fn seq(name: &str, codes: &[&str]) -> PathOption {
        PathOption {
            path_name: name.into(),
            courses: codes.iter().map(|c| Course::new(format!("{} - Course {}", c, c), 3)).collect(),
        }
    }

    fn group(paths: Vec<PathOption>) -> PathGroup {
        PathGroup { course: "Choice".into(), credits: 6, semester: None, paths }
    }

    #[test]
    fn grupo_de_dos_secuencias_da_cuatro_hojas() {
        let store = CatalogStore::new(vec![(
            "paths".into(),
            RequirementCategory::PathRequirement(group(vec![
                seq("A", &["ABC 1001", "ABC 1002"]),
                seq("B", &["ABC 2001", "ABC 2002"]),
            ])),
        )])
        .unwrap();
        assert_eq!(store.leaf_count(), 4);
        assert_eq!(store.leaves().len(), 4);
        assert_eq!(store.credit_total(), 6);
    }

    #[test]
    fn cantidad_de_hojas_no_depende_del_anidamiento() {
        let codes = ["ABC 1001", "ABC 1002", "ABC 2001", "ABC 2002"];
        let flat = CatalogStore::new(vec![(
            "flat".into(),
            RequirementCategory::Buckets(vec![Bucket::new(
                "all",
                codes.iter().map(|c| RequirementEntry::Course(Course::new(format!("{} - X", c), 3))).collect(),
            )]),
        )])
        .unwrap();
        let nested = CatalogStore::new(vec![(
            "nested".into(),
            RequirementCategory::ClassOptions(vec![Bucket::new(
                "opts",
                vec![
                    RequirementEntry::Sequence(seq("lab", &["ABC 1001", "ABC 1002"])),
                    RequirementEntry::Group(group(vec![seq("A", &["ABC 2001"]), seq("B", &["ABC 2002"])])),
                ],
            )]),
        )])
        .unwrap();
        assert_eq!(flat.leaf_count(), nested.leaf_count());
        let flat_codes: Vec<String> = flat.leaves().iter().map(|c| c.code().unwrap().to_string()).collect();
        let nested_codes: Vec<String> = nested.leaves().iter().map(|c| c.code().unwrap().to_string()).collect();
        assert_eq!(flat_codes, nested_codes);
    }

    #[test]
    fn categoria_desconocida() {
        let store = builtin::computer_science_bs().unwrap();
        assert!(matches!(store.category("nope"), Err(CatalogError::UnknownCategory(_))));
        assert!(store.category("major_related_paths").is_ok());
    }

    #[test]
    fn nombres_de_categoria_repetidos() {
        let cat = RequirementCategory::Buckets(vec![Bucket::new("x", vec![])]);
        let err = CatalogStore::new(vec![("a".into(), cat.clone()), ("a".into(), cat)]).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateKey { .. }));
    }

    #[test]
    fn ciclo_de_prerequisitos_es_fatal() {
        let cat = RequirementCategory::Buckets(vec![Bucket::new(
            "y",
            vec![
                RequirementEntry::Course(Course::new("CPSC 1000 - A", 3).with_prereq(&["CPSC 2000"])),
                RequirementEntry::Course(Course::new("CPSC 2000 - B", 3).with_prereq(&["CPSC 1000"])),
            ],
        )]);
        assert!(CatalogStore::new(vec![("c".into(), cat)]).is_err());
    }

    #[test]
    fn course_codes_sin_repetidos() {
        let store = builtin::computer_science_bs().unwrap();
        let codes = store.course_codes();
        let mut dedup = codes.clone();
        dedup.sort();
        dedup.dedup();
        assert_eq!(codes.len(), dedup.len());
        assert!(codes.len() < store.leaf_count());
        let algo = CourseCode::parse("CPSC 2120").unwrap();
        assert_eq!(store.find_course(&algo).unwrap().credits, 4);
    }

    #[test]
    fn sugerencia_de_codigo_cercano() {
        let store = builtin::computer_science_bs().unwrap();
        assert_eq!(store.suggest_code("cpsc2120").unwrap().as_str(), "CPSC 2120");
        assert_eq!(store.suggest_code("CPCS 2120").unwrap().as_str(), "CPSC 2120");
        assert!(store.suggest_code("zzzz").is_none());
    }
}
