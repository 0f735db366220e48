// Selección de plan: un camino por cada PathGroup, para UN estudiante.
//
// Es una operación distinta del aplanado de `CatalogStore::leaves`, que emite
// todas las alternativas (catálogo de oferta).
use serde::Serialize;
use std::collections::BTreeMap;

use super::CatalogStore;
use crate::error::PlanError;
use crate::models::{Course, PathGroup, PathOption, RequirementCategory, RequirementEntry};

/// Elección de camino por nombre de requisito ("Computer Science Path Requirement" -> "Advanced Systems").
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanChoices {
    choices: BTreeMap<String, String>,
}

impl PlanChoices {
    pub fn new() -> PlanChoices {
        PlanChoices::default()
    }

    pub fn choose(mut self, group: impl Into<String>, path: impl Into<String>) -> PlanChoices {
        self.choices.insert(group.into(), path.into());
        self
    }

    /// Parsea argumentos `"GRUPO=CAMINO"`. El nombre del grupo puede tener
    /// espacios; se separa en el primer `=`.
    pub fn parse<S: AsRef<str>>(args: &[S]) -> Result<PlanChoices, String> {
        let mut out = PlanChoices::new();
        for raw in args {
            let raw = raw.as_ref();
            let (group, path) = raw
                .split_once('=')
                .map(|(g, p)| (g.trim(), p.trim()))
                .filter(|(g, p)| !g.is_empty() && !p.is_empty())
                .ok_or_else(|| format!("expected GROUP=PATH, got `{}`", raw))?;
            out.choices.insert(group.to_string(), path.to_string());
        }
        Ok(out)
    }

    pub fn get(&self, group: &str) -> Option<&str> {
        self.choices.get(group).map(|s| s.as_str())
    }
}

/// Curso de un plan, con su procedencia.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedCourse {
    pub category: String,
    /// Lista dentro de la categoría (None para un requisito de camino a nivel de categoría)
    pub bucket: Option<String>,
    /// Camino elegido, si el curso viene de un PathGroup
    pub path: Option<String>,
    #[serde(flatten)]
    pub course: Course,
}

fn chosen<'g>(group: &'g PathGroup, choices: &PlanChoices) -> Result<&'g PathOption, PlanError> {
    let name = choices.get(&group.course).ok_or_else(|| PlanError::MissingChoice(group.course.clone()))?;
    group.path(name).ok_or_else(|| PlanError::UnknownPath {
        group: group.course.clone(),
        path: name.to_string(),
        available: group.path_names().join(", "),
    })
}

impl CatalogStore {
    /// Cursos del plan en orden de catálogo: cursos sueltos y secuencias tal
    /// cual, y de cada PathGroup sólo el camino elegido. Todo grupo necesita
    /// una elección y toda elección debe corresponder a un grupo.
    pub fn select_plan(&self, choices: &PlanChoices) -> Result<Vec<PlannedCourse>, PlanError> {
        let group_names: Vec<&str> = self.path_groups().iter().map(|g| g.course.as_str()).collect();
        if let Some(unknown) = choices.choices.keys().find(|k| !group_names.contains(&k.as_str())) {
            return Err(PlanError::UnknownGroup(unknown.clone()));
        }

        let mut out: Vec<PlannedCourse> = Vec::new();
        for (category, cat) in self.categories() {
            let push = |out: &mut Vec<PlannedCourse>, bucket: Option<&str>, path: Option<&str>, c: &Course| {
                out.push(PlannedCourse {
                    category: category.to_string(),
                    bucket: bucket.map(str::to_string),
                    path: path.map(str::to_string),
                    course: c.clone(),
                });
            };
            match cat {
                RequirementCategory::PathRequirement(g) => {
                    let p = chosen(g, choices)?;
                    for c in p.courses.iter() {
                        push(&mut out, None, Some(p.path_name.as_str()), c);
                    }
                }
                RequirementCategory::Buckets(buckets) | RequirementCategory::ClassOptions(buckets) => {
                    for b in buckets.iter() {
                        for entry in b.entries.iter() {
                            match entry {
                                RequirementEntry::Group(g) => {
                                    let p = chosen(g, choices)?;
                                    for c in p.courses.iter() {
                                        push(&mut out, Some(b.name.as_str()), Some(p.path_name.as_str()), c);
                                    }
                                }
                                RequirementEntry::Sequence(s) => {
                                    for c in s.courses.iter() {
                                        push(&mut out, Some(b.name.as_str()), Some(s.path_name.as_str()), c);
                                    }
                                }
                                RequirementEntry::Course(c) => push(&mut out, Some(b.name.as_str()), None, c),
                                RequirementEntry::Slot(_) => {}
                            }
                        }
                    }
                }
            }
        }
        Ok(out)
    }
}

pub fn plan_credits(plan: &[PlannedCourse]) -> u32 {
    plan.iter().map(|p| p.course.credits).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::builtin;

    fn full_choices() -> PlanChoices {
        PlanChoices::new()
            .choose("Introduction to Computing Requirement", "CPSC 1060/1070")
            .choose("Computer Science Path Requirement", "Intelligent Computing")
    }

    #[test]
    fn plan_toma_un_solo_camino_por_grupo() {
        let store = builtin::computer_science_bs().unwrap();
        let plan = store.select_plan(&full_choices()).unwrap();
        // 47 hojas - 2 (camino de intro no elegido) - 4 (dos caminos de carrera no elegidos)
        assert_eq!(plan.len(), 41);
        let codes: Vec<String> = plan.iter().filter_map(|p| p.course.code()).map(|c| c.to_string()).collect();
        assert!(codes.contains(&"CPSC 1060".to_string()));
        assert!(!codes.contains(&"CPSC 1010".to_string()));
        assert!(codes.contains(&"CPSC 4300".to_string()));
        assert!(!codes.contains(&"CPSC 3600".to_string()));
    }

    #[test]
    fn falta_eleccion() {
        let store = builtin::computer_science_bs().unwrap();
        let choices = PlanChoices::new().choose("Computer Science Path Requirement", "Advanced Systems");
        assert_eq!(
            store.select_plan(&choices).unwrap_err().to_string(),
            "no path chosen for requirement `Introduction to Computing Requirement`"
        );
    }

    #[test]
    fn camino_o_grupo_desconocido() {
        let store = builtin::computer_science_bs().unwrap();
        let bad_path = full_choices().choose("Computer Science Path Requirement", "Robotics");
        assert!(matches!(store.select_plan(&bad_path), Err(PlanError::UnknownPath { .. })));
        let bad_group = full_choices().choose("Minor Requirement", "X");
        assert!(matches!(store.select_plan(&bad_group), Err(PlanError::UnknownGroup(_))));
    }

    #[test]
    fn parse_de_argumentos() {
        let c = PlanChoices::parse(&["Computer Science Path Requirement = Advanced Systems"]).unwrap();
        assert_eq!(c.get("Computer Science Path Requirement"), Some("Advanced Systems"));
        assert!(PlanChoices::parse(&["sin-igual"]).is_err());
        assert!(PlanChoices::parse(&["=X"]).is_err());
    }
}
