// Grafo de prerequisitos (prereq -> curso) construido a partir de los cursos hoja.
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::{HashMap, HashSet};

use crate::models::{Course, CourseCode};

#[derive(Debug, Clone)]
pub struct PrereqGraph {
    graph: DiGraph<CourseCode, ()>,
    node_map: HashMap<CourseCode, NodeIndex>,
    /// Códigos que aparecen en el catálogo como curso hoja
    known: HashSet<CourseCode>,
}

impl PrereqGraph {
    /// Un mismo código puede aparecer en varias categorías (p.ej. MATH 1060 en
    /// educación general y en primer año): se fusiona en un solo nodo.
    pub fn build<'a, I>(courses: I) -> PrereqGraph
    where
        I: IntoIterator<Item = &'a Course>,
    {
        let mut graph: DiGraph<CourseCode, ()> = DiGraph::new();
        let mut node_map: HashMap<CourseCode, NodeIndex> = HashMap::new();
        let mut known: HashSet<CourseCode> = HashSet::new();

        fn node(graph: &mut DiGraph<CourseCode, ()>, node_map: &mut HashMap<CourseCode, NodeIndex>, code: &CourseCode) -> NodeIndex {
            *node_map.entry(code.clone()).or_insert_with(|| graph.add_node(code.clone()))
        }

        for course in courses {
            let Some(code) = course.code() else { continue };
            known.insert(code.clone());
            let to = node(&mut graph, &mut node_map, &code);
            for pre in course.prereq_codes() {
                let from = node(&mut graph, &mut node_map, &pre);
                if graph.find_edge(from, to).is_none() {
                    graph.add_edge(from, to, ());
                }
            }
        }

        PrereqGraph { graph, node_map, known }
    }

    pub fn contains(&self, code: &CourseCode) -> bool {
        self.known.contains(code)
    }

    /// Prerequisitos directos de `code`, ordenados.
    pub fn prereqs_of(&self, code: &CourseCode) -> Vec<CourseCode> {
        let Some(&idx) = self.node_map.get(code) else { return Vec::new() };
        let mut out: Vec<CourseCode> = self
            .graph
            .neighbors_directed(idx, Direction::Incoming)
            .map(|n| self.graph[n].clone())
            .collect();
        out.sort();
        out
    }

    /// Prerequisitos directos que faltan en `taken`.
    pub fn missing_for(&self, code: &CourseCode, taken: &HashSet<CourseCode>) -> Vec<CourseCode> {
        self.prereqs_of(code).into_iter().filter(|p| !taken.contains(p)).collect()
    }

    /// Pares (curso, prerequisito) donde el prerequisito no existe como curso
    /// del catálogo. No es fatal: un prerequisito puede ser de otro programa.
    pub fn unknown_prereqs(&self) -> Vec<(CourseCode, CourseCode)> {
        let mut out: Vec<(CourseCode, CourseCode)> = Vec::new();
        for edge in self.graph.raw_edges() {
            let pre = &self.graph[edge.source()];
            if !self.known.contains(pre) {
                out.push((self.graph[edge.target()].clone(), pre.clone()));
            }
        }
        out.sort();
        out
    }

    /// Algún curso que participa en un ciclo de prerequisitos, si existe.
    pub fn find_cycle(&self) -> Option<CourseCode> {
        match toposort(&self.graph, None) {
            Ok(_) => None,
            Err(cycle) => Some(self.graph[cycle.node_id()].clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> CourseCode {
        CourseCode::parse(s).unwrap()
    }

    fn sample() -> Vec<Course> {
        vec![
            Course::new("MATH 1060 - Calculus I", 4),
            Course::new("CPSC 2070 - Discrete Structures", 3).with_prereq(&["MATH 1060"]),
            Course::new("CPSC 2120 - Algorithms", 4).with_prereq(&["CPSC 2070"]),
            Course::new("CPSC 3720 - Software Engineering", 3).with_prereq(&["CPSC 2120", "CPSC 1990"]),
            // duplicado en otra categoría
            Course::new("MATH 1060 - Calculus of One Variable I", 4),
        ]
    }

    #[test]
    fn prereqs_y_faltantes() {
        let courses = sample();
        let g = PrereqGraph::build(courses.iter());
        assert_eq!(g.prereqs_of(&code("CPSC 3720")), vec![code("CPSC 1990"), code("CPSC 2120")]);

        let taken: HashSet<CourseCode> = [code("CPSC 2120")].into_iter().collect();
        assert_eq!(g.missing_for(&code("CPSC 3720"), &taken), vec![code("CPSC 1990")]);
        assert!(g.missing_for(&code("MATH 1060"), &taken).is_empty());
        assert!(g.contains(&code("MATH 1060")));
        assert!(!g.contains(&code("CPSC 1990")));
    }

    #[test]
    fn prereq_desconocido_se_reporta() {
        let courses = sample();
        let g = PrereqGraph::build(courses.iter());
        assert_eq!(g.unknown_prereqs(), vec![(code("CPSC 3720"), code("CPSC 1990"))]);
        assert!(g.find_cycle().is_none());
    }

    #[test]
    fn ciclo_detectado() {
        let courses = vec![
            Course::new("CPSC 1000 - A", 3).with_prereq(&["CPSC 2000"]),
            Course::new("CPSC 2000 - B", 3).with_prereq(&["CPSC 1000"]),
        ];
        let g = PrereqGraph::build(courses.iter());
        assert!(g.find_cycle().is_some());
    }
}
