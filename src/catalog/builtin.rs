// Catálogo embebido: BS en Computer Science.
//
// Es la fuente de `quickplan catalog init`, que lo escribe en
// data/course_structure.json. Una vez en disco el archivo es la única
// definición que se carga; este módulo no se consulta en tiempo de ejecución.
use crate::error::CatalogError;
use crate::models::{Bucket, Course, PathGroup, PathOption, RequirementCategory, RequirementEntry};

use super::CatalogStore;

fn course(name: &str, credits: u32) -> RequirementEntry {
    RequirementEntry::Course(Course::new(name, credits))
}

fn course_in(name: &str, credits: u32, semester: &str, prereq: &[&str]) -> RequirementEntry {
    RequirementEntry::Course(Course::new(name, credits).with_semester(semester).with_prereq(prereq))
}

fn slot(name: &str, credits: u32, semester: &str) -> RequirementEntry {
    RequirementEntry::Slot(Course::new(name, credits).with_semester(semester))
}

fn path(name: &str, courses: &[(&str, u32)]) -> PathOption {
    PathOption {
        path_name: name.to_string(),
        courses: courses.iter().map(|(c, cr)| Course::new(*c, *cr)).collect(),
    }
}

fn general_education() -> RequirementCategory {
    RequirementCategory::Buckets(vec![
        Bucket::new(
            "arts_and_humanities",
            vec![
                slot("Arts and Humanities (Non-Literature)", 3, "First Semester - Second Year"),
                slot("Arts and Humanities (Literature)", 3, "First Semester - Sophomore Year"),
            ],
        ),
        Bucket::new(
            "natural_science",
            vec![
                slot("Natural Science Requirement", 4, "First Semester - Freshman Year"),
                slot("Natural Science Requirement", 4, "Second Semester - Freshman Year"),
            ],
        ),
        Bucket::new(
            "oral_communication",
            vec![slot("Oral Communication Requirement", 3, "First Semester - Sophomore Year")],
        ),
        Bucket::new(
            "social_science",
            vec![
                slot("Social Science Requirement", 3, "First Semester - Junior Year"),
                slot("Social Science Requirement", 3, "Second Semester - Junior Year"),
            ],
        ),
        Bucket::new(
            "global_challenges",
            vec![
                slot("Global Challenges Requirement", 3, "First Semester - Junior Year"),
                slot("Global Challenges Requirement", 3, "Second Semester - Senior Year"),
            ],
        ),
        Bucket::new("writing", vec![slot("Writing Requirement", 3, "First Semester - Senior Year")]),
    ])
}

fn general_education_classes() -> RequirementCategory {
    let literature = || {
        vec![
            course("ENGL 2120 - World Literature", 3),
            course("ENGL 2130 - British Literature", 3),
            course("ENGL 2140 - American Literature", 3),
        ]
    };
    RequirementCategory::ClassOptions(vec![
        Bucket::new(
            "arts_and_humanities_non_lit",
            vec![
                course("MUSC 2100 - Music in the Western World", 3),
                course("THEA 2100 - Theatre Appreciation", 3),
                course("ARTS 2100 - Art Appreciation", 3),
            ],
        ),
        Bucket::new("arts_and_humanities_lit", literature()),
        Bucket::new(
            "oral_communication_requirement",
            vec![
                course("COMM 1500 - Introduction to Human Communication", 3),
                course("COMM 2500 - Public Speaking", 3),
                course("ENGL 1030 - Composition and Rhetoric", 3),
            ],
        ),
        Bucket::new(
            "natural_science_with_lab",
            vec![
                RequirementEntry::Sequence(path(
                    "BIOL 1030/1050",
                    &[("BIOL 1030 - General Biology I", 3), ("BIOL 1050 - General Biology Lab", 1)],
                )),
                RequirementEntry::Sequence(path(
                    "CH 1010/1011",
                    &[("CH 1010 - General Chemistry", 4), ("CH 1011 - General Chemistry Lab", 0)],
                )),
                RequirementEntry::Sequence(path(
                    "PHYS 1220/1240",
                    &[("PHYS 1220 - Physics with Calculus I", 3), ("PHYS 1240 - Physics Laboratory I", 1)],
                )),
            ],
        ),
        Bucket::new(
            "social_sciences",
            vec![
                course("ANTH 2010 - Introduction to Anthropology", 3),
                course("GEOG 1010 - Introduction to Geography", 3),
                course("POSC 1010 - American National Government", 3),
            ],
        ),
        Bucket::new("global_challenges", literature()),
        Bucket::new("cross_cultural_awareness", vec![course("MUSC 3140 - World Music", 3)]),
        Bucket::new(
            "science_and_technology_in_society",
            vec![course("ENGR 2210 - Technology, Culture and Design", 3)],
        ),
        Bucket::new(
            "mathematics",
            vec![
                course("MATH 1060 - Calculus of One Variable I", 4),
                course("MATH 1080 - Calculus of One Variable II", 4),
            ],
        ),
    ])
}

fn major_related_classes() -> RequirementCategory {
    let intro = PathGroup {
        course: "Introduction to Computing Requirement".to_string(),
        credits: 4,
        semester: Some("First/Second Semester - Freshman Year".to_string()),
        paths: vec![
            path(
                "CPSC 1010/1020",
                &[("CPSC 1010 - Introduction to Computing I", 4), ("CPSC 1020 - Introduction to Computing II", 4)],
            ),
            path(
                "CPSC 1060/1070",
                &[("CPSC 1060 - Introduction to Programming", 4), ("CPSC 1070 - Programming Methodology", 4)],
            ),
        ],
    };

    RequirementCategory::Buckets(vec![
        Bucket::new(
            "first_year",
            vec![
                course_in("ENGL 1030 - Composition and Rhetoric", 3, "First Semester - Freshman Year", &[]),
                course_in("MATH 1060 - Calculus of One Variable I", 4, "First Semester - Freshman Year", &[]),
                course_in("MATH 1080 - Calculus of One Variable II", 4, "Second Semester - Freshman Year", &[]),
                RequirementEntry::Group(intro),
            ],
        ),
        Bucket::new(
            "sophomore_year",
            vec![
                course_in("CPSC 2070 - Discrete Structures for Computing", 3, "First Semester - Sophomore Year", &["MATH 1060"]),
                course_in("CPSC 2120 - Algorithms and Data Structures", 4, "First Semester - Sophomore Year", &["CPSC 2070"]),
                course_in("CPSC 2150 - Software Development Foundations", 3, "Second Semester - Sophomore Year", &["CPSC 2120"]),
                course_in("CPSC 2310 - Introduction to Computer Organization", 4, "Second Semester - Sophomore Year", &["CPSC 2120"]),
            ],
        ),
        Bucket::new(
            "junior_year",
            vec![
                course_in("CPSC 3720 - Introduction to Software Engineering", 3, "First Semester - Junior Year", &["CPSC 2120"]),
                course_in("CPSC 3220 - Advanced Systems", 3, "First Semester - Junior Year", &["CPSC 2120"]),
                course_in("CPSC 4030 - Data Science and Artificial Intelligence", 3, "Second Semester - Junior Year", &["CPSC 2120"]),
            ],
        ),
        Bucket::new(
            "senior_year",
            vec![
                course_in("CPSC 4910 - Senior Computing Practicum", 3, "Second Semester - Senior Year", &["CPSC 3720"]),
                course_in("CPSC 3520 - Programming Systems", 3, "First Semester - Senior Year", &["CPSC 3720"]),
            ],
        ),
    ])
}

fn major_related_paths() -> RequirementCategory {
    RequirementCategory::PathRequirement(PathGroup {
        course: "Computer Science Path Requirement".to_string(),
        credits: 6,
        semester: Some("Second Semester - Junior and Senior Year".to_string()),
        paths: vec![
            path(
                "Advanced Systems",
                &[("CPSC 3220 - Introduction to Operating Systems", 3), ("CPSC 3600 - Network Programming", 3)],
            ),
            path(
                "Intelligent Computing",
                &[("CPSC 4030 - Machine Learning", 3), ("CPSC 4300 - Artificial Intelligence", 3)],
            ),
            path(
                "Interactive Systems",
                &[("CPSC 3750 - Human-Computer Interaction", 3), ("CPSC 4110 - Game Development", 3)],
            ),
        ],
    })
}

/// Categorías del programa en el orden en que se escriben al archivo.
pub fn computer_science_bs_categories() -> Vec<(String, RequirementCategory)> {
    vec![
        ("general_education".to_string(), general_education()),
        ("general_education_classes".to_string(), general_education_classes()),
        ("major_related_classes".to_string(), major_related_classes()),
        ("major_related_paths".to_string(), major_related_paths()),
    ]
}

pub fn computer_science_bs() -> Result<CatalogStore, CatalogError> {
    CatalogStore::new(computer_science_bs_categories())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hojas_del_catalogo_embebido() {
        let store = computer_science_bs().unwrap();
        // 25 opciones de educación general + 16 cursos de la carrera + 6 de caminos;
        // los marcadores de requisito no cuentan
        assert_eq!(store.category("general_education").unwrap().leaves().len(), 0);
        assert_eq!(store.category("general_education_classes").unwrap().leaves().len(), 25);
        assert_eq!(store.category("major_related_classes").unwrap().leaves().len(), 16);
        assert_eq!(store.category("major_related_paths").unwrap().leaves().len(), 6);
        assert_eq!(store.leaf_count(), 47);
    }

    #[test]
    fn creditos_por_categoria() {
        let store = computer_science_bs().unwrap();
        assert_eq!(store.category("general_education").unwrap().credit_target(), Some(32));
        // 3+4+4 + 4 (grupo: créditos declarados) + 14 + 9 + 6
        assert_eq!(store.category("major_related_classes").unwrap().credit_target(), Some(44));
        assert_eq!(store.category("major_related_paths").unwrap().credit_target(), Some(6));
        assert_eq!(store.credit_total(), 82);
        assert_eq!(store.path_groups().len(), 2);
    }

    #[test]
    fn sin_prerequisitos_desconocidos() {
        let store = computer_science_bs().unwrap();
        assert!(store.prereq_graph().unknown_prereqs().is_empty());
    }
}
