use quickplan::algorithm::conflict::coincident_sections;
use quickplan::algorithm::{generate, load_schedule, save_schedule, slots_for, ScheduleGenerator};
use quickplan::catalog::{builtin, CatalogStore};
use quickplan::error::ScheduleError;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Diez cursos hoja repartidos en listas, opciones y un marcador de requisito.
fn ten_leaf_catalog() -> CatalogStore {
    let text = r#"{
        "general_education": {
            "science": [{"course": "Natural Science Requirement", "credits": 4}]
        },
        "major": {
            "year_one": [
                {"course": "CPSC 1010 - Computer Science I", "credits": 4},
                {"course": "CPSC 1020 - Computer Science II", "credits": 4, "prereq": ["CPSC 1010"]},
                {"course": "MATH 1060 - Calculus I", "credits": 4},
                {"course": "MATH 1080 - Calculus II", "credits": 4, "prereq": ["MATH 1060"]},
                {"course": "ENGL 1030 - Composition", "credits": 3}
            ],
            "year_two": [
                {"course": "CPSC 2070 - Discrete Structures", "credits": 3, "prereq": ["MATH 1060"]},
                {"course": "CPSC 2120 - Algorithms", "credits": 4, "prereq": ["CPSC 2070"]},
                {"course": "CPSC 2150 - Software Development", "credits": 3, "prereq": ["CPSC 2120"]}
            ]
        },
        "science_options": {
            "class_options": {
                "biology": [
                    {"course": "BIOL 1030 - General Biology", "credits": 3},
                    {"course": "BIOL 1050 - General Biology Lab", "credits": 1}
                ]
            }
        }
    }"#;
    CatalogStore::from_json(text).unwrap()
}

#[test]
fn test_diez_hojas_por_tres_secciones() {
    let catalog = ten_leaf_catalog();
    assert_eq!(catalog.leaf_count(), 10);

    let schedule = generate(&catalog, 3, &mut StdRng::seed_from_u64(1)).unwrap();
    assert_eq!(schedule.len(), 10);
    assert_eq!(schedule.iter().map(|c| c.sections.len()).sum::<usize>(), 30);

    // mismo orden que el recorrido del catálogo
    let leaves: Vec<String> = catalog.leaves().iter().map(|c| c.course.clone()).collect();
    let scheduled: Vec<String> = schedule.iter().map(|c| c.course.course.clone()).collect();
    assert_eq!(leaves, scheduled);
}

#[test]
fn test_ids_y_franjas_validas() {
    let catalog = builtin::computer_science_bs().unwrap();
    let schedule = generate(&catalog, 5, &mut StdRng::seed_from_u64(42)).unwrap();
    for course in &schedule {
        let ids: Vec<u32> = course.sections.iter().map(|s| s.section_id).collect();
        assert_eq!(ids, (1..=5).collect::<Vec<u32>>(), "{}", course.course.course);
        for s in &course.sections {
            assert!(slots_for(s.day_type).contains(&s.time_slot), "{} {}", s.day_type, s.time_slot);
        }
    }
}

#[test]
fn test_misma_semilla_mismo_horario() {
    let catalog = builtin::computer_science_bs().unwrap();
    let a = generate(&catalog, 3, &mut StdRng::seed_from_u64(2024)).unwrap();
    let b = generate(&catalog, 3, &mut StdRng::seed_from_u64(2024)).unwrap();
    assert_eq!(serde_json::to_string(&a).unwrap(), serde_json::to_string(&b).unwrap());
}

#[test]
fn test_franjas_distintas_por_curso() {
    let catalog = ten_leaf_catalog();
    let schedule = ScheduleGenerator::new()
        .sections_per_course(6)
        .distinct_slots(true)
        .generate(&catalog, &mut StdRng::seed_from_u64(9))
        .unwrap();
    for course in &schedule {
        let mut seen = Vec::new();
        for s in &course.sections {
            assert!(!seen.contains(&(s.day_type, s.time_slot)));
            seen.push((s.day_type, s.time_slot));
        }
        assert!(coincident_sections(course).is_empty());
    }
}

#[test]
fn test_cero_secciones_es_error() {
    let catalog = ten_leaf_catalog();
    assert!(matches!(
        generate(&catalog, 0, &mut StdRng::seed_from_u64(0)),
        Err(ScheduleError::InvalidSectionCount)
    ));
}

#[test]
fn test_guardar_y_releer_horario() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data").join("class_schedule.json");
    let catalog = builtin::computer_science_bs().unwrap();
    let schedule = generate(&catalog, 3, &mut StdRng::seed_from_u64(3)).unwrap();

    save_schedule(&schedule, &path).unwrap();
    let reread = load_schedule(&path).unwrap();
    assert_eq!(reread, schedule);
    assert_eq!(reread.iter().map(|c| c.sections.len()).sum::<usize>(), 141);

    // el archivo usa los nombres de campo publicados
    let raw: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let first = &raw[0]["sections"][0];
    assert!(first["section_id"].is_u64());
    assert!(first["day_type"] == "MWF" || first["day_type"] == "TTh");
    assert!(first["time_slot"].as_str().unwrap().contains(" - "));
}
