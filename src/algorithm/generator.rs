// Generador de secciones sintéticas para el catálogo de oferta.
//
// Recorre las hojas del catálogo en orden y a cada curso le asigna N
// secciones. Cada sección elige patrón (MWF/TTh, p=0.5) y luego una franja
// uniforme de la tabla de ese patrón. Por defecto no hay control de choques:
// es un catálogo de ofertas posibles, no el horario de un estudiante.
use rand::Rng;
use tracing::{debug, info};

use super::timeslots::{combination_count, slots_for};
use crate::catalog::CatalogStore;
use crate::error::ScheduleError;
use crate::models::{Course, DayPattern, ScheduledCourse, Section, TimeSlot};

pub const DEFAULT_SECTIONS_PER_COURSE: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleGenerator {
    sections_per_course: u32,
    /// Si es true, las secciones de un mismo curso nunca repiten (patrón, franja).
    distinct_slots: bool,
}

impl Default for ScheduleGenerator {
    fn default() -> Self {
        ScheduleGenerator { sections_per_course: DEFAULT_SECTIONS_PER_COURSE, distinct_slots: false }
    }
}

impl ScheduleGenerator {
    pub fn new() -> ScheduleGenerator {
        ScheduleGenerator::default()
    }

    pub fn sections_per_course(mut self, n: u32) -> ScheduleGenerator {
        self.sections_per_course = n;
        self
    }

    pub fn distinct_slots(mut self, on: bool) -> ScheduleGenerator {
        self.distinct_slots = on;
        self
    }

    fn validate(&self, courses: &[&Course]) -> Result<(), ScheduleError> {
        if self.sections_per_course == 0 {
            return Err(ScheduleError::InvalidSectionCount);
        }
        let available = combination_count();
        if self.distinct_slots && self.sections_per_course as usize > available {
            let course = courses.first().map(|c| c.course.clone()).unwrap_or_default();
            return Err(ScheduleError::SlotsExhausted { course, requested: self.sections_per_course, available });
        }
        Ok(())
    }

    /// Una pasada completa. Con la misma semilla, el mismo catálogo y la misma
    /// configuración el resultado es idéntico.
    pub fn generate<R: Rng + ?Sized>(&self, catalog: &CatalogStore, rng: &mut R) -> Result<Vec<ScheduledCourse>, ScheduleError> {
        let leaves = catalog.leaves();
        self.validate(&leaves)?;

        let mut out: Vec<ScheduledCourse> = Vec::with_capacity(leaves.len());
        for course in leaves {
            let sections = if self.distinct_slots {
                self.distinct_sections(rng)
            } else {
                (1..=self.sections_per_course).map(|id| random_section(id, rng)).collect()
            };
            debug!("{}: {} sections", course.course, sections.len());
            out.push(ScheduledCourse { course: course.clone(), sections });
        }
        info!(
            "generated {} sections for {} courses ({} per course)",
            out.len() * self.sections_per_course as usize,
            out.len(),
            self.sections_per_course
        );
        Ok(out)
    }

    fn distinct_sections<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<Section> {
        let mut used: Vec<(DayPattern, TimeSlot)> = Vec::new();
        let mut sections: Vec<Section> = Vec::with_capacity(self.sections_per_course as usize);
        for id in 1..=self.sections_per_course {
            let free = |p: DayPattern, used: &[(DayPattern, TimeSlot)]| -> Vec<TimeSlot> {
                slots_for(p).iter().copied().filter(|s| !used.contains(&(p, *s))).collect()
            };
            let first = pick_pattern(rng);
            let other = if first == DayPattern::Mwf { DayPattern::Tth } else { DayPattern::Mwf };
            // si el patrón sorteado ya no tiene franjas libres se usa el otro
            let (pattern, candidates) = match free(first, &used) {
                c if !c.is_empty() => (first, c),
                _ => (other, free(other, &used)),
            };
            // validate() garantiza N <= combinaciones, así que siempre queda alguna
            if candidates.is_empty() {
                break;
            }
            let slot = candidates[rng.gen_range(0..candidates.len())];
            used.push((pattern, slot));
            sections.push(Section { section_id: id, day_type: pattern, time_slot: slot });
        }
        sections
    }
}

fn pick_pattern<R: Rng + ?Sized>(rng: &mut R) -> DayPattern {
    if rng.gen_bool(0.5) { DayPattern::Mwf } else { DayPattern::Tth }
}

fn random_section<R: Rng + ?Sized>(section_id: u32, rng: &mut R) -> Section {
    let day_type = pick_pattern(rng);
    let slots = slots_for(day_type);
    let time_slot = slots[rng.gen_range(0..slots.len())];
    Section { section_id, day_type, time_slot }
}

/// Atajo con la configuración por defecto (sin restricción de franjas distintas).
pub fn generate<R: Rng + ?Sized>(
    catalog: &CatalogStore,
    sections_per_course: u32,
    rng: &mut R,
) -> Result<Vec<ScheduledCourse>, ScheduleError> {
    ScheduleGenerator::new().sections_per_course(sections_per_course).generate(catalog, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::timeslots::is_valid_slot;
    use crate::catalog::builtin;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn una_entrada_por_hoja_y_ids_consecutivos() {
        let store = builtin::computer_science_bs().unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let schedule = generate(&store, 4, &mut rng).unwrap();
        assert_eq!(schedule.len(), store.leaf_count());
        for sc in &schedule {
            let ids: Vec<u32> = sc.sections.iter().map(|s| s.section_id).collect();
            assert_eq!(ids, vec![1, 2, 3, 4]);
            for s in &sc.sections {
                assert!(is_valid_slot(s.day_type, &s.time_slot));
            }
        }
    }

    #[test]
    fn cero_secciones_es_error() {
        let store = builtin::computer_science_bs().unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(generate(&store, 0, &mut rng), Err(ScheduleError::InvalidSectionCount)));
    }

    #[test]
    fn misma_semilla_mismo_resultado() {
        let store = builtin::computer_science_bs().unwrap();
        let a = generate(&store, 3, &mut StdRng::seed_from_u64(42)).unwrap();
        let b = generate(&store, 3, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(serde_json::to_string(&a).unwrap(), serde_json::to_string(&b).unwrap());
    }

    #[test]
    fn franjas_distintas_por_curso() {
        let store = builtin::computer_science_bs().unwrap();
        let generator = ScheduleGenerator::new().sections_per_course(13).distinct_slots(true);
        let schedule = generator.generate(&store, &mut StdRng::seed_from_u64(3)).unwrap();
        for sc in &schedule {
            assert_eq!(sc.sections.len(), 13);
            let mut combos: Vec<(DayPattern, TimeSlot)> = sc.sections.iter().map(|s| (s.day_type, s.time_slot)).collect();
            combos.sort_by_key(|(p, t)| (p.as_str(), *t));
            combos.dedup();
            assert_eq!(combos.len(), 13, "{} repite franja", sc.course.course);
        }
    }

    #[test]
    fn franjas_distintas_agotadas() {
        let store = builtin::computer_science_bs().unwrap();
        let generator = ScheduleGenerator::new().sections_per_course(14).distinct_slots(true);
        match generator.generate(&store, &mut StdRng::seed_from_u64(3)) {
            Err(ScheduleError::SlotsExhausted { requested, available, .. }) => {
                assert_eq!(requested, 14);
                assert_eq!(available, 13);
            }
            other => panic!("se esperaba SlotsExhausted, obtenido {:?}", other),
        }
    }
}
