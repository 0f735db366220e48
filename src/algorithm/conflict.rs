// Detección de choques entre secciones generadas.
use crate::models::{ScheduledCourse, Section};

/// True si dos secciones se reúnen a la vez. MWF y TTh no comparten días,
/// así que sólo pueden chocar secciones del mismo patrón.
pub fn sections_overlap(a: &Section, b: &Section) -> bool {
    a.day_type == b.day_type && a.time_slot.overlaps(&b.time_slot)
}

/// Pares de ids de sección de un mismo curso que coinciden en horario.
pub fn coincident_sections(course: &ScheduledCourse) -> Vec<(u32, u32)> {
    let mut out: Vec<(u32, u32)> = Vec::new();
    for (i, a) in course.sections.iter().enumerate() {
        for b in course.sections.iter().skip(i + 1) {
            if sections_overlap(a, b) {
                out.push((a.section_id, b.section_id));
            }
        }
    }
    out
}

/// Cuántos cursos del horario tienen al menos dos secciones a la misma hora.
pub fn courses_with_coincident_sections(schedule: &[ScheduledCourse]) -> usize {
    schedule.iter().filter(|c| !coincident_sections(c).is_empty()).count()
}
