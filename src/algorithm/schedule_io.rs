// Persistencia del horario generado (data/class_schedule.json).
use std::fs::{self, create_dir_all};
use std::io::ErrorKind;
use std::path::Path;
use tracing::info;

use super::timeslots::is_valid_slot;
use crate::error::{CatalogError, ScheduleError};
use crate::models::ScheduledCourse;

/// Escribe el horario completo (lista JSON con sangría). Crea directorios
/// intermedios y reemplaza cualquier salida anterior.
pub fn save_schedule(schedule: &[ScheduledCourse], path: impl AsRef<Path>) -> Result<(), ScheduleError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_dir_all(parent).map_err(|e| CatalogError::Io { path: parent.to_path_buf(), source: e })?;
    }
    let text = serde_json::to_string_pretty(schedule).map_err(CatalogError::from)?;
    fs::write(path, text).map_err(|e| CatalogError::Io { path: path.to_path_buf(), source: e })?;
    info!("schedule saved to {} ({} courses)", path.display(), schedule.len());
    Ok(())
}

/// Lee un horario guardado y comprueba que cada sección use una franja de
/// su patrón y que los ids sean 1..=N.
pub fn load_schedule(path: impl AsRef<Path>) -> Result<Vec<ScheduledCourse>, ScheduleError> {
    let path = path.as_ref();
    let text = match fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(ScheduleError::NotFound { path: path.to_path_buf() });
        }
        Err(e) => return Err(CatalogError::Io { path: path.to_path_buf(), source: e }.into()),
    };
    let schedule: Vec<ScheduledCourse> = serde_json::from_str(&text).map_err(CatalogError::from)?;

    for (i, sc) in schedule.iter().enumerate() {
        for (j, s) in sc.sections.iter().enumerate() {
            let at = format!("[{}].sections[{}]", i, j);
            if s.section_id as usize != j + 1 {
                return Err(CatalogError::structure(at, format!("expected section_id {}, found {}", j + 1, s.section_id)).into());
            }
            if !is_valid_slot(s.day_type, &s.time_slot) {
                return Err(CatalogError::structure(at, format!("{} is not a {} time slot", s.time_slot, s.day_type)).into());
            }
        }
    }
    Ok(schedule)
}
