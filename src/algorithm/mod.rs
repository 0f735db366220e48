// Módulo de generación de horarios de oferta
pub mod conflict;
pub mod generator;
pub mod schedule_io;
pub mod timeslots;

pub use generator::{generate, ScheduleGenerator, DEFAULT_SECTIONS_PER_COURSE};
pub use schedule_io::{load_schedule, save_schedule};
pub use timeslots::{slots_for, MWF_TIME_SLOTS, TTH_TIME_SLOTS};
