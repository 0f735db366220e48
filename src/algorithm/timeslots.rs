// Tablas fijas de franjas horarias por patrón de días.
use crate::models::{DayPattern, TimeSlot};

/// Lunes/miércoles/viernes: bloques de 50 minutos con 15 de pausa.
pub const MWF_TIME_SLOTS: [TimeSlot; 9] = [
    TimeSlot::new(8, 0, 8, 50),
    TimeSlot::new(9, 5, 9, 55),
    TimeSlot::new(10, 10, 11, 0),
    TimeSlot::new(11, 15, 12, 5),
    TimeSlot::new(12, 20, 13, 10),
    TimeSlot::new(13, 25, 14, 15),
    TimeSlot::new(14, 30, 15, 20),
    TimeSlot::new(15, 35, 16, 25),
    TimeSlot::new(16, 40, 17, 30),
];

/// Martes/jueves: bloques de 75 minutos.
pub const TTH_TIME_SLOTS: [TimeSlot; 4] = [
    TimeSlot::new(8, 0, 9, 15),
    TimeSlot::new(10, 30, 11, 45),
    TimeSlot::new(12, 0, 13, 15),
    TimeSlot::new(13, 30, 14, 45),
];

pub fn slots_for(pattern: DayPattern) -> &'static [TimeSlot] {
    match pattern {
        DayPattern::Mwf => &MWF_TIME_SLOTS,
        DayPattern::Tth => &TTH_TIME_SLOTS,
    }
}

pub fn is_valid_slot(pattern: DayPattern, slot: &TimeSlot) -> bool {
    slots_for(pattern).contains(slot)
}

/// Combinaciones (patrón, franja) distintas que existen.
pub fn combination_count() -> usize {
    DayPattern::ALL.iter().map(|p| slots_for(*p).len()).sum()
}
