// Estructuras del horario generado: patrón de días, franja horaria y secciones.
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use super::Course;

/// Patrón semanal de una sección.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayPattern {
    /// Lunes, miércoles y viernes (3 sesiones/semana)
    #[serde(rename = "MWF")]
    Mwf,
    /// Martes y jueves (2 sesiones/semana)
    #[serde(rename = "TTh")]
    Tth,
}

impl DayPattern {
    pub const ALL: [DayPattern; 2] = [DayPattern::Mwf, DayPattern::Tth];

    pub fn as_str(&self) -> &'static str {
        match self {
            DayPattern::Mwf => "MWF",
            DayPattern::Tth => "TTh",
        }
    }
}

impl fmt::Display for DayPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Intervalo de reloj [start, end) en minutos desde medianoche.
/// Se serializa como `"8:00 AM - 8:50 AM"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimeSlot {
    start: u16,
    end: u16,
}

impl TimeSlot {
    /// Constructor en formato 24h; usado por las tablas constantes.
    pub const fn new(start_h: u16, start_m: u16, end_h: u16, end_m: u16) -> TimeSlot {
        TimeSlot { start: start_h * 60 + start_m, end: end_h * 60 + end_m }
    }

    pub fn start_minutes(&self) -> u16 {
        self.start
    }

    pub fn end_minutes(&self) -> u16 {
        self.end
    }

    pub fn duration_minutes(&self) -> u16 {
        self.end.saturating_sub(self.start)
    }

    /// True si los dos intervalos comparten algún minuto.
    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        self.start < other.end && other.start < self.end
    }
}

fn write_clock(f: &mut fmt::Formatter<'_>, minutes: u16) -> fmt::Result {
    let (h24, m) = (minutes / 60, minutes % 60);
    let suffix = if h24 < 12 { "AM" } else { "PM" };
    let h12 = match h24 % 12 {
        0 => 12,
        h => h,
    };
    write!(f, "{}:{:02} {}", h12, m, suffix)
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_clock(f, self.start)?;
        f.write_str(" - ")?;
        write_clock(f, self.end)
    }
}

// "h:mm AM" -> minutos
fn parse_clock(s: &str) -> Result<u16, String> {
    let s = s.trim().to_ascii_uppercase();
    let (clock, pm) = if let Some(c) = s.strip_suffix("PM") {
        (c.trim(), true)
    } else if let Some(c) = s.strip_suffix("AM") {
        (c.trim(), false)
    } else {
        return Err(format!("missing AM/PM in `{}`", s));
    };
    let (h, m) = clock.split_once(':').ok_or_else(|| format!("expected h:mm, got `{}`", clock))?;
    let h: u16 = h.trim().parse().map_err(|_| format!("bad hour in `{}`", clock))?;
    let m: u16 = m.trim().parse().map_err(|_| format!("bad minutes in `{}`", clock))?;
    if !(1..=12).contains(&h) || m > 59 {
        return Err(format!("clock out of range: `{}`", clock));
    }
    let h24 = match (h, pm) {
        (12, false) => 0,
        (12, true) => 12,
        (h, false) => h,
        (h, true) => h + 12,
    };
    Ok(h24 * 60 + m)
}

impl FromStr for TimeSlot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (a, b) = s.split_once(" - ").ok_or_else(|| format!("expected `<start> - <end>`, got `{}`", s))?;
        let start = parse_clock(a)?;
        let end = parse_clock(b)?;
        if end <= start {
            return Err(format!("time slot ends before it starts: `{}`", s));
        }
        Ok(TimeSlot { start, end })
    }
}

impl Serialize for TimeSlot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeSlot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Una sección sintética de un curso.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub section_id: u32,
    pub day_type: DayPattern,
    pub time_slot: TimeSlot,
}

/// Curso hoja + sus secciones generadas. Se serializa con los campos del
/// curso aplanados: `{course, credits, ..., sections: [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledCourse {
    #[serde(flatten)]
    pub course: Course,
    pub sections: Vec<Section>,
}
