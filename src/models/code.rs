// Códigos de curso ("CPSC 2120") y su normalización.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Código normalizado: materia en mayúsculas, un espacio y el número.
/// `"cpsc2120"`, `"CPSC  2120"` y `"CPSC 2120"` producen el mismo código.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CourseCode(String);

const SUBJECT_LEN: std::ops::RangeInclusive<usize> = 2..=5;
const NUMBER_LEN: std::ops::RangeInclusive<usize> = 3..=4;

impl CourseCode {
    /// Parsea un código completo. Devuelve `None` si sobra texto o si la
    /// forma no es MATERIA + NÚMERO.
    pub fn parse(s: &str) -> Option<CourseCode> {
        let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        let split = compact.find(|c: char| !c.is_ascii_alphabetic())?;
        let (subject, rest) = compact.split_at(split);
        if !SUBJECT_LEN.contains(&subject.len()) { return None; }
        // Sufijo opcional de una letra (p.ej. "ENGL 1030H")
        let digits_end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
        let (number, suffix) = rest.split_at(digits_end);
        if !NUMBER_LEN.contains(&number.len()) { return None; }
        if suffix.len() > 1 || !suffix.chars().all(|c| c.is_ascii_alphabetic()) { return None; }
        Some(CourseCode(format!("{} {}{}", subject.to_ascii_uppercase(), number, suffix.to_ascii_uppercase())))
    }

    /// Extrae el código del identificador "CODE - Title" de un curso.
    /// Los marcadores de requisito ("Natural Science Requirement") no tienen código.
    pub fn from_course_name(name: &str) -> Option<CourseCode> {
        let head = match name.split_once(" - ") {
            Some((h, _)) => h,
            None => name,
        };
        CourseCode::parse(head)
    }

    /// Busca todos los códigos que aparecen en un texto libre, en orden y sin
    /// repetir. Sólo reconoce materias escritas en mayúsculas para no confundir
    /// palabras comunes seguidas de números.
    pub fn find_all(text: &str) -> Vec<CourseCode> {
        let tokens: Vec<&str> = text
            .split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|t| !t.is_empty())
            .collect();

        let is_subject = |t: &str| SUBJECT_LEN.contains(&t.len()) && t.chars().all(|c| c.is_ascii_uppercase());
        let is_number = |t: &str| NUMBER_LEN.contains(&t.len()) && t.chars().all(|c| c.is_ascii_digit());

        let mut out: Vec<CourseCode> = Vec::new();
        let mut i = 0;
        while i < tokens.len() {
            let tok = tokens[i];
            let found = if is_subject(tok) && i + 1 < tokens.len() && is_number(tokens[i + 1]) {
                let code = CourseCode(format!("{} {}", tok, tokens[i + 1]));
                i += 1;
                Some(code)
            } else if tok.chars().next().is_some_and(|c| c.is_ascii_uppercase()) && tok.chars().any(|c| c.is_ascii_digit()) {
                // forma compacta "CPSC1010"
                CourseCode::parse(tok).filter(|_| tok.chars().filter(|c| c.is_ascii_alphabetic()).all(|c| c.is_ascii_uppercase()))
            } else {
                None
            };
            if let Some(code) = found {
                if !out.contains(&code) { out.push(code); }
            }
            i += 1;
        }
        out
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CourseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for CourseCode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        CourseCode::parse(&value).ok_or_else(|| format!("`{}` is not a course code", value))
    }
}

impl From<CourseCode> for String {
    fn from(code: CourseCode) -> String {
        code.0
    }
}
