//! Validación estructural del catálogo.
//!
//! El archivo JSON se procesa en dos pasadas:
//! 1. `check_duplicate_keys`: recorre el documento completo y rechaza claves
//!    repetidas en cualquier objeto (serde_json se quedaría con la última sin
//!    avisar).
//! 2. `parse_categories`: clasifica cada categoría y cada elemento según su
//!    forma (lista de requisitos, `class_options`, grupo de caminos, secuencia,
//!    curso, marcador) y devuelve un error con la ruta exacta si algo no encaja.
//!
//! `check_store` aplica las invariantes que no dependen del formato (nombres
//! únicos, grupos con 2+ caminos, prerequisitos con forma de código) y se usa
//! tanto al cargar como al construir catálogos en código.

use serde::de::{self, DeserializeSeed, MapAccess, SeqAccess, Visitor};
use serde_json::{Map, Value};
use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;

use crate::error::CatalogError;
use crate::models::{Bucket, Course, CourseCode, PathGroup, PathOption, RequirementCategory, RequirementEntry};

const COURSE_KEYS: &[&str] = &["course", "credits", "semester", "prereq"];
const GROUP_KEYS: &[&str] = &["course", "credits", "semester", "paths"];
const SEQUENCE_KEYS: &[&str] = &["path_name", "courses"];
const CLASS_OPTIONS_KEY: &str = "class_options";

// ---------------------------------------------------------------------------
// Pasada 1: claves duplicadas

type DuplicateSlot = RefCell<Option<(String, String)>>;

struct DupSeed<'a> {
    found: &'a DuplicateSlot,
    path: String,
}

impl<'de> DeserializeSeed<'de> for DupSeed<'_> {
    type Value = ();

    fn deserialize<D: de::Deserializer<'de>>(self, deserializer: D) -> Result<(), D::Error> {
        deserializer.deserialize_any(DupVisitor { found: self.found, path: self.path })
    }
}

struct DupVisitor<'a> {
    found: &'a DuplicateSlot,
    path: String,
}

impl<'de> Visitor<'de> for DupVisitor<'_> {
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("any JSON value")
    }

    fn visit_bool<E>(self, _: bool) -> Result<(), E> { Ok(()) }
    fn visit_i64<E>(self, _: i64) -> Result<(), E> { Ok(()) }
    fn visit_u64<E>(self, _: u64) -> Result<(), E> { Ok(()) }
    fn visit_f64<E>(self, _: f64) -> Result<(), E> { Ok(()) }
    fn visit_str<E>(self, _: &str) -> Result<(), E> { Ok(()) }
    fn visit_unit<E>(self) -> Result<(), E> { Ok(()) }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<(), A::Error> {
        let mut idx = 0usize;
        while seq
            .next_element_seed(DupSeed { found: self.found, path: format!("{}[{}]", self.path, idx) })?
            .is_some()
        {
            idx += 1;
        }
        Ok(())
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<(), A::Error> {
        let mut seen: HashSet<String> = HashSet::new();
        while let Some(key) = map.next_key::<String>()? {
            if !seen.insert(key.clone()) {
                *self.found.borrow_mut() = Some((key.clone(), display_path(&self.path)));
                return Err(de::Error::custom(format!("duplicate key `{}`", key)));
            }
            let child = if self.path.is_empty() { key } else { format!("{}.{}", self.path, key) };
            map.next_value_seed(DupSeed { found: self.found, path: child })?;
        }
        Ok(())
    }
}

fn display_path(path: &str) -> String {
    if path.is_empty() { "<root>".to_string() } else { path.to_string() }
}

/// Rechaza documentos con claves repetidas en cualquier nivel.
pub fn check_duplicate_keys(text: &str) -> Result<(), CatalogError> {
    let found: DuplicateSlot = RefCell::new(None);
    let mut de = serde_json::Deserializer::from_str(text);
    let result = DupSeed { found: &found, path: String::new() }
        .deserialize(&mut de)
        .and_then(|_| de.end());
    match result {
        Ok(()) => Ok(()),
        Err(e) => match found.into_inner() {
            Some((key, at)) => Err(CatalogError::DuplicateKey { key, at }),
            None => Err(CatalogError::Parse(e)),
        },
    }
}

// ---------------------------------------------------------------------------
// Pasada 2: clasificación por forma

fn as_object<'v>(value: &'v Value, at: &str) -> Result<&'v Map<String, Value>, CatalogError> {
    value.as_object().ok_or_else(|| CatalogError::structure(at, format!("expected an object, found {}", kind_of(value))))
}

fn as_array<'v>(value: &'v Value, at: &str) -> Result<&'v Vec<Value>, CatalogError> {
    value.as_array().ok_or_else(|| CatalogError::structure(at, format!("expected a list, found {}", kind_of(value))))
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

fn reject_unknown_keys(obj: &Map<String, Value>, allowed: &[&str], at: &str) -> Result<(), CatalogError> {
    match obj.keys().find(|k| !allowed.contains(&k.as_str())) {
        Some(k) => Err(CatalogError::structure(at, format!("unknown field `{}` (allowed: {})", k, allowed.join(", ")))),
        None => Ok(()),
    }
}

fn typed<T: serde::de::DeserializeOwned>(value: &Value, at: &str) -> Result<T, CatalogError> {
    serde_json::from_value(value.clone()).map_err(|e| CatalogError::structure(at, e.to_string()))
}

fn parse_course(value: &Value, at: &str) -> Result<Course, CatalogError> {
    let obj = as_object(value, at)?;
    reject_unknown_keys(obj, COURSE_KEYS, at)?;
    typed(value, at)
}

fn parse_path_option(value: &Value, at: &str) -> Result<PathOption, CatalogError> {
    let obj = as_object(value, at)?;
    reject_unknown_keys(obj, SEQUENCE_KEYS, at)?;
    let path_name = match obj.get("path_name") {
        Some(Value::String(s)) => s.clone(),
        Some(other) => return Err(CatalogError::structure(at, format!("`path_name` must be a string, found {}", kind_of(other)))),
        None => return Err(CatalogError::structure(at, "missing `path_name`")),
    };
    let courses_at = format!("{}.courses", at);
    let raw_courses = obj.get("courses").ok_or_else(|| CatalogError::structure(at, "missing `courses`"))?;
    let courses = as_array(raw_courses, &courses_at)?
        .iter()
        .enumerate()
        .map(|(i, c)| parse_course(c, &format!("{}[{}]", courses_at, i)))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(PathOption { path_name, courses })
}

fn parse_path_group(value: &Value, at: &str) -> Result<PathGroup, CatalogError> {
    let obj = as_object(value, at)?;
    reject_unknown_keys(obj, GROUP_KEYS, at)?;
    let paths_at = format!("{}.paths", at);
    let raw_paths = obj.get("paths").ok_or_else(|| CatalogError::structure(at, "missing `paths`"))?;
    let paths = as_array(raw_paths, &paths_at)?
        .iter()
        .enumerate()
        .map(|(i, p)| parse_path_option(p, &format!("{}[{}]", paths_at, i)))
        .collect::<Result<Vec<_>, _>>()?;

    // el resto de campos se tipan con serde sobre un objeto sin `paths`
    let mut header = obj.clone();
    header.remove("paths");
    let head: Course = typed(&Value::Object(header), at)?;
    Ok(PathGroup { course: head.course, credits: head.credits, semester: head.semester, paths })
}

/// Clasifica un elemento de una lista de requisitos según sus claves.
pub fn parse_entry(value: &Value, at: &str) -> Result<RequirementEntry, CatalogError> {
    let obj = as_object(value, at)?;
    if obj.contains_key("paths") {
        if obj.contains_key("path_name") || obj.contains_key("courses") {
            return Err(CatalogError::structure(at, "entry mixes `paths` with `path_name`/`courses`"));
        }
        return Ok(RequirementEntry::Group(parse_path_group(value, at)?));
    }
    if obj.contains_key("path_name") || obj.contains_key("courses") {
        return Ok(RequirementEntry::Sequence(parse_path_option(value, at)?));
    }
    let course = parse_course(value, at)?;
    if course.code().is_some() {
        Ok(RequirementEntry::Course(course))
    } else {
        Ok(RequirementEntry::Slot(course))
    }
}

fn parse_buckets(obj: &Map<String, Value>, at: &str) -> Result<Vec<Bucket>, CatalogError> {
    let mut buckets = Vec::with_capacity(obj.len());
    for (name, raw) in obj.iter() {
        let bucket_at = format!("{}.{}", at, name);
        let entries = as_array(raw, &bucket_at)?
            .iter()
            .enumerate()
            .map(|(i, e)| parse_entry(e, &format!("{}[{}]", bucket_at, i)))
            .collect::<Result<Vec<_>, _>>()?;
        buckets.push(Bucket::new(name.clone(), entries));
    }
    Ok(buckets)
}

/// Clasifica una categoría completa.
pub fn parse_category(name: &str, value: &Value) -> Result<RequirementCategory, CatalogError> {
    let obj = as_object(value, name)?;
    if obj.is_empty() {
        return Err(CatalogError::structure(name, "category is empty"));
    }
    if obj.contains_key(CLASS_OPTIONS_KEY) {
        if obj.len() != 1 {
            return Err(CatalogError::structure(name, "`class_options` must be the only key of its category"));
        }
        let options_at = format!("{}.{}", name, CLASS_OPTIONS_KEY);
        let inner = as_object(&obj[CLASS_OPTIONS_KEY], &options_at)?;
        return Ok(RequirementCategory::ClassOptions(parse_buckets(inner, &options_at)?));
    }
    if obj.contains_key("paths") {
        return Ok(RequirementCategory::PathRequirement(parse_path_group(value, name)?));
    }
    if let Some((k, v)) = obj.iter().find(|(_, v)| !v.is_array()) {
        return Err(CatalogError::structure(
            format!("{}.{}", name, k),
            format!(
                "expected a list of requirements, found {} (a category is either requirement lists, `class_options`, or a path requirement with `paths`)",
                kind_of(v)
            ),
        ));
    }
    Ok(RequirementCategory::Buckets(parse_buckets(obj, name)?))
}

/// Clasifica todas las categorías del objeto raíz, en orden de documento.
pub fn parse_categories(root: &Map<String, Value>) -> Result<Vec<(String, RequirementCategory)>, CatalogError> {
    root.iter()
        .map(|(name, value)| Ok((name.clone(), parse_category(name, value)?)))
        .collect()
}

// ---------------------------------------------------------------------------
// Invariantes independientes del formato

fn check_course(course: &Course, at: &str) -> Result<(), CatalogError> {
    if course.course.trim().is_empty() {
        return Err(CatalogError::structure(at, "`course` must not be blank"));
    }
    for p in course.prereq.iter() {
        if CourseCode::parse(p).is_none() {
            return Err(CatalogError::structure(at, format!("prerequisite `{}` is not a course code", p)));
        }
    }
    Ok(())
}

fn check_path_option(path: &PathOption, at: &str) -> Result<(), CatalogError> {
    if path.path_name.trim().is_empty() {
        return Err(CatalogError::structure(at, "`path_name` must not be blank"));
    }
    if path.courses.is_empty() {
        return Err(CatalogError::structure(at, format!("path `{}` has no courses", path.path_name)));
    }
    for (i, c) in path.courses.iter().enumerate() {
        let c_at = format!("{}.courses[{}]", at, i);
        check_course(c, &c_at)?;
        if c.code().is_none() {
            return Err(CatalogError::structure(c_at, format!("`{}` inside a path must be a real course (\"CODE - Title\")", c.course)));
        }
    }
    Ok(())
}

fn check_path_group(group: &PathGroup, at: &str) -> Result<(), CatalogError> {
    if group.course.trim().is_empty() {
        return Err(CatalogError::structure(at, "`course` must not be blank"));
    }
    if group.paths.len() < 2 {
        return Err(CatalogError::structure(at, format!("path requirement `{}` needs at least two paths, found {}", group.course, group.paths.len())));
    }
    let mut names: HashSet<&str> = HashSet::new();
    for (i, p) in group.paths.iter().enumerate() {
        let p_at = format!("{}.paths[{}]", at, i);
        if !names.insert(p.path_name.as_str()) {
            return Err(CatalogError::structure(p_at, format!("duplicate path name `{}`", p.path_name)));
        }
        check_path_option(p, &p_at)?;
    }
    Ok(())
}

fn check_entry(entry: &RequirementEntry, at: &str) -> Result<(), CatalogError> {
    match entry {
        RequirementEntry::Group(g) => check_path_group(g, at),
        RequirementEntry::Sequence(s) => check_path_option(s, at),
        RequirementEntry::Course(c) | RequirementEntry::Slot(c) => check_course(c, at),
    }
}

/// Invariantes del catálogo ya tipado.
pub fn check_store(categories: &[(String, RequirementCategory)]) -> Result<(), CatalogError> {
    if categories.is_empty() {
        return Err(CatalogError::structure("<root>", "catalog has no categories"));
    }
    let mut names: HashSet<&str> = HashSet::new();
    for (name, category) in categories.iter() {
        if name.trim().is_empty() {
            return Err(CatalogError::structure("<root>", "category names must not be blank"));
        }
        if !names.insert(name.as_str()) {
            return Err(CatalogError::DuplicateKey { key: name.clone(), at: "<root>".to_string() });
        }
        match category {
            RequirementCategory::PathRequirement(g) => check_path_group(g, name)?,
            RequirementCategory::Buckets(buckets) | RequirementCategory::ClassOptions(buckets) => {
                let mut bucket_names: HashSet<&str> = HashSet::new();
                for b in buckets.iter() {
                    let b_at = format!("{}.{}", name, b.name);
                    if !bucket_names.insert(b.name.as_str()) {
                        return Err(CatalogError::DuplicateKey { key: b.name.clone(), at: name.clone() });
                    }
                    for (i, e) in b.entries.iter().enumerate() {
                        check_entry(e, &format!("{}[{}]", b_at, i))?;
                    }
                }
            }
        }
    }
    Ok(())
}
