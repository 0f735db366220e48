// Lectura/escritura del catálogo en JSON.
//
// Formato en disco (lo que escribe `save_catalog`):
//   {"version": 1, "categories": {<nombre>: <categoría>, ...}}
// También se acepta el mapa de categorías "desnudo" (sin envoltorio), que es
// la forma que producían los scripts de preprocesamiento.
use serde_json::{Map, Value};
use std::fs::{self, create_dir_all};
use std::io::ErrorKind;
use std::path::Path;
use tracing::info;

use super::validate;
use super::CatalogStore;
use crate::error::CatalogError;
use crate::models::{Bucket, RequirementCategory};

pub const CATALOG_FORMAT_VERSION: u64 = 1;

fn envelope(root: &Map<String, Value>) -> Option<(&Value, &Value)> {
    if root.len() == 2 {
        if let (Some(v), Some(c)) = (root.get("version"), root.get("categories")) {
            return Some((v, c));
        }
    }
    None
}

impl CatalogStore {
    /// Parsea y valida un documento completo. Rechaza claves duplicadas antes
    /// de que serde_json las colapse.
    pub fn from_json(text: &str) -> Result<CatalogStore, CatalogError> {
        validate::check_duplicate_keys(text)?;
        let root: Value = serde_json::from_str(text)?;
        let root = root
            .as_object()
            .ok_or_else(|| CatalogError::structure("<root>", "catalog document must be a JSON object"))?;

        let categories = match envelope(root) {
            Some((version, categories)) => {
                match version.as_u64() {
                    Some(CATALOG_FORMAT_VERSION) => {}
                    _ => {
                        return Err(CatalogError::structure(
                            "version",
                            format!("unsupported catalog version {} (expected {})", version, CATALOG_FORMAT_VERSION),
                        ));
                    }
                }
                categories
                    .as_object()
                    .ok_or_else(|| CatalogError::structure("categories", "expected an object of categories"))?
            }
            None => root,
        };

        CatalogStore::new(validate::parse_categories(categories)?)
    }

    /// Mapa de categorías con la misma forma que acepta `from_json`.
    pub fn categories_value(&self) -> Result<Value, CatalogError> {
        let mut out = Map::new();
        for (name, category) in self.categories() {
            out.insert(name.to_string(), category_value(category)?);
        }
        Ok(Value::Object(out))
    }

    pub fn to_value(&self) -> Result<Value, CatalogError> {
        Ok(serde_json::json!({
            "version": CATALOG_FORMAT_VERSION,
            "categories": self.categories_value()?,
        }))
    }

    pub fn to_json(&self) -> Result<String, CatalogError> {
        Ok(serde_json::to_string_pretty(&self.to_value()?)?)
    }
}

fn buckets_value(buckets: &[Bucket]) -> Result<Value, serde_json::Error> {
    let mut out = Map::new();
    for b in buckets {
        // RequirementEntry serializa cada variante con su forma de archivo
        out.insert(b.name.clone(), serde_json::to_value(&b.entries)?);
    }
    Ok(Value::Object(out))
}

fn category_value(category: &RequirementCategory) -> Result<Value, serde_json::Error> {
    match category {
        RequirementCategory::Buckets(b) => buckets_value(b),
        RequirementCategory::ClassOptions(b) => Ok(serde_json::json!({ "class_options": buckets_value(b)? })),
        RequirementCategory::PathRequirement(g) => serde_json::to_value(g),
    }
}

/// Carga el catálogo. `NotFound` si el archivo no existe (recuperable);
/// cualquier otro fallo es fatal y no se devuelven datos parciales.
pub fn load_catalog(path: impl AsRef<Path>) -> Result<CatalogStore, CatalogError> {
    let path = path.as_ref();
    let text = match fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(CatalogError::NotFound { path: path.to_path_buf() });
        }
        Err(e) => return Err(CatalogError::Io { path: path.to_path_buf(), source: e }),
    };
    let store = CatalogStore::from_json(&text)?;
    info!("loaded catalog from {} ({} leaf courses)", path.display(), store.leaf_count());
    Ok(store)
}

/// Escribe el catálogo (reemplaza el archivo completo, crea directorios).
pub fn save_catalog(store: &CatalogStore, path: impl AsRef<Path>) -> Result<(), CatalogError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_dir_all(parent).map_err(|e| CatalogError::Io { path: parent.to_path_buf(), source: e })?;
    }
    let text = store.to_json()?;
    fs::write(path, text).map_err(|e| CatalogError::Io { path: path.to_path_buf(), source: e })?;
    info!("catalog saved to {}", path.display());
    Ok(())
}
