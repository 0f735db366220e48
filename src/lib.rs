// Biblioteca raíz del crate `quickplan`.
// Catálogo de requisitos, generación de horarios de oferta y asesor de
// recomendaciones (CLI y formulario web). `main` sólo parsea argumentos y
// delega en estos módulos.
pub mod advisor;
pub mod algorithm;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod server;

/// Reexports para el binario y los tests de integración
pub use advisor::{BedrockOracle, RecommendationClient, RecommendationOracle};
pub use catalog::{load_catalog, save_catalog, CatalogStore};
pub use config::AppConfig;
pub use server::{run_server, AppState};
