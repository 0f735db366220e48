//! Módulo `advisor`: recomendaciones de horario para un estudiante.
//!
//! - `prompt`: textos enviados al modelo
//! - `oracle`: interfaz del servicio remoto y su implementación HTTP
//! - `client`: flujo recomendación + formato, fallos reducidos a `None`
//! - `postfilter`: verificación local contra el catálogo

pub mod client;
pub mod oracle;
pub mod postfilter;
pub mod prompt;

pub use client::{parse_generation, RecommendationClient};
pub use oracle::{BedrockOracle, RecommendationOracle};
pub use postfilter::{check_recommendations, FilterReport, Issue, RecommendationCheck};
pub use prompt::{build_format_prompt, build_schedule_prompt};
