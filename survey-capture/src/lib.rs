//! # survey-capture
//!
//! Saisie de géométries de levé et échange avec le record store.
//!
//! ## Features
//!
//! - Client HTTP du record store (recherche, création, détail, santé)
//! - Session d'édition interactive en ligne de commande
//! - Aperçu dans le terminal (GeoJSON, WKT, cadrage)
//!
//! ## Usage CLI
//!
//! ```bash
//! # Saisie d'un polygone et création de l'enregistrement
//! survey-capture capture --type Polygon --point 0,0 --point 1,0 --point 1,1 --finish \
//!     --owner "Jane Doe" --date 2024-03-15
//!
//! # Recherche par propriétaire
//! survey-capture search --owner jane
//!
//! # Session interactive
//! survey-capture session
//! ```

pub mod config;
pub mod display;
pub mod interactive;
pub mod store;
pub mod terminal;

pub use config::ClientConfig;
pub use store::{HealthStatus, Record, RecordStore, StoreError};
pub use terminal::TerminalRenderer;
