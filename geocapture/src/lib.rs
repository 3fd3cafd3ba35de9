//! # geocapture
//!
//! Saisie interactive, normalisation et validation de géométries de levé
//! (Point, LineString, Polygon).
//!
//! ## Features
//!
//! - Normalisation du JSON saisi en géométrie canonique (fermeture des anneaux)
//! - Liste de sommets avec flag de complétion du polygone
//! - Validation stricte avant soumission, permissive pour l'aperçu
//! - Synchronisation liste de sommets ↔ représentation textuelle
//! - Types `geo` et `geojson` pour l'interopérabilité
//!
//! ## Usage
//!
//! ```rust,ignore
//! use geocapture::{EditSession, GeometryType, SubmissionForm};
//!
//! let mut session = EditSession::headless(GeometryType::Polygon);
//! session.on_add_point(0.0, 0.0)?;
//! session.on_add_point(1.0, 0.0)?;
//! session.on_add_point(1.0, 1.0)?;
//! session.on_finish_polygon()?;
//!
//! let record = session.on_submit(&SubmissionForm::new("Jane Doe", "2024-03-15"))?;
//! println!("{}", record.coordinates); // [[[0,0],[1,0],[1,1],[0,0]]]
//! ```

pub mod error;
pub mod normalize;
pub mod points;
pub mod render;
pub mod session;
pub mod submission;
pub mod sync;
pub mod types;
pub mod validate;

pub use error::{CaptureError, NormalizationError, ValidationError};
pub use normalize::{normalize, normalize_named};
pub use points::{parse_number, PointListState};
pub use render::{MapRenderer, NullRenderer, Preview, RecordingRenderer, Viewport};
pub use session::EditSession;
pub use submission::{NewRecord, SubmissionForm, DEFAULT_SRID};
pub use sync::{preview_from_text, project, project_text, PreviewOutcome};
pub use types::{Coordinate, GeometryPayload, GeometryType, Ring};
pub use validate::{shape_rejection, validate, validate_preview, validate_submission};
