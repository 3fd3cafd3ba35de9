//! Synchronisation entre la liste de sommets et la représentation textuelle
//!
//! - sens direct : `PointListState` → JSON attendu par le normaliseur
//! - sens inverse : texte édité → géométrie d'aperçu (jamais d'erreur propagée)

use serde_json::Value;
use tracing::warn;

use crate::error::{CaptureError, NormalizationError};
use crate::normalize::normalize;
use crate::types::{Coordinate, GeometryPayload, GeometryType};
use crate::validate::validate_preview;

/// Structure de coordonnées pour un type, à partir des sommets saisis
///
/// - Point : premier sommet, ou `[]`
/// - LineString : tous les sommets
/// - Polygon : les sommets dans un seul anneau, `[[]]` si vide
pub fn project(geometry_type: GeometryType, points: &[Coordinate]) -> Value {
    let coords = || Value::Array(points.iter().map(Coordinate::to_value).collect());

    match geometry_type {
        GeometryType::Point => points
            .first()
            .map(Coordinate::to_value)
            .unwrap_or_else(|| Value::Array(Vec::new())),
        GeometryType::LineString => coords(),
        GeometryType::Polygon => Value::Array(vec![coords()]),
    }
}

/// Représentation textuelle compacte (ex: `[[1,2],[3,4]]`)
pub fn project_text(geometry_type: GeometryType, points: &[Coordinate]) -> String {
    project(geometry_type, points).to_string()
}

/// Résultat d'une mise à jour de l'aperçu
#[derive(Debug, Clone, PartialEq)]
pub enum PreviewOutcome {
    /// Texte vide ou rien à dessiner
    Empty,
    /// Texte qui n'est pas du JSON
    ParseError(String),
    /// JSON valide mais structure incompatible avec le type
    Rejected(NormalizationError),
    /// Géométrie à afficher
    Rendered(GeometryPayload),
}

impl PreviewOutcome {
    pub fn payload(&self) -> Option<&GeometryPayload> {
        match self {
            PreviewOutcome::Rendered(payload) => Some(payload),
            _ => None,
        }
    }

    pub fn is_rendered(&self) -> bool {
        matches!(self, PreviewOutcome::Rendered(_))
    }
}

/// Parse le texte saisi ; `None` si le texte est vide
pub fn parse_text(text: &str) -> Result<Option<Value>, CaptureError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    serde_json::from_str(trimmed)
        .map(Some)
        .map_err(|e| CaptureError::ParseError(e.to_string()))
}

/// Texte édité → aperçu
///
/// Les erreurs de parsing et de normalisation sont journalisées et effacent
/// l'aperçu.
pub fn preview_from_text(geometry_type: GeometryType, text: &str) -> PreviewOutcome {
    let raw = match parse_text(text) {
        Ok(Some(raw)) => raw,
        Ok(None) => return PreviewOutcome::Empty,
        Err(e) => {
            warn!(error = %e, "Invalid coordinates JSON, clearing preview");
            return PreviewOutcome::ParseError(e.to_string());
        }
    };

    if is_blank_structure(&raw) {
        return PreviewOutcome::Empty;
    }

    match normalize(geometry_type, &raw) {
        Ok(payload) if validate_preview(geometry_type, &payload) => {
            PreviewOutcome::Rendered(payload)
        }
        Ok(_) => PreviewOutcome::Empty,
        Err(e) => {
            warn!(
                geometry_type = %geometry_type,
                error = %e,
                "Coordinates rejected, clearing preview"
            );
            PreviewOutcome::Rejected(e)
        }
    }
}

/// `[]` ou `[[]]` : aucune coordonnée saisie
fn is_blank_structure(raw: &Value) -> bool {
    match raw.as_array() {
        Some(items) if items.is_empty() => true,
        Some(items) if items.len() == 1 => {
            items[0].as_array().is_some_and(|ring| ring.is_empty())
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pts(coords: &[(f64, f64)]) -> Vec<Coordinate> {
        coords.iter().copied().map(Coordinate::from).collect()
    }

    #[test]
    fn test_project_point() {
        assert_eq!(project_text(GeometryType::Point, &[]), "[]");
        assert_eq!(
            project_text(GeometryType::Point, &pts(&[(10.5, -3.2), (1.0, 1.0)])),
            "[10.5,-3.2]"
        );
    }

    #[test]
    fn test_project_linestring() {
        assert_eq!(project_text(GeometryType::LineString, &[]), "[]");
        assert_eq!(
            project_text(GeometryType::LineString, &pts(&[(1.0, 2.0), (3.0, 4.0)])),
            "[[1,2],[3,4]]"
        );
    }

    #[test]
    fn test_project_polygon() {
        assert_eq!(project_text(GeometryType::Polygon, &[]), "[[]]");
        assert_eq!(
            project(GeometryType::Polygon, &pts(&[(0.0, 0.0), (1.0, 0.0)])),
            json!([[[0, 0], [1, 0]]])
        );
    }

    #[test]
    fn test_round_trip_linestring() {
        let points = pts(&[(1.0, 2.0), (3.0, 4.0)]);
        let text = project_text(GeometryType::LineString, &points);
        let outcome = preview_from_text(GeometryType::LineString, &text);
        assert_eq!(
            outcome,
            PreviewOutcome::Rendered(GeometryPayload::LineString(points))
        );
    }

    #[test]
    fn test_blank_text_is_empty() {
        assert_eq!(preview_from_text(GeometryType::Point, ""), PreviewOutcome::Empty);
        assert_eq!(
            preview_from_text(GeometryType::Polygon, "  \n\t "),
            PreviewOutcome::Empty
        );
    }

    #[test]
    fn test_not_json() {
        let outcome = preview_from_text(GeometryType::Point, "not json");
        assert!(matches!(outcome, PreviewOutcome::ParseError(_)));
        assert!(outcome.payload().is_none());
    }

    #[test]
    fn test_rejected_shape() {
        let outcome = preview_from_text(GeometryType::Point, "[[1,2]]");
        assert!(matches!(
            outcome,
            PreviewOutcome::Rejected(NormalizationError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_empty_projection_has_no_preview() {
        for t in [GeometryType::Point, GeometryType::LineString, GeometryType::Polygon] {
            let text = project_text(t, &[]);
            let outcome = preview_from_text(t, &text);
            assert!(!outcome.is_rendered(), "{} with no points", t);
        }
    }

    #[test]
    fn test_blank_structures() {
        assert_eq!(preview_from_text(GeometryType::Point, "[]"), PreviewOutcome::Empty);
        assert_eq!(preview_from_text(GeometryType::Polygon, "[[]]"), PreviewOutcome::Empty);
        assert!(matches!(
            preview_from_text(GeometryType::Point, "[[1]]"),
            PreviewOutcome::Rejected(_)
        ));
    }

    #[test]
    fn test_parse_text() {
        assert_eq!(parse_text("   "), Ok(None));
        assert_eq!(parse_text("[1, 2]"), Ok(Some(json!([1, 2]))));
        assert!(matches!(parse_text("[1,"), Err(CaptureError::ParseError(_))));
    }
}
