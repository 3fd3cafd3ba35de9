//! Validation structurelle des géométries avant soumission ou aperçu

use serde_json::Value;

use crate::error::ValidationError;
use crate::types::{GeometryPayload, GeometryType};

/// Nombre minimum de sommets distincts d'un polygone
const MIN_POLYGON_VERTICES: usize = 3;

/// Nombre minimum de points d'une LineString
const MIN_LINE_VERTICES: usize = 2;

/// Validation stricte d'une géométrie normalisée
///
/// Un payload d'un autre type que `geometry_type` est rejeté avec l'erreur du
/// type attendu.
pub fn validate(
    geometry_type: GeometryType,
    payload: &GeometryPayload,
) -> Result<(), ValidationError> {
    match (geometry_type, payload) {
        (GeometryType::Point, GeometryPayload::Point(c)) => {
            if c.x.is_finite() && c.y.is_finite() {
                Ok(())
            } else {
                Err(ValidationError::InvalidPointArity)
            }
        }
        (GeometryType::Point, _) => Err(ValidationError::InvalidPointArity),

        (GeometryType::LineString, GeometryPayload::LineString(coords)) => {
            if coords.len() >= MIN_LINE_VERTICES {
                Ok(())
            } else {
                Err(ValidationError::InsufficientLineVertices {
                    found: coords.len(),
                })
            }
        }
        (GeometryType::LineString, other) => Err(ValidationError::InsufficientLineVertices {
            found: other.vertex_count(),
        }),

        (GeometryType::Polygon, GeometryPayload::Polygon(ring)) => {
            let distinct = ring.distinct_vertices();
            if distinct >= MIN_POLYGON_VERTICES
                && ring.len() > MIN_POLYGON_VERTICES
                && ring.is_closed()
            {
                Ok(())
            } else {
                Err(ValidationError::InsufficientPolygonVertices { found: distinct })
            }
        }
        (GeometryType::Polygon, other) => Err(ValidationError::InsufficientPolygonVertices {
            found: other.vertex_count(),
        }),
    }
}

/// Validation de soumission : `validate` + polygone fermé explicitement
pub fn validate_submission(
    geometry_type: GeometryType,
    payload: &GeometryPayload,
    polygon_complete: bool,
) -> Result<(), ValidationError> {
    validate(geometry_type, payload)?;

    if geometry_type == GeometryType::Polygon && !polygon_complete {
        return Err(ValidationError::PolygonNotFinished);
    }

    Ok(())
}

/// Erreur de soumission pour des coordonnées qui ne se normalisent pas
///
/// `found` compte les paires `[x, y]` bien formées de la séquence (ou du
/// premier anneau pour un polygone).
pub fn shape_rejection(geometry_type: GeometryType, raw: &Value) -> ValidationError {
    match geometry_type {
        GeometryType::Point => ValidationError::InvalidPointArity,
        GeometryType::LineString => ValidationError::InsufficientLineVertices {
            found: count_pairs(raw),
        },
        GeometryType::Polygon => ValidationError::InsufficientPolygonVertices {
            found: raw
                .as_array()
                .and_then(|rings| rings.first())
                .map_or(0, count_pairs),
        },
    }
}

fn count_pairs(raw: &Value) -> usize {
    raw.as_array().map_or(0, |items| {
        items
            .iter()
            .filter(|item| {
                item.as_array()
                    .is_some_and(|pair| pair.len() == 2 && pair.iter().all(Value::is_number))
            })
            .count()
    })
}

/// Validation permissive de l'aperçu : rien à dessiner → pas d'aperçu
pub fn validate_preview(geometry_type: GeometryType, payload: &GeometryPayload) -> bool {
    payload.geometry_type() == geometry_type && !payload.is_empty()
}
