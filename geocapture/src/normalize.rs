//! Normalisation des coordonnées brutes en géométrie canonique
//!
//! C'est la frontière entre le JSON non typé saisi par l'utilisateur et les
//! types stricts du crate : toute structure qui ne correspond pas au type de
//! géométrie est rejetée ici.

use serde_json::Value;
use tracing::debug;

use crate::error::NormalizationError;
use crate::types::{Coordinate, GeometryPayload, GeometryType, Ring};

/// Normalise une structure de coordonnées pour un type de géométrie
///
/// - Point : la paire est reprise telle quelle
/// - LineString : la séquence est reprise telle quelle, sans fermeture
/// - Polygon : seul `raw[0]` est conservé, fermé s'il compte plus de 2 sommets
///
/// Idempotent : un anneau déjà fermé ne reçoit pas de second sommet de fermeture.
pub fn normalize(
    geometry_type: GeometryType,
    raw: &Value,
) -> Result<GeometryPayload, NormalizationError> {
    match geometry_type {
        GeometryType::Point => parse_pair(geometry_type, raw).map(GeometryPayload::Point),
        GeometryType::LineString => {
            parse_sequence(geometry_type, raw).map(GeometryPayload::LineString)
        }
        GeometryType::Polygon => normalize_polygon(raw),
    }
}

/// Variante prenant le nom du type tel que saisi (ex: `"Polygon"`)
pub fn normalize_named(
    type_name: &str,
    raw: &Value,
) -> Result<GeometryPayload, NormalizationError> {
    let geometry_type: GeometryType = type_name.parse()?;
    normalize(geometry_type, raw)
}

fn normalize_polygon(raw: &Value) -> Result<GeometryPayload, NormalizationError> {
    let rings = raw.as_array().ok_or_else(|| {
        NormalizationError::shape_mismatch(GeometryType::Polygon, "expected an array of rings")
    })?;

    let Some(outer) = rings.first() else {
        return Err(NormalizationError::shape_mismatch(
            GeometryType::Polygon,
            "no ring found",
        ));
    };

    if rings.len() > 1 {
        debug!(dropped = rings.len() - 1, "Polygon holes are not supported, keeping outer ring");
    }

    let vertices = parse_sequence(GeometryType::Polygon, outer)?;
    let before = vertices.len();
    let ring = Ring::new(vertices);
    if ring.len() != before {
        debug!(vertices = before, "Closed polygon ring");
    }

    Ok(GeometryPayload::Polygon(ring))
}

/// Séquence de paires `[[x, y], ...]`
fn parse_sequence(
    geometry_type: GeometryType,
    raw: &Value,
) -> Result<Vec<Coordinate>, NormalizationError> {
    let items = raw.as_array().ok_or_else(|| {
        NormalizationError::shape_mismatch(geometry_type, "expected an array of [x, y] pairs")
    })?;

    items
        .iter()
        .map(|item| parse_pair(geometry_type, item))
        .collect()
}

/// Paire `[x, y]` de deux nombres exactement
fn parse_pair(geometry_type: GeometryType, raw: &Value) -> Result<Coordinate, NormalizationError> {
    let pair = raw.as_array().ok_or_else(|| {
        NormalizationError::shape_mismatch(geometry_type, format!("expected [x, y], got {}", raw))
    })?;

    if pair.len() != 2 {
        return Err(NormalizationError::shape_mismatch(
            geometry_type,
            format!("expected exactly 2 numbers, got {}", pair.len()),
        ));
    }

    match (pair[0].as_f64(), pair[1].as_f64()) {
        (Some(x), Some(y)) => Ok(Coordinate::new(x, y)),
        _ => Err(NormalizationError::shape_mismatch(
            geometry_type,
            format!("non-numeric coordinate {}", raw),
        )),
    }
}
