//! Types de données principaux

use std::fmt;
use std::str::FromStr;

use geo::{Coord, LineString, Point, Polygon};
use serde::ser::{SerializeStruct, SerializeTuple};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use crate::error::NormalizationError;

/// Plus grand entier représentable exactement par un f64 (2^53)
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Type de géométrie saisi pendant une session d'édition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeometryType {
    Point,
    LineString,
    Polygon,
}

impl GeometryType {
    /// Nom GeoJSON du type
    pub fn as_str(&self) -> &'static str {
        match self {
            GeometryType::Point => "Point",
            GeometryType::LineString => "LineString",
            GeometryType::Polygon => "Polygon",
        }
    }

    /// Valeur par défaut du flag de complétion pour ce type
    pub fn default_completion(&self) -> bool {
        !matches!(self, GeometryType::Polygon)
    }
}

impl fmt::Display for GeometryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GeometryType {
    type Err = NormalizationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Point" => Ok(GeometryType::Point),
            "LineString" => Ok(GeometryType::LineString),
            "Polygon" => Ok(GeometryType::Polygon),
            other => Err(NormalizationError::UnsupportedGeometryType(other.to_string())),
        }
    }
}

/// Paire de coordonnées (x, y)
///
/// Easting/northing ou lon/lat selon le SRID, qui n'est pas interprété ici.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
}

impl Coordinate {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Représentation JSON `[x, y]`, entiers écrits sans partie décimale
    pub fn to_value(&self) -> Value {
        Value::Array(vec![json_number(self.x), json_number(self.y)])
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<Coordinate> for Coord {
    fn from(c: Coordinate) -> Self {
        Coord { x: c.x, y: c.y }
    }
}

impl Serialize for Coordinate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(2)?;
        tuple.serialize_element(&Axis(self.x))?;
        tuple.serialize_element(&Axis(self.y))?;
        tuple.end()
    }
}

/// Composante d'une coordonnée, sérialisée comme le ferait `JSON.stringify`
struct Axis(f64);

impl Serialize for Axis {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if is_integral(self.0) {
            serializer.serialize_i64(self.0 as i64)
        } else {
            serializer.serialize_f64(self.0)
        }
    }
}

fn is_integral(v: f64) -> bool {
    v.is_finite() && v.fract() == 0.0 && v.abs() < MAX_SAFE_INTEGER
}

/// Convertit un f64 en nombre JSON (`1` plutôt que `1.0`)
pub(crate) fn json_number(v: f64) -> Value {
    if is_integral(v) {
        Value::from(v as i64)
    } else {
        serde_json::Number::from_f64(v)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

/// Anneau extérieur d'un polygone
///
/// La construction ferme l'anneau dès qu'il compte plus de 2 sommets.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Ring(Vec<Coordinate>);

impl Ring {
    /// Construit un anneau, en ajoutant une copie du premier sommet si nécessaire
    pub fn new(mut vertices: Vec<Coordinate>) -> Self {
        if vertices.len() > 2 {
            let first = vertices[0];
            let last = vertices[vertices.len() - 1];
            // Égalité stricte, pas de tolérance
            if first != last {
                vertices.push(first);
            }
        }
        Self(vertices)
    }

    pub fn vertices(&self) -> &[Coordinate] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Premier sommet égal au dernier
    pub fn is_closed(&self) -> bool {
        match (self.0.first(), self.0.last()) {
            (Some(first), Some(last)) => self.0.len() > 1 && first == last,
            _ => false,
        }
    }

    /// Nombre de sommets distincts (égalité stricte)
    pub fn distinct_vertices(&self) -> usize {
        let mut distinct: Vec<Coordinate> = Vec::with_capacity(self.0.len());
        for c in &self.0 {
            if !distinct.contains(c) {
                distinct.push(*c);
            }
        }
        distinct.len()
    }

    fn to_value(&self) -> Value {
        Value::Array(self.0.iter().map(Coordinate::to_value).collect())
    }
}

/// Géométrie canonique `{type, coordinates}` utilisée pour l'aperçu et la soumission
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryPayload {
    Point(Coordinate),
    LineString(Vec<Coordinate>),
    /// Un seul anneau, les trous ne sont pas supportés
    Polygon(Ring),
}

impl GeometryPayload {
    pub fn geometry_type(&self) -> GeometryType {
        match self {
            GeometryPayload::Point(_) => GeometryType::Point,
            GeometryPayload::LineString(_) => GeometryType::LineString,
            GeometryPayload::Polygon(_) => GeometryType::Polygon,
        }
    }

    /// Valeur JSON du champ `coordinates`
    pub fn coordinates_value(&self) -> Value {
        match self {
            GeometryPayload::Point(c) => c.to_value(),
            GeometryPayload::LineString(coords) => {
                Value::Array(coords.iter().map(Coordinate::to_value).collect())
            }
            GeometryPayload::Polygon(ring) => Value::Array(vec![ring.to_value()]),
        }
    }

    /// Nombre total de sommets (anneau fermé compris)
    pub fn vertex_count(&self) -> usize {
        match self {
            GeometryPayload::Point(_) => 1,
            GeometryPayload::LineString(coords) => coords.len(),
            GeometryPayload::Polygon(ring) => ring.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.vertex_count() == 0
    }

    /// Conversion vers une géométrie GeoJSON
    pub fn to_geojson(&self) -> geojson::Geometry {
        let value = match self {
            GeometryPayload::Point(c) => geojson::Value::Point(vec![c.x, c.y]),
            GeometryPayload::LineString(coords) => {
                geojson::Value::LineString(coords.iter().map(|c| vec![c.x, c.y]).collect())
            }
            GeometryPayload::Polygon(ring) => geojson::Value::Polygon(vec![ring
                .vertices()
                .iter()
                .map(|c| vec![c.x, c.y])
                .collect()]),
        };
        geojson::Geometry::new(value)
    }

    /// Conversion vers les types `geo`
    pub fn to_geo(&self) -> geo::Geometry<f64> {
        match self {
            GeometryPayload::Point(c) => geo::Geometry::Point(Point::new(c.x, c.y)),
            GeometryPayload::LineString(coords) => geo::Geometry::LineString(LineString::new(
                coords.iter().copied().map(Coord::from).collect(),
            )),
            GeometryPayload::Polygon(ring) => {
                let exterior =
                    LineString::new(ring.vertices().iter().copied().map(Coord::from).collect());
                geo::Geometry::Polygon(Polygon::new(exterior, vec![]))
            }
        }
    }
}

impl Serialize for GeometryPayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("GeometryPayload", 2)?;
        state.serialize_field("type", &self.geometry_type())?;
        state.serialize_field("coordinates", &self.coordinates_value())?;
        state.end()
    }
}
