//! Liste ordonnée des sommets saisis pendant une session

use tracing::debug;

use crate::error::CaptureError;
use crate::types::{Coordinate, GeometryType};

/// Nombre minimum de sommets pour fermer un polygone
const MIN_POLYGON_POINTS: usize = 3;

/// Sommets saisis + flag de complétion du polygone
#[derive(Debug, Clone)]
pub struct PointListState {
    geometry_type: GeometryType,
    points: Vec<Coordinate>,
    polygon_complete: bool,
}

impl PointListState {
    pub fn new(geometry_type: GeometryType) -> Self {
        Self {
            geometry_type,
            points: Vec::new(),
            polygon_complete: geometry_type.default_completion(),
        }
    }

    /// Ajoute un sommet et retourne la nouvelle longueur
    ///
    /// Le flag de complétion n'est pas modifié.
    pub fn add_point(&mut self, x: f64, y: f64) -> Result<usize, CaptureError> {
        if !x.is_finite() {
            return Err(CaptureError::invalid_number(x));
        }
        if !y.is_finite() {
            return Err(CaptureError::invalid_number(y));
        }

        self.points.push(Coordinate::new(x, y));

        debug!(x, y, len = self.points.len(), "Point added");
        Ok(self.points.len())
    }

    /// Vide la liste, le flag reprend sa valeur par défaut
    pub fn reset(&mut self) {
        self.points.clear();
        self.polygon_complete = self.geometry_type.default_completion();
    }

    /// Change de type de géométrie et vide la liste
    pub fn reset_for(&mut self, geometry_type: GeometryType) {
        self.geometry_type = geometry_type;
        self.reset();
    }

    /// Remplace les sommets (ex: saisis sous forme de texte), flag réinitialisé
    pub fn replace_points(&mut self, points: Vec<Coordinate>) {
        self.points = points;
        self.polygon_complete = self.geometry_type.default_completion();
    }

    /// Ferme le polygone (au moins 3 sommets) ; sans effet pour les autres types
    pub fn finish_polygon(&mut self) -> Result<(), CaptureError> {
        if self.geometry_type != GeometryType::Polygon {
            debug!(geometry_type = %self.geometry_type, "Nothing to finish");
            return Ok(());
        }
        if self.points.len() < MIN_POLYGON_POINTS {
            return Err(CaptureError::InsufficientVertices {
                found: self.points.len(),
            });
        }
        self.polygon_complete = true;
        Ok(())
    }

    pub fn geometry_type(&self) -> GeometryType {
        self.geometry_type
    }

    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.polygon_complete
    }
}

/// Parse un nombre saisi par l'utilisateur
pub fn parse_number(raw: &str) -> Result<f64, CaptureError> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| CaptureError::invalid_number(raw.trim()))?;

    if value.is_finite() {
        Ok(value)
    } else {
        Err(CaptureError::invalid_number(raw.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_point_returns_len() {
        let mut state = PointListState::new(GeometryType::LineString);
        assert_eq!(state.add_point(1.0, 2.0), Ok(1));
        assert_eq!(state.add_point(3.0, 4.0), Ok(2));
        assert_eq!(
            state.points(),
            &[Coordinate::new(1.0, 2.0), Coordinate::new(3.0, 4.0)]
        );
    }

    #[test]
    fn test_add_point_rejects_non_finite() {
        let mut state = PointListState::new(GeometryType::Point);
        assert!(matches!(
            state.add_point(f64::NAN, 1.0),
            Err(CaptureError::InvalidNumber(_))
        ));
        assert!(matches!(
            state.add_point(1.0, f64::INFINITY),
            Err(CaptureError::InvalidNumber(_))
        ));
        assert!(state.is_empty());
    }

    #[test]
    fn test_completion_default_per_type() {
        let mut state = PointListState::new(GeometryType::Polygon);
        assert!(!state.is_complete());
        for t in [GeometryType::Point, GeometryType::LineString] {
            state.reset_for(t);
            assert!(state.is_complete());
        }
        state.reset_for(GeometryType::Polygon);
        assert!(!state.is_complete());
    }

    #[test]
    fn test_finish_polygon_requires_three_points() {
        let mut state = PointListState::new(GeometryType::Polygon);
        state.add_point(0.0, 0.0).unwrap();
        state.add_point(1.0, 0.0).unwrap();

        assert_eq!(
            state.finish_polygon(),
            Err(CaptureError::InsufficientVertices { found: 2 })
        );
        assert!(!state.is_complete());

        state.add_point(1.0, 1.0).unwrap();
        assert_eq!(state.finish_polygon(), Ok(()));
        assert!(state.is_complete());
    }

    #[test]
    fn test_add_point_keeps_finished_polygon() {
        let mut state = PointListState::new(GeometryType::Polygon);
        for (x, y) in [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)] {
            state.add_point(x, y).unwrap();
        }
        state.finish_polygon().unwrap();
        state.add_point(0.0, 1.0).unwrap();
        assert!(state.is_complete());
        assert_eq!(state.len(), 4);
    }

    #[test]
    fn test_finish_ignored_for_other_types() {
        let mut state = PointListState::new(GeometryType::LineString);
        state.add_point(0.0, 0.0).unwrap();
        state.add_point(1.0, 1.0).unwrap();
        assert_eq!(state.finish_polygon(), Ok(()));
        assert!(state.is_complete());

        state.reset_for(GeometryType::Point);
        assert_eq!(state.finish_polygon(), Ok(()));
        assert!(state.is_empty());
    }

    #[test]
    fn test_replace_points_resets_flag() {
        let mut state = PointListState::new(GeometryType::Polygon);
        for (x, y) in [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)] {
            state.add_point(x, y).unwrap();
        }
        state.finish_polygon().unwrap();
        state.replace_points(vec![Coordinate::new(5.0, 5.0)]);
        assert_eq!(state.points(), &[Coordinate::new(5.0, 5.0)]);
        assert!(!state.is_complete());
    }

    #[test]
    fn test_reset_clears_points() {
        let mut state = PointListState::new(GeometryType::Polygon);
        for (x, y) in [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)] {
            state.add_point(x, y).unwrap();
        }
        state.finish_polygon().unwrap();
        state.reset();
        assert!(state.is_empty());
        assert!(!state.is_complete());
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number(" 10.5 "), Ok(10.5));
        assert_eq!(parse_number("-3.2"), Ok(-3.2));
        assert!(parse_number("").is_err());
        assert!(parse_number("abc").is_err());
        assert!(parse_number("NaN").is_err());
        assert!(parse_number("inf").is_err());
    }
}
