//! Interface avec le composant de rendu cartographique
//!
//! Le cœur pousse l'aperçu (ou son effacement) et n'interroge jamais la carte.

use geo::{BoundingRect, Coord, Rect};

use crate::types::GeometryPayload;

/// Niveau de zoom utilisé quand l'emprise est réduite à un point
pub const POINT_ZOOM: u8 = 14;

/// Cadrage de la carte sur l'aperçu
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Viewport {
    /// Ajuster la vue à l'emprise
    Fit(Rect<f64>),
    /// Centrer sur une coordonnée avec un zoom fixe
    Center { center: Coord<f64>, zoom: u8 },
}

/// Géométrie à afficher avec son cadrage
#[derive(Debug, Clone, PartialEq)]
pub struct Preview {
    pub payload: GeometryPayload,
    pub viewport: Option<Viewport>,
}

impl Preview {
    pub fn new(payload: GeometryPayload) -> Self {
        let viewport = viewport_for(&payload);
        Self { payload, viewport }
    }
}

/// Emprise de la géométrie, ou centrage si elle est dégénérée
fn viewport_for(payload: &GeometryPayload) -> Option<Viewport> {
    let rect = payload.to_geo().bounding_rect()?;
    if rect.width() == 0.0 && rect.height() == 0.0 {
        Some(Viewport::Center {
            center: rect.min(),
            zoom: POINT_ZOOM,
        })
    } else {
        Some(Viewport::Fit(rect))
    }
}

/// Composant de rendu : reçoit l'aperçu courant, `None` pour effacer
pub trait MapRenderer {
    fn render(&mut self, preview: Option<&Preview>);
}

/// Rendu sans effet
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl MapRenderer for NullRenderer {
    fn render(&mut self, _preview: Option<&Preview>) {}
}

/// Conserve l'historique des rendus (inspection, tests)
#[derive(Debug, Default, Clone)]
pub struct RecordingRenderer {
    pub frames: Vec<Option<Preview>>,
}

impl RecordingRenderer {
    /// Dernier rendu, `None` si rien n'a été rendu ou si la carte est vide
    pub fn current(&self) -> Option<&Preview> {
        self.frames.last().and_then(Option::as_ref)
    }
}

impl MapRenderer for RecordingRenderer {
    fn render(&mut self, preview: Option<&Preview>) {
        self.frames.push(preview.cloned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Coordinate;

    #[test]
    fn test_point_viewport_is_centered() {
        let preview = Preview::new(GeometryPayload::Point(Coordinate::new(10.5, -3.2)));
        assert_eq!(
            preview.viewport,
            Some(Viewport::Center {
                center: Coord { x: 10.5, y: -3.2 },
                zoom: POINT_ZOOM
            })
        );
    }

    #[test]
    fn test_line_viewport_fits_bounds() {
        let preview = Preview::new(GeometryPayload::LineString(vec![
            Coordinate::new(1.0, 2.0),
            Coordinate::new(3.0, 5.0),
        ]));
        match preview.viewport {
            Some(Viewport::Fit(rect)) => {
                assert_eq!(rect.min(), Coord { x: 1.0, y: 2.0 });
                assert_eq!(rect.max(), Coord { x: 3.0, y: 5.0 });
            }
            other => panic!("unexpected viewport: {:?}", other),
        }
    }

    #[test]
    fn test_recording_renderer() {
        let mut renderer = RecordingRenderer::default();
        let preview = Preview::new(GeometryPayload::Point(Coordinate::new(0.0, 0.0)));
        renderer.render(Some(&preview));
        assert!(renderer.current().is_some());
        renderer.render(None);
        assert!(renderer.current().is_none());
        assert_eq!(renderer.frames.len(), 2);
    }
}
