//! Session d'édition : état possédé par l'appelant et commandes utilisateur
//!
//! Chaque commande s'exécute entièrement de façon synchrone : mutation de la
//! liste, recalcul de la représentation textuelle puis rafraîchissement de
//! l'aperçu. Aucun observateur ne voit d'état intermédiaire.

use tracing::{debug, info};

use crate::error::{CaptureError, NormalizationError};
use crate::normalize::normalize;
use crate::points::PointListState;
use crate::render::{MapRenderer, NullRenderer, Preview};
use crate::submission::{NewRecord, SubmissionForm};
use crate::sync::{parse_text, preview_from_text, project_text, PreviewOutcome};
use crate::types::{Coordinate, GeometryPayload, GeometryType};
use crate::validate::{shape_rejection, validate_submission};

/// Session d'édition d'une géométrie
#[derive(Debug)]
pub struct EditSession<R: MapRenderer = NullRenderer> {
    points: PointListState,
    text: String,
    outcome: PreviewOutcome,
    preview: Option<Preview>,
    renderer: R,
}

impl EditSession<NullRenderer> {
    /// Session sans rendu cartographique
    pub fn headless(geometry_type: GeometryType) -> Self {
        Self::new(geometry_type, NullRenderer)
    }
}

impl<R: MapRenderer> EditSession<R> {
    pub fn new(geometry_type: GeometryType, renderer: R) -> Self {
        let mut session = Self {
            points: PointListState::new(geometry_type),
            text: String::new(),
            outcome: PreviewOutcome::Empty,
            preview: None,
            renderer,
        };
        session.sync_from_points();
        session
    }

    /// Changement de type : la liste est vidée
    pub fn on_type_change(&mut self, geometry_type: GeometryType) {
        debug!(
            from = %self.points.geometry_type(),
            to = %geometry_type,
            "Geometry type changed"
        );
        self.points.reset_for(geometry_type);
        self.sync_from_points();
    }

    /// Ajout d'un sommet ; une saisie invalide ne modifie rien
    pub fn on_add_point(&mut self, x: f64, y: f64) -> Result<usize, CaptureError> {
        let len = self.points.add_point(x, y)?;
        self.sync_from_points();
        Ok(len)
    }

    /// Fermeture explicite du polygone
    ///
    /// Si le texte a été édité directement, c'est son anneau qui est fermé et
    /// qui devient la liste de sommets. En cas d'échec rien n'est modifié.
    pub fn on_finish_polygon(&mut self) -> Result<(), CaptureError> {
        let mut points = self.points.clone();
        if let Some(vertices) = self.edited_ring() {
            debug!(vertices = vertices.len(), "Finishing polygon from edited text");
            points.replace_points(vertices);
        }
        points.finish_polygon()?;

        self.points = points;
        self.sync_from_points();
        Ok(())
    }

    /// Vide la liste sans changer de type
    pub fn on_reset(&mut self) {
        self.points.reset();
        self.sync_from_points();
    }

    /// Édition directe du texte ; la liste de sommets n'est pas modifiée
    pub fn on_text_edit(&mut self, text: impl Into<String>) -> &PreviewOutcome {
        self.text = text.into();
        self.refresh_preview();
        &self.outcome
    }

    /// Prépare la soumission à partir du texte courant
    ///
    /// En cas d'échec, l'état d'édition reste inchangé.
    pub fn on_submit(&self, form: &SubmissionForm) -> Result<NewRecord, CaptureError> {
        let geometry_type = self.geometry_type();

        let raw = parse_text(&self.text)?.ok_or(CaptureError::MissingField("coordinates"))?;
        let payload = normalize(geometry_type, &raw).map_err(|e| match e {
            NormalizationError::ShapeMismatch { .. } => {
                CaptureError::Validation(shape_rejection(geometry_type, &raw))
            }
            other => CaptureError::Normalization(other),
        })?;
        validate_submission(geometry_type, &payload, self.points.is_complete())?;

        let record = NewRecord::build(form, &payload)?;
        info!(
            geometry_type = %geometry_type,
            vertices = payload.vertex_count(),
            owner = %record.owner_name,
            "Submission ready"
        );
        Ok(record)
    }

    /// Après création réussie : retour à une session vide du même type
    pub fn on_submit_success(&mut self) {
        self.points.reset();
        self.sync_from_points();
    }

    pub fn geometry_type(&self) -> GeometryType {
        self.points.geometry_type()
    }

    pub fn points(&self) -> &[Coordinate] {
        self.points.points()
    }

    pub fn is_polygon_complete(&self) -> bool {
        self.points.is_complete()
    }

    /// Représentation textuelle courante
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Résultat du dernier rafraîchissement de l'aperçu
    pub fn outcome(&self) -> &PreviewOutcome {
        &self.outcome
    }

    pub fn preview(&self) -> Option<&Preview> {
        self.preview.as_ref()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Sommets de l'anneau affiché quand le texte ne correspond plus à la liste
    fn edited_ring(&self) -> Option<Vec<Coordinate>> {
        if self.text == project_text(self.geometry_type(), self.points.points()) {
            return None;
        }
        let PreviewOutcome::Rendered(GeometryPayload::Polygon(ring)) = &self.outcome else {
            return None;
        };
        let mut vertices = ring.vertices().to_vec();
        if ring.is_closed() {
            vertices.pop();
        }
        Some(vertices)
    }

    fn sync_from_points(&mut self) {
        self.text = project_text(self.geometry_type(), self.points.points());
        self.refresh_preview();
    }

    fn refresh_preview(&mut self) {
        self.outcome = preview_from_text(self.geometry_type(), &self.text);
        self.preview = self.outcome.payload().cloned().map(Preview::new);
        self.renderer.render(self.preview.as_ref());
    }
}
