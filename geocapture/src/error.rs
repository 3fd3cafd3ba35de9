//! Types d'erreurs pour le crate geocapture
//!
//! Le `Display` de chaque erreur est le message présenté à l'utilisateur.

use thiserror::Error;

use crate::types::GeometryType;

/// Erreurs de normalisation (frontière JSON non typé → payload canonique)
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NormalizationError {
    /// Structure de coordonnées incompatible avec le type de géométrie
    #[error("Coordinates do not match {geometry_type} shape: {reason}")]
    ShapeMismatch {
        geometry_type: GeometryType,
        reason: String,
    },

    /// Type de géométrie inconnu
    #[error("Unsupported geometry type: {0}")]
    UnsupportedGeometryType(String),
}

impl NormalizationError {
    /// Crée une erreur de forme avec contexte
    pub fn shape_mismatch(geometry_type: GeometryType, reason: impl Into<String>) -> Self {
        Self::ShapeMismatch {
            geometry_type,
            reason: reason.into(),
        }
    }
}

/// Erreurs de validation stricte (avant soumission)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Point requires exactly 2 coordinates [x, y]")]
    InvalidPointArity,

    #[error("LineString requires at least 2 points (found {found})")]
    InsufficientLineVertices { found: usize },

    #[error("Polygon requires at least 3 distinct points (found {found})")]
    InsufficientPolygonVertices { found: usize },

    /// Polygone valide mais pas encore fermé explicitement par l'utilisateur
    #[error("Polygon is not finished yet")]
    PolygonNotFinished,
}

/// Erreurs remontées par les commandes de la session d'édition
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CaptureError {
    /// Saisie numérique invalide (NaN, infini, texte)
    #[error("Please enter valid numeric coordinates (got '{0}')")]
    InvalidNumber(String),

    /// Pas assez de sommets pour fermer un polygone
    #[error("A polygon requires at least 3 points (found {found})")]
    InsufficientVertices { found: usize },

    /// Représentation textuelle qui n'est pas du JSON
    #[error("Invalid coordinates JSON: {0}")]
    ParseError(String),

    /// Champ obligatoire du formulaire manquant
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Date de levé au mauvais format
    #[error("Invalid survey_date '{0}', expected YYYY-MM-DD")]
    InvalidSurveyDate(String),

    #[error(transparent)]
    Normalization(#[from] NormalizationError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl CaptureError {
    /// Crée une erreur de nombre invalide à partir de la saisie brute
    pub fn invalid_number(raw: impl ToString) -> Self {
        Self::InvalidNumber(raw.to_string())
    }
}
