//! Construction du corps de création d'un enregistrement

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CaptureError;
use crate::types::{GeometryPayload, GeometryType};

/// SRID par défaut des levés (UTM 32N)
pub const DEFAULT_SRID: i32 = 32632;

/// Champs saisis par l'utilisateur, hors géométrie
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionForm {
    pub owner_name: String,
    /// Format `YYYY-MM-DD`
    pub survey_date: String,
    /// Métadonnée opaque, transmise telle quelle
    pub srid: i32,
    pub notes: Option<String>,
}

impl SubmissionForm {
    pub fn new(owner_name: impl Into<String>, survey_date: impl Into<String>) -> Self {
        Self {
            owner_name: owner_name.into(),
            survey_date: survey_date.into(),
            srid: DEFAULT_SRID,
            notes: None,
        }
    }

    pub fn with_srid(mut self, srid: i32) -> Self {
        self.srid = srid;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Corps de `POST /records`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRecord {
    pub owner_name: String,
    pub survey_date: String,
    pub geometry_type: GeometryType,
    pub coordinates: Value,
    pub srid: i32,
    pub notes: Option<String>,
}

impl NewRecord {
    /// Assemble le corps à partir d'une géométrie déjà validée
    ///
    /// Vérifie les champs obligatoires ; les notes vides deviennent `null`.
    pub fn build(form: &SubmissionForm, payload: &GeometryPayload) -> Result<Self, CaptureError> {
        let owner_name = form.owner_name.trim();
        if owner_name.is_empty() {
            return Err(CaptureError::MissingField("owner_name"));
        }

        let survey_date = form.survey_date.trim();
        if survey_date.is_empty() {
            return Err(CaptureError::MissingField("survey_date"));
        }
        validate_survey_date(survey_date)?;

        let notes = form
            .notes
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);

        Ok(Self {
            owner_name: owner_name.to_string(),
            survey_date: survey_date.to_string(),
            geometry_type: payload.geometry_type(),
            coordinates: payload.coordinates_value(),
            srid: form.srid,
            notes,
        })
    }
}

/// Vérifie une date `YYYY-MM-DD` (calendrier grégorien)
pub fn validate_survey_date(date: &str) -> Result<(), CaptureError> {
    let invalid = || CaptureError::InvalidSurveyDate(date.to_string());

    let bytes = date.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return Err(invalid());
    }
    if !date
        .char_indices()
        .all(|(i, c)| i == 4 || i == 7 || c.is_ascii_digit())
    {
        return Err(invalid());
    }

    let year: u32 = date[0..4].parse().map_err(|_| invalid())?;
    let month: u32 = date[5..7].parse().map_err(|_| invalid())?;
    let day: u32 = date[8..10].parse().map_err(|_| invalid())?;

    if !(1..=12).contains(&month) || day == 0 || day > days_in_month(year, month) {
        return Err(invalid());
    }

    Ok(())
}

fn days_in_month(year: u32, month: u32) -> u32 {
    match month {
        2 if (year % 4 == 0 && year % 100 != 0) || year % 400 == 0 => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Coordinate;
    use serde_json::json;

    fn point() -> GeometryPayload {
        GeometryPayload::Point(Coordinate::new(10.5, -3.2))
    }

    #[test]
    fn test_build_record() {
        let form = SubmissionForm::new("  Jane Doe ", "2024-03-15").with_notes("   ");
        let record = NewRecord::build(&form, &point()).unwrap();
        assert_eq!(record.owner_name, "Jane Doe");
        assert_eq!(record.srid, DEFAULT_SRID);
        assert_eq!(record.notes, None);
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({
                "owner_name": "Jane Doe",
                "survey_date": "2024-03-15",
                "geometry_type": "Point",
                "coordinates": [10.5, -3.2],
                "srid": 32632,
                "notes": null
            })
        );
    }

    #[test]
    fn test_missing_fields() {
        let form = SubmissionForm::new("", "2024-03-15");
        assert_eq!(
            NewRecord::build(&form, &point()),
            Err(CaptureError::MissingField("owner_name"))
        );

        let form = SubmissionForm::new("Jane", " ");
        assert_eq!(
            NewRecord::build(&form, &point()),
            Err(CaptureError::MissingField("survey_date"))
        );
    }

    #[test]
    fn test_validate_survey_date_valid() {
        assert!(validate_survey_date("2024-01-31").is_ok());
        assert!(validate_survey_date("2024-02-29").is_ok());
        assert!(validate_survey_date("2000-02-29").is_ok());
        assert!(validate_survey_date("1999-12-01").is_ok());
    }

    #[test]
    fn test_validate_survey_date_invalid() {
        assert!(validate_survey_date("2023-02-29").is_err());
        assert!(validate_survey_date("1900-02-29").is_err());
        assert!(validate_survey_date("2024-13-01").is_err());
        assert!(validate_survey_date("2024-04-31").is_err());
        assert!(validate_survey_date("2024-00-10").is_err());
        assert!(validate_survey_date("2024/01/01").is_err());
        assert!(validate_survey_date("24-01-01").is_err());
        assert!(validate_survey_date("2024-1-01").is_err());
        assert!(validate_survey_date("2024-+1-01").is_err());
    }
}
