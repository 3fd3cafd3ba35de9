//! Affichage des résultats de recherche et du détail d'un enregistrement

use std::io::{self, Write};

use crate::store::Record;

/// Tableau `ID | Owner | Survey Date | Type`
pub fn write_results_table<W: Write>(out: &mut W, records: &[Record]) -> io::Result<()> {
    if records.is_empty() {
        return writeln!(out, "No records found");
    }

    let owner_width = records
        .iter()
        .map(|r| r.owner_name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Owner".len());

    writeln!(
        out,
        "{:>6}  {:<owner_width$}  {:<11}  {}",
        "ID", "Owner", "Survey Date", "Type"
    )?;
    for record in records {
        writeln!(
            out,
            "{:>6}  {:<owner_width$}  {:<11}  {}",
            record.id, record.owner_name, record.survey_date, record.geometry_type
        )?;
    }
    writeln!(out, "{} record(s)", records.len())
}

/// Détail complet d'un enregistrement
pub fn write_record_details<W: Write>(out: &mut W, record: &Record) -> io::Result<()> {
    writeln!(out, "ID:            {}", record.id)?;
    writeln!(out, "Owner:         {}", record.owner_name)?;
    writeln!(out, "Survey Date:   {}", record.survey_date)?;
    writeln!(out, "Geometry Type: {}", record.geometry_type)?;
    writeln!(out, "SRID:          {}", record.srid)?;
    writeln!(
        out,
        "Notes:         {}",
        record.notes.as_deref().unwrap_or("None")
    )?;
    writeln!(out, "Coordinates:")?;
    let pretty = serde_json::to_string_pretty(&record.coordinates)
        .unwrap_or_else(|_| record.coordinates.to_string());
    writeln!(out, "{}", pretty)?;
    if let Some(geometry) = &record.geometry_geojson {
        let geojson = serde_json::to_string(geometry).map_err(io::Error::other)?;
        writeln!(out, "GeoJSON (WGS84): {}", geojson)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(id: i64, owner: &str) -> Record {
        Record {
            id,
            owner_name: owner.to_string(),
            survey_date: "2024-03-15".to_string(),
            geometry_type: "Point".to_string(),
            coordinates: json!([10.5, -3.2]),
            srid: 32632,
            notes: None,
            geometry_geojson: None,
        }
    }

    #[test]
    fn test_results_table() {
        let mut out = Vec::new();
        write_results_table(&mut out, &[record(1, "Jane Doe"), record(12, "Bo")]).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("Survey Date"));
        assert!(lines[1].contains("Jane Doe"));
        assert!(lines[2].trim_start().starts_with("12"));
        assert_eq!(lines[3], "2 record(s)");
    }

    #[test]
    fn test_empty_results() {
        let mut out = Vec::new();
        write_results_table(&mut out, &[]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "No records found\n");
    }

    #[test]
    fn test_record_details() {
        let mut out = Vec::new();
        write_record_details(&mut out, &record(3, "Jane Doe")).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Notes:         None"));
        assert!(text.contains("SRID:          32632"));
        assert!(text.contains("10.5"));
    }
}
