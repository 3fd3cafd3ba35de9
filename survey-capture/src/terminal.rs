//! Rendu de l'aperçu dans le terminal (GeoJSON, WKT, cadrage)

use std::io::{self, Write};

use anyhow::{Context, Result};
use geo::{Area, EuclideanLength};
use geocapture::{GeometryPayload, MapRenderer, Preview, Viewport};
use geozero::wkt::WktWriter;
use geozero::GeozeroGeometry;
use tracing::warn;

/// Encode une géométrie en WKT via geozero
pub fn to_wkt(payload: &GeometryPayload) -> Result<String> {
    let geometry = payload.to_geo();
    let mut buf = Vec::new();
    {
        let mut writer = WktWriter::new(&mut buf);
        geometry
            .process_geom(&mut writer)
            .context("Failed to encode geometry to WKT")?;
    }
    String::from_utf8(buf).context("WKT output is not UTF-8")
}

/// EWKT `SRID=<srid>;<wkt>` tel qu'inséré côté PostGIS
pub fn to_ewkt(payload: &GeometryPayload, srid: i32) -> Result<String> {
    Ok(format!("SRID={};{}", srid, to_wkt(payload)?))
}

/// Mesure planaire dans l'unité du SRID (pas de reprojection)
pub fn measure(payload: &GeometryPayload) -> Option<(&'static str, f64)> {
    match payload.to_geo() {
        geo::Geometry::LineString(line) => Some(("length", line.euclidean_length())),
        geo::Geometry::Polygon(polygon) => Some(("area", polygon.unsigned_area())),
        _ => None,
    }
}

/// Écrit la description d'un aperçu
pub fn write_preview<W: Write>(out: &mut W, preview: Option<&Preview>) -> Result<()> {
    let Some(preview) = preview else {
        writeln!(out, "preview: (cleared)")?;
        return Ok(());
    };

    let geojson = serde_json::to_string(&preview.payload.to_geojson())
        .context("Failed to encode preview as GeoJSON")?;
    writeln!(out, "preview: {}", geojson)?;
    writeln!(out, "wkt:     {}", to_wkt(&preview.payload)?)?;

    if let Some((label, value)) = measure(&preview.payload) {
        writeln!(out, "{}:  {:.3}", label, value)?;
    }

    match preview.viewport {
        Some(Viewport::Fit(rect)) => writeln!(
            out,
            "view:    fit [{}, {}] - [{}, {}]",
            rect.min().x,
            rect.min().y,
            rect.max().x,
            rect.max().y
        )?,
        Some(Viewport::Center { center, zoom }) => writeln!(
            out,
            "view:    center [{}, {}] zoom {}",
            center.x, center.y, zoom
        )?,
        None => {}
    }

    Ok(())
}

/// Renderer écrivant chaque aperçu sur la sortie standard
#[derive(Debug, Default)]
pub struct TerminalRenderer {
    /// N'affiche rien tant que `false` (ex: rejeu d'une saisie en ligne de commande)
    pub enabled: bool,
}

impl TerminalRenderer {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl MapRenderer for TerminalRenderer {
    fn render(&mut self, preview: Option<&Preview>) {
        if !self.enabled {
            return;
        }
        let stdout = io::stdout();
        let mut out = stdout.lock();
        if let Err(e) = write_preview(&mut out, preview) {
            warn!(error = %e, "Failed to render preview");
        }
    }
}
