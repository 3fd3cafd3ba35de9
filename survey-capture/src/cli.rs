//! Définition et implémentation des commandes CLI
//!
//! - `capture` : rejoue une saisie (points, texte) puis crée l'enregistrement
//! - `session` : édition interactive sur l'entrée standard
//! - `search` / `show` : consultation du record store
//! - `preview` : normalisation + validation sans réseau
//! - `health` : état du serveur

use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Subcommand;
use futures::future;
use geocapture::{
    normalize, parse_number, validate, EditSession, GeometryPayload, GeometryType, Preview,
    SubmissionForm,
};
use survey_capture::display::{write_record_details, write_results_table};
use survey_capture::interactive::{self, Interpreter, HELP};
use survey_capture::terminal::{to_ewkt, write_preview};
use survey_capture::{ClientConfig, RecordStore, TerminalRenderer};
use tokio::io::BufReader;
use tracing::{info, warn};

#[derive(Subcommand)]
pub enum Commands {
    /// Build a geometry from points or coordinates text and create a record
    Capture {
        /// Geometry type: Point, LineString or Polygon
        #[arg(short = 't', long = "type", value_parser = parse_geometry_type)]
        geometry_type: GeometryType,

        /// Vertex as "x,y" (repeatable, in order)
        #[arg(short, long = "point", value_parser = parse_point, allow_hyphen_values = true)]
        points: Vec<(f64, f64)>,

        /// Close the polygon after adding the points (ignored for other types)
        #[arg(long)]
        finish: bool,

        /// Coordinates JSON, instead of --point
        #[arg(long, conflicts_with = "points", allow_hyphen_values = true)]
        coords: Option<String>,

        /// Owner name
        #[arg(long)]
        owner: String,

        /// Survey date (YYYY-MM-DD)
        #[arg(long)]
        date: String,

        /// SRID of the coordinates (défaut : env SURVEY_DEFAULT_SRID / 32632)
        #[arg(long)]
        srid: Option<i32>,

        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,

        /// Validate and print the request body without sending it
        #[arg(long)]
        dry_run: bool,
    },

    /// Interactive editing session on stdin
    Session {
        /// Initial geometry type
        #[arg(
            short = 't',
            long = "type",
            value_parser = parse_geometry_type,
            default_value = "Point"
        )]
        geometry_type: GeometryType,
    },

    /// Search records by owner name (substring, case-insensitive)
    Search {
        #[arg(short, long)]
        owner: Option<String>,
    },

    /// Show a record by id
    Show { id: i64 },

    /// Normalize and validate coordinates without contacting the server
    Preview {
        #[arg(short = 't', long = "type", value_parser = parse_geometry_type)]
        geometry_type: GeometryType,

        /// Coordinates JSON
        #[arg(long, allow_hyphen_values = true)]
        coords: String,

        /// SRID used for the EWKT output
        #[arg(long)]
        srid: Option<i32>,
    },

    /// Check record store health
    Health,
}

fn parse_geometry_type(s: &str) -> Result<GeometryType, String> {
    s.parse().map_err(|e: geocapture::NormalizationError| e.to_string())
}

/// Parse un sommet `x,y`
fn parse_point(s: &str) -> Result<(f64, f64), String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected x,y, got '{}'", s))?;
    let x = parse_number(x).map_err(|e| e.to_string())?;
    let y = parse_number(y).map_err(|e| e.to_string())?;
    Ok((x, y))
}

/// Sommets d'un texte de coordonnées, sans le sommet de fermeture d'un anneau
fn vertices_from_text(geometry_type: GeometryType, text: &str) -> Result<Vec<(f64, f64)>> {
    let raw: serde_json::Value =
        serde_json::from_str(text.trim()).context("Invalid coordinates JSON")?;
    let payload = normalize(geometry_type, &raw)?;

    let vertices = match payload {
        GeometryPayload::Point(c) => vec![c],
        GeometryPayload::LineString(coords) => coords,
        GeometryPayload::Polygon(ring) => {
            let mut vertices = ring.vertices().to_vec();
            if ring.is_closed() {
                vertices.pop();
            }
            vertices
        }
    };
    Ok(vertices.into_iter().map(|c| (c.x, c.y)).collect())
}

/// Exécute la commande capture
#[allow(clippy::too_many_arguments)]
pub async fn cmd_capture(
    config: &ClientConfig,
    geometry_type: GeometryType,
    points: &[(f64, f64)],
    finish: bool,
    coords: Option<String>,
    owner: String,
    date: String,
    srid: Option<i32>,
    notes: Option<String>,
    dry_run: bool,
) -> Result<()> {
    let vertices = match coords {
        Some(text) => vertices_from_text(geometry_type, &text)?,
        None => points.to_vec(),
    };

    // Rejoue la saisie sans afficher chaque aperçu intermédiaire
    let mut session = EditSession::new(geometry_type, TerminalRenderer::new(false));
    for (x, y) in vertices {
        session.on_add_point(x, y)?;
    }
    if finish {
        session.on_finish_polygon()?;
    }

    let mut stdout = io::stdout();
    write_preview(&mut stdout, session.preview())?;

    let mut form =
        SubmissionForm::new(owner, date).with_srid(srid.unwrap_or(config.default_srid));
    form.notes = notes;

    let record = session.on_submit(&form).context("Submission rejected")?;

    if dry_run {
        let body = serde_json::to_string_pretty(&record).context("Failed to encode record")?;
        println!("{}", body);
        return Ok(());
    }

    let store = RecordStore::from_config(config)?;
    let created = store
        .create(&record)
        .await
        .context("Failed to create record")?;
    session.on_submit_success();

    println!("Record added successfully with ID: {}", created.id);
    Ok(())
}

/// Exécute la session interactive
pub async fn cmd_session(config: &ClientConfig, geometry_type: GeometryType) -> Result<()> {
    let store = RecordStore::from_config(config)?;

    // État du serveur et enregistrements existants, en parallèle
    let (health, records) = future::join(store.health(), store.list(None)).await;
    match health {
        Ok(h) if h.is_healthy() => info!(url = store.base_url(), "Record store is up"),
        Ok(h) => warn!(database = %h.database, "Record store database unavailable"),
        Err(e) => warn!(error = %e, "Record store unreachable"),
    }
    match records {
        Ok(records) => println!("{} existing record(s)", records.len()),
        Err(e) => println!("Failed to load records: {}", e),
    }

    println!("{}", HELP);
    let mut interpreter = Interpreter::new(
        geometry_type,
        TerminalRenderer::new(true),
        config.default_srid,
    );
    let input = BufReader::new(tokio::io::stdin());
    let mut stdout = io::stdout();
    interactive::run(&mut interpreter, &store, input, &mut stdout).await
}

/// Exécute la commande search
pub async fn cmd_search(config: &ClientConfig, owner: Option<String>) -> Result<()> {
    let store = RecordStore::from_config(config)?;
    let records = store
        .list(owner.as_deref())
        .await
        .context("Search failed")?;

    let mut stdout = io::stdout().lock();
    write_results_table(&mut stdout, &records)?;
    stdout.flush()?;
    Ok(())
}

/// Exécute la commande show
pub async fn cmd_show(config: &ClientConfig, id: i64) -> Result<()> {
    let store = RecordStore::from_config(config)?;
    let record = store.get(id).await?;

    let mut stdout = io::stdout().lock();
    write_record_details(&mut stdout, &record)?;

    match record.payload() {
        Ok(payload) => writeln!(stdout, "EWKT: {}", to_ewkt(&payload, record.srid)?)?,
        Err(e) => warn!(id, error = %e, "Stored coordinates do not normalize"),
    }
    Ok(())
}

/// Exécute la commande preview (hors ligne)
pub fn cmd_preview(
    config: &ClientConfig,
    geometry_type: GeometryType,
    coords: &str,
    srid: Option<i32>,
) -> Result<()> {
    let raw: serde_json::Value =
        serde_json::from_str(coords.trim()).context("Invalid coordinates JSON")?;
    let payload = normalize(geometry_type, &raw)?;

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "coordinates: {}", payload.coordinates_value())?;
    writeln!(
        stdout,
        "ewkt: {}",
        to_ewkt(&payload, srid.unwrap_or(config.default_srid))?
    )?;

    let valid = validate(geometry_type, &payload);
    write_preview(&mut stdout, Some(&Preview::new(payload)))?;

    match valid {
        Ok(()) => writeln!(stdout, "valid: yes")?,
        Err(e) => writeln!(stdout, "valid: no ({})", e)?,
    }
    Ok(())
}

/// Exécute la commande health
pub async fn cmd_health(config: &ClientConfig) -> Result<()> {
    let store = RecordStore::from_config(config)?;
    let health = store
        .health()
        .await
        .with_context(|| format!("Record store unreachable at {}", store.base_url()))?;

    println!("status: {}", health.status);
    println!("database: {}", health.database);
    if !health.is_healthy() {
        anyhow::bail!("Record store database is {}", health.database);
    }
    Ok(())
}
