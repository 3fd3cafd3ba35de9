//! Session d'édition interactive en ligne de commande
//!
//! Une commande par ligne :
//!
//! ```text
//! type Polygon        add 0 0        finish        text [[[0,0],[1,0],[1,1]]]
//! owner Jane Doe      date 2024-03-15              srid 32632    notes ...
//! show                reset          search [owner]               submit
//! help                quit
//! ```

use std::io::Write;

use anyhow::Result;
use geocapture::{
    parse_number, CaptureError, EditSession, GeometryType, MapRenderer, NewRecord, PreviewOutcome,
    SubmissionForm,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{info, warn};

use crate::display::write_results_table;
use crate::store::RecordStore;

pub const HELP: &str = "\
Commands:
  type <Point|LineString|Polygon>   select geometry type (clears points)
  add <x> <y>                       add a vertex
  finish                            close the polygon (>= 3 points, or the edited text)
  text <json>                       edit the coordinates text directly
  owner <name> | date <YYYY-MM-DD> | srid <n> | notes <text>
  show                              print the current state
  reset                             clear the points
  search [owner]                    search records by owner
  submit                            validate and create the record
  help | quit";

/// Commande saisie par l'utilisateur
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Type(GeometryType),
    Add(f64, f64),
    Finish,
    Text(String),
    Owner(String),
    Date(String),
    Srid(i32),
    Notes(String),
    Show,
    Reset,
    Search(Option<String>),
    Submit,
    Help,
    Quit,
}

/// Parse une ligne de commande ; `Ok(None)` pour une ligne vide
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "type" => Command::Type(
            rest.parse()
                .map_err(|e: geocapture::NormalizationError| e.to_string())?,
        ),
        "add" => {
            let mut parts = rest
                .split(|c: char| c.is_whitespace() || c == ',')
                .filter(|p| !p.is_empty());
            let (Some(x), Some(y), None) = (parts.next(), parts.next(), parts.next()) else {
                return Err("usage: add <x> <y>".to_string());
            };
            let x = parse_number(x).map_err(|e| e.to_string())?;
            let y = parse_number(y).map_err(|e| e.to_string())?;
            Command::Add(x, y)
        }
        "finish" => Command::Finish,
        "text" => Command::Text(rest.to_string()),
        "owner" => Command::Owner(rest.to_string()),
        "date" => Command::Date(rest.to_string()),
        "srid" => Command::Srid(
            rest.parse()
                .map_err(|_| format!("SRID must be an integer, got '{}'", rest))?,
        ),
        "notes" => Command::Notes(rest.to_string()),
        "show" => Command::Show,
        "reset" => Command::Reset,
        "search" => Command::Search(Some(rest.to_string()).filter(|s| !s.is_empty())),
        "submit" => Command::Submit,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("Unknown command '{}', type 'help'", other)),
    };

    Ok(Some(command))
}

/// Ce que la boucle doit faire après une commande locale
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Continue,
    Search(Option<String>),
    Create(NewRecord),
    Quit,
}

/// État de la session interactive : session d'édition + champs du formulaire
#[derive(Debug)]
pub struct Interpreter<R: MapRenderer> {
    pub session: EditSession<R>,
    pub form: SubmissionForm,
}

impl<R: MapRenderer> Interpreter<R> {
    pub fn new(geometry_type: GeometryType, renderer: R, default_srid: i32) -> Self {
        Self {
            session: EditSession::new(geometry_type, renderer),
            form: SubmissionForm::new("", "").with_srid(default_srid),
        }
    }

    /// Applique une commande ; les erreurs de saisie sont rendues à l'utilisateur
    pub fn apply<W: Write>(&mut self, command: Command, out: &mut W) -> Result<Action> {
        match command {
            Command::Type(t) => {
                self.session.on_type_change(t);
                writeln!(out, "type: {}", t)?;
            }
            Command::Add(x, y) => match self.session.on_add_point(x, y) {
                Ok(len) => writeln!(out, "point {} added ({}, {})", len, x, y)?,
                Err(e) => report(out, &e)?,
            },
            Command::Finish => match self.session.on_finish_polygon() {
                Ok(()) if self.session.geometry_type() == GeometryType::Polygon => {
                    writeln!(out, "polygon finished")?
                }
                Ok(()) => writeln!(
                    out,
                    "nothing to finish for {}",
                    self.session.geometry_type()
                )?,
                Err(e) => report(out, &e)?,
            },
            Command::Text(text) => {
                if let PreviewOutcome::ParseError(msg) = self.session.on_text_edit(text) {
                    writeln!(out, "invalid coordinates JSON: {}", msg)?;
                }
            }
            Command::Owner(owner) => self.form.owner_name = owner,
            Command::Date(date) => self.form.survey_date = date,
            Command::Srid(srid) => self.form.srid = srid,
            Command::Notes(notes) => {
                self.form.notes = Some(notes).filter(|n| !n.is_empty());
            }
            Command::Show => self.write_state(out)?,
            Command::Reset => self.session.on_reset(),
            Command::Search(owner) => return Ok(Action::Search(owner)),
            Command::Submit => match self.session.on_submit(&self.form) {
                Ok(record) => return Ok(Action::Create(record)),
                Err(e) => report(out, &e)?,
            },
            Command::Help => writeln!(out, "{}", HELP)?,
            Command::Quit => return Ok(Action::Quit),
        }
        Ok(Action::Continue)
    }

    fn write_state<W: Write>(&self, out: &mut W) -> Result<()> {
        writeln!(out, "type:        {}", self.session.geometry_type())?;
        writeln!(out, "points:      {}", self.session.points().len())?;
        for (i, p) in self.session.points().iter().enumerate() {
            writeln!(out, "  {}. ({}, {})", i + 1, p.x, p.y)?;
        }
        if self.session.geometry_type() == GeometryType::Polygon {
            writeln!(out, "finished:    {}", self.session.is_polygon_complete())?;
        }
        writeln!(out, "coordinates: {}", self.session.text())?;
        writeln!(out, "owner:       {}", self.form.owner_name)?;
        writeln!(out, "date:        {}", self.form.survey_date)?;
        writeln!(out, "srid:        {}", self.form.srid)?;
        writeln!(
            out,
            "notes:       {}",
            self.form.notes.as_deref().unwrap_or("")
        )?;
        Ok(())
    }
}

fn report<W: Write>(out: &mut W, err: &CaptureError) -> std::io::Result<()> {
    writeln!(out, "error: {}", err)
}

/// Boucle de lecture des commandes jusqu'à `quit` ou fin de l'entrée
pub async fn run<R, I, W>(
    interpreter: &mut Interpreter<R>,
    store: &RecordStore,
    input: I,
    out: &mut W,
) -> Result<()>
where
    R: MapRenderer,
    I: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();

    while let Some(line) = lines.next_line().await? {
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(msg) => {
                writeln!(out, "error: {}", msg)?;
                continue;
            }
        };

        match interpreter.apply(command, out)? {
            Action::Continue => {}
            Action::Quit => break,
            Action::Search(owner) => match store.list(owner.as_deref()).await {
                Ok(records) => write_results_table(out, &records)?,
                Err(e) => {
                    warn!(error = %e, "Search failed");
                    writeln!(out, "Search failed: {}", e)?;
                }
            },
            Action::Create(record) => match store.create(&record).await {
                Ok(created) => {
                    info!(id = created.id, "Record added");
                    writeln!(out, "Record added successfully with ID: {}", created.id)?;
                    interpreter.session.on_submit_success();
                }
                // La session reste intacte pour permettre une nouvelle tentative
                Err(e) => writeln!(out, "{}", e)?,
            },
        }
        out.flush()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use geocapture::RecordingRenderer;

    fn interpreter() -> Interpreter<RecordingRenderer> {
        Interpreter::new(GeometryType::Polygon, RecordingRenderer::default(), 32632)
    }

    fn apply_all(it: &mut Interpreter<RecordingRenderer>, lines: &[&str]) -> (Action, String) {
        let mut out = Vec::new();
        let mut last = Action::Continue;
        for line in lines {
            let command = parse_command(line).unwrap().unwrap();
            last = it.apply(command, &mut out).unwrap();
        }
        (last, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_parse_command() {
        assert_eq!(parse_command("  "), Ok(None));
        assert_eq!(parse_command("# comment"), Ok(None));
        assert_eq!(parse_command("add 1.5 -2"), Ok(Some(Command::Add(1.5, -2.0))));
        assert_eq!(parse_command("add 1.5,-2"), Ok(Some(Command::Add(1.5, -2.0))));
        assert_eq!(
            parse_command("type LineString"),
            Ok(Some(Command::Type(GeometryType::LineString)))
        );
        assert_eq!(
            parse_command("text [[1, 2], [3, 4]]"),
            Ok(Some(Command::Text("[[1, 2], [3, 4]]".to_string())))
        );
        assert_eq!(parse_command("search"), Ok(Some(Command::Search(None))));
        assert_eq!(
            parse_command("owner Jane Doe"),
            Ok(Some(Command::Owner("Jane Doe".to_string())))
        );
    }

    #[test]
    fn test_parse_command_errors() {
        assert!(parse_command("add 1").is_err());
        assert!(parse_command("add 1 2 3").is_err());
        assert!(parse_command("add x 2").is_err());
        assert!(parse_command("type Circle").is_err());
        assert!(parse_command("srid utm").is_err());
        assert!(parse_command("fly").is_err());
    }

    #[test]
    fn test_polygon_flow_reaches_create() {
        let mut it = interpreter();
        let (action, _) = apply_all(
            &mut it,
            &[
                "add 0 0",
                "add 1 0",
                "add 1 1",
                "finish",
                "owner Jane Doe",
                "date 2024-03-15",
                "submit",
            ],
        );
        let Action::Create(record) = action else {
            panic!("expected a record, got {:?}", action);
        };
        assert_eq!(
            record.coordinates,
            serde_json::json!([[[0, 0], [1, 0], [1, 1], [0, 0]]])
        );
        assert_eq!(record.srid, 32632);
    }

    #[test]
    fn test_submit_error_is_reported() {
        let mut it = interpreter();
        let (action, out) = apply_all(&mut it, &["add 0 0", "add 1 0", "submit"]);
        assert_eq!(action, Action::Continue);
        assert!(out.contains("Polygon requires at least 3 distinct points"));
        assert_eq!(it.session.points().len(), 2);
    }

    #[test]
    fn test_finish_error_is_reported() {
        let mut it = interpreter();
        let (_, out) = apply_all(&mut it, &["add 0 0", "finish"]);
        assert!(out.contains("A polygon requires at least 3 points"));
    }

    #[test]
    fn test_show_state() {
        let mut it = interpreter();
        let (_, out) = apply_all(&mut it, &["type LineString", "add 1 2", "add 3 4", "show"]);
        assert!(out.contains("coordinates: [[1,2],[3,4]]"));
        assert!(!out.contains("finished:"));
    }

    #[test]
    fn test_text_parse_error_is_reported() {
        let mut it = interpreter();
        let (_, out) = apply_all(&mut it, &["text not json"]);
        assert!(out.contains("invalid coordinates JSON"));
        assert!(it.session.preview().is_none());
    }

    #[test]
    fn test_text_polygon_reaches_create() {
        let mut it = interpreter();
        let (action, out) = apply_all(
            &mut it,
            &[
                "text [[[0,0],[1,0],[1,1]]]",
                "finish",
                "owner Jane Doe",
                "date 2024-03-15",
                "submit",
            ],
        );
        assert!(out.contains("polygon finished"));
        assert!(matches!(action, Action::Create(_)));
    }

    #[test]
    fn test_finish_on_line_is_harmless() {
        let mut it = interpreter();
        let (_, out) = apply_all(&mut it, &["type LineString", "add 0 0", "add 1 1", "finish"]);
        assert!(out.contains("nothing to finish for LineString"));
        assert_eq!(it.session.points().len(), 2);
    }
}
