//! Line-oriented event loop: one command, one state change, one redraw.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use crate::board::{FREE_INDEX, TOTAL_CELLS, week_label};
use crate::board_renderer::render_board_to_png;
use crate::celebration::Celebration;
use crate::config::RenderConfig;
use crate::session::{BingoSession, UploadOutcome};
use crate::view::{render, render_text};

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command: {0} (try `help`)")]
    Unknown(String),
    #[error("`{0}` needs {1}")]
    MissingArgument(&'static str, &'static str),
    #[error("not a cell number: {0}")]
    BadCell(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Upload { cell: usize, photo: Option<PathBuf> },
    Reset,
    Show,
    Render(PathBuf),
    Status,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let line = line.trim();
        let Some((word, rest)) = line.split_once(char::is_whitespace).or(Some((line, ""))).filter(|(w, _)| !w.is_empty()) else {
            return Ok(None);
        };
        let rest = rest.trim();
        let command = match word.to_ascii_lowercase().as_str() {
            "upload" | "mark" => {
                let (cell, photo) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                if cell.is_empty() {
                    return Err(CommandError::MissingArgument("upload", "a cell number"));
                }
                let cell = cell.parse().map_err(|_| CommandError::BadCell(cell.to_string()))?;
                let photo = photo.trim();
                Command::Upload {
                    cell,
                    photo: (!photo.is_empty()).then(|| PathBuf::from(photo)),
                }
            }
            "reset" => Command::Reset,
            "show" => Command::Show,
            "render" => {
                if rest.is_empty() {
                    return Err(CommandError::MissingArgument("render", "an output path"));
                }
                Command::Render(PathBuf::from(rest))
            }
            "status" => Command::Status,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(Some(command))
    }
}

const HELP: &str = "\
commands:
  upload <cell> <photo>   attach a photo to cell 0-24 and check it
  reset                   draw a new board and clear every cell
  show                    print the board
  render <out.png>        write the board as an image
  status                  checked cells and win state
  help                    this text
  quit                    leave
";

/// Runs commands from `input` until it ends or `quit` is read.
///
/// A photo path that does not name an existing file is treated as an empty
/// selection.
pub fn run<C, R, W>(session: &mut BingoSession<C>, input: R, mut out: W, render_config: &RenderConfig) -> io::Result<()>
where
    C: Celebration,
    R: BufRead,
    W: Write,
{
    writeln!(out, "Week of {}", week_label(chrono::Local::now().date_naive()))?;
    write!(out, "{}", render_text(&render(session)))?;

    for line in input.lines() {
        let line = line?;
        let command = match Command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                writeln!(out, "{e}")?;
                continue;
            }
        };
        match command {
            Command::Upload { cell, photo } => {
                let selection = photo.as_deref().filter(|p| p.is_file());
                if let (Some(p), None) = (&photo, selection) {
                    tracing::debug!(path = %p.display(), "selection is not a file");
                }
                match session.upload(cell, selection) {
                    Ok(UploadOutcome::Ignored) => writeln!(out, "no photo selected, cell {cell} unchanged")?,
                    Ok(UploadOutcome::FreeSpace) => writeln!(out, "cell {FREE_INDEX} is the free space")?,
                    Ok(UploadOutcome::Marked { bingo_started }) => {
                        write!(out, "{}", render_text(&render(session)))?;
                        if bingo_started {
                            if let Some(line) = session.win().line {
                                writeln!(out, "BINGO! {line} complete")?;
                            }
                        }
                    }
                    Err(e) => writeln!(out, "{e}")?,
                }
            }
            Command::Reset => {
                session.reset();
                writeln!(out, "new board")?;
                write!(out, "{}", render_text(&render(session)))?;
            }
            Command::Show => write!(out, "{}", render_text(&render(session)))?,
            Command::Render(path) => match write_png(session, render_config, &path) {
                Ok(()) => writeln!(out, "board image written to {}", path.display())?,
                Err(e) => writeln!(out, "{e}")?,
            },
            Command::Status => {
                let checked = session.cells().checked().iter().filter(|&&c| c).count();
                writeln!(out, "{checked}/{TOTAL_CELLS} checked, {} photos held", session.photos().live_count())?;
                match session.win().line {
                    Some(line) => writeln!(out, "bingo on {line}")?,
                    None => writeln!(out, "no bingo yet")?,
                }
            }
            Command::Help => write!(out, "{HELP}")?,
            Command::Quit => break,
        }
        out.flush()?;
    }
    Ok(())
}

fn write_png<C: Celebration>(session: &BingoSession<C>, config: &RenderConfig, path: &Path) -> Result<(), crate::error::BingoError> {
    render_board_to_png(&render(session), session.photos(), config, path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BoardGenerator, SeedMode};
    use crate::catalog::Catalog;
    use crate::celebration::Silent;

    fn session() -> BingoSession<Silent> {
        let generator = BoardGenerator::new(Catalog::madison_county(), SeedMode::Fixed { seed: 3 });
        BingoSession::new(generator, Silent)
    }

    fn run_script(session: &mut BingoSession<Silent>, script: &str) -> String {
        let mut out = Vec::new();
        run(session, script.as_bytes(), &mut out, &RenderConfig::default()).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn parses_commands() {
        assert_eq!(
            Command::parse("upload 3 /tmp/a b.jpg"),
            Ok(Some(Command::Upload { cell: 3, photo: Some(PathBuf::from("/tmp/a b.jpg")) }))
        );
        assert_eq!(Command::parse("mark 7"), Ok(Some(Command::Upload { cell: 7, photo: None })));
        assert_eq!(Command::parse("  RESET "), Ok(Some(Command::Reset)));
        assert_eq!(Command::parse(""), Ok(None));
        assert_eq!(Command::parse("   "), Ok(None));
        assert_eq!(Command::parse("render out.png"), Ok(Some(Command::Render(PathBuf::from("out.png")))));
        assert_eq!(Command::parse("q"), Ok(Some(Command::Quit)));
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(Command::parse("dance"), Err(CommandError::Unknown("dance".into())));
        assert_eq!(Command::parse("upload"), Err(CommandError::MissingArgument("upload", "a cell number")));
        assert_eq!(Command::parse("upload x"), Err(CommandError::BadCell("x".into())));
        assert_eq!(Command::parse("render"), Err(CommandError::MissingArgument("render", "an output path")));
    }

    #[test]
    fn row_of_uploads_reports_bingo() {
        let dir = tempfile::tempdir().unwrap();
        let photo = dir.path().join("p.jpg");
        std::fs::write(&photo, b"jpeg").unwrap();
        let script: String = (0..5).map(|i| format!("upload {i} {}\n", photo.display())).collect();

        let mut s = session();
        let out = run_script(&mut s, &format!("{script}status\nquit\nupload 9 {}\n", photo.display()));
        assert!(out.contains("BINGO! row 1 complete"));
        assert!(out.contains("bingo on row 1"));
        assert!(!s.cells().is_checked(9), "commands after quit must not run");
    }

    #[test]
    fn missing_file_is_ignored() {
        let mut s = session();
        let out = run_script(&mut s, "upload 4 /definitely/not/here.jpg\nupload 4\n");
        assert_eq!(out.matches("no photo selected, cell 4 unchanged").count(), 2);
        assert!(!s.cells().is_checked(4));
    }

    #[test]
    fn errors_are_reported_and_loop_continues() {
        let mut s = session();
        let out = run_script(&mut s, "jump\nupload 30 x\nupload 12 Cargo.toml\nstatus\n");
        assert!(out.contains("unknown command: jump"));
        assert!(out.contains("cell 30 is outside the 5x5 board"));
        assert!(out.contains("cell 12 is the free space"));
        assert!(out.contains("1/25 checked, 0 photos held"));
    }

    #[test]
    fn reset_after_bingo() {
        let dir = tempfile::tempdir().unwrap();
        let photo = dir.path().join("p.jpg");
        std::fs::write(&photo, b"jpeg").unwrap();
        let script: String = [0, 6, 18, 24].iter().map(|i| format!("upload {i} {}\n", photo.display())).collect();

        let mut s = session();
        let out = run_script(&mut s, &format!("{script}reset\nstatus\n"));
        assert!(out.contains("BINGO! diagonal complete"));
        assert!(out.contains("no bingo yet"));
        assert_eq!(s.photos().live_count(), 0);
    }
}
