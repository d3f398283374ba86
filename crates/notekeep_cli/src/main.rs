//! Terminal front-end for NoteKeep.
//!
//! # Responsibility
//! - Verify `notekeep_core` linkage (`ping`, `version`).
//! - Run one notes command against the data directory and exit.
//!
//! Usage: `notekeep <command> [args...]`; the data directory comes from
//! `NOTEKEEP_DATA_DIR` or the working directory. Every command ends with a
//! session shutdown, which rewrites the autosave file only when the command
//! changed notes.

use notekeep_core::{
    format_timestamp, note_summary, AppPaths, LoadMode, Note, NoteEdit, NoteId, NoteTemplate,
    NotesSession, SessionConfig,
};
use std::error::Error;
use std::path::Path;
use std::process::ExitCode;

const USAGE: &str = "usage: notekeep <command> [args]

commands:
  ping | version
  list                          list notes, newest first
  search <query>                case-insensitive search over title and content
  stats                         note and word counters
  show <id>                     print one note with its metrics
  random                        print a randomly chosen note
  new <title> [content]         create a note
  template <key>                create from daily_plan|project_idea|meeting_notes
  edit <id> <title|content> <text>
  clear <id>
  delete <id>
  save <path>                   write all notes as JSON
  load <path> [--merge]         replace (default) or merge notes from JSON
  export <id> <path>            write one note as .txt/.md
  import <path>                 create a note from a text file";

fn main() -> ExitCode {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &[String]) -> Result<(), Box<dyn Error>> {
    let Some((command, rest)) = args.split_first() else {
        println!("{USAGE}");
        return Ok(());
    };

    match command.as_str() {
        "ping" => {
            println!("notekeep_core ping={}", notekeep_core::ping());
            return Ok(());
        }
        "version" => {
            println!("notekeep_core version={}", notekeep_core::core_version());
            return Ok(());
        }
        "-h" | "--help" | "help" => {
            println!("{USAGE}");
            return Ok(());
        }
        _ => {}
    }

    let mut session = NotesSession::open(SessionConfig::new(AppPaths::from_env()?));
    let result = dispatch(&mut session, command, rest);
    session.shutdown();
    result
}

fn dispatch(session: &mut NotesSession, command: &str, rest: &[String]) -> Result<(), Box<dyn Error>> {
    match (command, rest) {
        ("list", []) => print_rows(&session.list()),
        ("search", [query]) => {
            let hits = session.search(query);
            if hits.is_empty() {
                println!("no notes match '{query}'");
            }
            print_rows(&hits);
        }
        ("stats", []) => {
            let stats = session.stats();
            println!("notes={} words={}", stats.total_notes, stats.total_words);
        }
        ("show", [id]) => print_note(&session.find(parse_id(id)?)?),
        ("random", []) => print_note(&session.select_random()?),
        ("new", [title]) => print_created(&session.create_with_seed(title.as_str(), "")),
        ("new", [title, content]) => {
            print_created(&session.create_with_seed(title.as_str(), content.as_str()))
        }
        ("template", [key]) => {
            let template = key.parse::<NoteTemplate>()?;
            print_created(&session.create_from_template(template));
        }
        ("edit", [id, field, text]) => {
            let edit = match field.as_str() {
                "title" => NoteEdit::title(text.as_str()),
                "content" => NoteEdit::content(text.as_str()),
                other => return Err(format!("unknown field `{other}`; expected title|content").into()),
            };
            let note = session.update_note(parse_id(id)?, edit)?;
            println!("updated {}", note.id());
        }
        ("clear", [id]) => {
            let note = session.clear_note(parse_id(id)?)?;
            println!("cleared {}", note.id());
        }
        ("delete", [id]) => {
            let note = session.delete_note(parse_id(id)?)?;
            println!("deleted {}", note.id());
        }
        ("save", [path]) => {
            session.save(Path::new(path))?;
            println!("saved {} note(s) to {path}", session.list().len());
        }
        ("load", [path]) => print_loaded(session, path, LoadMode::Replace)?,
        ("load", [path, flag]) if flag == "--merge" => print_loaded(session, path, LoadMode::Merge)?,
        ("export", [id, path]) => {
            session.export_note(parse_id(id)?, Path::new(path))?;
            println!("exported to {path}");
        }
        ("import", [path]) => print_created(&session.import_note(Path::new(path))?),
        _ => return Err(format!("unrecognized command `{command}`\n\n{USAGE}").into()),
    }
    Ok(())
}

fn print_loaded(session: &mut NotesSession, path: &str, mode: LoadMode) -> Result<(), Box<dyn Error>> {
    let outcome = session.load(Path::new(path), mode)?;
    println!("loaded {} note(s); {} total", outcome.loaded, outcome.total);
    Ok(())
}

fn print_note(note: &Note) {
    let summary = note_summary(note);
    println!("[{}] # {}", note.id(), note.title());
    println!(
        "modified {} | words {} | chars {}",
        format_timestamp(&summary.modified),
        summary.word_count,
        summary.char_count
    );
    println!();
    println!("{}", note.content());
}

fn print_created(note: &Note) {
    println!("created {} '{}'", note.id(), note.title());
}

fn print_rows(notes: &[Note]) {
    for note in notes {
        let summary = note_summary(note);
        println!(
            "{:>5}  {}  {:>5}w  {}",
            note.id(),
            format_timestamp(&note.modified()),
            summary.word_count,
            note.title()
        );
    }
}

fn parse_id(raw: &str) -> Result<NoteId, Box<dyn Error>> {
    raw.parse::<NoteId>()
        .map_err(|err| format!("invalid note id `{raw}`: {err}").into())
}
