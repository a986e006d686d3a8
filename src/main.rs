use std::io::{BufRead, Write};
use std::path::PathBuf;

use quill::config::QuillConfig;
use quill::core::{Filter, Id, Note};
use quill::engine::{Action, Notebook, Outcome, view};
use quill::{export, prompt};

const USAGE: &str = "usage: quill [--yes] [--debug] <command> [args]

commands:
  list [--favorites|--trash] [--category <id>]
  show <id>
  new
  title <id> <text>
  body <id> <text>
  favorite <id>
  trash <id>
  restore <id>
  delete <id>
  empty-trash
  categories
  category-new [name]
  category-rename <id> <name>
  category-delete <id>
  assign <note-id> <category-id|none>
  export <id> [dir]";

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn main() -> CliResult {
    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let assume_yes = take_flag(&mut args, "--yes");
    let debug = take_flag(&mut args, "--debug");

    let config = QuillConfig::load(&QuillConfig::default_path());

    // Set up logging to the systemd user journal (`journalctl --user -t quill -f`).
    // Wrapper filters: quill crate at info/debug (per config), everything else at warn.
    {
        struct FilteredJournal {
            inner: systemd_journal_logger::JournalLog,
        }

        impl log::Log for FilteredJournal {
            fn enabled(&self, metadata: &log::Metadata) -> bool {
                if metadata.target().starts_with("quill") {
                    let max = if quill::debug_logging() { log::LevelFilter::Debug } else { log::LevelFilter::Info };
                    metadata.level() <= max
                } else {
                    metadata.level() <= log::LevelFilter::Warn
                }
            }
            fn log(&self, record: &log::Record) {
                if self.enabled(record.metadata()) {
                    self.inner.log(record);
                }
            }
            fn flush(&self) {
                self.inner.flush();
            }
        }

        quill::set_debug_logging(config.debug_logging || debug);

        match systemd_journal_logger::JournalLog::new() {
            Ok(journal) => {
                let journal = journal.with_syslog_identifier("quill".to_string());
                if log::set_boxed_logger(Box::new(FilteredJournal { inner: journal })).is_ok() {
                    // Global max must be Debug so quill debug logs can pass through when toggled
                    log::set_max_level(log::LevelFilter::Debug);
                }
            }
            Err(e) => eprintln!("quill: journal logging unavailable: {}", e),
        }
    }

    if let Err(e) = config.ensure_dirs() {
        log::error!("Failed to create data directory: {}", e);
    }

    let mut notebook = Notebook::open(config.store());
    let mut terminal = TerminalPrompt { assume_yes };

    let Some(command) = args.first().cloned() else {
        println!("{}", USAGE);
        return Ok(());
    };
    let rest = &args[1..];

    match command.as_str() {
        "list" => list(&notebook, rest),
        "show" => {
            let id = resolve_note(&notebook, arg(rest, 0)?)?;
            notebook.dispatch(Action::SelectNote(Some(id.clone())));
            if let Some(note) = notebook.note(&id) {
                print_note(&notebook, note);
            }
            Ok(())
        }
        "new" => {
            notebook.dispatch(Action::NewNote);
            if let Some(id) = notebook.active_note_id() {
                println!("{}", id);
            }
            Ok(())
        }
        "title" => {
            let id = resolve_note(&notebook, arg(rest, 0)?)?;
            report(notebook.set_title(&id, rest[1..].join(" ")));
            Ok(())
        }
        "body" => {
            let id = resolve_note(&notebook, arg(rest, 0)?)?;
            report(notebook.set_body(&id, rest[1..].join(" ")));
            Ok(())
        }
        "favorite" => note_action(&mut notebook, rest, Action::ToggleFavorite),
        "trash" => note_action(&mut notebook, rest, Action::TrashNote),
        "restore" => note_action(&mut notebook, rest, Action::RestoreNote),
        "delete" => {
            let id = resolve_note(&notebook, arg(rest, 0)?)?;
            report(prompt::permanently_delete_note(&mut notebook, &mut terminal, id));
            Ok(())
        }
        "empty-trash" => {
            report(prompt::empty_trash(&mut notebook, &mut terminal));
            Ok(())
        }
        "categories" => {
            for category in notebook.categories() {
                let count = notebook
                    .notes()
                    .iter()
                    .filter(|n| !n.trashed && n.category_id.as_ref() == Some(&category.id))
                    .count();
                println!("{}  {} ({})", short(&category.id), category.name, count);
            }
            Ok(())
        }
        "category-new" => {
            let outcome = if rest.is_empty() {
                prompt::new_category(&mut notebook, &mut terminal)
            } else {
                notebook.dispatch(Action::NewCategory(rest.join(" ")))
            };
            report(outcome);
            if let Some(id) = notebook.active_category_id().filter(|_| outcome == Outcome::Committed) {
                println!("{}", id);
            }
            Ok(())
        }
        "category-rename" => {
            let id = resolve_category(&notebook, arg(rest, 0)?)?;
            report(notebook.dispatch(Action::RenameCategory(id, rest[1..].join(" "))));
            Ok(())
        }
        "category-delete" => {
            let id = resolve_category(&notebook, arg(rest, 0)?)?;
            report(prompt::delete_category(&mut notebook, &mut terminal, id));
            Ok(())
        }
        "assign" => {
            let note_id = resolve_note(&notebook, arg(rest, 0)?)?;
            let category_id = match arg(rest, 1)? {
                "none" => None,
                other => Some(resolve_category(&notebook, other)?),
            };
            report(notebook.dispatch(Action::AssignCategory(note_id, category_id)));
            Ok(())
        }
        "export" => {
            let id = resolve_note(&notebook, arg(rest, 0)?)?;
            let dir = rest.get(1).map(PathBuf::from).unwrap_or_else(|| config.export_dir());
            if let Some(note) = notebook.note(&id) {
                let path = export::write_markdown(note, &dir)?;
                println!("{}", path.display());
            }
            Ok(())
        }
        "help" | "--help" | "-h" => {
            println!("{}", USAGE);
            Ok(())
        }
        other => Err(format!("unknown command: {}\n\n{}", other, USAGE).into()),
    }
}

/// Reads answers from stdin, or says yes to everything with `--yes`.
struct TerminalPrompt {
    assume_yes: bool,
}

impl TerminalPrompt {
    fn read_line(&self, message: &str) -> Option<String> {
        print!("{} ", message);
        std::io::stdout().flush().ok()?;
        let mut line = String::new();
        match std::io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        }
    }
}

impl prompt::Prompt for TerminalPrompt {
    fn confirm(&mut self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        self.read_line(&format!("{} [y/N]", message))
            .is_some_and(|answer| matches!(answer.trim(), "y" | "Y" | "yes"))
    }

    fn ask(&mut self, message: &str) -> Option<String> {
        self.read_line(message)
    }
}

fn list(notebook: &Notebook, rest: &[String]) -> CliResult {
    let mut filter = Filter::Notes;
    let mut category = None;
    let mut args = rest.iter();
    while let Some(flag) = args.next() {
        match flag.as_str() {
            "--favorites" => filter = Filter::Favorites,
            "--trash" => filter = Filter::Trash,
            "--category" => {
                let value = args.next().ok_or("--category needs an id")?;
                category = Some(resolve_category(notebook, value)?);
            }
            other => return Err(format!("unknown list option: {}", other).into()),
        }
    }

    let visible = view::project(notebook.notes(), filter, category.as_ref());
    match category.as_ref().and_then(|id| notebook.category(id)) {
        Some(c) => println!("== {} / {} ==", filter, c.name),
        None => println!("== {} ==", filter),
    }
    if visible.is_empty() {
        println!("No notes in this category.");
        return Ok(());
    }
    for note in view::sorted_for_display(&visible) {
        let star = if note.favorited { " *" } else { "" };
        println!(
            "{}  {:>11}  {}{}",
            short(&note.id),
            note.modified_label(),
            note.display_title(),
            star
        );
        println!("          {}", note.preview());
    }
    Ok(())
}

fn print_note(notebook: &Notebook, note: &Note) {
    println!("# {}", note.display_title());
    let category = note
        .category_id
        .as_ref()
        .and_then(|id| notebook.category(id))
        .map(|c| c.name.as_str())
        .unwrap_or("Uncategorized");
    let mut flags = Vec::new();
    if note.favorited {
        flags.push("favorite");
    }
    if note.trashed {
        flags.push("trashed");
    }
    println!("{} | {} | {}", note.id, category, note.modified_label());
    if !flags.is_empty() {
        println!("[{}]", flags.join(", "));
    }
    println!();
    println!("{}", note.body);
}

fn note_action(notebook: &mut Notebook, rest: &[String], action: fn(Id) -> Action) -> CliResult {
    let id = resolve_note(notebook, arg(rest, 0)?)?;
    report(notebook.dispatch(action(id)));
    Ok(())
}

fn report(outcome: Outcome) {
    match outcome {
        Outcome::Committed => {}
        Outcome::Unchanged => println!("Nothing changed."),
        Outcome::TrashAlreadyEmpty => println!("The trash is already empty."),
    }
}

fn take_flag(args: &mut Vec<String>, flag: &str) -> bool {
    let before = args.len();
    args.retain(|a| a != flag);
    args.len() != before
}

fn arg(rest: &[String], index: usize) -> Result<&str, String> {
    rest.get(index)
        .map(String::as_str)
        .ok_or_else(|| format!("missing argument\n\n{}", USAGE))
}

fn short(id: &Id) -> &str {
    id.short(8)
}

/// Full id or a unique prefix of one.
fn resolve_prefix<'a>(ids: impl Iterator<Item = &'a Id>, prefix: &str, kind: &str) -> Result<Id, String> {
    let matches: Vec<&Id> = ids.filter(|id| id.as_str().starts_with(prefix)).collect();
    if let Some(exact) = matches.iter().find(|id| id.as_str() == prefix) {
        return Ok((*exact).clone());
    }
    match matches.as_slice() {
        [id] => Ok((*id).clone()),
        [] => Err(format!("no {} matches {}", kind, prefix)),
        _ => Err(format!("{} prefix {} is ambiguous", kind, prefix)),
    }
}

fn resolve_note(notebook: &Notebook, prefix: &str) -> Result<Id, String> {
    resolve_prefix(notebook.notes().iter().map(|n| &n.id), prefix, "note")
}

fn resolve_category(notebook: &Notebook, prefix: &str) -> Result<Id, String> {
    resolve_prefix(notebook.categories().iter().map(|c| &c.id), prefix, "category")
}
