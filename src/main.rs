mod app;
mod board;
mod config;
mod drag;
mod edit;
mod input;
mod logging;
mod ui;

use std::env;
use std::io;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{bail, eyre, WrapErr};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};

use board::ids::{IdGenerator, UuidIds};
use board::storage::{init_board, resolve_tack_dir, storage_for, DirStorage, SnapshotStorage, StorageError, TACK_DIR};
use board::store::BoardStore;
use board::{Board, List};
use config::Config;
use drag::{resolve_drop, DropTarget};

#[derive(Parser)]
#[command(name = "tack", about = "A mouse-driven Kanban board for the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Initialize a new .tack/ board in the current directory
    Init,
    #[command(flatten)]
    Board(BoardCommand),
}

#[derive(Subcommand)]
enum BoardCommand {
    /// Print all lists and cards with their ids
    Show,
    /// Add a card to the end of a list
    Add {
        /// Target list id
        list_id: String,
        /// Card text
        content: String,
    },
    /// Append a new list
    AddList {
        title: String,
    },
    /// Move a card to a list (appends unless --index is given)
    Move {
        card_id: String,
        /// Target list id
        list_id: String,
        /// Position in the target list, counted after the card is taken out
        #[arg(short, long)]
        index: Option<usize>,
    },
    /// Drop a card onto a card or list id, as a mouse drag would
    Drop {
        card_id: String,
        /// Card or list id under the pointer (card ids win)
        over_id: String,
        /// Treat the id as a list id, dropping onto the list's empty area
        #[arg(long)]
        list: bool,
    },
    /// Rename a list
    Rename {
        list_id: String,
        title: String,
    },
    /// Replace a card's text (empty text deletes the card)
    Edit {
        card_id: String,
        content: String,
    },
    /// Delete a card
    Rm {
        card_id: String,
    },
    /// Replace the board with the starter board
    Reset,
}

fn main() {
    // Install color_eyre for unexpected panics/errors (developer bugs).
    let _ = color_eyre::install();
    let cli = Cli::parse();
    let cwd = match env::current_dir() {
        Ok(d) => d,
        Err(e) => {
            eprintln!("error: cannot determine current directory: {e}");
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Command::Init) => cmd_init(&cwd),
        Some(Command::Board(cmd)) => {
            locate(&cwd).and_then(|(tack_dir, config)| run_board_command(&mut open_store(&tack_dir, &config), cmd))
        }
        None => locate(&cwd).and_then(|(tack_dir, config)| cmd_tui(&tack_dir, &config)),
    };

    logging::flush_logging();
    if let Err(e) = result {
        print_user_error(&e);
        std::process::exit(1);
    }
}

/// Print a user-friendly error message, with actionable hints for known error types.
fn print_user_error(error: &color_eyre::Report) {
    if let Some(storage_err) = error.downcast_ref::<StorageError>() {
        match storage_err {
            StorageError::NotFound(_) => {
                eprintln!("error: no tack board found and no data directory available.");
                eprintln!("  Run `tack init` to create one here.");
            }
            StorageError::InvalidKey(key) => {
                eprintln!("error: invalid storage key: {key:?}");
                eprintln!("  Set [board] storage_key in config.toml to letters, digits, '-', '_' or '.'.");
            }
            StorageError::TomlDe(e) => {
                eprintln!("error: config file has invalid TOML syntax.");
                eprintln!("  {e}");
            }
            StorageError::TomlSer(e) => {
                eprintln!("error: failed to save board config.");
                eprintln!("  {e}");
            }
            StorageError::Json(e) => {
                eprintln!("error: failed to serialize the board.");
                eprintln!("  {e}");
            }
            StorageError::Io(e) => {
                eprintln!("error: could not read or write board files.");
                eprintln!("  {e}");
            }
        }
        return;
    }

    if let Some(log_err) = error.downcast_ref::<logging::LoggingError>() {
        eprintln!("error: {log_err}");
        eprintln!("  Check [log] level in config.toml.");
        return;
    }

    eprintln!("error: {e:#}", e = error);
}

/// Find the board directory, load its config and start logging.
fn locate(cwd: &Path) -> color_eyre::Result<(PathBuf, Config)> {
    let tack_dir = resolve_tack_dir(cwd)?;
    let config = Config::load(&tack_dir)?;
    logging::init_logging(&config.log.level, &tack_dir)?;
    Ok((tack_dir, config))
}

fn open_store(tack_dir: &Path, config: &Config) -> BoardStore<DirStorage, UuidIds> {
    BoardStore::open(storage_for(tack_dir), config.board.storage_key.clone(), UuidIds)
}

fn cmd_init(cwd: &Path) -> color_eyre::Result<()> {
    if cwd.join(TACK_DIR).exists() {
        bail!("Board already exists in this directory");
    }
    let tack_dir = init_board(cwd)?;
    println!("Initialized tack board in {}", tack_dir.display());
    println!("Run `tack` to open the board, or `tack show` to list it.");
    Ok(())
}

fn cmd_tui(tack_dir: &Path, config: &Config) -> color_eyre::Result<()> {
    let mut terminal = ratatui::init();
    if let Err(e) = crossterm::execute!(io::stdout(), EnableMouseCapture) {
        ratatui::restore();
        return Err(e).wrap_err("failed to enable mouse capture");
    }
    let result = app::run(&mut terminal, tack_dir, config);
    let _ = crossterm::execute!(io::stdout(), DisableMouseCapture);
    ratatui::restore();
    result
}

fn run_board_command<S: SnapshotStorage, G: IdGenerator>(
    store: &mut BoardStore<S, G>,
    cmd: BoardCommand,
) -> color_eyre::Result<()> {
    match cmd {
        BoardCommand::Show => {
            print!("{}", format_board(store.board()));
            Ok(())
        }
        BoardCommand::Add { list_id, content } => cmd_add(store, &list_id, &content),
        BoardCommand::AddList { title } => {
            let id = store.add_list(&title)?;
            println!("Created list {id}: {title}");
            Ok(())
        }
        BoardCommand::Move { card_id, list_id, index } => cmd_move(store, &card_id, &list_id, index),
        BoardCommand::Drop { card_id, over_id, list } => cmd_drop(store, &card_id, &over_id, list),
        BoardCommand::Rename { list_id, title } => cmd_rename(store, &list_id, &title),
        BoardCommand::Edit { card_id, content } => cmd_edit(store, &card_id, &content),
        BoardCommand::Rm { card_id } => {
            let list_id = list_of(store.board(), &card_id)?;
            store.delete_card(&list_id, &card_id)?;
            println!("Deleted {card_id}");
            Ok(())
        }
        BoardCommand::Reset => {
            if store.replace(Board::seed())? {
                println!("Board reset");
            } else {
                println!("Board is already the starter board");
            }
            Ok(())
        }
    }
}

/// Id of the list holding `card_id`.
fn list_of(board: &Board, card_id: &str) -> color_eyre::Result<String> {
    let (li, _) = board
        .find_card(card_id)
        .ok_or_else(|| eyre!("Card '{}' not found", card_id))?;
    Ok(board.lists[li].id.clone())
}

fn require_list<'a>(board: &'a Board, list_id: &str) -> color_eyre::Result<&'a List> {
    board
        .list(list_id)
        .ok_or_else(|| eyre!("List '{}' not found", list_id))
}

fn cmd_add<S: SnapshotStorage, G: IdGenerator>(
    store: &mut BoardStore<S, G>,
    list_id: &str,
    content: &str,
) -> color_eyre::Result<()> {
    if content.trim().is_empty() {
        bail!("Card content cannot be empty");
    }
    let title = require_list(store.board(), list_id)?.title.clone();
    let id = store
        .add_card(list_id)?
        .ok_or_else(|| eyre!("List '{}' not found", list_id))?;
    store.update_card_content(list_id, &id, content)?;
    println!("Created {id} in {title}");
    Ok(())
}

fn cmd_move<S: SnapshotStorage, G: IdGenerator>(
    store: &mut BoardStore<S, G>,
    card_id: &str,
    list_id: &str,
    index: Option<usize>,
) -> color_eyre::Result<()> {
    list_of(store.board(), card_id)?;
    let target = require_list(store.board(), list_id)?;
    let title = target.title.clone();
    let index = index.unwrap_or(target.cards.len());

    if store.move_card(card_id, list_id, index)? {
        println!("Moved {card_id} to {title}");
    } else {
        println!("Card is already there");
    }
    Ok(())
}

fn cmd_drop<S: SnapshotStorage, G: IdGenerator>(
    store: &mut BoardStore<S, G>,
    card_id: &str,
    over_id: &str,
    as_list: bool,
) -> color_eyre::Result<()> {
    list_of(store.board(), card_id)?;
    let over = if as_list {
        require_list(store.board(), over_id)?;
        DropTarget::List(over_id.to_string())
    } else {
        DropTarget::resolve(store.board(), over_id)
            .ok_or_else(|| eyre!("Nothing with id '{}' to drop onto", over_id))?
    };

    match resolve_drop(store.board(), card_id, Some(&over)) {
        Some(intent) => {
            store.move_card(&intent.card_id, &intent.target_list_id, intent.target_index)?;
            println!("Moved {card_id} to {} at {}", intent.target_list_id, intent.target_index);
        }
        None => println!("Card is already there"),
    }
    Ok(())
}

fn cmd_rename<S: SnapshotStorage, G: IdGenerator>(
    store: &mut BoardStore<S, G>,
    list_id: &str,
    title: &str,
) -> color_eyre::Result<()> {
    require_list(store.board(), list_id)?;
    let title = title.trim();
    if store.rename_list(list_id, title)? {
        println!("Renamed list {list_id} to {title}");
    } else {
        println!("List {list_id} already has that title");
    }
    Ok(())
}

fn cmd_edit<S: SnapshotStorage, G: IdGenerator>(
    store: &mut BoardStore<S, G>,
    card_id: &str,
    content: &str,
) -> color_eyre::Result<()> {
    let list_id = list_of(store.board(), card_id)?;
    let changed = store.update_card_content(&list_id, card_id, content)?;
    if content.trim().is_empty() {
        println!("Deleted {card_id}");
    } else if changed {
        println!("Updated {card_id}");
    } else {
        println!("Card {card_id} unchanged");
    }
    Ok(())
}

/// Plain-text rendering of the board for `tack show`.
fn format_board(board: &Board) -> String {
    let mut out = String::new();
    for list in &board.lists {
        out.push_str(&format!("{} [{}] ({})\n", list.title, list.id, list.cards.len()));
        out.push_str(&format!("{}\n", "─".repeat(40)));
        for card in &list.cards {
            let mut lines = card.content.lines();
            let first = lines.next().unwrap_or("");
            out.push_str(&format!("  {:<8} {}\n", card.id, first));
            for line in lines {
                out.push_str(&format!("  {:<8} {}\n", "", line));
            }
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::ids::SequentialIds;
    use crate::board::storage::{load_board, MemoryStorage};

    type TestStore = BoardStore<MemoryStorage, SequentialIds>;

    fn store() -> TestStore {
        BoardStore::open(MemoryStorage::new(), "kanban-board", SequentialIds::new("n"))
    }

    fn ids_in(store: &TestStore, list_id: &str) -> Vec<String> {
        store.board().list(list_id).unwrap().cards.iter().map(|c| c.id.clone()).collect()
    }

    #[test]
    fn cmd_init_creates_board_once() {
        let dir = tempfile::tempdir().unwrap();
        cmd_init(dir.path()).unwrap();
        let tack_dir = dir.path().join(TACK_DIR);
        assert!(tack_dir.join(config::CONFIG_FILE).is_file());

        let config = Config::load(&tack_dir).unwrap();
        let storage = storage_for(&tack_dir);
        assert_eq!(load_board(&storage, &config.board.storage_key), Board::seed());

        let err = cmd_init(dir.path()).unwrap_err();
        assert!(format!("{err:#}").contains("already exists"));
    }

    #[test]
    fn board_command_persists_to_dir_storage() {
        let dir = tempfile::tempdir().unwrap();
        let tack_dir = init_board(dir.path()).unwrap();
        let config = Config::load(&tack_dir).unwrap();

        let mut store = open_store(&tack_dir, &config);
        run_board_command(&mut store, BoardCommand::Rename { list_id: "2".into(), title: "Doing".into() }).unwrap();

        let reopened = open_store(&tack_dir, &config);
        assert_eq!(reopened.board().lists[1].title, "Doing");
    }

    #[test]
    fn add_appends_card_with_content() {
        let mut store = store();
        run_board_command(&mut store, BoardCommand::Add { list_id: "2".into(), content: " Ship ".into() }).unwrap();
        assert_eq!(ids_in(&store, "2"), vec!["3", "n1"]);
        assert_eq!(store.board().card("n1").unwrap().content, "Ship");
    }

    #[test]
    fn add_rejects_empty_content_and_unknown_list() {
        let mut store = store();
        assert!(run_board_command(&mut store, BoardCommand::Add { list_id: "1".into(), content: "  ".into() }).is_err());
        let err = run_board_command(&mut store, BoardCommand::Add { list_id: "9".into(), content: "x".into() })
            .unwrap_err();
        assert!(format!("{err:#}").contains("List '9' not found"));
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn move_appends_by_default() {
        let mut store = store();
        run_board_command(&mut store, BoardCommand::Move { card_id: "1".into(), list_id: "2".into(), index: None })
            .unwrap();
        assert_eq!(ids_in(&store, "1"), vec!["2"]);
        assert_eq!(ids_in(&store, "2"), vec!["3", "1"]);
    }

    #[test]
    fn move_with_index() {
        let mut store = store();
        run_board_command(&mut store, BoardCommand::Move { card_id: "2".into(), list_id: "1".into(), index: Some(0) })
            .unwrap();
        assert_eq!(ids_in(&store, "1"), vec!["2", "1"]);
    }

    #[test]
    fn move_unknown_card_is_an_error() {
        let mut store = store();
        let err = run_board_command(&mut store, BoardCommand::Move { card_id: "x".into(), list_id: "1".into(), index: None })
            .unwrap_err();
        assert!(format!("{err:#}").contains("Card 'x' not found"));
    }

    #[test]
    fn drop_on_card_takes_its_place() {
        let mut store = store();
        run_board_command(&mut store, BoardCommand::Drop { card_id: "2".into(), over_id: "3".into(), list: false }).unwrap();
        assert_eq!(ids_in(&store, "1"), vec!["1"]);
        assert_eq!(ids_in(&store, "2"), vec!["2", "3"]);
    }

    #[test]
    fn drop_on_list_appends_and_own_list_is_noop() {
        let mut store = store();
        run_board_command(&mut store, BoardCommand::AddList { title: "Done".into() }).unwrap();
        run_board_command(&mut store, BoardCommand::Drop { card_id: "3".into(), over_id: "n1".into(), list: false }).unwrap();
        assert_eq!(ids_in(&store, "n1"), vec!["3"]);

        let revision = store.revision();
        run_board_command(&mut store, BoardCommand::Drop { card_id: "3".into(), over_id: "n1".into(), list: false }).unwrap();
        assert_eq!(store.revision(), revision);
    }

    #[test]
    fn drop_list_flag_reaches_list_shadowed_by_card_id() {
        let mut store = store();
        run_board_command(&mut store, BoardCommand::Drop { card_id: "3".into(), over_id: "1".into(), list: false }).unwrap();
        assert_eq!(ids_in(&store, "1"), vec!["3", "1", "2"]);

        let mut store = self::store();
        run_board_command(&mut store, BoardCommand::Drop { card_id: "3".into(), over_id: "1".into(), list: true }).unwrap();
        assert_eq!(ids_in(&store, "1"), vec!["1", "2", "3"]);
        assert!(run_board_command(&mut store, BoardCommand::Drop { card_id: "3".into(), over_id: "3".into(), list: true }).is_err());
    }

    #[test]
    fn rename_trims_and_padded_same_title_is_noop() {
        let mut store = store();
        run_board_command(&mut store, BoardCommand::Rename { list_id: "1".into(), title: " To Do ".into() }).unwrap();
        assert_eq!(store.revision(), 0);
        assert_eq!(store.storage().writes, 0);

        run_board_command(&mut store, BoardCommand::Rename { list_id: "1".into(), title: "  Backlog ".into() }).unwrap();
        assert_eq!(store.board().lists[0].title, "Backlog");
    }

    #[test]
    fn drop_onto_unknown_id_is_an_error() {
        let mut store = store();
        assert!(run_board_command(&mut store, BoardCommand::Drop { card_id: "1".into(), over_id: "zz".into(), list: false }).is_err());
    }

    #[test]
    fn edit_with_empty_content_deletes() {
        let mut store = store();
        run_board_command(&mut store, BoardCommand::Edit { card_id: "3".into(), content: "".into() }).unwrap();
        assert!(store.board().card("3").is_none());
    }

    #[test]
    fn rm_and_reset() {
        let mut store = store();
        run_board_command(&mut store, BoardCommand::Rm { card_id: "1".into() }).unwrap();
        assert!(run_board_command(&mut store, BoardCommand::Rm { card_id: "1".into() }).is_err());
        run_board_command(&mut store, BoardCommand::Reset).unwrap();
        assert_eq!(store.board(), &Board::seed());
    }

    #[test]
    fn add_list_appends() {
        let mut store = store();
        run_board_command(&mut store, BoardCommand::AddList { title: "Done".into() }).unwrap();
        assert_eq!(store.board().lists[2].title, "Done");
        assert!(store.board().lists[2].cards.is_empty());
    }

    #[test]
    fn format_board_lists_ids_and_continuation_lines() {
        let mut board = Board::seed();
        board.lists[1].cards[0].content = "first\nsecond".into();
        let out = format_board(&board);
        assert!(out.contains("To Do [1] (2)"));
        assert!(out.contains("  1        Task 1\n"));
        assert!(out.contains("  3        first\n           second\n"));
    }

    #[test]
    fn cli_parses_flattened_board_commands() {
        let cli = Cli::try_parse_from(["tack", "move", "1", "2", "--index", "0"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Board(BoardCommand::Move { index: Some(0), .. }))
        ));
        let cli = Cli::try_parse_from(["tack", "add-list", "Done"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Board(BoardCommand::AddList { .. }))));
        assert!(Cli::try_parse_from(["tack"]).unwrap().command.is_none());
        let cli = Cli::try_parse_from(["tack", "drop", "3", "1", "--list"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Board(BoardCommand::Drop { list: true, .. }))));
    }
}
