//! lector - read documents one word at a time

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use clap::{Parser, Subcommand};
use tokio::sync::{Notify, mpsc};

use lector::preferences::ReadingMode;
use lector::{
    Assembler, Document, DocumentStore, JsonStore, PlaybackController, PlaybackSession,
    PlaybackState, PositionCoalescer, ReadingSession, UserPreferences, process_word,
    time_now_millis, update_progress,
};

#[derive(Parser)]
#[command(name = "lector")]
#[command(version, about = "Speed-read documents in the terminal", long_about = None)]
#[command(after_help = "EXAMPLES:
    lector info book.epub                Show metadata and chapters
    lector words notes.md                Print each word with its focus letter
    lector read book.epub --wpm 450      Read at 450 words per minute
    lector library --store ~/.lector     List saved documents")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show document metadata and chapters
    Info {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Print every word with its ORP split
    Words {
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Present the document word by word
    Read {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Reading rate in words per minute (default: stored preference)
        #[arg(long)]
        wpm: Option<i64>,

        /// Extra pause after punctuation, in milliseconds
        #[arg(long)]
        pause: Option<u32>,

        /// Directory for saved documents, progress and preferences
        #[arg(long, value_name = "DIR")]
        store: Option<PathBuf>,
    },
    /// List documents saved in a store
    Library {
        #[arg(long, value_name = "DIR")]
        store: PathBuf,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Info { file } => show_info(&file),
        Command::Words { file } => show_words(&file),
        Command::Read {
            file,
            wpm,
            pause,
            store,
        } => read(&file, wpm, pause, store.as_deref()),
        Command::Library { store } => show_library(&store),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn show_info(path: &Path) -> Result<(), String> {
    let doc = Assembler::new()
        .import_path(path)
        .map_err(|e| e.to_string())?;

    println!("File: {}", path.display());
    println!("Title: {}", doc.title);
    println!("Author: {}", doc.author);
    println!("Format: {} ({})", doc.format, doc.format.mime_type());
    println!("Words: {}", doc.word_count);
    println!("Chapters: {}", doc.chapters.len());
    for chapter in &doc.chapters {
        println!(
            "  {:>7}-{:<7} {}",
            chapter.start_word_index, chapter.end_word_index, chapter.title
        );
    }
    Ok(())
}

fn show_words(path: &Path) -> Result<(), String> {
    let doc = Assembler::new()
        .import_path(path)
        .map_err(|e| e.to_string())?;

    let mut out = std::io::stdout().lock();
    for (i, word) in doc.words().iter().enumerate() {
        let split = process_word(word);
        writeln!(
            out,
            "{i:>7} {}[{}]{}",
            split.before_orp, split.orp_char, split.after_orp
        )
        .map_err(|e| e.to_string())?;
    }
    Ok(())
}

fn show_library(dir: &Path) -> Result<(), String> {
    let store = JsonStore::open(dir).map_err(|e| e.to_string())?;
    let documents = store.load_all().map_err(|e| e.to_string())?;
    if documents.is_empty() {
        println!("No documents in {}", dir.display());
        return Ok(());
    }
    for doc in documents {
        println!(
            "{:>3}%  {:<40} {} ({}, {} words)",
            doc.reading_progress, doc.title, doc.author, doc.format, doc.word_count
        );
    }
    Ok(())
}

/// Resume the stored copy of `path` if one exists, otherwise import it.
fn open_for_reading(path: &Path, store: Option<&mut JsonStore>) -> Result<Document, String> {
    let imported = Assembler::new()
        .import_path(path)
        .map_err(|e| e.to_string())?;
    let Some(store) = store else {
        return Ok(imported);
    };

    let existing = store
        .load_all()
        .map_err(|e| e.to_string())?
        .into_iter()
        .find(|d| d.source == imported.source && d.content == imported.content);
    match existing {
        Some(doc) => Ok(doc),
        None => {
            store.upsert(&imported).map_err(|e| e.to_string())?;
            Ok(imported)
        }
    }
}

fn read(
    path: &Path,
    wpm: Option<i64>,
    pause: Option<u32>,
    store_dir: Option<&Path>,
) -> Result<(), String> {
    let mut store = match store_dir {
        Some(dir) => Some(JsonStore::open(dir).map_err(|e| e.to_string())?),
        None => None,
    };
    let preferences = match &store {
        Some(store) => store.load_preferences().map_err(|e| e.to_string())?,
        None => UserPreferences::default(),
    };
    let doc = open_for_reading(path, store.as_mut())?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .enable_io()
        .build()
        .map_err(|e| e.to_string())?;
    let started_at = time_now_millis();
    let end_position = runtime.block_on(present(&doc, &preferences, wpm, pause, store.as_mut()))?;

    if let Some(store) = store.as_mut() {
        update_progress(store, &doc.id, end_position).map_err(|e| e.to_string())?;
        let session = ReadingSession::new(
            &doc.id,
            ReadingMode::Rsvp,
            (started_at, time_now_millis()),
            (doc.current_position, end_position),
        );
        store.record_session(session).map_err(|e| e.to_string())?;
    }
    Ok(())
}

async fn present(
    doc: &Document,
    preferences: &UserPreferences,
    wpm: Option<i64>,
    pause: Option<u32>,
    mut store: Option<&mut JsonStore>,
) -> Result<usize, String> {
    let words = Arc::new(doc.words());
    let mut controller = PlaybackController::new(
        words.as_ref().clone(),
        doc.current_position,
        preferences.rate(),
        pause.unwrap_or(preferences.punctuation_pause),
    );
    if let Some(wpm) = wpm {
        controller.set_rate(wpm).map_err(|e| e.to_string())?;
    }

    let last_position = Arc::new(AtomicUsize::new(doc.current_position));
    let finished = Arc::new(Notify::new());
    let (autosave_tx, mut autosave_rx) = mpsc::unbounded_channel();
    let coalescer = Arc::new(Mutex::new(PositionCoalescer::default()));

    {
        let words = Arc::clone(&words);
        let last_position = Arc::clone(&last_position);
        let coalescer = Arc::clone(&coalescer);
        let autosave = preferences.auto_save;
        controller.on_position_change(move |position| {
            last_position.store(position, Ordering::Relaxed);
            if let Some(word) = words.get(position) {
                let split = process_word(word);
                print!(
                    "\r\x1b[2K{:>20}\x1b[1;31m{}\x1b[0m{}",
                    split.before_orp, split.orp_char, split.after_orp
                );
                let _ = std::io::stdout().flush();
            }
            if autosave
                && let Ok(mut coalescer) = coalescer.lock()
                && let Some(position) = coalescer.offer(position)
            {
                let _ = autosave_tx.send(position);
            }
        });
    }
    {
        let finished = Arc::clone(&finished);
        controller.on_completed(move || finished.notify_one());
    }

    let mut session = PlaybackSession::new(controller);
    if session.state() == PlaybackState::Completed {
        println!("{} has no readable words.", doc.source);
        return Ok(last_position.load(Ordering::Relaxed));
    }
    let first = session.current_word();
    print!(
        "{:>20}\x1b[1;31m{}\x1b[0m{}",
        first.before_orp, first.orp_char, first.after_orp
    );
    let _ = std::io::stdout().flush();
    session.play();

    loop {
        tokio::select! {
            _ = finished.notified() => break,
            _ = tokio::signal::ctrl_c() => break,
            Some(position) = autosave_rx.recv() => {
                if let Some(store) = store.as_deref_mut()
                    && let Err(e) = update_progress(store, &doc.id, position)
                {
                    log::warn!("autosave failed: {e}");
                }
            }
        }
    }

    session.close();
    println!();
    Ok(last_position.load(Ordering::Relaxed))
}
