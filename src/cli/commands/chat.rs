//! Interactive chat loop.
//!
//! The loop owns the [`Session`] and is the only place it is mutated.
//! Extraction and answer requests run as background tasks and report back
//! over a channel, so the prompt stays responsive (`/reset`, `/open`) while a
//! request is in flight. Results that arrive for a superseded session are
//! dropped by the session's ticket check.
//!
//! When stdin is not a terminal (`medibot chat doc.pdf < questions.txt`) the
//! next line is only read once the session is idle, so piped questions wait
//! for the document and for the previous answer.

use anyhow::{Context, Result};
use console::{Emoji, style};
use std::io::{IsTerminal, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use super::{answer_service, extract_in_background};
use crate::cli::render;
use crate::error::ChatError;
use crate::llm::AnswerService;
use crate::session::{AnswerTicket, ExtractionTicket, Session, SessionStatus};

static PAPER: Emoji<'_, '_> = Emoji("📄 ", "");
static HOURGLASS: Emoji<'_, '_> = Emoji("⏳ ", "... ");
static BROOM: Emoji<'_, '_> = Emoji("🧹 ", "");

enum Event {
    Extracted(ExtractionTicket, Result<String, ChatError>),
    Answered(AnswerTicket, Result<String, ChatError>),
}

#[derive(Debug, PartialEq, Eq)]
enum Input {
    Open(PathBuf),
    Reset,
    History,
    Status,
    Help,
    Quit,
    Question(String),
    Empty,
    Unknown(String),
}

impl Input {
    fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Input::Empty;
        }
        if !trimmed.starts_with('/') {
            return Input::Question(line.trim_end_matches(['\r', '\n']).to_string());
        }

        let (command, arg) = match trimmed.split_once(char::is_whitespace) {
            Some((command, arg)) => (command, arg.trim()),
            None => (trimmed, ""),
        };

        match command {
            "/open" | "/upload" if !arg.is_empty() => Input::Open(PathBuf::from(arg)),
            "/reset" | "/new" => Input::Reset,
            "/history" => Input::History,
            "/status" => Input::Status,
            "/help" => Input::Help,
            "/quit" | "/exit" => Input::Quit,
            other => Input::Unknown(other.to_string()),
        }
    }
}

pub async fn run(pdf: Option<PathBuf>, model: Option<String>) -> Result<()> {
    let service = Arc::new(answer_service(model.as_deref())?);

    render::header("MediBot - Chat with your PDF");
    println!(
        "Type a question, or {} for commands.",
        style("/help").cyan()
    );

    let (tx, mut rx) = mpsc::unbounded_channel::<Event>();
    let mut session = Session::new();

    match pdf {
        Some(path) => start_extraction(&mut session, path, &tx),
        None => println!(
            "Load a document with {}.",
            style("/open <path-to.pdf>").cyan()
        ),
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let interactive = std::io::stdin().is_terminal();
    prompt()?;

    loop {
        tokio::select! {
            line = lines.next_line(), if stdin_open && accepts_input(&session, interactive) => {
                let Some(line) = line.context("Failed to read from stdin")? else {
                    stdin_open = false;
                    // Piped input: let outstanding work settle before leaving.
                    if is_busy(&session) {
                        continue;
                    }
                    break;
                };

                match Input::parse(&line) {
                    Input::Quit => break,
                    Input::Empty => {}
                    Input::Open(path) => start_extraction(&mut session, path, &tx),
                    Input::Reset => {
                        session.reset();
                        println!("{}Session cleared. Load a document with {}.", BROOM, style("/open <path>").cyan());
                    }
                    Input::History => render::transcript(session.messages()),
                    Input::Status => print_status(&session, &service),
                    Input::Help => print_help(),
                    Input::Unknown(command) => println!(
                        "{}",
                        style(format!("Unknown command {command}. Type /help for commands.")).yellow()
                    ),
                    Input::Question(question) => ask(&mut session, &service, question, &tx),
                }
                prompt()?;
            }
            Some(event) = rx.recv() => {
                if apply(&mut session, event) {
                    if let Some(message) = session.messages().last() {
                        println!();
                        render::message(message);
                    }
                    if !stdin_open && !is_busy(&session) {
                        break;
                    }
                    prompt()?;
                }
            }
            else => break,
        }
    }

    Ok(())
}

fn start_extraction(session: &mut Session, path: PathBuf, tx: &mpsc::UnboundedSender<Event>) {
    let ticket = session.begin_extraction();
    println!(
        "{}Processing {}... This may take a moment for large files.",
        PAPER,
        style(path.display()).cyan()
    );

    let tx = tx.clone();
    tokio::spawn(async move {
        let outcome = extract_in_background(path).await;
        let _ = tx.send(Event::Extracted(ticket, outcome));
    });
}

fn ask(
    session: &mut Session,
    service: &Arc<AnswerService>,
    question: String,
    tx: &mpsc::UnboundedSender<Event>,
) {
    let Some(ticket) = session.submit(&question) else {
        let hint = match session.status() {
            SessionStatus::NoDocument => "Load a document first with /open <path>.",
            SessionStatus::Extracting => "Still processing the document, please wait.",
            SessionStatus::Answering => "Still answering the previous question, please wait.",
            SessionStatus::Ready => "Please type a question.",
        };
        println!("{}", style(hint).yellow());
        return;
    };

    println!("{}{}", HOURGLASS, style("Thinking...").dim());

    let service = Arc::clone(service);
    let tx = tx.clone();
    tokio::spawn(async move {
        let outcome = service.answer(&ticket.question, &ticket.context).await;
        let _ = tx.send(Event::Answered(ticket, outcome));
    });
}

fn is_busy(session: &Session) -> bool {
    matches!(
        session.status(),
        SessionStatus::Extracting | SessionStatus::Answering
    )
}

/// A terminal is always read; piped input waits until the session is idle.
fn accepts_input(session: &Session, interactive: bool) -> bool {
    interactive || !is_busy(session)
}

fn apply(session: &mut Session, event: Event) -> bool {
    match event {
        Event::Extracted(ticket, outcome) => session.finish_extraction(ticket, outcome),
        Event::Answered(ticket, outcome) => session.settle(&ticket, outcome),
    }
}

fn prompt() -> Result<()> {
    print!("{} ", style(">").green().bold());
    std::io::stdout().flush().context("Failed to flush stdout")?;
    Ok(())
}

fn print_status(session: &Session, service: &AnswerService) {
    println!("  Status:   {}", style(session.status()).cyan());
    println!("  Provider: {}", style(service.provider_name()).cyan());
    match session.context() {
        Some(context) => println!(
            "  Document: {} characters",
            style(context.chars().count()).cyan()
        ),
        None => println!("  Document: {}", style("none").dim()),
    }
    println!("  Messages: {}", style(session.messages().len()).cyan());
}

fn print_help() {
    println!("Commands:");
    println!("  {}  load a PDF document (replaces the current one)", style("/open <path>").cyan());
    println!("  {}        forget the document and the conversation", style("/reset").cyan());
    println!("  {}      show the conversation so far", style("/history").cyan());
    println!("  {}       show session status", style("/status").cyan());
    println!("  {}         leave", style("/quit").cyan());
    println!("Anything else is a question about the loaded document.");
}
