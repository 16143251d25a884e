use anyhow::Result;
use console::Emoji;
use std::path::PathBuf;

use super::{answer_service, extract_in_background};
use crate::cli::render;
use crate::session::Session;

static PAPER: Emoji<'_, '_> = Emoji("📄 ", "");
static BRAIN: Emoji<'_, '_> = Emoji("🧠 ", "");

pub async fn run(pdf: PathBuf, question: String, model: Option<String>) -> Result<()> {
    let service = answer_service(model.as_deref())?;
    let mut session = Session::new();

    let spinner = render::spinner(&PAPER, "Processing your document...");
    let ticket = session.begin_extraction();
    let outcome = extract_in_background(pdf.clone()).await;
    spinner.finish_and_clear();

    let extracted = outcome.is_ok();
    session.finish_extraction(ticket, outcome);
    if !extracted {
        render::transcript(session.messages());
        anyhow::bail!("Could not process {}", pdf.display());
    }

    let Some(ticket) = session.submit(&question) else {
        anyhow::bail!("The question must not be blank");
    };

    let spinner = render::spinner(&BRAIN, "Thinking...");
    let outcome = service.answer(&ticket.question, &ticket.context).await;
    spinner.finish_and_clear();

    let failed = outcome.is_err();
    session.settle(&ticket, outcome);
    if let Some(answer) = session.messages().last() {
        render::message(answer);
    }

    if failed {
        anyhow::bail!("The question could not be answered");
    }

    Ok(())
}
