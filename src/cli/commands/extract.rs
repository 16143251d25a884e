use anyhow::Result;
use console::{Emoji, style};
use std::num::NonZeroUsize;
use std::path::PathBuf;

use super::extract_in_background;
use crate::cli::render;
use crate::llm::truncate_context;

static PAPER: Emoji<'_, '_> = Emoji("📄 ", "");

pub async fn run(pdf: PathBuf, max_chars: Option<NonZeroUsize>) -> Result<()> {
    let spinner = render::spinner(&PAPER, "Processing your document...");
    let text = extract_in_background(pdf).await;
    spinner.finish_and_clear();

    let text = text?;
    let total = text.chars().count();
    let shown = match max_chars {
        Some(n) => truncate_context(&text, n.get()),
        None => text.as_str(),
    };

    print!("{}", shown);
    eprintln!(
        "{}",
        style(format!(
            "{} of {} characters",
            shown.chars().count(),
            total
        ))
        .dim()
    );

    Ok(())
}
