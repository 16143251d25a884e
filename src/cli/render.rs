use console::{Emoji, style};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::error::ChatError;
use crate::llm::NOT_FOUND_ANSWER;
use crate::session::{Message, Sender};

static BOT: Emoji<'_, '_> = Emoji("🩺 ", "bot> ");
static USER: Emoji<'_, '_> = Emoji("🧑 ", "you> ");
static CROSS: Emoji<'_, '_> = Emoji("❌ ", "[X] ");

pub fn header(title: &str) {
    println!();
    println!("{}", style(format!(" {} ", title)).bold().reverse());
    println!();
}

pub fn message(message: &Message) {
    match message.sender {
        Sender::User => println!("{}{}", USER, style(&message.text).cyan()),
        Sender::Bot if message.text.trim() == NOT_FOUND_ANSWER => {
            println!("{}{}", BOT, style(&message.text).yellow())
        }
        Sender::Bot => println!("{}{}", BOT, message.text),
    }
}

pub fn transcript(messages: &[Message]) {
    if messages.is_empty() {
        println!("{}", style("No messages yet.").dim());
        return;
    }
    for m in messages {
        message(m);
    }
}

/// Blocking screen shown instead of the chat when no credential is set.
pub fn configuration_error(err: &ChatError) {
    println!();
    println!("{}", style(" Configuration Error ").bold().white().on_red());
    println!();
    println!("{}{}", CROSS, style(err).red());
    println!();
    println!("Set the key with:");
    println!("  {} export API_KEY=your-key", style("$").dim());
    println!("or run {} and edit the config file.", style("medibot init").cyan());
    println!();
}

pub fn spinner(prefix: &Emoji<'_, '_>, message: &'static str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template(&format!("{}{{spinner:.green}} {{msg}}", prefix))
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(message);
    spinner
}
