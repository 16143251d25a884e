pub mod ask;
pub mod chat;
pub mod extract;
pub mod init;

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::cli::render;
use crate::config::Config;
use crate::error::ChatError;
use crate::llm::AnswerService;
use crate::parser;

/// Build the answer service, showing the configuration screen when no
/// credential is available.
pub(crate) fn answer_service(model: Option<&str>) -> Result<AnswerService> {
    let config = Config::load().context("Failed to load configuration")?;
    AnswerService::from_config(&config, model).map_err(|err| {
        render::configuration_error(&err);
        anyhow::Error::new(err)
    })
}

/// Run PDF extraction on the blocking pool.
pub(crate) async fn extract_in_background(path: PathBuf) -> Result<String, ChatError> {
    tokio::task::spawn_blocking(move || parser::extract_document(&path))
        .await
        .map_err(|e| ChatError::Extraction(format!("Extraction task failed: {e}")))?
}
