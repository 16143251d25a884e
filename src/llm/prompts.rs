/// Sampling temperature for answers. Kept low so the model stays literal.
pub const ANSWER_TEMPERATURE: f32 = 0.1;

/// Sentence the model must reply with when the document has no answer.
pub const NOT_FOUND_ANSWER: &str =
    "I could not find an answer to that question in the provided document.";

/// System prompt for answering questions about the loaded document
pub const ANSWER_SYSTEM_PROMPT: &str = r#"You are an expert medical chatbot. Your purpose is to answer questions based *only* on the provided text from a medical document.
- Analyze the following context carefully.
- Answer the user's question using only the information found within the provided context.
- Do not use any external knowledge or make assumptions.
- If the answer to the question cannot be found in the provided context, you must explicitly state: "I could not find an answer to that question in the provided document."
- Be concise and direct in your response."#;

/// A provider-neutral request: one system instruction and one user turn.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptRequest {
    pub system_instruction: &'static str,
    pub user_content: String,
    pub temperature: f32,
}

/// Build the request for `question`, embedding the (already truncated)
/// document context between `---` markers. Nothing is escaped.
pub fn build_prompt(question: &str, context: &str) -> PromptRequest {
    PromptRequest {
        system_instruction: ANSWER_SYSTEM_PROMPT,
        user_content: answer_user_prompt(question, context),
        temperature: ANSWER_TEMPERATURE,
    }
}

/// User prompt template for answering
fn answer_user_prompt(question: &str, context: &str) -> String {
    format!("CONTEXT:\n---\n{}\n---\n\nQUESTION: {}", context, question)
}
