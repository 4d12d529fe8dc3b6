use crate::error::InsightError;
use crate::results::Question;
use crate::store::LetterStore;
use async_trait::async_trait;

/// Longest question accepted, in characters
pub const MAX_QUESTION_LEN: usize = 5000;

/// Text-generation backend that answers questions about a letter
#[async_trait]
pub trait AnswerService: Send + Sync {
    /// Complete a prompt, returning the raw answer text
    async fn complete(&self, prompt: &str) -> Result<String, InsightError>;
}

/// Prompt asking for an answer grounded in the letter's text
pub fn build_prompt(letter_body: &str, question: &str) -> String {
    format!(
        "You are an expert economist analyzing Federal Reserve Bank economic letters.\n\
         \n\
         Here is an economic letter:\n\
         \n\
         <letter>\n{letter_body}\n</letter>\n\
         \n\
         Please answer the following question about this letter:\n\
         \n\
         <question>\n{question}\n</question>\n\
         \n\
         Provide a clear, concise, and informative answer based on the content of the letter. \
         If the letter doesn't contain enough information to fully answer the question, \
         acknowledge this and provide what insights you can based on the available content."
    )
}

/// Answer `question` about letter `letter_id` and record the exchange
pub async fn ask_question<S, A>(
    store: &mut S,
    service: &A,
    letter_id: i64,
    question: &str,
) -> Result<Question, InsightError>
where
    S: LetterStore,
    A: AnswerService + ?Sized,
{
    let question = question.trim();
    let len = question.chars().count();
    if len == 0 || len > MAX_QUESTION_LEN {
        return Err(InsightError::InvalidQuestion {
            max: MAX_QUESTION_LEN,
        });
    }

    let letter = store
        .get_letter(letter_id)?
        .ok_or(InsightError::LetterNotFound(letter_id))?;

    ::log::info!("Generating answer for letter {}", letter_id);
    let answer = service.complete(&build_prompt(&letter.body, question)).await?;

    let stored = store.insert_question(letter_id, question, &answer)?;
    ::log::info!(
        "Inserted question with ID {} for letter {}",
        stored.id,
        letter_id
    );
    Ok(stored)
}
