use super::ClassifierError;

/// System prompt for the yes/no question judgement
pub const YES_NO_SYSTEM_PROMPT: &str =
    "You are an expert at identifying yes/no questions, and at analyzing courtroom transcripts.";

/// Build the user prompt for one question
pub fn build_yes_no_prompt(question: &str) -> String {
    format!(
        "Is the following question a yes or no question? Respond with 'yes' or 'no':\n\nQuestion: {}",
        question
    )
}

/// Read the model's reply as a boolean
pub fn parse_yes_no_reply(reply: &str) -> Result<bool, ClassifierError> {
    let answer = reply
        .trim()
        .trim_matches(|c: char| c.is_ascii_punctuation() || c.is_whitespace())
        .to_lowercase();
    match answer.as_str() {
        "yes" => Ok(true),
        "no" => Ok(false),
        _ => Err(ClassifierError::UnexpectedAnswer(reply.to_string())),
    }
}
