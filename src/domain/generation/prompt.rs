//! Prompt layout and answer extraction

/// Style preamble placed before the web data
pub const PERSONA: &str = "You're Alphonse, a witty and sarcastic AI who answers based ONLY on the web data provided, no fluff.";

/// Cue the model continues from; everything after its last occurrence is the answer
pub const ANSWER_CUE: &str = "Answer:";

/// Decoded tokens that end generation
pub const TERMINAL_TOKENS: [&str; 3] = [".", "!", "?"];

/// Builds the full prompt for a question and its context
pub fn build_prompt(question: &str, context: &str) -> String {
    format!(
        "{}\nWeb data: {}\nQuestion: {}\n{} ",
        PERSONA, context, question, ANSWER_CUE
    )
}

/// Returns the text after the last answer cue, trimmed
///
/// Falls back to the whole decoded text when the cue is missing.
pub fn extract_answer(decoded: &str) -> String {
    match decoded.rfind(ANSWER_CUE) {
        Some(idx) => decoded[idx + ANSWER_CUE.len()..].trim().to_string(),
        None => decoded.trim().to_string(),
    }
}

pub(crate) fn is_terminal(token_text: &str) -> bool {
    TERMINAL_TOKENS.contains(&token_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_prompt_layout() {
        let prompt = build_prompt("Who?", "Some data");

        assert!(prompt.starts_with(PERSONA));
        assert!(prompt.contains("\nWeb data: Some data\n"));
        assert!(prompt.contains("\nQuestion: Who?\n"));
        assert!(prompt.ends_with("Answer: "));
    }

    #[test]
    fn test_extract_answer_uses_last_cue() {
        let decoded = "Web data: Answer: fake\nQuestion: q\nAnswer:  Paris, obviously. ";
        assert_eq!(extract_answer(decoded), "Paris, obviously.");
    }

    #[test]
    fn test_extract_answer_without_cue() {
        assert_eq!(extract_answer("  just text  "), "just text");
    }

    #[test]
    fn test_terminal_tokens() {
        assert!(is_terminal("."));
        assert!(is_terminal("!"));
        assert!(is_terminal("?"));
        assert!(!is_terminal(" ."));
        assert!(!is_terminal("..."));
        assert!(!is_terminal(","));
    }
}
