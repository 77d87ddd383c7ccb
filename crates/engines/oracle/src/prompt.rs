//! Prompt construction and response parsing, independent of any transport.

use blitz_core::Square;
use serde::Deserialize;

use crate::{AdviceRequest, AdvisorError, CommentaryRequest, Suggestion};

pub fn move_prompt(request: &AdviceRequest) -> String {
    let pieces = serde_json::to_string(&request.pieces).unwrap_or_default();
    let history = request.history.join(", ");
    format!(
        "You are a Grandmaster chess engine.\n\
         Current Turn: {turn}\n\
         Board State: {pieces}\n\
         History: {history}\n\
         \n\
         Squares are [rank, file] with 0-7 indices; white starts on ranks 0-1.\n\
         Return the best move in JSON format: {{\"from\": [rank, file], \"to\": [rank, file]}}.\n\
         Only valid moves.",
        turn = request.turn,
    )
}

pub fn commentary_prompt(request: &CommentaryRequest) -> String {
    format!(
        "You are a witty Napoleonic-era Grandmaster.\n\
         A move was just played: {notation}.\n\
         The current evaluation is: {evaluation}.\n\
         Provide a one-sentence commentary in the style of a 19th-century military general. \
         Keep it under 20 words.",
        notation = request.notation,
        evaluation = request.evaluation,
    )
}

#[derive(Deserialize)]
struct RawSuggestion {
    from: Option<Square>,
    to: Option<Square>,
}

/// Parses `{"from": [r, f], "to": [r, f]}`, tolerating a Markdown code fence
/// around it. Off-board coordinates are malformed.
pub fn parse_suggestion(text: &str) -> Result<Suggestion, AdvisorError> {
    let body = strip_fence(text);
    if body.is_empty() {
        return Err(AdvisorError::EmptyResponse);
    }
    let raw: RawSuggestion = serde_json::from_str(body)?;
    let from = raw.from.ok_or(AdvisorError::MissingEndpoint("from"))?;
    let to = raw.to.ok_or(AdvisorError::MissingEndpoint("to"))?;
    Ok(Suggestion { from, to })
}

/// Trims whitespace and wrapping quotes from a commentary line.
pub fn tidy_commentary(text: &str) -> String {
    text.trim()
        .trim_matches(|c| c == '"' || c == '\u{201c}' || c == '\u{201d}')
        .trim()
        .to_string()
}

fn strip_fence(text: &str) -> &str {
    let t = text.trim();
    let Some(rest) = t.strip_prefix("```") else {
        return t;
    };
    // drop an optional language tag on the opening line
    let rest = match rest.find('\n') {
        Some(nl) => &rest[nl + 1..],
        None => rest,
    };
    rest.trim_end().trim_end_matches("```").trim()
}
