use crate::foundation::error::{ReelError, ReelResult};

/// Fields extracted from one `round_<N>_summary.txt` artifact.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct RoundSummary {
    /// Round number from the `Round N` header, when present.
    pub round_number: Option<u32>,
    /// The prompt word or phrase.
    pub prompt: String,
    /// Image file name recorded by the game generator.
    pub image_file: Option<String>,
    /// The wrong guess recorded for the round.
    pub guess: Option<String>,
}

const PROMPT_KEYS: &[&str] = &["actual word", "final word", "prompt", "word"];
const IMAGE_KEYS: &[&str] = &["image file", "image"];
const GUESS_KEYS: &[&str] = &["ai's wrong guess", "wrong guess", "guess"];

/// Parse a round summary.
///
/// Lines are `key: value` pairs; keys match case-insensitively and values are trimmed of
/// whitespace and surrounding quotes. A summary without a prompt line is a data error.
pub fn parse_summary(text: &str) -> ReelResult<RoundSummary> {
    let mut out = RoundSummary::default();
    let mut prompt = None;

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if out.round_number.is_none()
            && let Some(n) = parse_round_header(line)
        {
            out.round_number = Some(n);
            continue;
        }

        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim().to_ascii_lowercase();
        let value = clean_value(value);
        if value.is_empty() {
            continue;
        }

        if prompt.is_none() && PROMPT_KEYS.contains(&key.as_str()) {
            prompt = Some(value);
        } else if out.image_file.is_none() && IMAGE_KEYS.contains(&key.as_str()) {
            out.image_file = Some(value);
        } else if out.guess.is_none() && GUESS_KEYS.contains(&key.as_str()) {
            out.guess = Some(value);
        }
    }

    out.prompt = prompt.ok_or_else(|| ReelError::data("summary has no prompt line"))?;
    Ok(out)
}

fn parse_round_header(line: &str) -> Option<u32> {
    let (head, rest) = line.split_once(char::is_whitespace)?;
    if !head.eq_ignore_ascii_case("round") {
        return None;
    }
    rest.trim().parse().ok()
}

fn clean_value(value: &str) -> String {
    value
        .trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .trim()
        .to_string()
}

#[cfg(test)]
#[path = "../../tests/unit/session/summary.rs"]
mod tests;
