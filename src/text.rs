//! Query and answer shaping applied at the handler boundary.

const QUESTION_WORDS: &[&str] = &[
    "how", "what", "who", "where", "when", "why", "which", "whose", "whom", "what's", "where's",
    "how's",
];

/// Normalise a query before it reaches a chat or search handler.
///
/// Lowercases and trims, terminates the sentence with `?` when it reads like
/// a question (or `.` otherwise) unless it already ends in `.`, `?` or `!`,
/// and capitalises the first character.
pub fn normalize_query(query: &str) -> String {
    let mut normalized = query.trim().to_lowercase();
    if normalized.is_empty() {
        return normalized;
    }

    if !normalized.ends_with(['.', '?', '!']) {
        normalized.push(if is_question(&normalized) { '?' } else { '.' });
    }

    let mut chars = normalized.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => normalized,
    }
}

/// Question words match whole words only, so "show" is not read as "how".
fn is_question(lowercase: &str) -> bool {
    let words: Vec<&str> = lowercase
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric() && c != '\''))
        .collect();

    words.iter().any(|w| QUESTION_WORDS.contains(w))
        || words.windows(2).any(|pair| pair == ["can", "you"])
}

/// Drop blank lines from a generated answer.
pub fn tidy_answer(answer: &str) -> String {
    answer
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
