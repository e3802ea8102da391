/// Punctuation removed before splitting. Removed, not replaced by a space.
const STRIPPED_PUNCTUATION: [char; 4] = ['.', ',', '?', '!'];

/// Normalizes `text` and splits it into word tokens.
///
/// Trims surrounding whitespace, lower-cases, deletes `.`, `,`, `?` and `!`,
/// then splits on single space characters. Empty input yields `[""]` and runs of
/// spaces yield empty tokens; both are passed through as-is so the index
/// sequence matches what the paired classifier was trained on.
pub fn tokenize(text: &str) -> Vec<String> {
    let normalized: String = text
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| !STRIPPED_PUNCTUATION.contains(c))
        .collect();

    normalized.split(' ').map(str::to_string).collect()
}
