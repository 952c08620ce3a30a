use once_cell::sync::Lazy;
use regex::Regex;

// ASCII word characters only, matching the behaviour stored tags were built with.
static HASHTAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"#[A-Za-z0-9_]+").unwrap());

/// Extract every `#word` in `text`, normalized, in order of appearance.
///
/// In `##word` the first `#` cannot start a match, so the scanner picks up
/// `#word` and the result is the same single tag.
pub fn extract_tags(text: Option<&str>) -> Vec<String> {
    let Some(text) = text else {
        return Vec::new();
    };

    HASHTAG_RE
        .find_iter(text)
        .map(|m| normalize(m.as_str()))
        .collect()
}

/// Lower-case a token and drop every `#` in it.
pub fn normalize(token: &str) -> String {
    token.to_lowercase().replace('#', "")
}
