//! Keyword extraction from section titles

/// Reserved sigil kept inside tokens during splitting (`$state`, `$app`)
const SIGIL: char = '$';

/// Tokens of this length or shorter carry no search signal
const MIN_KEYWORD_LEN: usize = 3;

/// Extract lowercase keywords from a title
///
/// The title is lowercased and split on every run of characters other than
/// ASCII letters, digits and the `$` sigil. The sigil is then trimmed from
/// each token and tokens of two characters or fewer are dropped, so a bare
/// `$` fragment never survives. Order of first occurrence is kept and
/// duplicates are removed.
pub fn extract_keywords(title: &str) -> Vec<String> {
    let lowered = title.to_lowercase();
    let mut keywords: Vec<String> = Vec::new();

    for token in lowered
        .split(|c: char| !(c.is_ascii_lowercase() || c.is_ascii_digit() || c == SIGIL))
        .map(|t| t.trim_matches(SIGIL))
        .filter(|t| t.len() >= MIN_KEYWORD_LEN)
    {
        if !keywords.iter().any(|k| k == token) {
            keywords.push(token.to_string());
        }
    }

    keywords
}
