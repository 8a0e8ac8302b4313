//! Character-level cleanup, the first normalization step

/// Strip apostrophes, blank out everything that is not an ASCII letter,
/// collapse whitespace and lowercase.
///
/// Apostrophes are removed rather than blanked so contractions stay one
/// token ("don't" → "dont").
///
/// # Examples
///
/// ```
/// use genre_common::text::clean;
///
/// assert_eq!(clean("It's 1984, Winston!"), "its winston");
/// assert_eq!(clean("  ... 42 ..."), "");
/// ```
pub fn clean(text: &str) -> String {
    let letters_only: String = text
        .chars()
        .filter(|&c| c != '\'')
        .map(|c| if c.is_ascii_alphabetic() { c } else { ' ' })
        .collect();

    letters_only
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_lowercase()
}
