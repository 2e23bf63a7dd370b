//! Splitting of raw input lines into argument vectors.
//!
//! There is no quoting or escaping: every run of delimiter characters separates two
//! arguments and nothing else is special.

/// Characters separating arguments: space, tab, carriage return, newline and bell.
pub const DELIMITERS: [char; 5] = [' ', '\t', '\r', '\n', '\x07'];

/// Splits `line` into its arguments.
///
/// The returned slices borrow from `line`. Leading, trailing and repeated delimiters
/// never produce empty arguments, so a blank line yields an empty vector.
pub fn split_into_tokens(line: &str) -> Vec<&str> {
    line.split(&DELIMITERS[..])
        .filter(|token| !token.is_empty())
        .collect()
}
