/// Token separators: space, tab, CR, LF, and BEL.
const DELIMITERS: &[char] = &[' ', '\t', '\r', '\n', '\x07'];

/// Splits a line into owned tokens. No quoting or escaping; `&` is a token
/// like any other.
pub fn tokenize(line: &str) -> Vec<String> {
    line.split(DELIMITERS)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}
