//! # Tokenizer
//!
//! Splits a command line on spaces, keeping double-quoted runs together.
//!
//! ```text
//! modify -name="The Hobbit" -price=9.90
//! └─┬──┘ └───────┬────────┘ └────┬────┘
//!   0            1               2
//! ```
//!
//! Quotes stay in the token text; flag parsers strip them. Only the space
//! character separates tokens, and an unmatched quote runs to end of line.

/// Splits `line` into tokens. Empty and all-space lines yield no tokens.
pub fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quote = false;

    for c in line.chars() {
        match c {
            '"' => {
                in_quote = !in_quote;
                current.push(c);
            }
            ' ' if !in_quote => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(c),
        }
    }

    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}
