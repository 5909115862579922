//! Text Normalizer — syntactic cleanup of raw extracted document text.
//!
//! PDF and DOCX extraction leaves behind broken line wraps, exotic whitespace,
//! ligatures and control characters. Everything downstream (quality, experience,
//! relevance) reads the output of `normalize_text`, never raw text.
//!
//! Also hosts the small lexical helpers shared by the analyzers.

/// Cleans raw extracted text. Idempotent; never fails.
pub fn normalize_text(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    // Pass 1: character-level cleanup.
    let mut cleaned = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() != Some(&'\n') {
                    cleaned.push('\n');
                }
            }
            '\n' | '\u{2028}' | '\u{2029}' | '\u{0B}' | '\u{0C}' | '\u{85}' => cleaned.push('\n'),
            '\t' => cleaned.push(' '),
            '\u{FB00}' => cleaned.push_str("ff"),
            '\u{FB01}' => cleaned.push_str("fi"),
            '\u{FB02}' => cleaned.push_str("fl"),
            '\u{FB03}' => cleaned.push_str("ffi"),
            '\u{FB04}' => cleaned.push_str("ffl"),
            // zero-width, soft hyphen, BOM
            '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{2060}' | '\u{00AD}' | '\u{FEFF}' => {}
            c if c.is_control() => {}
            c if c.is_whitespace() => cleaned.push(' '),
            c => cleaned.push(c),
        }
    }

    // Pass 2: line-level cleanup.
    let mut lines: Vec<String> = Vec::new();
    let mut pending_blank = false;
    for line in cleaned.split('\n') {
        let collapsed = collapse_spaces(line);
        if collapsed.is_empty() {
            pending_blank = !lines.is_empty();
            continue;
        }

        // Rejoin a word hyphenated across the previous line break.
        if !pending_blank {
            if let Some(prev) = lines.last_mut() {
                if ends_with_broken_word(prev) && starts_with_lowercase(&collapsed) {
                    prev.pop();
                    prev.push_str(&collapsed);
                    continue;
                }
            }
        }

        if pending_blank {
            lines.push(String::new());
            pending_blank = false;
        }
        lines.push(collapsed);
    }

    lines.join("\n")
}

fn collapse_spaces(line: &str) -> String {
    line.split(' ')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// `develop-` at the end of a line, preceded by a letter.
fn ends_with_broken_word(line: &str) -> bool {
    let mut rev = line.chars().rev();
    matches!(rev.next(), Some('-')) && rev.next().is_some_and(|c| c.is_alphabetic())
}

fn starts_with_lowercase(line: &str) -> bool {
    line.chars().next().is_some_and(|c| c.is_lowercase())
}

// ────────────────────────────────────────────────────────────────────────────
// Lexical helpers
// ────────────────────────────────────────────────────────────────────────────

/// Characters that may appear inside a token besides alphanumerics
/// (`c++`, `c#`, `node.js`, `ci/cd` splits on `/`).
fn is_token_inner(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '+' | '#' | '.' | '\'')
}

/// Lowercased word tokens. Trailing punctuation is stripped, so `Python.` and
/// `Python` are the same token, while `c++` and `node.js` survive intact.
pub fn word_tokens(text: &str) -> Vec<String> {
    text.split(|c: char| !is_token_inner(c))
        .map(|t| t.trim_matches(|c: char| matches!(c, '.' | '\'')))
        .filter(|t| t.chars().any(|c| c.is_alphanumeric()))
        .map(|t| t.to_lowercase())
        .collect()
}

/// Finds `term` in `haystack` on word boundaries. Both arguments must already be
/// lowercased. Returns the byte offset of the first boundary-respecting match.
pub fn find_term(haystack: &str, term: &str) -> Option<usize> {
    if term.is_empty() {
        return None;
    }
    haystack.match_indices(term).map(|(idx, _)| idx).find(|&idx| {
        let before_ok = haystack[..idx]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());
        let after = &haystack[idx + term.len()..];
        let mut after_chars = after.chars();
        let after_ok = match after_chars.next() {
            None => true,
            // `python.` ends a sentence, `node.js` continues a token
            Some('.') => after_chars.next().map_or(true, |c| !c.is_alphanumeric()),
            Some(c) => !c.is_alphanumeric() && !matches!(c, '+' | '#'),
        };
        before_ok && after_ok
    })
}
