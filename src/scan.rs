//! Generic delimited-token scanning
//!
//! Provides [`TokenScanner`], a single-pass scanner that locates markers
//! between a fixed pair of delimiters and hands each marker's inner text to
//! a pluggable [`ContentHandler`]. The scanner knows nothing about what the
//! markers mean; the handler decides what replaces them.
//!
//! Scanning rules:
//! - A backslash immediately before a delimiter escapes that one occurrence;
//!   the backslash is dropped and the delimiter passes through literally.
//! - Markers do not nest. An open delimiter inside a marker's content is
//!   ordinary text; the nearest unescaped close delimiter ends the marker.
//! - A marker with no closing delimiter anywhere in the remaining text is
//!   emitted as-is and the handler is not invoked for it.

/// Maps a marker's inner text to its replacement text.
///
/// Implemented for any `Fn(&str) -> String`, so a closure works wherever a
/// handler is expected:
///
/// ```
/// use varsub::scan::TokenScanner;
///
/// let shout = |content: &str| content.to_uppercase();
/// let scanner = TokenScanner::new("${", "}", &shout);
/// assert_eq!(scanner.parse("hello ${name}"), "hello NAME");
/// ```
pub trait ContentHandler {
    /// Produce the replacement text for one marker's content.
    fn handle(&self, content: &str) -> String;
}

impl<F> ContentHandler for F
where
    F: Fn(&str) -> String,
{
    fn handle(&self, content: &str) -> String {
        self(content)
    }
}

/// Single-pass scanner for delimited markers in text.
///
/// The delimiter pair is fixed for the scanner's lifetime and must be
/// non-empty. A scanner holds no per-call state, so one instance can be
/// reused across any number of [`parse`](TokenScanner::parse) calls.
pub struct TokenScanner<'a> {
    open_token: &'a str,
    close_token: &'a str,
    handler: &'a dyn ContentHandler,
}

impl<'a> TokenScanner<'a> {
    /// Create a scanner for the given delimiter pair and handler.
    pub fn new(open_token: &'a str, close_token: &'a str, handler: &'a dyn ContentHandler) -> Self {
        debug_assert!(
            !open_token.is_empty() && !close_token.is_empty(),
            "delimiter tokens must be non-empty"
        );
        Self {
            open_token,
            close_token,
            handler,
        }
    }

    /// Scan `text` and rebuild it with every well-formed marker replaced by
    /// the handler's output.
    ///
    /// Accepts either `&str` or `Option<&str>`; absent and empty input both
    /// produce an empty string rather than echoing the absence back. Text
    /// containing no open delimiter is returned unchanged without consulting
    /// the handler.
    ///
    /// ```
    /// use varsub::scan::TokenScanner;
    ///
    /// let echo = |content: &str| format!("<{}>", content);
    /// let scanner = TokenScanner::new("${", "}", &echo);
    ///
    /// assert_eq!(scanner.parse(None), "");
    /// assert_eq!(scanner.parse("plain text"), "plain text");
    /// assert_eq!(scanner.parse("a ${b} c"), "a <b> c");
    /// ```
    pub fn parse<'t>(&self, text: impl Into<Option<&'t str>>) -> String {
        let text = match text.into() {
            Some(text) if !text.is_empty() => text,
            _ => return String::new(),
        };
        let Some(mut start) = text.find(self.open_token) else {
            return text.to_string();
        };

        // Delimiter escapes are a single ASCII byte before the match, so
        // byte-position arithmetic is safe on UTF-8 input: 0x5C can never be
        // the trailing byte of a multi-byte character.
        let bytes = text.as_bytes();
        let mut offset = 0;
        let mut builder = String::with_capacity(text.len());
        let mut expression = String::new();

        loop {
            if start > 0 && bytes[start - 1] == b'\\' {
                // Escaped open token: drop the backslash, keep the token.
                builder.push_str(&text[offset..start - 1]);
                builder.push_str(self.open_token);
                offset = start + self.open_token.len();
            } else {
                expression.clear();
                builder.push_str(&text[offset..start]);
                offset = start + self.open_token.len();

                let mut end = find_from(text, self.close_token, offset);
                while let Some(at) = end {
                    if at <= offset || bytes[at - 1] != b'\\' {
                        expression.push_str(&text[offset..at]);
                        break;
                    }
                    // Escaped close token: it belongs to the expression.
                    expression.push_str(&text[offset..at - 1]);
                    expression.push_str(self.close_token);
                    offset = at + self.close_token.len();
                    end = find_from(text, self.close_token, offset);
                }

                match end {
                    Some(at) => {
                        builder.push_str(&self.handler.handle(&expression));
                        offset = at + self.close_token.len();
                    }
                    None => {
                        // Unterminated marker: emit it literally, scan over.
                        builder.push_str(&text[start..]);
                        offset = text.len();
                    }
                }
            }

            match find_from(text, self.open_token, offset) {
                Some(next) => start = next,
                None => break,
            }
        }

        if offset < text.len() {
            builder.push_str(&text[offset..]);
        }
        builder
    }
}

fn find_from(text: &str, token: &str, from: usize) -> Option<usize> {
    text[from..].find(token).map(|at| at + from)
}
