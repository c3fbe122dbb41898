//! Line masking: comments and string-literal contents become spaces so that
//! pattern rules only ever see code. Byte offsets are preserved, which lets
//! a capture on the masked line be read back from the original line.

use crate::analyzer::language::CommentSyntax;

/// A string delimiter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
    pub delim: char,
    /// Whether the literal may continue past the end of a line
    pub multiline: bool,
}

impl Quote {
    pub const fn single_line(delim: char) -> Self {
        Self {
            delim,
            multiline: false,
        }
    }

    pub const fn multiline(delim: char) -> Self {
        Self {
            delim,
            multiline: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Code,
    Block { closer: &'static str },
    Str(Quote),
}

/// Stateful masker; feed it the lines of one file in order.
pub struct LineMasker {
    comments: CommentSyntax,
    quotes: &'static [Quote],
    state: State,
}

impl LineMasker {
    pub fn new(comments: CommentSyntax, quotes: &'static [Quote]) -> Self {
        Self {
            comments,
            quotes,
            state: State::Code,
        }
    }

    pub fn mask(&mut self, line: &str) -> String {
        let mut out = String::with_capacity(line.len());
        let mut i = 0;

        while i < line.len() {
            let tail = &line[i..];
            let Some(ch) = tail.chars().next() else {
                break;
            };

            match self.state {
                State::Block { closer } => {
                    if tail.starts_with(closer) {
                        blank(&mut out, closer.len());
                        i += closer.len();
                        self.state = State::Code;
                    } else {
                        blank(&mut out, ch.len_utf8());
                        i += ch.len_utf8();
                    }
                }
                State::Str(quote) => {
                    if ch == '\\' {
                        blank(&mut out, 1);
                        i += 1;
                        if let Some(escaped) = line[i..].chars().next() {
                            blank(&mut out, escaped.len_utf8());
                            i += escaped.len_utf8();
                        }
                    } else if ch == quote.delim {
                        out.push(ch);
                        i += ch.len_utf8();
                        self.state = State::Code;
                    } else {
                        blank(&mut out, ch.len_utf8());
                        i += ch.len_utf8();
                    }
                }
                State::Code => {
                    if let Some((opener, closer)) = self
                        .comments
                        .block
                        .iter()
                        .find(|(opener, _)| tail.starts_with(*opener))
                        .copied()
                    {
                        blank(&mut out, opener.len());
                        i += opener.len();
                        self.state = State::Block { closer };
                    } else if self.comments.line.iter().any(|m| tail.starts_with(*m)) {
                        blank(&mut out, tail.len());
                        i = line.len();
                    } else if let Some(quote) = self.quotes.iter().find(|q| q.delim == ch) {
                        out.push(ch);
                        i += ch.len_utf8();
                        self.state = State::Str(*quote);
                    } else {
                        out.push(ch);
                        i += ch.len_utf8();
                    }
                }
            }
        }

        // An unterminated single-line literal ends with its line
        if let State::Str(quote) = self.state
            && !quote.multiline
        {
            self.state = State::Code;
        }
        out
    }
}

fn blank(out: &mut String, width: usize) {
    out.extend(std::iter::repeat_n(' ', width));
}
