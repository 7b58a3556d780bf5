use std::path::{Path, PathBuf};
use std::str::Chars;

use crate::core::diag::{Location, ParseError};
use crate::core::evt::ParseErrorKind;

/// One `;`-terminated statement together with the line it starts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub text: String,
    pub line: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Default,
    InComment,
    InString,
}

/// Splits preprocessed `.evt` text into statements.
///
/// `#` starts a comment running to the end of the line and `"` toggles a
/// string; neither a `#` nor a `;` inside a string is special. A backslash
/// right before `"`, `#` or `;` escapes it.
pub struct Scanner<'a> {
    path: PathBuf,
    source: Chars<'a>,
    line: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(path: &Path, source: &'a str) -> Self {
        Self {
            path: path.to_path_buf(),
            source: source.chars(),
            line: 1,
        }
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn location(&self) -> Location {
        Location::new(&self.path, self.line)
    }

    /// Returns the next statement, or `None` at a clean end of input.
    pub fn next_chunk(&mut self) -> Result<Option<Chunk>, ParseError> {
        let mut chunk = String::new();
        let mut start_line = None;
        let mut state = State::Default;
        let mut prev = '\0';

        loop {
            let Some(cur) = self.source.next() else {
                if chunk.trim().is_empty() {
                    return Ok(None);
                }
                return Err(ParseErrorKind::UnexpectedEof.at(&self.location()));
            };

            match state {
                State::Default => {
                    if cur == '"' && prev != '\\' {
                        state = State::InString;
                    }

                    if cur == '#' && prev != '\\' {
                        state = State::InComment;
                        continue;
                    }

                    if cur == ';' && prev != '\\' {
                        let text = chunk.trim();
                        let line = start_line.unwrap_or(self.line);
                        if text.is_empty() {
                            return Err(ParseErrorKind::EmptyBlock.at(&Location::new(&self.path, line)));
                        }
                        return Ok(Some(Chunk {
                            text: format!("{text};"),
                            line,
                        }));
                    }
                }

                State::InString => {
                    if cur == '"' && prev != '\\' {
                        state = State::Default;
                    }
                }

                State::InComment => {
                    if cur != '\n' {
                        continue;
                    }
                    state = State::Default;
                }
            }

            if cur == '\n' {
                self.line += 1;
            } else if start_line.is_none() && !cur.is_whitespace() {
                start_line = Some(self.line);
            }

            chunk.push(cur);
            prev = cur;
        }
    }
}

impl Iterator for Scanner<'_> {
    type Item = Result<Chunk, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_chunk().transpose()
    }
}

#[cfg(test)]
#[path = "../../tests/evt/t_scanner.rs"]
mod tests;
