//! Line-preserving `@if` / `@else` / `@endif` preprocessing.
//!
//! Every input line yields exactly one output line: directives and skipped
//! lines become empty lines so that diagnostics reported against the
//! preprocessed text point at the user's original line numbers.

use std::path::Path;

use indexmap::IndexMap;

use crate::core::diag::{Location, ParseError};
use crate::core::evt::ParseErrorKind;

pub const HOST_VERSION: &str = "HOST_VERSION";

/// Accepted as a synonym for `HOST_VERSION` in existing `.evt` files.
pub const ZEEK_VERSION: &str = "ZEEK_VERSION";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Include,
    Skip,
}

#[derive(Debug, Clone, Copy)]
struct Branch {
    parent: State,
    taken: bool,
    seen_else: bool,
    state: State,
}

#[derive(Debug, Clone)]
pub struct Preprocessor {
    vars: IndexMap<String, i64>,
    stack: Vec<Branch>,
}

impl Preprocessor {
    pub fn new(host_version: u32) -> Self {
        let mut vars = IndexMap::new();
        vars.insert(HOST_VERSION.to_string(), i64::from(host_version));
        vars.insert(ZEEK_VERSION.to_string(), i64::from(host_version));
        Self {
            vars,
            stack: Vec::new(),
        }
    }

    pub fn state(&self) -> State {
        self.stack.last().map_or(State::Include, |b| b.state)
    }

    pub fn expecting_directive(&self) -> bool {
        !self.stack.is_empty()
    }

    /// Applies a single directive. `directive` includes the leading `@`.
    pub fn process_directive(
        &mut self,
        directive: &str,
        condition: &str,
    ) -> Result<(), ParseErrorKind> {
        match directive {
            "@if" => {
                let parent = self.state();
                let taken = self.eval(condition)?;
                let state = if parent == State::Include && taken {
                    State::Include
                } else {
                    State::Skip
                };
                self.stack.push(Branch {
                    parent,
                    taken,
                    seen_else: false,
                    state,
                });
                Ok(())
            }
            "@else" => {
                let branch = self
                    .stack
                    .last_mut()
                    .ok_or(ParseErrorKind::UnmatchedDirective("else"))?;
                if branch.seen_else {
                    return Err(ParseErrorKind::DuplicateElse);
                }
                branch.seen_else = true;
                branch.state = if branch.parent == State::Include && !branch.taken {
                    State::Include
                } else {
                    State::Skip
                };
                Ok(())
            }
            "@endif" => {
                self.stack
                    .pop()
                    .ok_or(ParseErrorKind::UnmatchedDirective("endif"))?;
                Ok(())
            }
            other => Err(ParseErrorKind::UnknownDirective(other.to_string())),
        }
    }

    /// Evaluates `[!] VAR [OP INT]`. A bare variable is true when non-zero.
    fn eval(&self, condition: &str) -> Result<bool, ParseErrorKind> {
        let invalid = || ParseErrorKind::InvalidCondition(condition.to_string());

        let mut rest = condition.trim();
        let negate = rest.starts_with('!') && !rest.starts_with("!=");
        if negate {
            rest = rest[1..].trim_start();
        }

        let name_len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(rest.len());
        if name_len == 0 {
            return Err(invalid());
        }
        let (name, rest) = rest.split_at(name_len);
        let value = *self
            .vars
            .get(name)
            .ok_or_else(|| ParseErrorKind::UnknownVariable(name.to_string()))?;

        let rest = rest.trim();
        let result = if rest.is_empty() {
            value != 0
        } else {
            let (op, operand) = ["==", "!=", "<=", ">=", "<", ">"]
                .iter()
                .find_map(|op| rest.strip_prefix(op).map(|operand| (*op, operand)))
                .ok_or_else(invalid)?;
            let operand: i64 = operand.trim().parse().map_err(|_| invalid())?;
            match op {
                "==" => value == operand,
                "!=" => value != operand,
                "<=" => value <= operand,
                ">=" => value >= operand,
                "<" => value < operand,
                _ => value > operand,
            }
        };

        Ok(result != negate)
    }

    /// Runs the whole file through the preprocessor.
    pub fn preprocess(&mut self, path: &Path, source: &str) -> Result<String, ParseError> {
        let mut out = String::with_capacity(source.len());
        let mut line_no = 0;

        for line in source.lines() {
            line_no += 1;
            let trimmed = line.trim();

            if trimmed.starts_with('@') {
                out.push('\n');
                let (directive, condition) = trimmed
                    .split_once(char::is_whitespace)
                    .unwrap_or((trimmed, ""));
                self.process_directive(directive, condition.trim())
                    .map_err(|kind| kind.at(&Location::new(path, line_no)))?;
                continue;
            }

            if self.state() == State::Include {
                out.push_str(line);
            }
            out.push('\n');
        }

        if self.expecting_directive() {
            return Err(ParseErrorKind::UnterminatedDirective.at(&Location::new(path, line_no)));
        }

        Ok(out)
    }
}

#[cfg(test)]
#[path = "../../tests/evt/t_preprocess.rs"]
mod tests;
