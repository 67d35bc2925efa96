//! Pipeline string parser
//!
//! ```text
//! pipeline  := primitive '(' input (',' terminal)* ')'
//! input     := 'data' | pipeline
//! terminal  := [primitive '.'] name '=' value
//! value     := quoted string | number | True | False | None | bare word
//! ```

use super::grammar::Grammar;
use super::{Candidate, HyperValue, Step};
use crate::error::CandidateError;

const DATA: &str = "data";

/// Recursive-descent parser for one serialized candidate.
pub(super) struct PipelineParser<'a> {
    input: &'a str,
    pos: usize,
    grammar: &'a Grammar,
}

impl<'a> PipelineParser<'a> {
    pub(super) const fn new(input: &'a str, grammar: &'a Grammar) -> Self {
        Self {
            input,
            pos: 0,
            grammar,
        }
    }

    pub(super) fn parse(mut self) -> Result<Candidate, CandidateError> {
        let mut steps = Vec::new();
        self.skip_whitespace();
        let name = self.identifier()?;
        self.pipeline(name, &mut steps)?;
        self.skip_whitespace();
        if self.pos != self.input.len() {
            return Err(self.error("trailing input after pipeline"));
        }
        let estimator = steps
            .pop()
            .ok_or_else(|| self.error("pipeline has no steps"))?;
        Ok(Candidate {
            preprocessing: steps,
            estimator,
        })
    }

    // `name` has been consumed; parses the rest of the call and pushes the
    // steps innermost first.
    fn pipeline(&mut self, name: &'a str, steps: &mut Vec<Step>) -> Result<(), CandidateError> {
        let kind = self
            .grammar
            .kind(name)
            .ok_or_else(|| self.error(&format!("unknown primitive '{name}'")))?;
        self.expect('(')?;

        self.skip_whitespace();
        let input = self.identifier()?;
        self.skip_whitespace();
        if self.peek() == Some('(') {
            self.pipeline(input, steps)?;
        } else if input != DATA {
            return Err(self.error(&format!("expected '{DATA}' or a primitive, found '{input}'")));
        }

        let mut hyperparameters = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some(',') => {
                    self.pos += 1;
                    hyperparameters.push(self.terminal(name)?);
                }
                Some(')') => {
                    self.pos += 1;
                    break;
                }
                _ => return Err(self.error(&format!("unterminated call to '{name}'"))),
            }
        }

        steps.push(Step {
            primitive: name.to_string(),
            kind,
            hyperparameters,
        });
        Ok(())
    }

    // `<Primitive>.<name>=<value>`, or `<name>=<value>` for a hyperparameter
    // shared between primitives.
    fn terminal(&mut self, owner: &str) -> Result<(String, HyperValue), CandidateError> {
        self.skip_whitespace();
        let first = self.identifier()?;
        let parameter = if self.peek() == Some('.') {
            self.pos += 1;
            let parameter = self.identifier()?;
            if first != owner {
                return Err(self.error(&format!(
                    "hyperparameter '{first}.{parameter}' does not belong to '{owner}'"
                )));
            }
            parameter
        } else {
            first
        };
        self.skip_whitespace();
        self.expect('=')?;
        self.skip_whitespace();
        Ok((parameter.to_string(), self.value()?))
    }

    fn value(&mut self) -> Result<HyperValue, CandidateError> {
        if let Some(quote @ ('\'' | '"')) = self.peek() {
            self.pos += 1;
            let input = self.input;
            let rest = &input[self.pos..];
            let end = rest
                .find(quote)
                .ok_or_else(|| self.error("unterminated string"))?;
            self.pos += end + 1;
            return Ok(HyperValue::Str(rest[..end].to_string()));
        }

        let input = self.input;
        let rest = &input[self.pos..];
        let end = rest
            .find(|c: char| c == ',' || c == ')')
            .unwrap_or(rest.len());
        let raw = rest[..end].trim();
        if raw.is_empty() {
            return Err(self.error("missing hyperparameter value"));
        }
        self.pos += end;
        Ok(HyperValue::from_literal(raw))
    }

    fn identifier(&mut self) -> Result<&'a str, CandidateError> {
        let input = self.input;
        let rest = &input[self.pos..];
        let end = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(rest.len());
        if end == 0 {
            return Err(self.error("expected an identifier"));
        }
        self.pos += end;
        Ok(&rest[..end])
    }

    fn expect(&mut self, expected: char) -> Result<(), CandidateError> {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            Ok(())
        } else {
            Err(self.error(&format!("expected '{expected}'")))
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn skip_whitespace(&mut self) {
        let rest = &self.input[self.pos..];
        let skipped = rest.len() - rest.trim_start().len();
        self.pos += skipped;
    }

    fn error(&self, reason: &str) -> CandidateError {
        CandidateError::new(format!("{reason} at position {} in '{}'", self.pos, self.input))
    }
}
