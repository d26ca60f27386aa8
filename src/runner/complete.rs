//! Shell completion
//!
//! Works from the raw command line and the cursor position, both supplied by a
//! shell hook through `--complete [--position N] <line>`.

use crate::binding::POSITIONAL_ONLY;
use crate::catalog::{Operation, ParamType, ParameterSpec, ScalarKind};
use crate::error::InvocationError;
use crate::resolve::{suggest, Arguments, Candidate, Comparison, Suggestion, Token};
use std::sync::Arc;
use tracing::debug;

/// Flag carrying the cursor position
pub const POSITION_FLAG: &str = "--position";

/// Parsed `--complete` arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub line: String,
    pub position: usize,
}

impl CompletionRequest {
    /// Read `--position N` and the line from the tokens that followed `--complete`.
    ///
    /// The last token that is not part of a position pair is the line. The
    /// position defaults to the end of the line.
    pub fn parse(tokens: &[Token]) -> Result<Self, InvocationError> {
        let mut line = None;
        let mut position = None;
        let mut iter = tokens.iter();

        while let Some(token) = iter.next() {
            if token.value == POSITION_FLAG {
                let number = iter
                    .next()
                    .and_then(|t| t.value.trim().parse::<usize>().ok())
                    .ok_or_else(|| {
                        InvocationError::Usage(format!(
                            "Failed to parse number.  Argument: {}",
                            POSITION_FLAG
                        ))
                    })?;
                position = Some(number);
                continue;
            }

            line = Some(token.value.clone());
        }

        let line = line.ok_or_else(|| {
            InvocationError::Usage("Missing required positional argument.  Argument: line".to_string())
        })?;
        let position = position.unwrap_or(line.len());

        Ok(CompletionRequest { line, position })
    }
}

/// Completion engine over one candidate index
pub struct Completer<'a> {
    candidates: &'a [Candidate],
    cmp: Comparison,
    sigils: &'a str,
    default_sigil: char,
}

impl<'a> Completer<'a> {
    pub fn new(candidates: &'a [Candidate], cmp: Comparison, sigils: &'a str, default_sigil: char) -> Self {
        Completer {
            candidates,
            cmp,
            sigils,
            default_sigil,
        }
    }

    /// Completions for the word under the cursor, in order, without duplicates
    pub fn complete(&self, line: &str, position: usize) -> Vec<String> {
        let mut args = Arguments::parse(line);
        args.trim(position);

        // the program name
        args.skip(1);

        let mut completions = self.completions(args.as_slice());
        let mut seen = Vec::with_capacity(completions.len());
        completions.retain(|c| {
            let fresh = !seen.contains(c);
            if fresh {
                seen.push(c.clone());
            }
            fresh
        });

        debug!(line, position, count = completions.len(), "completed");
        completions
    }

    fn completions(&self, tokens: &[Token]) -> Vec<String> {
        let Some((head, rest)) = tokens.split_first() else {
            return Vec::new();
        };

        let suggestions = suggest(&head.value, self.candidates, self.cmp);

        // still typing the command name
        let Some((cursor, middle)) = rest.split_last() else {
            return suggestions.into_iter().map(|s| s.text).collect();
        };

        if head.value.trim().is_empty() {
            return Vec::new();
        }

        let Some(operation) = self.resolve(&head.value, &suggestions) else {
            return Vec::new();
        };

        self.argument_completions(&operation, middle, &cursor.value)
    }

    /// The one operation a command-name token stands for
    fn resolve(&self, text: &str, suggestions: &[Suggestion]) -> Option<Arc<Operation>> {
        if let [only] = suggestions {
            return only.operation.clone();
        }

        let mut exact = suggestions
            .iter()
            .filter(|s| s.operation.is_some() && self.cmp.eq(&s.text, text));
        match (exact.next(), exact.next()) {
            (Some(s), None) => s.operation.clone(),
            _ => None,
        }
    }

    fn argument_completions(&self, operation: &Operation, middle: &[Token], cursor: &str) -> Vec<String> {
        let mut parameters: Vec<&ParameterSpec> = operation.parameters.iter().collect();
        let mut last_named: Option<&ParameterSpec> = None;
        let mut positional_only = false;

        for token in middle {
            last_named = None;

            if positional_only {
                continue;
            }

            if token.value == POSITIONAL_ONLY {
                positional_only = true;
            } else if let Some((_, name)) = self.split_sigil(&token.value) {
                if let Some(ix) = parameters.iter().position(|p| self.cmp.eq(&p.name, name)) {
                    last_named = Some(parameters[ix]);

                    // repeatable parameters stay available
                    if !parameters[ix].ty.is_enumerable() {
                        parameters.remove(ix);
                    }
                }
            }
        }

        let name_shaped = self.split_sigil(cursor);
        if !positional_only && ((cursor.is_empty() && last_named.is_none()) || name_shaped.is_some()) {
            let (sigil, partial) = name_shaped.unwrap_or((self.default_sigil, ""));
            return parameters
                .iter()
                .filter(|p| self.cmp.starts_with(&p.name, partial))
                .map(|p| format!("{}{}", sigil, p.name))
                .collect();
        }

        match last_named.or_else(|| parameters.first().copied()) {
            Some(param) => self.value_completions(&param.ty, cursor),
            None => Vec::new(),
        }
    }

    fn value_completions(&self, ty: &ParamType, cursor: &str) -> Vec<String> {
        let ty = ty.element_type();
        let nullable = matches!(ty, ParamType::Nullable(_));

        let values: Vec<String> = match ty.underlying() {
            ParamType::Enum(e) => e.names().map(str::to_string).collect(),
            ParamType::Scalar(ScalarKind::Boolean) => {
                let mut values = vec!["true".to_string(), "false".to_string()];
                if nullable {
                    values.push("null".to_string());
                }
                values
            }
            _ => Vec::new(),
        };

        values
            .into_iter()
            .filter(|v| self.cmp.starts_with(v, cursor))
            .collect()
    }

    /// Sigil and name of a parameter-name-shaped token
    fn split_sigil<'t>(&self, token: &'t str) -> Option<(char, &'t str)> {
        let sigil = token.chars().next().filter(|c| self.sigils.contains(*c))?;
        Some((sigil, &token[sigil.len_utf8()..]))
    }
}
