//! Suggestion matcher
//!
//! Prefix-matches a partial token against the candidate index. The result is an
//! ordered list of group-level (`Name.`) or operation-level (`Name.Op`) matches;
//! deciding whether that list is good enough is left to the caller.

use crate::catalog::{CommandGroup, Operation};
use crate::resolve::{Candidate, Comparison};
use std::sync::Arc;
use tracing::trace;

/// One resolution match
#[derive(Debug, Clone)]
pub struct Suggestion {
    pub text: String,
    pub group: Arc<CommandGroup>,
    /// `None` for a group-level match that has not been descended into
    pub operation: Option<Arc<Operation>>,
    pub group_index: usize,
}

impl Suggestion {
    fn same_as(&self, other: &Suggestion) -> bool {
        self.text == other.text
            && Arc::ptr_eq(&self.group, &other.group)
            && match (&self.operation, &other.operation) {
                (Some(a), Some(b)) => Arc::ptr_eq(a, b),
                (None, None) => true,
                _ => false,
            }
    }
}

/// Match `partial` against every candidate, in candidate then operation order
pub fn suggest(partial: &str, candidates: &[Candidate], cmp: Comparison) -> Vec<Suggestion> {
    let mut suggestions = Vec::new();

    for (index, candidate) in candidates.iter().enumerate() {
        let name = candidate.name.as_str();
        let name_typed = name.len() <= partial.len();
        let (shorter, longer) = if name_typed {
            (name, partial)
        } else {
            (partial, name)
        };

        if !cmp.starts_with(longer, shorter) {
            continue;
        }

        let display = format!("{}.", name);
        if name_typed {
            add_operation_matches(&mut suggestions, Some(partial), &display, candidate, index, cmp);
        } else {
            push_unique(
                &mut suggestions,
                Suggestion {
                    text: display,
                    group: candidate.group.clone(),
                    operation: None,
                    group_index: index,
                },
            );
        }
    }

    // a lone group match goes straight to its operations
    if let [only] = suggestions.as_slice() {
        if only.operation.is_none() {
            let index = only.group_index;
            let display = only.text.clone();
            suggestions.clear();
            add_operation_matches(&mut suggestions, None, &display, &candidates[index], index, cmp);
        }
    }

    trace!(partial, count = suggestions.len(), "suggestions computed");
    suggestions
}

fn add_operation_matches(
    suggestions: &mut Vec<Suggestion>,
    partial: Option<&str>,
    display: &str,
    candidate: &Candidate,
    index: usize,
    cmp: Comparison,
) {
    for op in candidate.operations() {
        let text = format!("{}{}", display, op.name);
        if partial.map_or(true, |p| cmp.starts_with(&text, p)) {
            push_unique(
                suggestions,
                Suggestion {
                    text,
                    group: candidate.group.clone(),
                    operation: Some(op.clone()),
                    group_index: index,
                },
            );
        }
    }
}

fn push_unique(suggestions: &mut Vec<Suggestion>, suggestion: Suggestion) {
    if !suggestions.iter().any(|s| s.same_as(&suggestion)) {
        suggestions.push(suggestion);
    }
}
