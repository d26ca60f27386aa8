//! Candidate index
//!
//! Gives every command group a display name with the shared leading namespace
//! removed, and caches the group's operation list on first use.

use crate::catalog::{CommandGroup, Operation};
use std::cell::OnceCell;
use std::sync::Arc;

/// A command group annotated with its compressed display name
#[derive(Debug)]
pub struct Candidate {
    pub group: Arc<CommandGroup>,
    pub name: String,
    operations: OnceCell<Vec<Arc<Operation>>>,
}

impl Candidate {
    /// Build the index for a catalog, preserving catalog order
    pub fn build(groups: &[Arc<CommandGroup>]) -> Vec<Candidate> {
        let prefix = common_prefix(groups.iter().map(|g| g.identity.as_str())).unwrap_or_default();

        groups
            .iter()
            .map(|group| Candidate {
                group: group.clone(),
                name: group.identity[prefix.len()..].to_string(),
                operations: OnceCell::new(),
            })
            .collect()
    }

    /// Operations offered by this candidate, enumerated on first access
    pub fn operations(&self) -> &[Arc<Operation>] {
        self.operations
            .get_or_init(|| self.group.invokable_operations())
    }
}

/// Longest shared dotted prefix of `names`, never splitting a segment.
///
/// The prefix always ends with `.` (or is empty) and never swallows the last
/// segment of the first name. Returns `None` when there are no names.
pub fn common_prefix<'a, I>(names: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut names = names.into_iter();
    let first = names.next()?;

    let mut prefix = match last_boundary(first) {
        Some(ix) => first[..=ix].to_string(),
        None => String::new(),
    };

    for name in names {
        if prefix.is_empty() {
            break;
        }
        if !name.starts_with(&prefix) {
            prefix = back_off(&prefix, name);
        }
    }

    Some(prefix)
}

/// Shorten `prefix` a segment at a time until it covers `name`
fn back_off(prefix: &str, name: &str) -> String {
    let mut prefix = prefix;
    loop {
        match last_boundary(prefix) {
            Some(ix) => prefix = &prefix[..=ix],
            None => return String::new(),
        }
        if name.starts_with(prefix) {
            return prefix.to_string();
        }
    }
}

/// Index of the last `.` that is neither the first nor the final character
fn last_boundary(s: &str) -> Option<usize> {
    if s.len() < 2 {
        return None;
    }
    s[..s.len() - 1].rfind('.').filter(|ix| *ix > 0)
}
