//! Documentation side-files
//!
//! Groups and operations can be described in a YAML file keyed by member id:
//!
//! ```yaml
//! members:
//!   "T:demo.Calendar":
//!     summary: Calendar arithmetic.
//!   "M:demo.Calendar.Next":
//!     summary: Find the next occurrence of a weekday.
//!     params:
//!       day: The weekday to look for
//! ```
//!
//! Each file is read at most once per process.

use crate::catalog::CommandGroup;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};
use tracing::{debug, warn};

type Cache = Mutex<HashMap<PathBuf, Option<Arc<Docs>>>>;

static CACHE: OnceLock<Cache> = OnceLock::new();
static WHITESPACE: OnceLock<Regex> = OnceLock::new();

/// A parsed documentation file
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Docs {
    #[serde(default)]
    pub members: HashMap<String, MemberDoc>,
}

/// Documentation for one group or operation
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MemberDoc {
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub params: HashMap<String, String>,
}

impl MemberDoc {
    /// One-line form of the summary
    pub fn summary_line(&self) -> Option<String> {
        self.summary.as_deref().and_then(first_line)
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(|s| s.trim())
    }
}

impl Docs {
    pub fn parse(yaml: &str) -> Result<Docs, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    pub fn group(&self, identity: &str) -> Option<&MemberDoc> {
        self.members.get(&format!("T:{}", identity))
    }

    pub fn operation(&self, identity: &str, operation: &str) -> Option<&MemberDoc> {
        self.members.get(&format!("M:{}.{}", identity, operation))
    }
}

/// Documentation for `group`: its own file if it names one, else `fallback`
pub fn for_group(group: &CommandGroup, fallback: Option<&Path>) -> Option<Arc<Docs>> {
    group.documentation.as_deref().or(fallback).and_then(load)
}

/// Load a documentation file through the process-wide cache.
///
/// Missing or malformed files are remembered as having no documentation.
pub fn load(path: &Path) -> Option<Arc<Docs>> {
    let cache = CACHE.get_or_init(Default::default);
    let mut cache = cache.lock().unwrap_or_else(|e| e.into_inner());

    if let Some(entry) = cache.get(path) {
        return entry.clone();
    }

    let docs = read(path);
    cache.insert(path.to_path_buf(), docs.clone());
    docs
}

fn read(path: &Path) -> Option<Arc<Docs>> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "no documentation");
            return None;
        }
    };

    match Docs::parse(&text) {
        Ok(docs) => {
            debug!(path = %path.display(), members = docs.members.len(), "documentation loaded");
            Some(Arc::new(docs))
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignoring malformed documentation");
            None
        }
    }
}

/// First non-blank line of `text` with inner whitespace collapsed
pub fn first_line(text: &str) -> Option<String> {
    let line = text.lines().map(str::trim).find(|l| !l.is_empty())?;
    let re = WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));
    Some(re.replace_all(line, " ").into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const YAML: &str = r#"
members:
  "T:demo.Calendar":
    summary: |

      Calendar   arithmetic.
      More detail here.
  "M:demo.Calendar.Next":
    summary: Find the next weekday.
    params:
      day: "  The weekday to look for "
"#;

    #[test]
    fn test_parse_and_lookup() {
        let docs = Docs::parse(YAML).unwrap();
        let group = docs.group("demo.Calendar").unwrap();
        assert_eq!(group.summary_line().as_deref(), Some("Calendar arithmetic."));

        let op = docs.operation("demo.Calendar", "Next").unwrap();
        assert_eq!(op.summary_line().as_deref(), Some("Find the next weekday."));
        assert_eq!(op.param("day"), Some("The weekday to look for"));
        assert!(docs.operation("demo.Calendar", "Prev").is_none());
    }

    #[test]
    fn test_first_line() {
        assert_eq!(first_line("\n  \n a\tb  c \nd").as_deref(), Some("a b c"));
        assert_eq!(first_line("   "), None);
    }

    #[test]
    fn test_load_is_cached() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("docs.yml");
        fs::write(&path, YAML).unwrap();

        let first = load(&path).unwrap();
        fs::remove_file(&path).unwrap();
        let second = load(&path).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_missing_and_malformed() {
        let temp_dir = TempDir::new().unwrap();
        assert!(load(&temp_dir.path().join("missing.yml")).is_none());

        let path = temp_dir.path().join("bad.yml");
        fs::write(&path, "members: [").unwrap();
        assert!(load(&path).is_none());
    }
}
