//! Case rule used by every name comparison

/// How names and tokens are compared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Comparison {
    /// Exact, case-sensitive
    Ordinal,
    /// Case-insensitive
    #[default]
    IgnoreCase,
}

impl Comparison {
    pub fn from_ignore_case(ignore_case: bool) -> Self {
        if ignore_case {
            Comparison::IgnoreCase
        } else {
            Comparison::Ordinal
        }
    }

    pub fn ignores_case(&self) -> bool {
        matches!(self, Comparison::IgnoreCase)
    }

    pub fn eq(&self, a: &str, b: &str) -> bool {
        match self {
            Comparison::Ordinal => a == b,
            Comparison::IgnoreCase => a.to_lowercase() == b.to_lowercase(),
        }
    }

    pub fn starts_with(&self, s: &str, prefix: &str) -> bool {
        match self {
            Comparison::Ordinal => s.starts_with(prefix),
            Comparison::IgnoreCase => s.to_lowercase().starts_with(&prefix.to_lowercase()),
        }
    }
}
