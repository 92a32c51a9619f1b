//! Hierarchical cache keys.
//!
//! A key is a list of parts, root first: `["budgets", "current"]`. Any key is
//! also usable as a prefix; invalidating `["budgets"]` touches every key that
//! starts with it.

use std::fmt;

/// One segment of a [`QueryKey`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeyPart {
    Null,
    Bool(bool),
    Int(i64),
    Str(String),
}

impl From<&str> for KeyPart {
    fn from(value: &str) -> Self {
        KeyPart::Str(value.to_string())
    }
}

impl From<String> for KeyPart {
    fn from(value: String) -> Self {
        KeyPart::Str(value)
    }
}

impl From<&String> for KeyPart {
    fn from(value: &String) -> Self {
        KeyPart::Str(value.clone())
    }
}

impl From<i64> for KeyPart {
    fn from(value: i64) -> Self {
        KeyPart::Int(value)
    }
}

impl From<u32> for KeyPart {
    fn from(value: u32) -> Self {
        KeyPart::Int(i64::from(value))
    }
}

impl From<bool> for KeyPart {
    fn from(value: bool) -> Self {
        KeyPart::Bool(value)
    }
}

impl<T: Into<KeyPart>> From<Option<T>> for KeyPart {
    fn from(value: Option<T>) -> Self {
        value.map_or(KeyPart::Null, Into::into)
    }
}

impl fmt::Display for KeyPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyPart::Null => write!(f, "null"),
            KeyPart::Bool(b) => write!(f, "{}", b),
            KeyPart::Int(i) => write!(f, "{}", i),
            KeyPart::Str(s) => write!(f, "{:?}", s),
        }
    }
}

/// Identity of a cached resource. Equal keys share one cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey(Vec<KeyPart>);

impl QueryKey {
    pub fn new(root: impl Into<KeyPart>) -> Self {
        Self(vec![root.into()])
    }

    pub fn from_parts(parts: Vec<KeyPart>) -> Self {
        Self(parts)
    }

    /// Append a segment.
    pub fn with(mut self, part: impl Into<KeyPart>) -> Self {
        self.0.push(part.into());
        self
    }

    pub fn parts(&self) -> &[KeyPart] {
        &self.0
    }

    pub fn root(&self) -> Option<&KeyPart> {
        self.0.first()
    }

    /// Whether `prefix` is a leading run of this key's parts.
    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, part) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", part)?;
        }
        write!(f, "]")
    }
}

/// Build a [`QueryKey`] from anything convertible into [`KeyPart`]s.
///
/// ```
/// use finance_client::query_key;
///
/// let key = query_key!["budgets", "current"];
/// assert!(key.starts_with(&query_key!["budgets"]));
/// ```
#[macro_export]
macro_rules! query_key {
    ($($part:expr),+ $(,)?) => {
        $crate::sync::key::QueryKey::from_parts(vec![$($crate::sync::key::KeyPart::from($part)),+])
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_matching() {
        let key = query_key!["budgets", "2025-03-01"];
        assert!(key.starts_with(&query_key!["budgets"]));
        assert!(key.starts_with(&key.clone()));
        assert!(!key.starts_with(&query_key!["budgetProgress"]));
        assert!(!query_key!["budgets"].starts_with(&key));
    }

    #[test]
    fn test_root_is_not_a_string_prefix() {
        // "budgets" must not match "budgetsArchive"
        assert!(!query_key!["budgetsArchive"].starts_with(&query_key!["budgets"]));
    }

    #[test]
    fn test_optional_parts() {
        let none: Option<&str> = None;
        assert_eq!(query_key!["budgetProgress", none].parts()[1], KeyPart::Null);
        assert_eq!(
            query_key!["topMerchants", 5u32].to_string(),
            r#"["topMerchants",5]"#
        );
    }
}
