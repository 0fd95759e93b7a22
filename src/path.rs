//! Relation path normalization.
//!
//! Callers request relations as a single name, a sequence of names, or
//! (path, constraint) pairs. All forms normalize into a [`PathMap`]: an
//! insertion-ordered mapping from dotted path to constraint. Paths are not
//! validated here; resolution happens at planning time, so a malformed
//! path only surfaces when actually walked.

use crate::sql::Sql;

/// Insertion-ordered mapping from dotted relation path to join constraint.
///
/// An empty constraint means "no constraint". Inserting an existing path
/// replaces its constraint but keeps the original position.
#[derive(Debug, Clone, Default)]
pub struct PathMap {
    entries: Vec<(String, Sql)>,
}

impl PathMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Adds a path. Later constraints win for a repeated path.
    pub fn insert(&mut self, path: impl Into<String>, constraint: Sql) {
        let path = path.into();
        if let Some(entry) = self.entries.iter_mut().find(|(p, _)| *p == path) {
            entry.1 = constraint;
        } else {
            self.entries.push((path, constraint));
        }
    }

    /// Merges another map into this one, later entries overriding earlier
    /// ones with the same path.
    pub fn merge(&mut self, other: PathMap) {
        for (path, constraint) in other.entries {
            self.insert(path, constraint);
        }
    }

    /// Paths in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Sql)> {
        self.entries.iter().map(|(p, c)| (p.as_str(), c))
    }
}

/// Conversion into a [`PathMap`] for the accepted request forms.
pub trait IntoJoinPaths {
    fn into_paths(self) -> PathMap;
}

impl IntoJoinPaths for PathMap {
    fn into_paths(self) -> PathMap {
        self
    }
}

impl IntoJoinPaths for &str {
    fn into_paths(self) -> PathMap {
        let mut map = PathMap::new();
        map.insert(self, Sql::empty());
        map
    }
}

impl IntoJoinPaths for String {
    fn into_paths(self) -> PathMap {
        let mut map = PathMap::new();
        map.insert(self, Sql::empty());
        map
    }
}

impl IntoJoinPaths for (&str, Sql) {
    fn into_paths(self) -> PathMap {
        let mut map = PathMap::new();
        map.insert(self.0, self.1);
        map
    }
}

impl<const N: usize> IntoJoinPaths for [&str; N] {
    fn into_paths(self) -> PathMap {
        let mut map = PathMap::new();
        for path in self {
            map.insert(path, Sql::empty());
        }
        map
    }
}

impl IntoJoinPaths for Vec<&str> {
    fn into_paths(self) -> PathMap {
        let mut map = PathMap::new();
        for path in self {
            map.insert(path, Sql::empty());
        }
        map
    }
}

impl<const N: usize> IntoJoinPaths for [(&str, Sql); N] {
    fn into_paths(self) -> PathMap {
        let mut map = PathMap::new();
        for (path, constraint) in self {
            map.insert(path, constraint);
        }
        map
    }
}

impl IntoJoinPaths for Vec<(&str, Sql)> {
    fn into_paths(self) -> PathMap {
        let mut map = PathMap::new();
        for (path, constraint) in self {
            map.insert(path, constraint);
        }
        map
    }
}
