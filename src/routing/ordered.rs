//! Sorted string set used for category values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A sorted list of strings with binary-search membership.
///
/// Call [`OrderedList::sort`] after mutating through [`OrderedList::push`];
/// every query assumes the slice is sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderedList(Vec<String>);

impl OrderedList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: impl Into<String>) {
        self.0.push(value.into());
    }

    pub fn sort(&mut self) {
        self.0.sort_unstable();
    }

    /// Lower-case every element, then sort.
    pub fn normalize(&mut self) {
        for value in &mut self.0 {
            *value = value.to_lowercase();
        }
        self.sort();
    }

    pub fn contains(&self, value: &str) -> bool {
        self.0
            .binary_search_by(|probe| probe.as_str().cmp(value))
            .is_ok()
    }

    /// True if any element of `other` is in `self`.
    ///
    /// An empty list on either side matches anything.
    pub fn contains_any(&self, other: &OrderedList) -> bool {
        if self.0.is_empty() || other.0.is_empty() {
            return true;
        }
        other.0.iter().any(|v| self.contains(v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl From<Vec<String>> for OrderedList {
    fn from(values: Vec<String>) -> Self {
        let mut list = Self(values);
        list.sort();
        list
    }
}

impl<'a> From<&[&'a str]> for OrderedList {
    fn from(values: &[&'a str]) -> Self {
        values.iter().map(|v| v.to_string()).collect::<Vec<_>>().into()
    }
}

impl fmt::Display for OrderedList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(","))
    }
}
