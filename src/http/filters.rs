//! `filter[...]` query parameters for JSON:API list endpoints

use crate::error::{Error, Result};
use chrono::{DateTime, TimeZone};
use std::collections::BTreeMap;
use std::fmt;

/// Filter parameters sent with the first page request
///
/// Each entry becomes `filter[name]=value`. Later pages follow the server's
/// next link, which already carries the filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    values: BTreeMap<String, String>,
}

impl Filters {
    /// Create an empty filter set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter, replacing an earlier value for the same name
    #[must_use]
    pub fn filter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// Only items created at or after `at`
    #[must_use]
    pub fn since<Tz: TimeZone>(self, at: &DateTime<Tz>) -> Self
    where
        Tz::Offset: fmt::Display,
    {
        self.filter("since", at.to_rfc3339())
    }

    /// Only items created before `at`
    #[must_use]
    pub fn until<Tz: TimeZone>(self, at: &DateTime<Tz>) -> Self
    where
        Tz::Offset: fmt::Display,
    {
        self.filter("until", at.to_rfc3339())
    }

    /// Parse a `name=value` pair as given on the command line
    pub fn parse_pair(pair: &str) -> Result<(String, String)> {
        match pair.split_once('=') {
            Some((name, value)) if !name.trim().is_empty() => {
                Ok((name.trim().to_string(), value.to_string()))
            }
            _ => Err(Error::config(format!(
                "invalid filter '{pair}', expected name=value"
            ))),
        }
    }

    /// Check if no filter is set
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of filters
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Value of the filter `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Query pairs in `filter[name]` form, sorted by name
    pub fn to_query(&self) -> Vec<(String, String)> {
        self.values
            .iter()
            .map(|(name, value)| (format!("filter[{name}]"), value.clone()))
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Filters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |filters, (name, value)| filters.filter(name, value))
    }
}
