//! `--sort-by` handling

use crate::shared::error::{CliError, Result};
use std::cmp::Ordering;

pub type Comparator<T> = fn(&T, &T) -> Ordering;

/// Named comparators of an entity plus the keys used when none are requested.
pub struct SortKeys<T> {
    keys: Vec<(&'static str, Comparator<T>)>,
    defaults: Vec<&'static str>,
}

impl<T> Default for SortKeys<T> {
    fn default() -> Self {
        Self {
            keys: Vec::new(),
            defaults: Vec::new(),
        }
    }
}

impl<T> SortKeys<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(mut self, name: &'static str, compare: Comparator<T>) -> Self {
        self.keys.push((name, compare));
        self
    }

    pub fn defaults(mut self, keys: &[&'static str]) -> Self {
        self.defaults = keys.to_vec();
        self
    }

    pub fn available(&self) -> Vec<&'static str> {
        self.keys.iter().map(|(name, _)| *name).collect()
    }

    /// Sort `items` by the requested keys, falling back to the defaults.
    ///
    /// Keys may be comma separated; a leading `-` reverses a key. The sort is stable.
    pub fn sort(&self, items: &mut [T], requested: &[String]) -> Result<()> {
        let names: Vec<String> = if requested.is_empty() {
            self.defaults.iter().map(|k| k.to_string()).collect()
        } else {
            requested
                .iter()
                .flat_map(|r| r.split(','))
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(str::to_string)
                .collect()
        };

        let mut resolved = Vec::with_capacity(names.len());
        for name in &names {
            let (key, descending) = match name.strip_prefix('-') {
                Some(key) => (key, true),
                None => (name.as_str(), false),
            };
            let compare = self
                .keys
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, c)| *c)
                .ok_or_else(|| {
                    CliError::invalid_argument(format!(
                        "unknown sort key '{}', available: {}",
                        key,
                        self.available().join(", ")
                    ))
                })?;
            resolved.push((compare, descending));
        }

        if resolved.is_empty() {
            return Ok(());
        }

        items.sort_by(|a, b| {
            for (compare, descending) in &resolved {
                let ordering = compare(a, b);
                let ordering = if *descending {
                    ordering.reverse()
                } else {
                    ordering
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            Ordering::Equal
        });
        Ok(())
    }
}
