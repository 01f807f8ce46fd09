//! Typed snapshot of the host page's global bindings
//!
//! The extractor never touches a live page. A host bridge (the `host`
//! module, behind the `wasm` feature) or a JSON dump provides the
//! bindings as a [`SymbolTable`]; function bindings carry their source text,
//! which is what the version scan matches against.

use crate::Result;
use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Symbol {
    Null,
    Number(f64),
    Text(String),
    Array(Vec<Symbol>),
    /// A function, as its source text.
    Function { source: String },
    /// A value with a `prototype`, listing the prototype's own entries.
    Constructor { prototype: Vec<SymbolEntry> },
    /// Any other object; its contents are never inspected.
    Object,
}

impl Symbol {
    pub fn function(source: impl Into<String>) -> Self {
        Self::Function {
            source: source.into(),
        }
    }

    pub fn constructor<I, S>(prototype: I) -> Self
    where
        I: IntoIterator<Item = (S, Symbol)>,
        S: Into<String>,
    {
        Self::Constructor {
            prototype: prototype
                .into_iter()
                .map(|(name, value)| SymbolEntry::new(name, value))
                .collect(),
        }
    }

    /// Builds an array of numbers.
    pub fn numbers<I, N>(values: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<f64>,
    {
        Self::Array(values.into_iter().map(|n| Self::Number(n.into())).collect())
    }

    /// The value as an integer, if it is a number with no fractional part.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Number(n) if n.is_finite() && n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER => {
                Some(*n as i64)
            }
            _ => None,
        }
    }

    /// The elements as integers, if this is an array holding only integers.
    pub fn as_integer_array(&self) -> Option<Vec<i64>> {
        match self {
            Self::Array(items) => items.iter().map(Symbol::as_integer).collect(),
            _ => None,
        }
    }

    pub fn prototype(&self) -> Option<&[SymbolEntry]> {
        match self {
            Self::Constructor { prototype } => Some(prototype),
            _ => None,
        }
    }

    pub fn function_source(&self) -> Option<&str> {
        match self {
            Self::Function { source } => Some(source),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolEntry {
    pub name: String,
    pub value: Symbol,
}

impl SymbolEntry {
    pub fn new(name: impl Into<String>, value: Symbol) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Ordered name to value bindings. Iteration follows insertion order, which
/// is the order the extractor scans in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<SymbolEntry>", into = "Vec<SymbolEntry>")]
pub struct SymbolTable {
    entries: Vec<SymbolEntry>,
    index: FxHashMap<String, usize>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a snapshot: a JSON array of `{"name": .., "value": ..}` entries.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Binds `name`, replacing an earlier binding in place.
    pub fn insert(&mut self, name: impl Into<String>, value: Symbol) {
        let name = name.into();
        match self.index.get(&name) {
            Some(&i) => self.entries[i].value = value,
            None => {
                self.index.insert(name.clone(), self.entries.len());
                self.entries.push(SymbolEntry { name, value });
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.index.get(name).map(|&i| &self.entries[i].value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SymbolEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<SymbolEntry> for SymbolTable {
    fn from_iter<T: IntoIterator<Item = SymbolEntry>>(iter: T) -> Self {
        let mut table = Self::new();
        for entry in iter {
            table.insert(entry.name, entry.value);
        }
        table
    }
}

impl From<Vec<SymbolEntry>> for SymbolTable {
    fn from(entries: Vec<SymbolEntry>) -> Self {
        entries.into_iter().collect()
    }
}

impl From<SymbolTable> for Vec<SymbolEntry> {
    fn from(table: SymbolTable) -> Self {
        table.entries
    }
}

impl<S: Into<String>> FromIterator<(S, Symbol)> for SymbolTable {
    fn from_iter<T: IntoIterator<Item = (S, Symbol)>>(iter: T) -> Self {
        iter.into_iter()
            .map(|(name, value)| SymbolEntry::new(name, value))
            .collect()
    }
}
