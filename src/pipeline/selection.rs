//! Input column selection.

use crate::error::{Error, Result};

/// Reference to an input column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnRef {
    /// First column with this name.
    Name(String),
    /// 0-based position.
    Index(usize),
}

impl ColumnRef {
    /// Position of the column within `headers`.
    pub fn position(&self, headers: &[String]) -> Result<usize> {
        match self {
            Self::Name(name) => headers.iter().position(|h| h == name),
            Self::Index(index) => (*index < headers.len()).then_some(*index),
        }
        .ok_or_else(|| Error::ColumnNotFound {
            column: self.to_string(),
        })
    }
}

impl std::fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Name(name) => write!(f, "{name}"),
            Self::Index(index) => write!(f, "#{index}"),
        }
    }
}

impl From<&str> for ColumnRef {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for ColumnRef {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<usize> for ColumnRef {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// Input columns kept in the output.
///
/// The default keeps every input column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    inverted: bool,
    columns: Vec<ColumnRef>,
}

impl Default for Selection {
    fn default() -> Self {
        Self::all()
    }
}

impl Selection {
    /// Keep every input column.
    pub fn all() -> Self {
        Self {
            inverted: true,
            columns: Vec::new(),
        }
    }

    /// Keep only the given columns, in the given order.
    pub fn only<I, C>(columns: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<ColumnRef>,
    {
        Self {
            inverted: false,
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    /// Keep every input column except the given ones.
    pub fn except<I, C>(columns: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<ColumnRef>,
    {
        Self {
            inverted: true,
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    /// Positions of the kept columns within `headers`.
    ///
    /// Every referenced column must exist.
    pub fn resolve(&self, headers: &[String]) -> Result<Vec<usize>> {
        let positions = self
            .columns
            .iter()
            .map(|column| column.position(headers))
            .collect::<Result<Vec<_>>>()?;

        if self.inverted {
            Ok((0..headers.len())
                .filter(|i| !positions.contains(i))
                .collect())
        } else {
            Ok(positions)
        }
    }
}
