// Copyright 2026 Rowjoin Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Row type for Rowjoin - an ordered collection of column values

use std::fmt;
use std::mem;
use std::ops::{Deref, Index};

use super::value::Value;

/// A row of column values
///
/// Rows are immutable once stored in the bucket table; mutation happens only
/// on the operator's scratch row while composing output.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    values: Vec<Value>,
}

impl Row {
    /// Create a new empty row
    #[inline]
    pub fn new() -> Self {
        Self { values: Vec::new() }
    }

    /// Create a row with pre-allocated capacity
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: Vec::with_capacity(capacity),
        }
    }

    /// Create a row from a vector of values
    #[inline]
    pub fn from_values(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// Create a row of `len` NULL values
    ///
    /// Used for the NULL templates padding unmatched rows in outer joins.
    pub fn nulls(len: usize) -> Self {
        Self {
            values: vec![Value::null_unknown(); len],
        }
    }

    /// Get the number of values in the row
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the row is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get a value by index
    #[inline]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Push a value to the end of the row
    #[inline]
    pub fn push(&mut self, value: Value) {
        self.values.push(value);
    }

    /// Get an iterator over the values
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.values.iter()
    }

    /// Get a reference to the underlying slice
    #[inline]
    pub fn as_slice(&self) -> &[Value] {
        &self.values
    }

    /// Get a mutable reference to the underlying slice
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [Value] {
        &mut self.values
    }

    /// Get the underlying vector of values
    #[inline]
    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    /// In-memory footprint in bytes, used for quota charging
    pub fn estimated_size(&self) -> usize {
        mem::size_of::<Self>()
            + self
                .values
                .iter()
                .map(Value::estimated_size)
                .sum::<usize>()
    }
}

// Implement Deref to allow using Row like a slice
impl Deref for Row {
    type Target = [Value];

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.values
    }
}

impl Index<usize> for Row {
    type Output = Value;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.values[index]
    }
}

impl FromIterator<Value> for Row {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Row::from_values(iter.into_iter().collect())
    }
}

impl IntoIterator for Row {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

impl<'a> IntoIterator for &'a Row {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl From<Vec<Value>> for Row {
    fn from(values: Vec<Value>) -> Self {
        Row::from_values(values)
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", value)?;
        }
        write!(f, ")")
    }
}
