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

//! Compact set of column indices
//!
//! Column counts are small (tens, rarely hundreds), so a grow-on-demand
//! bitset beats a hash set for the subset tests the optimizer runs.

use std::fmt;

const WORD_BITS: usize = 64;

/// A set of column indices backed by a bitset
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColSet {
    words: Vec<u64>,
}

impl ColSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a column index
    pub fn insert(&mut self, col: usize) {
        let word = col / WORD_BITS;
        if word >= self.words.len() {
            self.words.resize(word + 1, 0);
        }
        self.words[word] |= 1 << (col % WORD_BITS);
    }

    /// Check whether the set contains a column index
    pub fn contains(&self, col: usize) -> bool {
        let word = col / WORD_BITS;
        self.words
            .get(word)
            .is_some_and(|w| w & (1 << (col % WORD_BITS)) != 0)
    }

    /// Number of columns in the set
    pub fn len(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Check whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Check whether every column of `self` is also in `other`
    pub fn is_subset_of(&self, other: &ColSet) -> bool {
        self.words
            .iter()
            .enumerate()
            .all(|(i, &w)| w & !other.words.get(i).copied().unwrap_or(0) == 0)
    }

    /// Iterate over the column indices in ascending order
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.words.iter().enumerate().flat_map(|(i, &w)| {
            (0..WORD_BITS).filter_map(move |bit| {
                if w & (1 << bit) != 0 {
                    Some(i * WORD_BITS + bit)
                } else {
                    None
                }
            })
        })
    }
}

impl FromIterator<usize> for ColSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut set = ColSet::new();
        for col in iter {
            set.insert(col);
        }
        set
    }
}

impl fmt::Display for ColSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, col) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", col)?;
        }
        write!(f, "}}")
    }
}
