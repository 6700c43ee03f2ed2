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

//! Hash table of buffered rows keyed by encoded equality columns
//!
//! Built once from the right input, then probed once per left row. Rows
//! whose key contains a NULL are stored too: they can never match a probe,
//! but RIGHT and FULL joins must still emit them during the drain phase.

use rustc_hash::FxHashMap;

use crate::core::error::Result;
use crate::core::row::Row;

use super::memory::MemoryAccount;

/// Rows sharing one equality key, plus per-row match bookkeeping
#[derive(Debug, Default)]
pub struct Bucket {
    rows: Vec<Row>,
    seen: Vec<bool>,
}

impl Bucket {
    /// Rows stored under this key, in insertion order
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of rows in the bucket
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check whether the bucket holds no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether the row at `idx` has matched some probe row
    ///
    /// Always false before [`BucketTable::init_seen`] runs.
    pub fn seen(&self, idx: usize) -> bool {
        self.seen.get(idx).copied().unwrap_or(false)
    }

    /// Record that the row at `idx` matched a probe row
    pub fn mark_seen(&mut self, idx: usize) {
        if let Some(flag) = self.seen.get_mut(idx) {
            *flag = true;
        }
    }

    fn add_row(&mut self, row: Row) {
        self.rows.push(row);
    }
}

/// Map from encoded equality key to [`Bucket`]
#[derive(Debug, Default)]
pub struct BucketTable {
    buckets: FxHashMap<Vec<u8>, Bucket>,
    row_count: usize,
}

impl BucketTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `row` under `key`, charging its footprint to `account`
    ///
    /// Fails without storing the row when the memory budget is exceeded.
    pub fn add_row(&mut self, account: &mut MemoryAccount, key: &[u8], row: Row) -> Result<()> {
        account.grow(key.len() + row.estimated_size())?;
        match self.buckets.get_mut(key) {
            Some(bucket) => bucket.add_row(row),
            None => {
                let mut bucket = Bucket::default();
                bucket.add_row(row);
                self.buckets.insert(key.to_vec(), bucket);
            }
        }
        self.row_count += 1;
        Ok(())
    }

    /// Allocate the per-row seen flags for every bucket
    ///
    /// Only joins that drain unmatched stored rows need this; inner and
    /// left joins skip the allocation entirely.
    pub fn init_seen(&mut self, account: &mut MemoryAccount) -> Result<()> {
        for bucket in self.buckets.values_mut() {
            account.grow(std::mem::size_of::<Vec<bool>>() + bucket.rows.len())?;
            bucket.seen = vec![false; bucket.rows.len()];
        }
        Ok(())
    }

    /// Look up the bucket for `key`
    pub fn fetch(&self, key: &[u8]) -> Option<&Bucket> {
        self.buckets.get(key)
    }

    /// Look up the bucket for `key` for seen-flag updates
    pub fn fetch_mut(&mut self, key: &[u8]) -> Option<&mut Bucket> {
        self.buckets.get_mut(key)
    }

    /// Total number of stored rows across all buckets
    pub fn len(&self) -> usize {
        self.row_count
    }

    /// Check whether the table holds no rows
    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    /// Iterate over the buckets in unspecified order
    pub fn buckets(&self) -> impl Iterator<Item = &Bucket> {
        self.buckets.values()
    }

    /// Drop all stored rows
    pub fn close(&mut self) {
        self.buckets.clear();
        self.row_count = 0;
    }
}
