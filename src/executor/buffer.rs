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

//! Output row buffer
//!
//! One probe row can match many stored rows, so the operator composes the
//! whole fan-out in one step and then serves it row by row. The buffer keeps
//! its backing allocation across refills.

use std::mem;

use crate::core::row::Row;

/// FIFO buffer of composed output rows
#[derive(Debug, Default)]
pub struct RowBuffer {
    rows: Vec<Row>,
    pos: usize,
    current: Row,
}

impl RowBuffer {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row to the back of the buffer
    pub fn push(&mut self, row: Row) {
        self.rows.push(row);
    }

    /// Advance to the next buffered row, making it available via [`values`]
    ///
    /// Returns `false` and resets the buffer when it is exhausted.
    ///
    /// [`values`]: RowBuffer::values
    pub fn next(&mut self) -> bool {
        if self.pos >= self.rows.len() {
            self.rows.clear();
            self.pos = 0;
            return false;
        }
        self.current = mem::take(&mut self.rows[self.pos]);
        self.pos += 1;
        true
    }

    /// Borrow the row produced by the last successful [`next`]
    ///
    /// [`next`]: RowBuffer::next
    pub fn values(&self) -> &Row {
        &self.current
    }

    /// Check whether any rows remain to be served
    pub fn is_empty(&self) -> bool {
        self.pos >= self.rows.len()
    }

    /// Drop all buffered rows
    pub fn clear(&mut self) {
        self.rows.clear();
        self.pos = 0;
        self.current = Row::new();
    }
}
