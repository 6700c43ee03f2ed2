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

//! Plan node protocol
//!
//! Every node in a query plan is driven through the same four calls:
//! `start` once, `next`/`values` until `next` returns `Ok(false)`, `close`
//! once. `values` borrows the node's current row, which stays valid until
//! the next call to `next` or `close`.

use std::mem;

use crate::core::error::Result;
use crate::core::row::Row;

/// Metadata for one output column of a plan node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    /// Column name as rendered to the client
    pub name: String,
    /// Source table alias, when the column comes straight from a table
    pub table_alias: Option<String>,
    /// Hidden columns are carried through the plan but not rendered
    pub hidden: bool,
}

impl ColumnInfo {
    /// Create a visible column with no table alias
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table_alias: None,
            hidden: false,
        }
    }

    /// Create a visible column scoped to a table alias
    pub fn with_table(name: impl Into<String>, table_alias: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table_alias: Some(table_alias.into()),
            hidden: false,
        }
    }
}

/// Pull-based plan node
pub trait PlanNode: Send {
    /// Run any pre-computation the node needs before rows can be pulled
    fn start(&mut self) -> Result<()>;

    /// Advance to the next row
    ///
    /// Returns `Ok(true)` when a row is available through [`values`], and
    /// `Ok(false)` once the node is exhausted.
    ///
    /// [`values`]: PlanNode::values
    fn next(&mut self) -> Result<bool>;

    /// Borrow the row produced by the last successful [`next`]
    ///
    /// [`next`]: PlanNode::next
    fn values(&self) -> &Row;

    /// Output column metadata, valid before `start`
    fn columns(&self) -> &[ColumnInfo];

    /// Release the node's resources
    ///
    /// Must be idempotent. After `close`, `next` may not be called again.
    fn close(&mut self);
}

/// A plan node serving rows from an in-memory vector
///
/// Leaf node for tests and for plans whose input is already materialized.
pub struct MaterializedNode {
    columns: Vec<ColumnInfo>,
    rows: Vec<Row>,
    pos: usize,
    current: Row,
}

impl MaterializedNode {
    /// Create a node producing `rows` in order
    pub fn new(columns: Vec<ColumnInfo>, rows: Vec<Row>) -> Self {
        Self {
            columns,
            rows,
            pos: 0,
            current: Row::new(),
        }
    }
}

impl PlanNode for MaterializedNode {
    fn start(&mut self) -> Result<()> {
        self.pos = 0;
        Ok(())
    }

    fn next(&mut self) -> Result<bool> {
        if self.pos >= self.rows.len() {
            return Ok(false);
        }
        // Rows are handed out once, so moving them beats cloning.
        self.current = mem::take(&mut self.rows[self.pos]);
        self.pos += 1;
        Ok(true)
    }

    fn values(&self) -> &Row {
        &self.current
    }

    fn columns(&self) -> &[ColumnInfo] {
        &self.columns
    }

    fn close(&mut self) {
        self.rows.clear();
        self.current = Row::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::value::Value;

    fn int_row(v: i64) -> Row {
        Row::from_values(vec![Value::integer(v)])
    }

    #[test]
    fn test_materialized_node_yields_rows_in_order() {
        let mut node = MaterializedNode::new(
            vec![ColumnInfo::new("a")],
            vec![int_row(1), int_row(2), int_row(3)],
        );

        node.start().unwrap();
        let mut seen = Vec::new();
        while node.next().unwrap() {
            seen.push(node.values().clone());
        }
        assert_eq!(seen, vec![int_row(1), int_row(2), int_row(3)]);
        node.close();
    }

    #[test]
    fn test_materialized_node_empty() {
        let mut node = MaterializedNode::new(vec![ColumnInfo::new("a")], Vec::new());
        node.start().unwrap();
        assert!(!node.next().unwrap());
        node.close();
    }

    #[test]
    fn test_column_info_constructors() {
        let plain = ColumnInfo::new("x");
        assert_eq!(plain.name, "x");
        assert_eq!(plain.table_alias, None);
        assert!(!plain.hidden);

        let scoped = ColumnInfo::with_table("x", "t");
        assert_eq!(scoped.table_alias.as_deref(), Some("t"));
    }
}
