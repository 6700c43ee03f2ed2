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

//! # Rowjoin - hash-join execution operator
//!
//! Rowjoin is the hash-join slice of a relational query engine: given two
//! row-producing plan nodes and a join predicate, it produces the rows of an
//! INNER, LEFT OUTER, RIGHT OUTER, or FULL OUTER join under SQL NULL
//! semantics (`NULL` never equals `NULL` on an equality key), with memory
//! usage bounded by an explicit quota account, and it derives the
//! ordering/key metadata the planner needs downstream.
//!
//! ## Execution model
//!
//! Execution is pull-based: the consumer drives a [`PlanNode`] through
//! `start` / `next` / `values` / `close`. The join runs in three phases:
//!
//! 1. **Build** - the right child is fully consumed into a [`BucketTable`]
//!    keyed by the encoded equality columns, charging a [`MemoryAccount`]
//!    for every stored row.
//! 2. **Probe** - left rows are looked up against the table; every bucket
//!    row satisfying the predicate yields one composed output row.
//! 3. **Drain** - for RIGHT/FULL OUTER joins, right rows never matched
//!    during probing surface NULL-padded on the left.
//!
//! ## Modules
//!
//! - [`core`] - data model ([`Value`], [`Row`], [`Error`])
//! - [`common`] - small data structures ([`ColSet`], [`EquivGroups`])
//! - [`executor`] - the join operator and its collaborators
//! - [`optimizer`] - physical properties and join property propagation
//!
//! ## Quick start
//!
//! ```rust
//! use rowjoin::{
//!     ColumnInfo, ExecutionContext, HashJoinNode, JoinCond, MaterializedNode, MemoryAccount,
//!     MemoryPool, PlanNode, Row, Value,
//! };
//!
//! let left = MaterializedNode::new(
//!     vec![ColumnInfo::new("id"), ColumnInfo::new("name")],
//!     vec![Row::from_values(vec![Value::integer(1), Value::text("a")])],
//! );
//! let right = MaterializedNode::new(
//!     vec![ColumnInfo::new("id"), ColumnInfo::new("total")],
//!     vec![Row::from_values(vec![Value::integer(1), Value::integer(100)])],
//! );
//!
//! let pool = MemoryPool::unlimited();
//! let mut join = HashJoinNode::new(
//!     ExecutionContext::new(),
//!     "JOIN",
//!     Box::new(left),
//!     Box::new(right),
//!     JoinCond::Using(vec!["id".into()]),
//!     MemoryAccount::new(pool),
//! )
//! .unwrap();
//!
//! join.start().unwrap();
//! while join.next().unwrap() {
//!     println!("{}", join.values());
//! }
//! join.close();
//! ```

pub mod common;
pub mod core;
pub mod executor;
pub mod optimizer;

// Re-export main types for convenience
pub use crate::core::{DataType, Error, Result, Row, Value};

pub use common::{ColSet, EquivGroups};

pub use executor::{
    encode_key, BucketTable, CancellationHandle, ColumnInfo, ExecutionContext, HashJoinNode,
    JoinCond, JoinPredicate, JoinType, MaterializedNode, MemoryAccount, MemoryPool, OnExpr,
    PlanNode, RowBuffer,
};

pub use optimizer::{join_props, ColumnOrder, Direction, PhysicalProps};
