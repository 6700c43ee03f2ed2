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

//! Join execution
//!
//! The operator follows a pull-based pipeline where each plan node hands
//! rows to its consumer one at a time:
//!
//! ```text
//! right child ──▶ key encoding ──▶ BucketTable        (build phase)
//! left child  ──▶ key encoding ──▶ lookup ──▶ predicate ──▶ RowBuffer
//!                                                      (probe phase)
//! unseen bucket rows ─────────────────────────▶ RowBuffer
//!                                                      (drain phase)
//! ```
//!
//! # Components
//!
//! - [`PlanNode`] - pull-based node protocol (start/next/values/close)
//! - [`HashJoinNode`] - the join operator itself
//! - [`JoinPredicate`] - equality columns, merged columns, ON filter
//! - [`BucketTable`] - encoded-key to bucket map built from the right side
//! - [`RowBuffer`] - batch of composed output rows awaiting consumption
//! - [`MemoryAccount`] / [`MemoryPool`] - revocable memory quota
//! - [`ExecutionContext`] - cooperative cancellation

pub mod bucket;
pub mod buffer;
pub mod context;
pub mod encode;
pub mod join;
pub mod memory;
pub mod node;
pub mod predicate;

// Re-export main types for convenience
pub use bucket::{Bucket, BucketTable};
pub use buffer::RowBuffer;
pub use context::{CancellationHandle, ExecutionContext};
pub use encode::encode_key;
pub use join::{HashJoinNode, JoinCond, JoinType};
pub use memory::{MemoryAccount, MemoryPool};
pub use node::{ColumnInfo, MaterializedNode, PlanNode};
pub use predicate::{JoinPredicate, OnExpr};
