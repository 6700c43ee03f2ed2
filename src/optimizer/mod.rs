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

//! Physical properties of plan nodes
//!
//! Metadata the planner tracks alongside each node: column equivalences,
//! constant and not-NULL columns, weak keys, and the output ordering.
//! [`join_props`] derives a join's properties from its children's.

pub mod props;

// Re-export main types for convenience
pub use props::{join_props, ColumnOrder, Direction, PhysicalProps};
