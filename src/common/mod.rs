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

//! Common utilities for Rowjoin
//!
//! Small data structures shared by the executor and the optimizer:
//!
//! - [`ColSet`] - bitset over column indices
//! - [`EquivGroups`] - union-find over column indices

pub mod col_set;
pub mod equiv;

// Re-export main types for convenience
pub use col_set::ColSet;
pub use equiv::EquivGroups;
