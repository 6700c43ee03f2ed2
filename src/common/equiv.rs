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

//! Equivalence classes over column indices
//!
//! Array-backed union-find. Links always point from larger to smaller
//! indices, so the representative of a group is its smallest member - the
//! property-propagation code relies on that when remapping orderings.

/// Union-find over column indices
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EquivGroups {
    parent: Vec<u32>,
}

impl EquivGroups {
    /// Create an empty structure where every column is its own group
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure(&mut self, col: usize) {
        while self.parent.len() <= col {
            self.parent.push(self.parent.len() as u32);
        }
    }

    /// Return the representative (smallest member) of `col`'s group
    ///
    /// Columns never unioned are their own representative.
    pub fn find(&self, col: usize) -> usize {
        let mut cur = col;
        while let Some(&p) = self.parent.get(cur) {
            if p as usize == cur {
                break;
            }
            cur = p as usize;
        }
        cur
    }

    /// Merge the groups of `a` and `b`, compressing both paths
    pub fn union(&mut self, a: usize, b: usize) {
        self.ensure(a.max(b));
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return;
        }
        let root = ra.min(rb);
        self.parent[ra.max(rb)] = root as u32;
        for start in [a, b] {
            let mut cur = start;
            while self.parent[cur] as usize != root {
                let next = self.parent[cur] as usize;
                self.parent[cur] = root as u32;
                cur = next;
            }
        }
    }

    /// Check whether two columns belong to the same group
    pub fn equivalent(&self, a: usize, b: usize) -> bool {
        self.find(a) == self.find(b)
    }
}
