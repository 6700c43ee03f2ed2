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

//! Physical properties and join property propagation
//!
//! A node's physical properties describe facts about its output stream that
//! hold regardless of how the node computes it: which columns are known
//! equal, constant, or not NULL, which column sets act as keys, and the
//! ordering of the stream. [`join_props`] derives the properties of a hash
//! join's output, renumbered into the join's `[merged][left][right]` column
//! layout, from the properties of its children.

use crate::common::col_set::ColSet;
use crate::common::equiv::EquivGroups;
use crate::executor::join::JoinType;
use crate::executor::predicate::JoinPredicate;

/// Sort direction of one ordering column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// One column of an output ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnOrder {
    pub col: usize,
    pub dir: Direction,
}

/// Physical properties of one plan node's output
#[derive(Debug, Clone, Default)]
pub struct PhysicalProps {
    /// Columns known to carry equal values on every row
    pub eq_groups: EquivGroups,
    /// Columns carrying the same value on every row
    pub constant_cols: ColSet,
    /// Columns that never carry NULL
    pub not_null_cols: ColSet,
    /// Column sets with no duplicate non-NULL combinations
    pub weak_keys: Vec<ColSet>,
    /// Ordering of the output stream
    pub ordering: Vec<ColumnOrder>,
}

impl PhysicalProps {
    /// Properties claiming nothing
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `col` is constant
    pub fn add_constant_column(&mut self, col: usize) {
        self.constant_cols.insert(col);
    }

    /// Record that `col` never carries NULL
    pub fn add_not_null_column(&mut self, col: usize) {
        self.not_null_cols.insert(col);
    }

    /// Record a weak key, keeping only minimal key sets
    ///
    /// Columns are first mapped to their equivalence representatives. A
    /// superset of an existing weak key adds no information and is dropped;
    /// existing supersets of the new key are removed.
    pub fn add_weak_key(&mut self, cols: ColSet) {
        let cols: ColSet = cols.iter().map(|c| self.eq_groups.find(c)).collect();
        if self.weak_keys.iter().any(|k| k.is_subset_of(&cols)) {
            return;
        }
        self.weak_keys.retain(|k| !cols.is_subset_of(k));
        self.weak_keys.push(cols);
    }

    /// Whether `cols` determines at most one row
    ///
    /// True when some weak key is contained in `cols` and consists of
    /// not-NULL columns, making it a proper key.
    pub fn is_key(&self, cols: &ColSet) -> bool {
        let cols: ColSet = cols.iter().map(|c| self.eq_groups.find(c)).collect();
        self.weak_keys
            .iter()
            .any(|k| k.is_subset_of(&cols) && k.is_subset_of(&self.not_null_cols))
    }

    /// Rewrite an ordering into its minimal equivalent form
    ///
    /// Each column maps to its equivalence representative; constant columns
    /// and repeated groups contribute nothing to the order and are dropped.
    pub fn reduce(&self, ordering: &[ColumnOrder]) -> Vec<ColumnOrder> {
        let mut seen = ColSet::new();
        let mut result = Vec::with_capacity(ordering.len());
        for co in ordering {
            let col = self.eq_groups.find(co.col);
            if self.constant_cols.contains(col) || seen.contains(col) {
                continue;
            }
            seen.insert(col);
            result.push(ColumnOrder { col, dir: co.dir });
        }
        result
    }
}

/// Derive the physical properties of a hash join's output
///
/// `merge_ordering` is the ordering over equality-pair indices that both
/// children share; when it is empty the streams give no usable order and no
/// properties are claimed. Constants, not-NULL columns and keys survive
/// only an inner join: outer joins introduce NULL padding and row
/// duplication that invalidate them, so those join types keep just the
/// column equivalences.
pub fn join_props(
    join_type: JoinType,
    pred: &JoinPredicate,
    left: &PhysicalProps,
    right: &PhysicalProps,
    merge_ordering: &[ColumnOrder],
) -> PhysicalProps {
    if merge_ordering.is_empty() {
        return PhysicalProps::new();
    }

    let merged = pred.num_merged_equality_columns();
    let num_left = pred.num_left_cols();
    let left_col = |i: usize| merged + i;
    let right_col = |j: usize| merged + num_left + j;

    let mut props = PhysicalProps::new();

    // Carry each side's internal equivalences, renumbered.
    for i in 0..pred.num_left_cols() {
        let group = left.eq_groups.find(i);
        if group != i {
            props.eq_groups.union(left_col(group), left_col(i));
        }
    }
    for j in 0..pred.num_right_cols() {
        let group = right.eq_groups.find(j);
        if group != j {
            props.eq_groups.union(right_col(group), right_col(j));
        }
    }

    // Each equality pair equates its two sides, and its merged output
    // column when one exists.
    let left_eq = pred.left_equality_indices();
    let right_eq = pred.right_equality_indices();
    for (i, (&l, &r)) in left_eq.iter().zip(right_eq).enumerate() {
        props.eq_groups.union(left_col(l), right_col(r));
        if i < merged {
            props.eq_groups.union(i, left_col(l));
        }
    }

    if join_type != JoinType::Inner {
        return props;
    }

    for c in left.constant_cols.iter() {
        props.add_constant_column(left_col(c));
    }
    for c in right.constant_cols.iter() {
        props.add_constant_column(right_col(c));
    }

    // Rows with a NULL equality column never reach the output of an inner
    // join, so every equality column is not-NULL downstream.
    let mut left_eq_set = ColSet::new();
    let mut right_eq_set = ColSet::new();
    for (i, (&l, &r)) in left_eq.iter().zip(right_eq).enumerate() {
        left_eq_set.insert(l);
        props.add_not_null_column(left_col(l));
        right_eq_set.insert(r);
        props.add_not_null_column(right_col(r));
        if i < merged {
            props.add_not_null_column(i);
        }
    }

    // When the equality columns are keys on both sides, every input row
    // lands in at most one output row and the children's keys stay valid.
    if left.is_key(&left_eq_set) && right.is_key(&right_eq_set) {
        for k in &left.weak_keys {
            props.add_weak_key(k.iter().map(left_col).collect());
        }
        for k in &right.weak_keys {
            props.add_weak_key(k.iter().map(right_col).collect());
        }
    }

    let ordering: Vec<ColumnOrder> = merge_ordering
        .iter()
        .map(|co| ColumnOrder {
            col: left_col(left.eq_groups.find(left_eq[co.col])),
            dir: co.dir,
        })
        .collect();
    props.ordering = props.reduce(&ordering);
    props
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::node::ColumnInfo;

    fn cols(names: &[&str]) -> Vec<ColumnInfo> {
        names.iter().map(|n| ColumnInfo::new(*n)).collect()
    }

    fn asc(col: usize) -> ColumnOrder {
        ColumnOrder {
            col,
            dir: Direction::Ascending,
        }
    }

    #[test]
    fn test_add_weak_key_keeps_minimal_sets() {
        let mut props = PhysicalProps::new();
        props.add_weak_key([0, 1].into_iter().collect());
        // superset adds nothing
        props.add_weak_key([0, 1, 2].into_iter().collect());
        assert_eq!(props.weak_keys.len(), 1);
        // subset replaces the wider key
        props.add_weak_key([0].into_iter().collect());
        assert_eq!(props.weak_keys.len(), 1);
        assert_eq!(props.weak_keys[0], [0].into_iter().collect());
    }

    #[test]
    fn test_is_key_requires_not_null() {
        let mut props = PhysicalProps::new();
        props.add_weak_key([0].into_iter().collect());
        let cols: ColSet = [0, 1].into_iter().collect();
        assert!(!props.is_key(&cols));
        props.add_not_null_column(0);
        assert!(props.is_key(&cols));
        assert!(!props.is_key(&[1].into_iter().collect()));
    }

    #[test]
    fn test_reduce_drops_constants_and_repeats() {
        let mut props = PhysicalProps::new();
        props.eq_groups.union(0, 3);
        props.add_constant_column(1);
        let reduced = props.reduce(&[asc(3), asc(1), asc(0), asc(2)]);
        assert_eq!(reduced, vec![asc(0), asc(2)]);
    }

    #[test]
    fn test_empty_merge_ordering_claims_nothing() {
        let pred = JoinPredicate::on(&cols(&["a"]), &cols(&["b"]), vec![(0, 0)], None);
        let props = join_props(
            JoinType::Inner,
            &pred,
            &PhysicalProps::new(),
            &PhysicalProps::new(),
            &[],
        );
        assert!(props.ordering.is_empty());
        assert!(props.weak_keys.is_empty());
        assert!(props.constant_cols.is_empty());
    }

    #[test]
    fn test_inner_join_propagates_keys_and_constants() {
        // left(a, x) joined with right(b, y) on a = b
        let pred = JoinPredicate::on(&cols(&["a", "x"]), &cols(&["b", "y"]), vec![(0, 0)], None);

        let mut left = PhysicalProps::new();
        left.add_weak_key([0].into_iter().collect());
        left.add_not_null_column(0);
        left.add_constant_column(1);

        let mut right = PhysicalProps::new();
        right.add_weak_key([0].into_iter().collect());
        right.add_not_null_column(0);

        let props = join_props(JoinType::Inner, &pred, &left, &right, &[asc(0)]);

        // equality pair a = b, renumbered to output columns 0 and 2
        assert!(props.eq_groups.equivalent(0, 2));
        // left's constant x lands at output column 1
        assert!(props.constant_cols.contains(1));
        // equality columns become not-NULL
        assert!(props.not_null_cols.contains(0));
        assert!(props.not_null_cols.contains(2));
        // both sides keyed on their equality column: keys survive
        assert!(props.weak_keys.contains(&[0].into_iter().collect()));
        // ordering on the first equality pair maps to output column 0
        assert_eq!(props.ordering, vec![asc(0)]);
    }

    #[test]
    fn test_outer_join_keeps_only_equivalences() {
        let pred = JoinPredicate::on(&cols(&["a"]), &cols(&["b"]), vec![(0, 0)], None);

        let mut left = PhysicalProps::new();
        left.add_weak_key([0].into_iter().collect());
        left.add_not_null_column(0);
        left.add_constant_column(0);

        let props = join_props(
            JoinType::FullOuter,
            &pred,
            &left,
            &PhysicalProps::new(),
            &[asc(0)],
        );

        assert!(props.eq_groups.equivalent(0, 1));
        assert!(props.constant_cols.is_empty());
        assert!(props.not_null_cols.is_empty());
        assert!(props.weak_keys.is_empty());
        assert!(props.ordering.is_empty());
    }

    #[test]
    fn test_merged_columns_join_all_three_positions() {
        let pred = JoinPredicate::using(
            &cols(&["id", "x"]),
            &cols(&["id", "y"]),
            &["id".to_string()],
        )
        .unwrap();

        let props = join_props(
            JoinType::Inner,
            &pred,
            &PhysicalProps::new(),
            &PhysicalProps::new(),
            &[asc(0)],
        );

        // merged output column 0, left id at 1, right id at 3
        assert!(props.eq_groups.equivalent(0, 1));
        assert!(props.eq_groups.equivalent(0, 3));
        assert!(props.not_null_cols.contains(0));
        // the ordering lands on the group representative
        assert_eq!(props.ordering, vec![asc(0)]);
    }

    #[test]
    fn test_child_equivalences_are_renumbered() {
        // left knows its columns 0 and 1 are equal
        let pred =
            JoinPredicate::on(&cols(&["a", "a2"]), &cols(&["b"]), vec![(0, 0)], None);
        let mut left = PhysicalProps::new();
        left.eq_groups.union(0, 1);

        let props = join_props(
            JoinType::Inner,
            &pred,
            &left,
            &PhysicalProps::new(),
            &[asc(0)],
        );

        // no merged columns: left 0,1 stay at 0,1; right lands at 2
        assert!(props.eq_groups.equivalent(0, 1));
        assert!(props.eq_groups.equivalent(0, 2));
    }
}
