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

//! Join Property Propagation Tests
//!
//! Tests the planner-facing metadata derivation for a merge-ordered hash
//! join: equivalences, keys, constants and the reduced output ordering.

use rowjoin::{
    join_props, ColSet, ColumnInfo, ColumnOrder, Direction, JoinPredicate, JoinType, PhysicalProps,
};

fn cols(names: &[&str]) -> Vec<ColumnInfo> {
    names.iter().map(|n| ColumnInfo::new(*n)).collect()
}

fn asc(col: usize) -> ColumnOrder {
    ColumnOrder {
        col,
        dir: Direction::Ascending,
    }
}

fn set(cols: &[usize]) -> ColSet {
    cols.iter().copied().collect()
}

#[test]
fn test_using_join_full_propagation() {
    // orders(id, customer) USING (id) products(id, price); both sides
    // keyed and ordered on id, left's customer column constant
    let pred = JoinPredicate::using(
        &cols(&["id", "customer"]),
        &cols(&["id", "price"]),
        &["id".to_string()],
    )
    .expect("Failed to build predicate");

    let mut left = PhysicalProps::new();
    left.add_weak_key(set(&[0]));
    left.add_not_null_column(0);
    left.add_constant_column(1);

    let mut right = PhysicalProps::new();
    right.add_weak_key(set(&[0]));
    right.add_not_null_column(0);

    let props = join_props(JoinType::Inner, &pred, &left, &right, &[asc(0)]);

    // output layout: [merged id, left id, customer, right id, price]
    assert!(props.eq_groups.equivalent(0, 1), "merged = left id");
    assert!(props.eq_groups.equivalent(0, 3), "merged = right id");
    assert!(props.constant_cols.contains(2), "customer stays constant");
    for col in [0, 1, 3] {
        assert!(props.not_null_cols.contains(col), "column {col} not-NULL");
    }
    assert!(props.is_key(&set(&[0])), "id keys the join output");
    assert_eq!(props.ordering, vec![asc(0)]);
}

#[test]
fn test_without_merge_ordering_nothing_is_claimed() {
    let pred = JoinPredicate::on(&cols(&["a"]), &cols(&["b"]), vec![(0, 0)], None);
    let mut left = PhysicalProps::new();
    left.add_weak_key(set(&[0]));
    left.add_not_null_column(0);

    let props = join_props(JoinType::Inner, &pred, &left, &PhysicalProps::new(), &[]);

    assert!(props.weak_keys.is_empty());
    assert!(props.ordering.is_empty());
    assert!(!props.eq_groups.equivalent(0, 1));
}

#[test]
fn test_outer_join_drops_keys_but_keeps_equivalences() {
    let pred = JoinPredicate::on(&cols(&["a"]), &cols(&["b"]), vec![(0, 0)], None);
    let mut left = PhysicalProps::new();
    left.add_weak_key(set(&[0]));
    left.add_not_null_column(0);

    for join_type in [JoinType::LeftOuter, JoinType::RightOuter, JoinType::FullOuter] {
        let props = join_props(join_type, &pred, &left, &PhysicalProps::new(), &[asc(0)]);
        assert!(props.eq_groups.equivalent(0, 1));
        assert!(props.weak_keys.is_empty(), "{join_type:?} drops keys");
        assert!(props.ordering.is_empty(), "{join_type:?} drops ordering");
    }
}

#[test]
fn test_non_key_sides_drop_weak_keys() {
    // right side not keyed on its equality column: fan-out possible, so
    // neither side's keys survive
    let pred = JoinPredicate::on(&cols(&["a"]), &cols(&["b", "c"]), vec![(0, 0)], None);
    let mut left = PhysicalProps::new();
    left.add_weak_key(set(&[0]));
    left.add_not_null_column(0);
    let mut right = PhysicalProps::new();
    right.add_weak_key(set(&[1]));
    right.add_not_null_column(1);

    let props = join_props(JoinType::Inner, &pred, &left, &right, &[asc(0)]);
    assert!(props.weak_keys.is_empty());
}

#[test]
fn test_descending_direction_preserved() {
    let pred = JoinPredicate::on(&cols(&["a"]), &cols(&["b"]), vec![(0, 0)], None);
    let desc = ColumnOrder {
        col: 0,
        dir: Direction::Descending,
    };

    let props = join_props(
        JoinType::Inner,
        &pred,
        &PhysicalProps::new(),
        &PhysicalProps::new(),
        &[desc],
    );
    assert_eq!(props.ordering.len(), 1);
    assert_eq!(props.ordering[0].dir, Direction::Descending);
}
