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

//! Join predicate: equality columns, merged columns, residual filter
//!
//! Output rows are laid out as `[merged][left][right]`. Merged columns
//! exist only for USING and NATURAL joins, where the equality columns of
//! both sides collapse into one output column and the source columns are
//! hidden.

use crate::core::error::{Error, Result};
use crate::core::row::Row;

use super::encode::encode_key;
use super::node::ColumnInfo;

/// Residual filter applied to a composed output row
pub type OnExpr = Box<dyn Fn(&Row) -> Result<bool> + Send>;

/// Equality and filter conditions of one join
pub struct JoinPredicate {
    num_left_cols: usize,
    num_right_cols: usize,
    num_merged: usize,
    left_eq: Vec<usize>,
    right_eq: Vec<usize>,
    cols: Vec<ColumnInfo>,
    on_cond: Option<OnExpr>,
}

impl JoinPredicate {
    /// Predicate with no condition at all: the cross product
    pub fn cross(left_cols: &[ColumnInfo], right_cols: &[ColumnInfo]) -> Self {
        Self::with_equality(left_cols, right_cols, Vec::new(), Vec::new(), None)
    }

    /// Predicate for an ON clause
    ///
    /// `eq_pairs` holds the extracted equality column pairs (left index,
    /// right index); `filter` is the residual condition, if any, evaluated
    /// against the composed output row.
    pub fn on(
        left_cols: &[ColumnInfo],
        right_cols: &[ColumnInfo],
        eq_pairs: Vec<(usize, usize)>,
        filter: Option<OnExpr>,
    ) -> Self {
        let (left_eq, right_eq) = eq_pairs.into_iter().unzip();
        Self::with_equality(left_cols, right_cols, left_eq, right_eq, filter)
    }

    /// Predicate for a USING clause
    ///
    /// Each name must resolve to a visible column on both sides. The
    /// resolved source columns are hidden and replaced by one merged output
    /// column per name.
    pub fn using(
        left_cols: &[ColumnInfo],
        right_cols: &[ColumnInfo],
        names: &[String],
    ) -> Result<Self> {
        let mut left_cols = left_cols.to_vec();
        let mut right_cols = right_cols.to_vec();
        let mut left_eq = Vec::with_capacity(names.len());
        let mut right_eq = Vec::with_capacity(names.len());
        let mut merged = Vec::with_capacity(names.len());

        for name in names {
            left_eq.push(resolve_and_hide(&mut left_cols, name)?);
            right_eq.push(resolve_and_hide(&mut right_cols, name)?);
            merged.push(ColumnInfo::new(name.clone()));
        }

        let num_left_cols = left_cols.len();
        let num_right_cols = right_cols.len();
        let mut cols = merged;
        cols.extend(left_cols);
        cols.extend(right_cols);
        Ok(Self {
            num_left_cols,
            num_right_cols,
            num_merged: names.len(),
            left_eq,
            right_eq,
            cols,
            on_cond: None,
        })
    }

    /// Predicate for a NATURAL join
    ///
    /// Joins on every visible column name the two sides share, in left-side
    /// order. With no shared names this degenerates to the cross product.
    pub fn natural(left_cols: &[ColumnInfo], right_cols: &[ColumnInfo]) -> Result<Self> {
        let common: Vec<String> = left_cols
            .iter()
            .filter(|lc| !lc.hidden)
            .filter(|lc| {
                right_cols
                    .iter()
                    .any(|rc| !rc.hidden && rc.name.eq_ignore_ascii_case(&lc.name))
            })
            .map(|lc| lc.name.clone())
            .collect();
        if common.is_empty() {
            return Ok(Self::cross(left_cols, right_cols));
        }
        Self::using(left_cols, right_cols, &common)
    }

    fn with_equality(
        left_cols: &[ColumnInfo],
        right_cols: &[ColumnInfo],
        left_eq: Vec<usize>,
        right_eq: Vec<usize>,
        on_cond: Option<OnExpr>,
    ) -> Self {
        let mut cols = left_cols.to_vec();
        cols.extend_from_slice(right_cols);
        Self {
            num_left_cols: left_cols.len(),
            num_right_cols: right_cols.len(),
            num_merged: 0,
            left_eq,
            right_eq,
            cols,
            on_cond,
        }
    }

    /// Number of columns the left child produces
    pub fn num_left_cols(&self) -> usize {
        self.num_left_cols
    }

    /// Number of columns the right child produces
    pub fn num_right_cols(&self) -> usize {
        self.num_right_cols
    }

    /// Number of merged (USING/NATURAL) output columns
    pub fn num_merged_equality_columns(&self) -> usize {
        self.num_merged
    }

    /// Equality column indices into the left child's rows
    pub fn left_equality_indices(&self) -> &[usize] {
        &self.left_eq
    }

    /// Equality column indices into the right child's rows
    pub fn right_equality_indices(&self) -> &[usize] {
        &self.right_eq
    }

    /// Whether the join has any equality columns
    pub fn has_equality(&self) -> bool {
        !self.left_eq.is_empty()
    }

    /// Output column metadata, laid out `[merged][left][right]`
    pub fn columns(&self) -> &[ColumnInfo] {
        &self.cols
    }

    /// Width of a composed output row
    pub fn output_width(&self) -> usize {
        self.cols.len()
    }

    /// Encode a left row's equality key into `scratch`
    pub fn encode_left_key(&self, scratch: Vec<u8>, row: &Row) -> Result<(Vec<u8>, bool)> {
        encode_key(scratch, row, &self.left_eq)
    }

    /// Encode a right row's equality key into `scratch`
    pub fn encode_right_key(&self, scratch: Vec<u8>, row: &Row) -> Result<(Vec<u8>, bool)> {
        encode_key(scratch, row, &self.right_eq)
    }

    /// Compose the output row for a (left, right) pair into `output`
    ///
    /// Merged columns take the left side's datum and fall back to the right
    /// side's when the left is NULL, which is how drained unmatched right
    /// rows surface their key values.
    pub fn prepare_row(&self, output: &mut Row, left_row: &Row, right_row: &Row) {
        // recycle the output row's allocation across calls
        let mut values = std::mem::take(output).into_values();
        values.clear();
        values.reserve(self.num_merged + left_row.len() + right_row.len());
        for i in 0..self.num_merged {
            let left_datum = &left_row[self.left_eq[i]];
            if left_datum.is_null() {
                values.push(right_row[self.right_eq[i]].clone());
            } else {
                values.push(left_datum.clone());
            }
        }
        values.extend(left_row.iter().cloned());
        values.extend(right_row.iter().cloned());
        *output = Row::from_values(values);
    }

    /// Compose the output row for a pair and evaluate the residual filter
    ///
    /// Returns whether the pair passes; `output` holds the composed row
    /// either way.
    pub fn eval(&self, output: &mut Row, left_row: &Row, right_row: &Row) -> Result<bool> {
        self.prepare_row(output, left_row, right_row);
        match &self.on_cond {
            Some(filter) => filter(output),
            None => Ok(true),
        }
    }
}

impl std::fmt::Debug for JoinPredicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JoinPredicate")
            .field("num_left_cols", &self.num_left_cols)
            .field("num_right_cols", &self.num_right_cols)
            .field("num_merged", &self.num_merged)
            .field("left_eq", &self.left_eq)
            .field("right_eq", &self.right_eq)
            .field("has_on_cond", &self.on_cond.is_some())
            .finish()
    }
}

fn resolve_and_hide(cols: &mut [ColumnInfo], name: &str) -> Result<usize> {
    let idx = cols
        .iter()
        .position(|c| !c.hidden && c.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| Error::ColumnNotFound(name.to_string()))?;
    cols[idx].hidden = true;
    Ok(idx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::value::Value;

    fn cols(names: &[&str]) -> Vec<ColumnInfo> {
        names.iter().map(|n| ColumnInfo::new(*n)).collect()
    }

    fn row(values: &[i64]) -> Row {
        values.iter().map(|&v| Value::integer(v)).collect()
    }

    #[test]
    fn test_cross_layout() {
        let pred = JoinPredicate::cross(&cols(&["a", "b"]), &cols(&["c"]));
        assert_eq!(pred.num_merged_equality_columns(), 0);
        assert_eq!(pred.output_width(), 3);
        assert!(!pred.has_equality());

        let mut output = Row::new();
        pred.prepare_row(&mut output, &row(&[1, 2]), &row(&[3]));
        assert_eq!(output, row(&[1, 2, 3]));
    }

    #[test]
    fn test_on_equality_and_filter() {
        let filter: OnExpr = Box::new(|r: &Row| Ok(r[0].as_int64().unwrap_or(0) > 5));
        let pred = JoinPredicate::on(
            &cols(&["a"]),
            &cols(&["b"]),
            vec![(0, 0)],
            Some(filter),
        );
        assert_eq!(pred.left_equality_indices(), &[0]);
        assert_eq!(pred.right_equality_indices(), &[0]);

        let mut output = Row::new();
        assert!(pred.eval(&mut output, &row(&[7]), &row(&[7])).unwrap());
        assert!(!pred.eval(&mut output, &row(&[3]), &row(&[3])).unwrap());
    }

    #[test]
    fn test_using_merges_and_hides() {
        let pred = JoinPredicate::using(
            &cols(&["id", "x"]),
            &cols(&["id", "y"]),
            &["id".to_string()],
        )
        .unwrap();

        assert_eq!(pred.num_merged_equality_columns(), 1);
        assert_eq!(pred.output_width(), 5);

        let names: Vec<(&str, bool)> = pred
            .columns()
            .iter()
            .map(|c| (c.name.as_str(), c.hidden))
            .collect();
        assert_eq!(
            names,
            vec![
                ("id", false),
                ("id", true),
                ("x", false),
                ("id", true),
                ("y", false),
            ]
        );
    }

    #[test]
    fn test_using_unknown_column() {
        let err = JoinPredicate::using(
            &cols(&["a"]),
            &cols(&["b"]),
            &["missing".to_string()],
        )
        .unwrap_err();
        assert!(matches!(err, Error::ColumnNotFound(name) if name == "missing"));
    }

    #[test]
    fn test_merged_column_falls_back_to_right() {
        let pred = JoinPredicate::using(
            &cols(&["id"]),
            &cols(&["id"]),
            &["id".to_string()],
        )
        .unwrap();

        let mut output = Row::new();
        pred.prepare_row(&mut output, &row(&[4]), &row(&[4]));
        assert_eq!(output[0], Value::integer(4));

        // unmatched right row padded with a NULL left side
        let null_left = Row::nulls(1);
        pred.prepare_row(&mut output, &null_left, &row(&[9]));
        assert_eq!(output[0], Value::integer(9));
        assert!(output[1].is_null());
        assert_eq!(output[2], Value::integer(9));
    }

    #[test]
    fn test_natural_finds_common_columns() {
        let pred = JoinPredicate::natural(&cols(&["a", "id", "b"]), &cols(&["id", "c"])).unwrap();
        assert_eq!(pred.num_merged_equality_columns(), 1);
        assert_eq!(pred.left_equality_indices(), &[1]);
        assert_eq!(pred.right_equality_indices(), &[0]);
        assert_eq!(pred.columns()[0].name, "id");
    }

    #[test]
    fn test_natural_without_common_columns_is_cross() {
        let pred = JoinPredicate::natural(&cols(&["a"]), &cols(&["b"])).unwrap();
        assert!(!pred.has_equality());
        assert_eq!(pred.num_merged_equality_columns(), 0);
    }
}
