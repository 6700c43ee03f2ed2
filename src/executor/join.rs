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

//! Hash join operator
//!
//! `start` builds a [`BucketTable`] from the right child. `next` probes the
//! table with one left row at a time, buffering the fan-out of matches, and
//! for RIGHT/FULL OUTER joins finishes by draining the stored rows no probe
//! ever matched. Probe keys containing a NULL skip the lookup entirely:
//! under SQL semantics a NULL equality column matches nothing, not even
//! another NULL.

use std::mem;

use crate::core::error::{Error, Result};
use crate::core::row::Row;

use super::bucket::BucketTable;
use super::buffer::RowBuffer;
use super::context::ExecutionContext;
use super::memory::MemoryAccount;
use super::node::{ColumnInfo, PlanNode};
use super::predicate::{JoinPredicate, OnExpr};

/// The shape of a join, as written in the query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    Inner,
    LeftOuter,
    RightOuter,
    FullOuter,
}

impl JoinType {
    /// Map a SQL join keyword sequence to a join type
    ///
    /// Matching is case-insensitive and whitespace-insensitive. The empty
    /// string (comma-join syntax) and `CROSS JOIN` are both inner joins.
    pub fn from_token(token: &str) -> Result<Self> {
        let normalized = token
            .split_whitespace()
            .map(str::to_ascii_uppercase)
            .collect::<Vec<_>>()
            .join(" ");
        match normalized.as_str() {
            "" | "JOIN" | "INNER JOIN" | "CROSS JOIN" => Ok(JoinType::Inner),
            "LEFT JOIN" | "LEFT OUTER JOIN" => Ok(JoinType::LeftOuter),
            "RIGHT JOIN" | "RIGHT OUTER JOIN" => Ok(JoinType::RightOuter),
            "FULL JOIN" | "FULL OUTER JOIN" => Ok(JoinType::FullOuter),
            _ => Err(Error::UnsupportedJoinType(token.to_string())),
        }
    }

    /// Whether left rows without a match must still be emitted
    pub fn wants_unmatched_left(self) -> bool {
        matches!(self, JoinType::LeftOuter | JoinType::FullOuter)
    }

    /// Whether stored right rows without a match must still be emitted
    pub fn wants_unmatched_right(self) -> bool {
        matches!(self, JoinType::RightOuter | JoinType::FullOuter)
    }
}

/// Join condition, as written in the query
pub enum JoinCond {
    /// No condition: the cross product
    Cross,
    /// `ON <expr>`, split into extracted equality column pairs and a
    /// residual filter over the composed output row
    On {
        eq_pairs: Vec<(usize, usize)>,
        filter: Option<OnExpr>,
    },
    /// `USING (a, b, ...)`
    Using(Vec<String>),
    /// `NATURAL`
    Natural,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JoinState {
    Unstarted,
    Building,
    Probing,
    Draining,
    Done,
}

/// Hash join plan node
pub struct HashJoinNode {
    ctx: ExecutionContext,
    join_type: JoinType,
    pred: JoinPredicate,
    left: Box<dyn PlanNode>,
    right: Box<dyn PlanNode>,
    table: BucketTable,
    account: MemoryAccount,
    buffer: RowBuffer,
    empty_left_row: Row,
    empty_right_row: Row,
    key_scratch: Vec<u8>,
    state: JoinState,
    closed: bool,
}

impl std::fmt::Debug for HashJoinNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HashJoinNode")
            .field("join_type", &self.join_type)
            .field("state", &self.state)
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}

impl HashJoinNode {
    /// Create a hash join over two child nodes
    ///
    /// `join_token` is the SQL keyword sequence naming the join shape.
    /// Fails when the token is not a supported join type, when both children
    /// expose a column under the same source name, or when a USING column
    /// does not exist on both sides.
    pub fn new(
        ctx: ExecutionContext,
        join_token: &str,
        left: Box<dyn PlanNode>,
        right: Box<dyn PlanNode>,
        cond: JoinCond,
        account: MemoryAccount,
    ) -> Result<Self> {
        let join_type = JoinType::from_token(join_token)?;
        check_duplicate_sources(left.columns(), right.columns())?;

        let pred = match cond {
            JoinCond::Cross => JoinPredicate::cross(left.columns(), right.columns()),
            JoinCond::On { eq_pairs, filter } => {
                JoinPredicate::on(left.columns(), right.columns(), eq_pairs, filter)
            }
            JoinCond::Using(names) => {
                JoinPredicate::using(left.columns(), right.columns(), &names)?
            }
            JoinCond::Natural => JoinPredicate::natural(left.columns(), right.columns())?,
        };

        let empty_left_row = Row::nulls(left.columns().len());
        let empty_right_row = Row::nulls(right.columns().len());

        Ok(Self {
            ctx,
            join_type,
            pred,
            left,
            right,
            table: BucketTable::new(),
            account,
            buffer: RowBuffer::new(),
            empty_left_row,
            empty_right_row,
            key_scratch: Vec::new(),
            state: JoinState::Unstarted,
            closed: false,
        })
    }

    /// The join's shape
    pub fn join_type(&self) -> JoinType {
        self.join_type
    }

    /// The join's predicate
    pub fn predicate(&self) -> &JoinPredicate {
        &self.pred
    }

    /// Consume the right child into the bucket table
    fn build(&mut self) -> Result<()> {
        let store_null_keys = self.join_type.wants_unmatched_right();
        while self.right.next()? {
            self.ctx.check_cancelled()?;
            let row = self.right.values().clone();
            let (key, contains_null) =
                self.pred.encode_right_key(mem::take(&mut self.key_scratch), &row)?;
            // A NULL key can never match a probe; store the row only if it
            // must surface during the drain phase.
            if !contains_null || store_null_keys {
                self.table.add_row(&mut self.account, &key, row)?;
            }
            self.key_scratch = key;
        }
        if store_null_keys {
            self.table.init_seen(&mut self.account)?;
        }
        Ok(())
    }

    /// Pull one left row and buffer everything it produces
    ///
    /// May leave the buffer empty (no match on an inner join, or the
    /// residual filter rejected every pairing); the caller loops.
    fn probe(&mut self) -> Result<()> {
        self.ctx.check_cancelled()?;

        // With nothing stored, no probe can match. Only joins padding
        // unmatched left rows still have output to produce.
        if self.table.is_empty() && !self.join_type.wants_unmatched_left() {
            self.state = JoinState::Done;
            return Ok(());
        }

        if !self.left.next()? {
            self.state = if self.join_type.wants_unmatched_right() {
                JoinState::Draining
            } else {
                JoinState::Done
            };
            return Ok(());
        }
        let left_row = self.left.values().clone();

        let (key, contains_null) =
            self.pred.encode_left_key(mem::take(&mut self.key_scratch), &left_row)?;

        let mut matched = false;
        if !contains_null {
            if let Some(bucket) = self.table.fetch_mut(&key) {
                let track_seen = self.join_type.wants_unmatched_right();
                for idx in 0..bucket.len() {
                    let mut output = Row::new();
                    if self.pred.eval(&mut output, &left_row, &bucket.rows()[idx])? {
                        matched = true;
                        if track_seen {
                            bucket.mark_seen(idx);
                        }
                        self.buffer.push(output);
                    }
                }
            }
        }
        self.key_scratch = key;

        if !matched && self.join_type.wants_unmatched_left() {
            let mut output = Row::new();
            self.pred
                .prepare_row(&mut output, &left_row, &self.empty_right_row);
            self.buffer.push(output);
        }
        Ok(())
    }

    /// Buffer every stored row no probe matched, NULL-padded on the left
    fn drain(&mut self) -> Result<()> {
        for bucket in self.table.buckets() {
            for (idx, row) in bucket.rows().iter().enumerate() {
                self.ctx.check_cancelled()?;
                if bucket.seen(idx) {
                    continue;
                }
                let mut output = Row::new();
                self.pred.prepare_row(&mut output, &self.empty_left_row, row);
                self.buffer.push(output);
            }
        }
        Ok(())
    }
}

impl PlanNode for HashJoinNode {
    fn start(&mut self) -> Result<()> {
        if self.state != JoinState::Unstarted {
            return Err(Error::internal("hash join started twice"));
        }
        self.left.start()?;
        self.right.start()?;
        self.state = JoinState::Building;
        self.build()?;
        self.state = JoinState::Probing;
        Ok(())
    }

    fn next(&mut self) -> Result<bool> {
        loop {
            if self.buffer.next() {
                return Ok(true);
            }
            match self.state {
                JoinState::Unstarted | JoinState::Building => {
                    return Err(Error::internal("hash join pulled before start"))
                }
                JoinState::Probing => self.probe()?,
                JoinState::Draining => {
                    self.drain()?;
                    self.state = JoinState::Done;
                }
                JoinState::Done => return Ok(false),
            }
        }
    }

    fn values(&self) -> &Row {
        self.buffer.values()
    }

    fn columns(&self) -> &[ColumnInfo] {
        self.pred.columns()
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.state = JoinState::Done;
        self.buffer.clear();
        self.table.close();
        self.account.close();
        self.right.close();
        self.left.close();
    }
}

/// Reject plans where both children expose columns under one source name
///
/// The composed output would make such columns ambiguous; the query must
/// alias one side.
fn check_duplicate_sources(left: &[ColumnInfo], right: &[ColumnInfo]) -> Result<()> {
    for rc in right {
        let Some(alias) = &rc.table_alias else {
            continue;
        };
        if left
            .iter()
            .any(|lc| lc.table_alias.as_deref() == Some(alias.as_str()))
        {
            return Err(Error::DuplicateSourceName(alias.clone()));
        }
    }
    Ok(())
}
