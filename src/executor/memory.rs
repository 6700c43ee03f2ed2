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

//! Memory accounting for buffered state
//!
//! A [`MemoryPool`] holds the budget shared by every operator of a query.
//! Each buffering operator opens a [`MemoryAccount`] against the pool and
//! charges it as rows accumulate; closing the account returns everything it
//! charged. An operator that overruns the budget fails its query instead of
//! taking the process down.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::core::error::{Error, Result};

/// Byte budget shared by the operators of one query
#[derive(Debug)]
pub struct MemoryPool {
    budget: usize,
    used: AtomicUsize,
}

impl MemoryPool {
    /// Create a pool with no effective limit
    pub fn unlimited() -> Arc<Self> {
        Self::with_budget(usize::MAX)
    }

    /// Create a pool capped at `budget` bytes
    pub fn with_budget(budget: usize) -> Arc<Self> {
        Arc::new(Self {
            budget,
            used: AtomicUsize::new(0),
        })
    }

    /// Total bytes currently reserved across all accounts
    pub fn used(&self) -> usize {
        self.used.load(Ordering::SeqCst)
    }

    /// Configured budget in bytes
    pub fn budget(&self) -> usize {
        self.budget
    }

    fn reserve(&self, bytes: usize) -> Result<()> {
        let mut current = self.used.load(Ordering::SeqCst);
        loop {
            let new = match current.checked_add(bytes) {
                Some(new) if new <= self.budget => new,
                _ => {
                    return Err(Error::MemoryBudgetExceeded {
                        requested: bytes,
                        used: current,
                        budget: self.budget,
                    })
                }
            };
            match self.used.compare_exchange_weak(
                current,
                new,
                Ordering::SeqCst,
                Ordering::SeqCst,
            ) {
                Ok(_) => return Ok(()),
                Err(actual) => current = actual,
            }
        }
    }

    fn release(&self, bytes: usize) {
        self.used.fetch_sub(bytes, Ordering::SeqCst);
    }
}

/// One operator's charges against a [`MemoryPool`]
///
/// Dropping the account releases its reservation, so a query that errors out
/// mid-flight cannot leak budget.
#[derive(Debug)]
pub struct MemoryAccount {
    pool: Arc<MemoryPool>,
    used: usize,
    closed: bool,
}

impl MemoryAccount {
    /// Open an empty account against `pool`
    pub fn new(pool: Arc<MemoryPool>) -> Self {
        Self {
            pool,
            used: 0,
            closed: false,
        }
    }

    /// Charge `bytes` to the account, failing if the pool budget would be
    /// exceeded
    ///
    /// A closed account rejects further charges: nothing would ever return
    /// them to the pool.
    pub fn grow(&mut self, bytes: usize) -> Result<()> {
        if self.closed {
            return Err(Error::internal("memory account grown after close"));
        }
        self.pool.reserve(bytes)?;
        self.used += bytes;
        Ok(())
    }

    /// Bytes charged so far
    pub fn used(&self) -> usize {
        self.used
    }

    /// Return every charged byte to the pool
    ///
    /// Closing twice is a no-op.
    pub fn close(&mut self) {
        if !self.closed {
            self.pool.release(self.used);
            self.used = 0;
            self.closed = true;
        }
    }
}

impl Drop for MemoryAccount {
    fn drop(&mut self) {
        self.close();
    }
}
