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

//! Execution context with cooperative cancellation
//!
//! The operator polls the context at row-processing boundaries, so a
//! cancelled query stops within one row of the request rather than running
//! its phase to completion.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::core::error::{Error, Result};

/// Shared state for one query execution
#[derive(Debug, Clone, Default)]
pub struct ExecutionContext {
    cancelled: Arc<AtomicBool>,
}

impl ExecutionContext {
    /// Create a fresh, non-cancelled context
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation of the query
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Check whether cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Return an error if cancellation has been requested
    pub fn check_cancelled(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(Error::QueryCancelled)
        } else {
            Ok(())
        }
    }

    /// Create a handle that can cancel this context from another thread
    pub fn cancellation_handle(&self) -> CancellationHandle {
        CancellationHandle {
            cancelled: Arc::clone(&self.cancelled),
        }
    }
}

/// Cancels an [`ExecutionContext`] from outside the executing thread
#[derive(Debug, Clone)]
pub struct CancellationHandle {
    cancelled: Arc<AtomicBool>,
}

impl CancellationHandle {
    /// Request cancellation
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_context_not_cancelled() {
        let ctx = ExecutionContext::new();
        assert!(!ctx.is_cancelled());
        assert!(ctx.check_cancelled().is_ok());
    }

    #[test]
    fn test_cancel() {
        let ctx = ExecutionContext::new();
        ctx.cancel();
        assert!(ctx.is_cancelled());
        assert!(matches!(
            ctx.check_cancelled(),
            Err(Error::QueryCancelled)
        ));
    }

    #[test]
    fn test_handle_cancels_shared_state() {
        let ctx = ExecutionContext::new();
        let handle = ctx.cancellation_handle();
        let clone = ctx.clone();

        handle.cancel();

        assert!(ctx.is_cancelled());
        assert!(clone.is_cancelled());
    }

    #[test]
    fn test_handle_from_other_thread() {
        let ctx = ExecutionContext::new();
        let handle = ctx.cancellation_handle();

        std::thread::spawn(move || handle.cancel())
            .join()
            .unwrap();

        assert!(ctx.is_cancelled());
    }
}
