//! Worker budget accounting.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Bound on concurrently executing scan workers.
///
/// The counter starts at the configured worker count and never goes
/// negative. `try_acquire` hands out an RAII slot; dropping the slot
/// returns the worker to the budget. There is no blocking acquire:
/// callers that fail to get a slot run inline instead of waiting.
///
/// A budget belongs to one scanner rather than the process, so
/// independent scans (and tests) get independent counters.
#[derive(Debug)]
pub struct WorkerBudget {
    available: AtomicUsize,
}

impl WorkerBudget {
    /// Create a budget with `workers` slots. Zero means every node runs
    /// inline in its caller's thread.
    pub fn new(workers: usize) -> Self {
        Self {
            available: AtomicUsize::new(workers),
        }
    }

    /// Try to take one worker slot.
    ///
    /// Returns `None` when the budget is spent, leaving the counter
    /// unchanged.
    pub fn try_acquire(&self) -> Option<BudgetSlot<'_>> {
        let mut current = self.available.load(Ordering::Relaxed);
        loop {
            if current == 0 {
                return None;
            }
            match self.available.compare_exchange_weak(
                current,
                current - 1,
                Ordering::Acquire,
                Ordering::Relaxed,
            ) {
                Ok(_) => return Some(BudgetSlot { budget: self }),
                Err(observed) => current = observed,
            }
        }
    }

    /// Worker slots currently available.
    pub fn available(&self) -> usize {
        self.available.load(Ordering::Relaxed)
    }

    fn release(&self) {
        self.available.fetch_add(1, Ordering::Release);
    }
}

/// One acquired worker slot; released exactly once, on drop.
#[derive(Debug)]
pub struct BudgetSlot<'a> {
    budget: &'a WorkerBudget,
}

impl Drop for BudgetSlot<'_> {
    fn drop(&mut self) {
        self.budget.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_until_spent() {
        let budget = WorkerBudget::new(2);

        let a = budget.try_acquire();
        let b = budget.try_acquire();
        assert!(a.is_some());
        assert!(b.is_some());
        assert_eq!(budget.available(), 0);

        // Spent budget fails without changing the counter.
        assert!(budget.try_acquire().is_none());
        assert_eq!(budget.available(), 0);

        drop(a);
        drop(b);
        assert_eq!(budget.available(), 2);
    }

    #[test]
    fn test_zero_budget_never_acquires() {
        let budget = WorkerBudget::new(0);
        assert!(budget.try_acquire().is_none());
        assert_eq!(budget.available(), 0);
    }

    #[test]
    fn test_conservation_under_contention() {
        let budget = WorkerBudget::new(3);

        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    for _ in 0..1000 {
                        if let Some(slot) = budget.try_acquire() {
                            drop(slot);
                        }
                    }
                });
            }
        });

        assert_eq!(budget.available(), 3);
    }
}
