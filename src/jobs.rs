use std::sync::atomic::{AtomicI32, Ordering};

/// Most background jobs tracked at once; launches past this run untracked.
pub const MAX_JOBS: usize = 64;

/// Fixed-capacity pid set shared between the main thread and the SIGCHLD
/// handler.
///
/// Each slot is a single atomic, 0 meaning empty (the kernel never hands a
/// child pid 0). Every operation is one load or compare-exchange per slot,
/// so the handler can interrupt the main thread mid-anything and both sides
/// still see a consistent table. Nothing here allocates.
pub struct JobTable {
    slots: [AtomicI32; MAX_JOBS],
}

/// Background children still running.
pub static BACKGROUND: JobTable = JobTable::new();

/// Reaped background pids waiting for the main loop to print their notice.
pub static FINISHED: JobTable = JobTable::new();

impl JobTable {
    pub const fn new() -> Self {
        Self {
            slots: [const { AtomicI32::new(0) }; MAX_JOBS],
        }
    }

    /// Inserts a pid. Returns false if the table is full or the pid is
    /// already present.
    pub fn add(&self, pid: i32) -> bool {
        if pid == 0 || self.contains(pid) {
            return false;
        }
        for slot in &self.slots {
            if slot
                .compare_exchange(0, pid, Ordering::AcqRel, Ordering::Relaxed)
                .is_ok()
            {
                return true;
            }
        }
        false
    }

    /// Removes a pid. Returns whether it was present.
    pub fn remove(&self, pid: i32) -> bool {
        if pid == 0 {
            return false;
        }
        for slot in &self.slots {
            if slot
                .compare_exchange(pid, 0, Ordering::AcqRel, Ordering::Relaxed)
                .is_ok()
            {
                return true;
            }
        }
        false
    }

    pub fn contains(&self, pid: i32) -> bool {
        self.slots
            .iter()
            .any(|slot| slot.load(Ordering::Acquire) == pid)
    }

    pub fn len(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| slot.load(Ordering::Acquire) != 0)
            .count()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Empties the table, returning whatever pids were in it.
    pub fn take_all(&self) -> Vec<i32> {
        let mut pids = Vec::new();
        for slot in &self.slots {
            let pid = slot.swap(0, Ordering::AcqRel);
            if pid != 0 {
                pids.push(pid);
            }
        }
        pids
    }
}

/// Prints one notice per background job the handler has reaped since the
/// last call, and clears the queue.
pub fn report_finished() {
    for pid in FINISHED.take_all() {
        println!("ush: Background process {} finished", pid);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_remove() {
        let table = JobTable::new();
        assert!(table.add(100));
        assert!(table.add(200));
        assert_eq!(table.len(), 2);
        assert!(table.contains(100));
        assert!(table.remove(100));
        assert!(!table.contains(100));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_remove_is_not_repeatable() {
        let table = JobTable::new();
        table.add(42);
        assert!(table.remove(42));
        assert!(!table.remove(42));
    }

    #[test]
    fn test_no_duplicates() {
        let table = JobTable::new();
        assert!(table.add(42));
        assert!(!table.add(42));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_capacity_bound() {
        let table = JobTable::new();
        for pid in 1..=MAX_JOBS as i32 {
            assert!(table.add(pid));
        }
        assert!(!table.add(9999));
        assert_eq!(table.len(), MAX_JOBS);
    }

    #[test]
    fn test_take_all_empties_the_table() {
        let table = JobTable::new();
        table.add(10);
        table.add(20);
        let mut pids = table.take_all();
        pids.sort();
        assert_eq!(pids, vec![10, 20]);
        assert!(table.is_empty());
        assert!(table.take_all().is_empty());
    }

    #[test]
    fn test_zero_is_never_an_entry() {
        let table = JobTable::new();
        assert!(!table.add(0));
        assert!(!table.remove(0));
        assert!(table.take_all().is_empty());
    }
}
