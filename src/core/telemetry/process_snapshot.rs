//! Shared process table and its top-K views.
//!
//! The process producer swaps a freshly built table in; the update loop
//! copies it out. Both hold the lock only for the swap or the clone, so
//! sorting never happens under the lock.

use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;

use super::metrics::ProcessEntry;

/// One complete refresh of the process list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessTable {
    /// Incremented on every replace; 0 means "never refreshed".
    pub generation: u64,
    pub entries: Vec<ProcessEntry>,
}

/// Handle to the shared table. Clones refer to the same table.
#[derive(Debug, Clone, Default)]
pub struct ProcessSnapshot {
    inner: Arc<Mutex<ProcessTable>>,
}

impl ProcessSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole table, returning the new generation.
    pub fn replace(&self, entries: Vec<ProcessEntry>) -> u64 {
        let (generation, previous) = {
            let mut guard = self.inner.lock();
            let generation = guard.generation + 1;
            let previous = std::mem::replace(&mut *guard, ProcessTable { generation, entries });
            (generation, previous)
        };
        drop(previous);
        generation
    }

    /// Copy of the current table.
    pub fn copy(&self) -> ProcessTable {
        self.inner.lock().clone()
    }

    pub fn generation(&self) -> u64 {
        self.inner.lock().generation
    }

    /// Both rankings, derived from a single copy of the table.
    pub fn top_processes(&self, by_cpu: usize, by_memory: usize) -> TopProcesses {
        TopProcesses::derive(&self.copy(), by_cpu, by_memory)
    }
}

/// Highest-ranked processes by CPU and by memory.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TopProcesses {
    pub generation: u64,
    pub total: usize,
    pub by_cpu: Vec<ProcessEntry>,
    pub by_memory: Vec<ProcessEntry>,
}

impl TopProcesses {
    pub fn derive(table: &ProcessTable, by_cpu: usize, by_memory: usize) -> Self {
        Self {
            generation: table.generation,
            total: table.entries.len(),
            by_cpu: top_k_by_cpu(&table.entries, by_cpu),
            by_memory: top_k_by_memory(&table.entries, by_memory),
        }
    }
}

/// `k` entries with the highest CPU usage. Ties keep table order.
pub fn top_k_by_cpu(entries: &[ProcessEntry], k: usize) -> Vec<ProcessEntry> {
    let mut sorted = entries.to_vec();
    // stable sort: equal keys stay in snapshot order
    sorted.sort_by(|a, b| b.cpu_percent.total_cmp(&a.cpu_percent));
    sorted.truncate(k);
    sorted
}

/// `k` entries with the largest resident memory. Ties keep table order.
pub fn top_k_by_memory(entries: &[ProcessEntry], k: usize) -> Vec<ProcessEntry> {
    let mut sorted = entries.to_vec();
    sorted.sort_by(|a, b| b.memory_bytes.cmp(&a.memory_bytes));
    sorted.truncate(k);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn entry(pid: u32, cpu: f32, mem: u64) -> ProcessEntry {
        ProcessEntry {
            pid,
            name: format!("proc{}", pid),
            cpu_percent: cpu,
            memory_bytes: mem,
        }
    }

    #[test]
    fn test_rankings_disagree_for_small_k() {
        let snapshot = ProcessSnapshot::new();
        snapshot.replace(vec![
            entry(1, 90.0, 10),
            entry(2, 5.0, 5_000),
            entry(3, 50.0, 20),
            entry(4, 1.0, 9_000),
        ]);

        let top = snapshot.top_processes(2, 2);
        let cpu_pids: Vec<_> = top.by_cpu.iter().map(|p| p.pid).collect();
        let mem_pids: Vec<_> = top.by_memory.iter().map(|p| p.pid).collect();
        assert_eq!(cpu_pids, vec![1, 3]);
        assert_eq!(mem_pids, vec![4, 2]);
        assert_eq!(top.total, 4);
        assert_eq!(top.generation, 1);
    }

    #[test]
    fn test_ties_keep_snapshot_order() {
        let entries = vec![entry(7, 10.0, 1), entry(3, 10.0, 1), entry(9, 10.0, 1)];
        let pids: Vec<_> = top_k_by_cpu(&entries, 3).iter().map(|p| p.pid).collect();
        assert_eq!(pids, vec![7, 3, 9]);
        let pids: Vec<_> = top_k_by_memory(&entries, 2).iter().map(|p| p.pid).collect();
        assert_eq!(pids, vec![7, 3]);
    }

    #[test]
    fn test_k_larger_than_table() {
        let entries = vec![entry(1, 1.0, 1)];
        assert_eq!(top_k_by_cpu(&entries, 7).len(), 1);
    }

    #[test]
    fn test_replace_bumps_generation() {
        let snapshot = ProcessSnapshot::new();
        assert_eq!(snapshot.generation(), 0);
        assert_eq!(snapshot.replace(vec![]), 1);
        assert_eq!(snapshot.replace(vec![entry(1, 1.0, 1)]), 2);
        assert_eq!(snapshot.copy().entries.len(), 1);
    }

    #[test]
    fn test_reader_never_sees_mixed_table() {
        // Every table written has all pids equal to its generation tag, so a
        // half-old/half-new read would show mixed tags.
        let snapshot = ProcessSnapshot::new();
        let writer = {
            let snapshot = snapshot.clone();
            thread::spawn(move || {
                for tag in 1..=500u32 {
                    let table = (0..50).map(|i| entry(tag, i as f32, i)).collect();
                    snapshot.replace(table);
                }
            })
        };

        for _ in 0..500 {
            let table = snapshot.copy();
            if let Some(first) = table.entries.first() {
                assert!(table.entries.iter().all(|p| p.pid == first.pid));
                assert_eq!(table.entries.len(), 50);
            }
        }
        writer.join().unwrap();
    }
}
