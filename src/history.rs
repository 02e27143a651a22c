//! Execution history — bounded trace for Gantt-style rendering
//!
//! Fixed-size ring of samples. When full, the oldest sample is overwritten,
//! so the log always holds the most recent `N` ticks. No heap.

use crate::task::TaskId;

/// Samples kept for rendering
pub const HISTORY_WINDOW: usize = 50;

/// One tick's scheduling decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExecutionSample {
    pub time: u64,
    /// `None` = CPU idle
    pub running: Option<TaskId>,
}

impl ExecutionSample {
    pub const IDLE: ExecutionSample = ExecutionSample { time: 0, running: None };
}

/// Bounded append-only sample log
#[derive(Debug, Clone)]
pub struct HistoryLog<const N: usize = HISTORY_WINDOW> {
    buffer: [ExecutionSample; N],
    /// Slot the next sample goes into
    write_idx: usize,
    len: usize,
}

impl<const N: usize> HistoryLog<N> {
    /// Empty log
    pub const fn new() -> Self {
        Self {
            buffer: [ExecutionSample::IDLE; N],
            write_idx: 0,
            len: 0,
        }
    }

    /// Record a sample, evicting the oldest one when full
    pub fn append(&mut self, sample: ExecutionSample) {
        if N == 0 {
            return;
        }
        self.buffer[self.write_idx] = sample;
        self.write_idx = (self.write_idx + 1) % N;
        if self.len < N {
            self.len += 1;
        }
    }

    /// The last `min(n, len)` samples, oldest first
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &ExecutionSample> + '_ {
        let take = n.min(self.len);
        let start = (self.write_idx + N - take) % N.max(1);
        (0..take).map(move |i| &self.buffer[(start + i) % N])
    }

    /// Every retained sample, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &ExecutionSample> + '_ {
        self.recent(self.len)
    }

    /// Most recent sample
    pub fn latest(&self) -> Option<&ExecutionSample> {
        if self.len == 0 {
            return None;
        }
        Some(&self.buffer[(self.write_idx + N - 1) % N])
    }

    /// Number of samples held
    pub fn len(&self) -> usize {
        self.len
    }

    /// Is the log empty?
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Maximum samples retained
    pub fn capacity(&self) -> usize {
        N
    }

    /// Drop every sample
    pub fn clear(&mut self) {
        self.write_idx = 0;
        self.len = 0;
    }
}

impl<const N: usize> Default for HistoryLog<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(time: u64, id: Option<u32>) -> ExecutionSample {
        ExecutionSample {
            time,
            running: id.map(TaskId),
        }
    }

    #[test]
    fn test_append_and_latest() {
        let mut log = HistoryLog::<8>::new();
        assert!(log.is_empty());
        assert!(log.latest().is_none());

        log.append(sample(0, Some(1)));
        log.append(sample(1, None));
        assert_eq!(log.len(), 2);
        assert_eq!(log.latest(), Some(&sample(1, None)));
    }

    #[test]
    fn test_recent_is_chronological() {
        let mut log = HistoryLog::<8>::new();
        for t in 0..5 {
            log.append(sample(t, Some(1)));
        }
        let mut times = log.recent(3).map(|s| s.time);
        assert_eq!(times.next(), Some(2));
        assert_eq!(times.next(), Some(3));
        assert_eq!(times.next(), Some(4));
        assert_eq!(times.next(), None);
    }

    #[test]
    fn test_recent_larger_than_len() {
        let mut log = HistoryLog::<8>::new();
        log.append(sample(0, None));
        log.append(sample(1, None));
        assert_eq!(log.recent(100).count(), 2);
    }

    #[test]
    fn test_wraparound_keeps_newest() {
        let mut log = HistoryLog::<4>::new();
        for t in 0..10 {
            log.append(sample(t, Some(t as u32)));
        }
        assert_eq!(log.len(), 4);
        assert_eq!(log.capacity(), 4);
        let mut it = log.iter();
        for t in 6..10 {
            assert_eq!(it.next().map(|s| s.time), Some(t));
        }
        assert!(it.next().is_none());
        assert_eq!(log.latest().map(|s| s.time), Some(9));
    }

    #[test]
    fn test_clear() {
        let mut log = HistoryLog::<4>::new();
        log.append(sample(0, Some(1)));
        log.clear();
        assert!(log.is_empty());
        assert_eq!(log.recent(4).count(), 0);
    }

    #[test]
    fn test_default_window() {
        let log: HistoryLog = HistoryLog::default();
        assert_eq!(log.capacity(), HISTORY_WINDOW);
    }
}
