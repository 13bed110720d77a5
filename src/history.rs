use std::collections::VecDeque;

pub const DEFAULT_HISTORY_SIZE: usize = 5;

/// The most recent raw queries, oldest evicted first once full.
#[derive(Debug, Clone)]
pub struct QueryHistory {
    entries: VecDeque<String>,
    capacity: usize,
}

impl QueryHistory {
    pub fn new(capacity: usize) -> Self {
        QueryHistory {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn record(&mut self, query: &str) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(query.to_string());
    }

    /// Oldest first, matching the order queries were recorded in.
    pub fn list(&self) -> Vec<&str> {
        self.entries.iter().map(String::as_str).collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for QueryHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evicts_oldest_when_full() {
        let mut history = QueryHistory::default();
        for q in ["q1", "q2", "q3", "q4", "q5", "q6"] {
            history.record(q);
        }

        assert_eq!(history.len(), 5);
        assert_eq!(history.list(), vec!["q2", "q3", "q4", "q5", "q6"]);
    }

    #[test]
    fn test_records_empty_queries() {
        let mut history = QueryHistory::new(2);
        history.record("");
        history.record("   ");
        assert_eq!(history.list(), vec!["", "   "]);
    }

    #[test]
    fn test_clear() {
        let mut history = QueryHistory::new(3);
        history.record("god");
        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.capacity(), 3);
    }

    #[test]
    fn test_zero_capacity_keeps_nothing() {
        let mut history = QueryHistory::new(0);
        history.record("god");
        assert!(history.is_empty());
    }
}
