use std::sync::{Mutex, MutexGuard};

/// Ordered, append-only record of subprocess invocations.
///
/// Each appended command is assigned a 1-based sequence number reflecting
/// invocation order. The history is interior-mutable so it can be shared with
/// rendering machinery that only holds a shared reference.
#[derive(Debug, Default)]
pub struct CommandHistory {
    records: Mutex<Vec<String>>,
}

impl CommandHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a command and returns its sequence number.
    pub fn append(&self, command: impl Into<String>) -> usize {
        let mut records = self.locked();
        records.push(command.into());
        records.len()
    }

    /// Appends a batch of commands in order.
    pub fn extend(&self, commands: impl IntoIterator<Item = String>) {
        self.locked().extend(commands);
    }

    /// Returns the full history as `(sequence_number, command)` pairs.
    ///
    /// Sequence numbers start at 1 and strictly increase in append order.
    pub fn entries(&self) -> Vec<(usize, String)> {
        self.locked()
            .iter()
            .enumerate()
            .map(|(i, command)| (i + 1, command.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.locked().len()
    }

    pub fn is_empty(&self) -> bool {
        self.locked().is_empty()
    }

    /// Drops all records; subsequent sequence numbers restart at 1.
    pub fn clear(&self) {
        self.locked().clear();
    }

    fn locked(&self) -> MutexGuard<'_, Vec<String>> {
        self.records.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_numbers_start_at_one() {
        let history = CommandHistory::new();
        assert_eq!(history.append("ls"), 1);
        assert_eq!(history.append("pwd"), 2);
        assert_eq!(history.append("date"), 3);

        let entries = history.entries();
        assert_eq!(
            entries,
            vec![
                (1, "ls".to_string()),
                (2, "pwd".to_string()),
                (3, "date".to_string()),
            ]
        );
    }

    #[test]
    fn test_clear_restarts_sequence() {
        let history = CommandHistory::new();
        history.append("ls");
        history.append("pwd");
        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.append("date"), 1);
    }

    #[test]
    fn test_extend_preserves_order() {
        let history = CommandHistory::new();
        history.append("first");
        history.extend(["second".to_string(), "third".to_string()]);
        assert_eq!(history.len(), 3);
        assert_eq!(history.entries()[2], (3, "third".to_string()));
    }
}
