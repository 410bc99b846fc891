use std::collections::VecDeque;

/// Player-facing status messages ("Cue Ball is in Play", fouls, turn changes).
///
/// Messages are queued for the host, which drains them once per frame, and a
/// short history is kept so a late-attaching UI can show the latest line.
/// Both are bounded: a host that never drains loses the oldest lines.
#[derive(Debug)]
pub struct MessageLog {
    pending: VecDeque<String>,
    history: VecDeque<String>,
    history_len: usize,
}

impl MessageLog {
    pub fn new(history_len: usize) -> Self {
        Self {
            pending: VecDeque::with_capacity(history_len),
            history: VecDeque::with_capacity(history_len),
            history_len: history_len.max(1),
        }
    }

    pub fn post(&mut self, text: impl Into<String>) {
        let text = text.into();
        log::info!("message: {}", text);
        if self.history.len() == self.history_len {
            self.history.pop_front();
        }
        self.history.push_back(text.clone());
        if self.pending.len() == self.history_len {
            self.pending.pop_front();
        }
        self.pending.push_back(text);
    }

    /// Take all messages posted since the last drain, oldest first.
    pub fn drain(&mut self) -> Vec<String> {
        self.pending.drain(..).collect()
    }

    pub fn latest(&self) -> Option<&str> {
        self.history.back().map(String::as_str)
    }

    pub fn history(&self) -> impl Iterator<Item = &str> {
        self.history.iter().map(String::as_str)
    }
}

impl Default for MessageLog {
    fn default() -> Self {
        Self::new(32)
    }
}
