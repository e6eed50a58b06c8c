//! Chat with the trader.
//!
//! Typed lines go to the chat agent on the IO task pool; the reply is polled
//! each frame so a slow service never stalls rendering. Only one request is
//! in flight at a time.

use std::collections::VecDeque;

use bevy::prelude::*;
use bevy::tasks::{block_on, futures_lite::future, IoTaskPool, Task};

use crate::agent::{AgentError, ChatAgent};
use crate::data::GameConfig;

/// Lines kept in the log.
pub const CHAT_LOG_CAPACITY: usize = 50;
/// Lines shown in the chat panel.
pub const VISIBLE_CHAT_LINES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    Player,
    Trader,
}

impl Speaker {
    pub fn label(self) -> &'static str {
        match self {
            Speaker::Player => "You",
            Speaker::Trader => "Trader",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatLine {
    pub speaker: Speaker,
    pub text: String,
}

#[derive(Resource, Default)]
pub struct ChatLog {
    lines: VecDeque<ChatLine>,
    /// What the player is typing.
    pub input: String,
    pending: Option<Task<Result<String, AgentError>>>,
}

impl ChatLog {
    pub fn push(&mut self, speaker: Speaker, text: impl Into<String>) {
        if self.lines.len() == CHAT_LOG_CAPACITY {
            self.lines.pop_front();
        }
        self.lines.push_back(ChatLine {
            speaker,
            text: text.into(),
        });
    }

    pub fn lines(&self) -> impl Iterator<Item = &ChatLine> {
        self.lines.iter()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The most recent lines, oldest first.
    pub fn visible(&self) -> impl Iterator<Item = &ChatLine> {
        self.lines
            .iter()
            .skip(self.lines.len().saturating_sub(VISIBLE_CHAT_LINES))
    }

    /// Append printable characters to the input buffer.
    pub fn type_text(&mut self, text: &str) {
        self.input.extend(text.chars().filter(|c| !c.is_control()));
    }

    pub fn backspace(&mut self) {
        self.input.pop();
    }

    /// A reply is on its way.
    pub fn waiting(&self) -> bool {
        self.pending.is_some()
    }

    /// Take the buffer for sending. The buffer is cleared even when it only
    /// held whitespace; `None` means nothing to send. Ignored while waiting.
    pub fn take_input(&mut self) -> Option<String> {
        if self.waiting() {
            return None;
        }
        let line = std::mem::take(&mut self.input);
        if line.trim().is_empty() {
            None
        } else {
            Some(line)
        }
    }
}

/// Record the player's line and hand the conversation to the IO pool.
pub fn submit_line(log: &mut ChatLog, agent: Option<&mut ChatAgent>, config: &GameConfig, line: String) {
    log.push(Speaker::Player, line.clone());
    let Some(agent) = agent else {
        log.push(Speaker::Trader, config.agent.apology.clone());
        return;
    };
    let (backend, messages) = agent.begin(&line);
    let task = IoTaskPool::get().spawn(async move { backend.complete(&messages) });
    log.pending = Some(task);
}

/// Collect a finished reply, if any.
pub fn poll_chat_reply(mut log: ResMut<ChatLog>, agent: Option<ResMut<ChatAgent>>) {
    let Some(task) = log.pending.as_mut() else {
        return;
    };
    let Some(result) = block_on(future::poll_once(task)) else {
        return;
    };
    log.pending = None;
    let reply = match agent {
        Some(mut agent) => agent.finish(result),
        None => result.unwrap_or_default(),
    };
    log.push(Speaker::Trader, reply);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_is_bounded_and_shows_the_tail() {
        let mut log = ChatLog::default();
        for i in 0..60 {
            log.push(Speaker::Player, format!("line {i}"));
        }
        assert_eq!(log.len(), CHAT_LOG_CAPACITY);
        assert_eq!(log.lines().next().unwrap().text, "line 10");

        let visible: Vec<&str> = log.visible().map(|l| l.text.as_str()).collect();
        assert_eq!(visible, vec!["line 55", "line 56", "line 57", "line 58", "line 59"]);
    }

    #[test]
    fn typing_and_backspace_edit_the_buffer() {
        let mut log = ChatLog::default();
        log.type_text("hi");
        log.type_text("\u{8}");
        log.type_text(" there");
        log.backspace();
        assert_eq!(log.input, "hi ther");
    }

    #[test]
    fn blank_input_is_cleared_but_not_sent() {
        let mut log = ChatLog::default();
        log.type_text("   ");
        assert_eq!(log.take_input(), None);
        assert!(log.input.is_empty());

        log.type_text("how much for corn?");
        assert_eq!(log.take_input().as_deref(), Some("how much for corn?"));
        assert!(log.input.is_empty());
    }
}
