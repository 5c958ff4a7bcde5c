//! Per-command reply sequence.
//!
//! A command moves Started -> Continuing (100, any number of times) ->
//! Finished (2xx or 4xx). Once finished, nothing more is sent for it.

use crate::config::ReplyConfig;
use crate::errno::LastError;
use crate::error::ArielFwError;
use crate::reply::Reply;
use crate::response_code::ResponseCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Where a command is in its reply sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum ReplyState {
    Started,
    Continuing { sent: usize },
    Finished { code: ResponseCode },
}

/// Replies emitted for one command
#[derive(Debug, Clone)]
pub struct CommandReplies {
    command: String,
    state: ReplyState,
    replies: Vec<Reply>,
    append_errno_detail: bool,
    max_message_len: usize,
}

impl CommandReplies {
    pub fn new(command: impl Into<String>) -> Self {
        Self::with_config(command, &ReplyConfig::default())
    }

    pub fn with_config(command: impl Into<String>, config: &ReplyConfig) -> Self {
        if config.max_message_len_was_clamped() {
            warn!(
                configured = config.max_message_len,
                effective = config.effective_max_message_len(),
                "replies.max_message_len out of range, clamped"
            );
        }
        Self {
            command: command.into(),
            state: ReplyState::Started,
            replies: Vec::new(),
            append_errno_detail: config.append_errno_detail,
            max_message_len: config.effective_max_message_len(),
        }
    }

    /// Record the next reply. Fails without recording once the command is finished.
    pub fn push(&mut self, reply: Reply) -> Result<&Reply, ArielFwError> {
        if let ReplyState::Finished { code } = self.state {
            warn!(
                command = %self.command,
                finished_with = %code,
                rejected = %reply.code,
                "Reply after terminal reply rejected"
            );
            return Err(ArielFwError::CommandFinished {
                command: self.command.clone(),
                code,
            });
        }

        let reply = reply.truncated(self.max_message_len);
        self.state = match self.state {
            _ if reply.is_terminal() => ReplyState::Finished { code: reply.code },
            ReplyState::Continuing { sent } => ReplyState::Continuing { sent: sent + 1 },
            _ => ReplyState::Continuing { sent: 1 },
        };
        debug!(command = %self.command, code = %reply.code, "{}", reply.message);

        self.replies.push(reply);
        Ok(&self.replies[self.replies.len() - 1])
    }

    pub fn operational(&mut self, message: impl Into<String>) -> Result<&Reply, ArielFwError> {
        self.push(Reply::operational(message))
    }

    pub fn okay(&mut self, message: impl Into<String>) -> Result<&Reply, ArielFwError> {
        self.push(Reply::okay(message))
    }

    pub fn failed(&mut self, message: impl Into<String>) -> Result<&Reply, ArielFwError> {
        self.push(Reply::failed(message))
    }

    /// Finish with a failure classified from an errno captured by the caller
    pub fn failed_from(
        &mut self,
        last_error: LastError,
        message: impl Into<String>,
    ) -> Result<&Reply, ArielFwError> {
        warn!(command = %self.command, errno = %last_error, "Command failed");
        let reply = Reply::from_last_error(message, last_error, self.append_errno_detail);
        self.push(reply)
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn state(&self) -> ReplyState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.state, ReplyState::Finished { .. })
    }

    /// Terminal code, once finished
    pub fn outcome(&self) -> Option<ResponseCode> {
        match self.state {
            ReplyState::Finished { code } => Some(code),
            _ => None,
        }
    }

    pub fn replies(&self) -> &[Reply] {
        &self.replies
    }

    pub fn into_replies(self) -> Vec<Reply> {
        self.replies
    }

    /// All replies as wire lines, in order
    pub fn wire(&self) -> String {
        self.replies.iter().map(Reply::to_line).collect()
    }
}
