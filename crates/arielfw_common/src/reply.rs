//! Reply lines of the control protocol.
//!
//! Wire form, one reply per line:
//!   <code> <message>\n
//!
//! e.g. `100 Firewall start requested`, `200 Firewall started`,
//! `401 Failed to load rules (Permission denied)`.

use crate::errno::LastError;
use crate::error::ArielFwError;
use crate::response_code::ResponseCode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default cap on message length in bytes
pub const DEFAULT_MAX_MESSAGE_LEN: usize = 4096;

/// A single reply: code plus human-readable message.
/// The message never contains CR or LF.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ReplyFields")]
pub struct Reply {
    pub code: ResponseCode,
    pub message: String,
}

/// Unchecked shape of a deserialized reply
#[derive(Deserialize)]
struct ReplyFields {
    code: ResponseCode,
    message: String,
}

impl TryFrom<ReplyFields> for Reply {
    type Error = ArielFwError;

    fn try_from(fields: ReplyFields) -> Result<Self, Self::Error> {
        check_single_line(&fields.message)?;
        Ok(Self {
            code: fields.code,
            message: fields.message,
        })
    }
}

impl Reply {
    pub fn new(code: ResponseCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: single_line(message.into()),
        }
    }

    /// Continuation reply (100)
    pub fn operational(message: impl Into<String>) -> Self {
        Self::new(ResponseCode::FirewallStatusOperational, message)
    }

    /// Terminal success (200)
    pub fn okay(message: impl Into<String>) -> Self {
        Self::new(ResponseCode::CommandOkay, message)
    }

    /// Terminal generic failure (400)
    pub fn failed(message: impl Into<String>) -> Self {
        Self::new(ResponseCode::OperationFailed, message)
    }

    /// Failure classified from a captured errno.
    ///
    /// With `append_detail` the strerror text is appended in parentheses.
    /// Nothing is appended when errno was unset.
    pub fn from_last_error(
        message: impl Into<String>,
        last_error: LastError,
        append_detail: bool,
    ) -> Self {
        let mut message = message.into();
        if append_detail && !last_error.is_unset() {
            message = format!("{} ({})", message, last_error.description());
        }
        Self::new(last_error.response_code(), message)
    }

    pub fn is_terminal(&self) -> bool {
        self.code.is_terminal()
    }

    /// Cut the message to at most `max_len` bytes on a char boundary
    pub fn truncated(mut self, max_len: usize) -> Self {
        if self.message.len() > max_len {
            let mut end = max_len;
            while !self.message.is_char_boundary(end) {
                end -= 1;
            }
            self.message.truncate(end);
        }
        self
    }

    /// Wire line including the trailing newline
    pub fn to_line(&self) -> String {
        format!("{}\n", self)
    }

    /// Parse one wire line. A trailing `\n` or `\r\n` is accepted.
    pub fn parse(line: &str) -> Result<Self, ArielFwError> {
        let line = line
            .strip_suffix('\n')
            .map(|l| l.strip_suffix('\r').unwrap_or(l))
            .unwrap_or(line);

        if line.contains('\n') {
            return Err(ArielFwError::MalformedReply(
                "more than one line".to_string(),
            ));
        }

        let (digits, message) = match line.split_once(' ') {
            Some((digits, message)) => (digits, message),
            None => (line, ""),
        };

        if digits.len() != 3 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ArielFwError::MalformedReply(format!(
                "expected three-digit code, got '{}'",
                digits
            )));
        }

        let value: u16 = digits
            .parse()
            .map_err(|_| ArielFwError::MalformedReply(digits.to_string()))?;
        let code = ResponseCode::try_from(value)?;
        check_single_line(message)?;

        Ok(Self {
            code,
            message: message.to_string(),
        })
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "{}", self.code)
        } else {
            write!(f, "{} {}", self.code, self.message)
        }
    }
}

fn check_single_line(message: &str) -> Result<(), ArielFwError> {
    if message.contains(['\n', '\r']) {
        return Err(ArielFwError::MalformedReply(
            "line break inside message".to_string(),
        ));
    }
    Ok(())
}

fn single_line(message: String) -> String {
    if message.contains(['\n', '\r']) {
        message.replace(['\n', '\r'], " ")
    } else {
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nix::errno::Errno;

    #[test]
    fn test_to_line() {
        assert_eq!(Reply::okay("Firewall started").to_line(), "200 Firewall started\n");
        assert_eq!(Reply::okay("").to_line(), "200\n");
    }

    #[test]
    fn test_newlines_never_split_a_reply() {
        let reply = Reply::failed("line one\nline two\r\n");
        assert_eq!(reply.message, "line one line two  ");
        assert_eq!(reply.to_line().matches('\n').count(), 1);
    }

    #[test]
    fn test_from_last_error_appends_strerror() {
        let reply = Reply::from_last_error(
            "Failed to load rules",
            LastError::from_errno(Errno::EACCES),
            true,
        );
        assert_eq!(reply.code, ResponseCode::PermissionDenied);
        assert_eq!(
            reply.message,
            format!("Failed to load rules ({})", Errno::EACCES.desc())
        );
    }

    #[test]
    fn test_from_last_error_without_detail() {
        let reply = Reply::from_last_error("Failed", LastError::from_errno(Errno::ENOENT), false);
        assert_eq!(reply.to_line(), "402 Failed\n");
    }

    #[test]
    fn test_from_unset_errno_is_generic_failure() {
        let reply = Reply::from_last_error("Failed", LastError::from_raw(0), true);
        assert_eq!(reply.code, ResponseCode::OperationFailed);
        assert_eq!(reply.message, "Failed");
    }

    #[test]
    fn test_parse() {
        let reply = Reply::parse("100 Firewall start requested\n").unwrap();
        assert_eq!(reply.code, ResponseCode::FirewallStatusOperational);
        assert_eq!(reply.message, "Firewall start requested");
        assert!(!reply.is_terminal());

        let reply = Reply::parse("200\r\n").unwrap();
        assert_eq!(reply, Reply::okay(""));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(matches!(
            Reply::parse("20 short"),
            Err(ArielFwError::MalformedReply(_))
        ));
        assert!(matches!(
            Reply::parse("abc hello"),
            Err(ArielFwError::MalformedReply(_))
        ));
        assert!(matches!(
            Reply::parse("200ok"),
            Err(ArielFwError::MalformedReply(_))
        ));
        assert!(matches!(
            Reply::parse("200 a\n200 b"),
            Err(ArielFwError::MalformedReply(_))
        ));
        assert!(matches!(
            Reply::parse("500 Command not recognized"),
            Err(ArielFwError::UnknownCode(500))
        ));
    }

    #[test]
    fn test_parse_rejects_stray_carriage_return() {
        assert!(matches!(
            Reply::parse("200 ok\r"),
            Err(ArielFwError::MalformedReply(_))
        ));
        assert!(matches!(
            Reply::parse("200 rule\radded\n"),
            Err(ArielFwError::MalformedReply(_))
        ));
        assert_eq!(Reply::parse("200 ok\r\n").unwrap().message, "ok");
    }

    #[test]
    fn test_deserialize_checks_message() {
        let reply: Reply = serde_json::from_str(r#"{"code":200,"message":"ok"}"#).unwrap();
        assert_eq!(reply, Reply::okay("ok"));

        assert!(serde_json::from_str::<Reply>(r#"{"code":200,"message":"a\nb"}"#).is_err());
        assert!(serde_json::from_str::<Reply>(r#"{"code":200,"message":"a\r"}"#).is_err());
        assert!(serde_json::from_str::<Reply>(r#"{"code":250,"message":"a"}"#).is_err());
    }

    #[test]
    fn test_parse_inverts_to_line() {
        let reply = Reply::new(ResponseCode::ResourceBusy, "Rule table locked");
        assert_eq!(Reply::parse(&reply.to_line()).unwrap(), reply);
    }

    #[test]
    fn test_truncated_respects_char_boundary() {
        let reply = Reply::okay("héllo").truncated(2);
        assert_eq!(reply.message, "h");

        let reply = Reply::okay("short").truncated(64);
        assert_eq!(reply.message, "short");
    }
}
