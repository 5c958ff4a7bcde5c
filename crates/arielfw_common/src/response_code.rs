//! Response codes for the arielfw control protocol.
//!
//! Every reply line the daemon writes starts with one of these three-digit
//! codes. The set is closed: nothing outside `ResponseCode::ALL` is ever
//! emitted, and nothing outside it is accepted when parsing.
//!
//! Families:
//!   - 1xx  continuation, more replies follow for the same command
//!   - 2xx  terminal success
//!   - 4xx  terminal failure

use crate::error::ArielFwError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Hundred-series family of a response code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeFamily {
    Continuation,
    Success,
    Failure,
}

impl CodeFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            CodeFamily::Continuation => "continuation",
            CodeFamily::Success => "success",
            CodeFamily::Failure => "failure",
        }
    }
}

impl fmt::Display for CodeFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status code attached to every reply sent to a control client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
#[repr(u16)]
pub enum ResponseCode {
    /// Multi-step firewall operation started; expect another reply before
    /// the command is complete.
    FirewallStatusOperational = 100,

    CommandOkay = 200,

    /// Generic failure, and the default for unclassified OS errors.
    OperationFailed = 400,
    PermissionDenied = 401,
    NotFound = 402,
    InvalidArgument = 403,
    AlreadyExists = 404,
    ResourceBusy = 405,
    ResourceExhausted = 406,
    NotSupported = 407,
    IoError = 408,
    NetworkUnreachable = 409,
}

impl ResponseCode {
    /// Every code the protocol defines, in wire order
    pub const ALL: [ResponseCode; 12] = [
        ResponseCode::FirewallStatusOperational,
        ResponseCode::CommandOkay,
        ResponseCode::OperationFailed,
        ResponseCode::PermissionDenied,
        ResponseCode::NotFound,
        ResponseCode::InvalidArgument,
        ResponseCode::AlreadyExists,
        ResponseCode::ResourceBusy,
        ResponseCode::ResourceExhausted,
        ResponseCode::NotSupported,
        ResponseCode::IoError,
        ResponseCode::NetworkUnreachable,
    ];

    /// Wire-level integer
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    pub fn family(self) -> CodeFamily {
        match self {
            ResponseCode::FirewallStatusOperational => CodeFamily::Continuation,
            ResponseCode::CommandOkay => CodeFamily::Success,
            ResponseCode::OperationFailed
            | ResponseCode::PermissionDenied
            | ResponseCode::NotFound
            | ResponseCode::InvalidArgument
            | ResponseCode::AlreadyExists
            | ResponseCode::ResourceBusy
            | ResponseCode::ResourceExhausted
            | ResponseCode::NotSupported
            | ResponseCode::IoError
            | ResponseCode::NetworkUnreachable => CodeFamily::Failure,
        }
    }

    /// True when no further replies follow for the command
    pub fn is_terminal(self) -> bool {
        self.family() != CodeFamily::Continuation
    }

    pub fn is_failure(self) -> bool {
        self.family() == CodeFamily::Failure
    }

    /// Symbolic name, as used in logs and `arielfwctl codes`
    pub fn name(self) -> &'static str {
        match self {
            ResponseCode::FirewallStatusOperational => "FirewallStatusOperational",
            ResponseCode::CommandOkay => "CommandOkay",
            ResponseCode::OperationFailed => "OperationFailed",
            ResponseCode::PermissionDenied => "PermissionDenied",
            ResponseCode::NotFound => "NotFound",
            ResponseCode::InvalidArgument => "InvalidArgument",
            ResponseCode::AlreadyExists => "AlreadyExists",
            ResponseCode::ResourceBusy => "ResourceBusy",
            ResponseCode::ResourceExhausted => "ResourceExhausted",
            ResponseCode::NotSupported => "NotSupported",
            ResponseCode::IoError => "IoError",
            ResponseCode::NetworkUnreachable => "NetworkUnreachable",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ResponseCode::FirewallStatusOperational => {
                "firewall operation initiated, further replies follow"
            }
            ResponseCode::CommandOkay => "command completed",
            ResponseCode::OperationFailed => "operation failed",
            ResponseCode::PermissionDenied => "operation not permitted",
            ResponseCode::NotFound => "target does not exist",
            ResponseCode::InvalidArgument => "invalid argument",
            ResponseCode::AlreadyExists => "target already exists",
            ResponseCode::ResourceBusy => "resource busy or temporarily unavailable",
            ResponseCode::ResourceExhausted => "out of memory, buffers or descriptors",
            ResponseCode::NotSupported => "operation not supported",
            ResponseCode::IoError => "input/output error",
            ResponseCode::NetworkUnreachable => "network unreachable or not connected",
        }
    }
}

impl From<ResponseCode> for u16 {
    fn from(code: ResponseCode) -> u16 {
        code.as_u16()
    }
}

impl TryFrom<u16> for ResponseCode {
    type Error = ArielFwError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        ResponseCode::ALL
            .iter()
            .copied()
            .find(|code| code.as_u16() == value)
            .ok_or(ArielFwError::UnknownCode(value))
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u16())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_constants_are_stable() {
        assert_eq!(u16::from(ResponseCode::FirewallStatusOperational), 100);
        assert_eq!(u16::from(ResponseCode::CommandOkay), 200);
        assert_eq!(u16::from(ResponseCode::OperationFailed), 400);
    }

    #[test]
    fn test_family_matches_hundred_series() {
        for code in ResponseCode::ALL {
            let expected = match code.as_u16() / 100 {
                1 => CodeFamily::Continuation,
                2 => CodeFamily::Success,
                4 => CodeFamily::Failure,
                other => panic!("code {} in unexpected series {}xx", code, other),
            };
            assert_eq!(code.family(), expected, "{}", code.name());
        }
    }

    #[test]
    fn test_only_continuation_is_non_terminal() {
        assert!(!ResponseCode::FirewallStatusOperational.is_terminal());
        assert!(ResponseCode::CommandOkay.is_terminal());
        assert!(ResponseCode::OperationFailed.is_terminal());
        assert!(!ResponseCode::CommandOkay.is_failure());
    }

    #[test]
    fn test_try_from_rejects_unknown() {
        assert_eq!(ResponseCode::try_from(200).unwrap(), ResponseCode::CommandOkay);
        assert!(matches!(
            ResponseCode::try_from(500),
            Err(ArielFwError::UnknownCode(500))
        ));
        assert!(ResponseCode::try_from(0).is_err());
        assert!(ResponseCode::try_from(410).is_err());
    }

    #[test]
    fn test_wire_values_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for code in ResponseCode::ALL {
            assert!(seen.insert(code.as_u16()), "duplicate {}", code);
        }
    }

    #[test]
    fn test_serde_uses_integer() {
        let json = serde_json::to_string(&ResponseCode::PermissionDenied).unwrap();
        assert_eq!(json, "401");

        let code: ResponseCode = serde_json::from_str("100").unwrap();
        assert_eq!(code, ResponseCode::FirewallStatusOperational);

        assert!(serde_json::from_str::<ResponseCode>("299").is_err());
    }

    #[test]
    fn test_display_is_wire_integer() {
        assert_eq!(ResponseCode::NotFound.to_string(), "402");
        assert_eq!(CodeFamily::Failure.to_string(), "failure");
    }
}
