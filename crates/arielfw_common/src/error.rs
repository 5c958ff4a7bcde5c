//! Error types for arielfw.

use crate::errno::LastError;
use crate::response_code::ResponseCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArielFwError {
    #[error("Unknown response code: {0}")]
    UnknownCode(u16),

    #[error("Malformed reply line: {0}")]
    MalformedReply(String),

    #[error("Command '{command}' already finished with {code}")]
    CommandFinished { command: String, code: ResponseCode },

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ArielFwError {
    /// Code a command processor should report when this error ends a command
    pub fn response_code(&self) -> ResponseCode {
        match self {
            ArielFwError::UnknownCode(_) => ResponseCode::InvalidArgument,
            ArielFwError::MalformedReply(_) => ResponseCode::InvalidArgument,
            ArielFwError::CommandFinished { .. } => ResponseCode::OperationFailed,
            ArielFwError::Config(_) => ResponseCode::OperationFailed,
            ArielFwError::Io(e) => LastError::from_io(e).response_code(),
        }
    }
}

impl From<toml::de::Error> for ArielFwError {
    fn from(e: toml::de::Error) -> Self {
        ArielFwError::Config(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_uses_errno_table() {
        let err = ArielFwError::from(std::io::Error::from_raw_os_error(libc::EACCES));
        assert_eq!(err.response_code(), ResponseCode::PermissionDenied);

        let err = ArielFwError::from(std::io::Error::new(std::io::ErrorKind::Other, "boom"));
        assert_eq!(err.response_code(), ResponseCode::OperationFailed);
    }

    #[test]
    fn test_error_codes_are_failures() {
        let errors = [
            ArielFwError::UnknownCode(999),
            ArielFwError::MalformedReply("x".to_string()),
            ArielFwError::CommandFinished {
                command: "rule add".to_string(),
                code: ResponseCode::CommandOkay,
            },
            ArielFwError::Config("bad".to_string()),
        ];
        for err in &errors {
            assert!(err.response_code().is_failure(), "{}", err);
        }
    }

    #[test]
    fn test_command_finished_message() {
        let err = ArielFwError::CommandFinished {
            command: "rule add".to_string(),
            code: ResponseCode::CommandOkay,
        };
        assert_eq!(err.to_string(), "Command 'rule add' already finished with 200");
    }
}
