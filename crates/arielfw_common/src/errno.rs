//! OS error classification.
//!
//! Translates the thread-local errno into the failure family of
//! `ResponseCode`. The mapping is total: anything not listed in
//! `ERRNO_CLASSES`, including errno 0, becomes `OperationFailed`.
//!
//! errno is overwritten by the next failing call on the same thread, so it is
//! read exactly once through `LastError::capture()` right after the failing
//! operation. Everything downstream works on the captured value.

use crate::response_code::ResponseCode;
use nix::errno::Errno;
use serde::{Deserialize, Serialize};
use std::fmt;

/// errno values grouped by the failure code they map to.
/// An errno appears in at most one group.
pub const ERRNO_CLASSES: &[(ResponseCode, &[Errno])] = &[
    (ResponseCode::PermissionDenied, &[Errno::EPERM, Errno::EACCES]),
    (
        ResponseCode::NotFound,
        &[Errno::ENOENT, Errno::ESRCH, Errno::ENODEV, Errno::ENXIO],
    ),
    (
        ResponseCode::InvalidArgument,
        &[
            Errno::EINVAL,
            Errno::E2BIG,
            Errno::ERANGE,
            Errno::EDOM,
            Errno::EBADF,
        ],
    ),
    (ResponseCode::AlreadyExists, &[Errno::EEXIST]),
    (
        ResponseCode::ResourceBusy,
        &[Errno::EBUSY, Errno::EAGAIN, Errno::EINTR, Errno::ETIMEDOUT],
    ),
    (
        ResponseCode::ResourceExhausted,
        &[
            Errno::ENOMEM,
            Errno::ENOSPC,
            Errno::ENOBUFS,
            Errno::EMFILE,
            Errno::ENFILE,
        ],
    ),
    (
        ResponseCode::NotSupported,
        &[
            Errno::ENOSYS,
            Errno::EOPNOTSUPP,
            Errno::EPROTONOSUPPORT,
            Errno::EAFNOSUPPORT,
        ],
    ),
    (ResponseCode::IoError, &[Errno::EIO]),
    (
        ResponseCode::NetworkUnreachable,
        &[
            Errno::ENETDOWN,
            Errno::ENETUNREACH,
            Errno::EHOSTUNREACH,
            Errno::ECONNREFUSED,
            Errno::ENOTCONN,
        ],
    ),
];

impl ResponseCode {
    /// Failure code for an errno value. Pure and total.
    pub fn from_errno(errno: Errno) -> ResponseCode {
        ERRNO_CLASSES
            .iter()
            .find(|(_, members)| members.contains(&errno))
            .map(|(code, _)| *code)
            .unwrap_or(ResponseCode::OperationFailed)
    }

    /// Same as `from_errno` for a raw integer, which may be 0 or unknown
    pub fn from_raw_errno(raw: i32) -> ResponseCode {
        ResponseCode::from_errno(Errno::from_raw(raw))
    }

    /// Classify the calling thread's current errno.
    ///
    /// Call this directly after the failing operation, before anything else
    /// that could touch errno.
    pub fn convert_from_errno() -> ResponseCode {
        LastError::capture().response_code()
    }

    /// errno values that map to this code (empty for non-failure codes and
    /// for the `OperationFailed` default)
    pub fn mapped_errnos(self) -> &'static [Errno] {
        ERRNO_CLASSES
            .iter()
            .find(|(code, _)| *code == self)
            .map(|(_, members)| *members)
            .unwrap_or(&[])
    }
}

/// Free-function form of `ResponseCode::convert_from_errno`
pub fn convert_from_errno() -> ResponseCode {
    ResponseCode::convert_from_errno()
}

/// errno captured once at the point of failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastError {
    raw: i32,
}

impl LastError {
    /// Read the thread-local errno. This is the only place errno is read.
    pub fn capture() -> Self {
        Self {
            raw: Errno::last_raw(),
        }
    }

    pub fn from_raw(raw: i32) -> Self {
        Self { raw }
    }

    pub fn from_errno(errno: Errno) -> Self {
        Self { raw: errno as i32 }
    }

    /// From an I/O error carrying an OS error number; other I/O errors are unset
    pub fn from_io(err: &std::io::Error) -> Self {
        Self {
            raw: err.raw_os_error().unwrap_or(0),
        }
    }

    pub fn raw(&self) -> i32 {
        self.raw
    }

    pub fn errno(&self) -> Errno {
        Errno::from_raw(self.raw)
    }

    /// True when no error was recorded (errno 0)
    pub fn is_unset(&self) -> bool {
        self.raw == 0
    }

    pub fn response_code(&self) -> ResponseCode {
        ResponseCode::from_raw_errno(self.raw)
    }

    /// strerror-style text
    pub fn description(&self) -> &'static str {
        self.errno().desc()
    }
}

impl fmt::Display for LastError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} ({}): {}", self.errno(), self.raw, self.description())
    }
}

/// Highest errno value scanned when resolving names
const MAX_ERRNO: i32 = 4095;

/// Alternative spellings that share a value with another errno
const ERRNO_ALIASES: &[(&str, Errno)] = &[
    ("EWOULDBLOCK", Errno::EAGAIN),
    ("ENOTSUP", Errno::EOPNOTSUPP),
];

/// Parse an errno given as a number (`13`) or a name (`EACCES`, any case).
/// Any errno the platform defines is accepted by name, mapped or not.
pub fn parse_errno(value: &str) -> Option<Errno> {
    let value = value.trim();
    if let Ok(raw) = value.parse::<i32>() {
        return Some(Errno::from_raw(raw));
    }

    let wanted = value.to_ascii_uppercase();
    (1..=MAX_ERRNO)
        .map(Errno::from_raw)
        .filter(|errno| *errno != Errno::UnknownErrno)
        .find(|errno| format!("{:?}", errno) == wanted)
        .or_else(|| {
            ERRNO_ALIASES
                .iter()
                .find(|(name, _)| *name == wanted)
                .map(|(_, errno)| *errno)
        })
}
