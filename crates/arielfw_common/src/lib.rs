//! arielfw common - response protocol shared by the arielfw daemon and its clients.
//!
//! Every command sent over the control socket is answered with one or more
//! reply lines of the form `<code> <message>`. This crate defines the closed
//! set of codes, the errno classifier, reply framing and the per-command
//! reply sequence.

pub mod config;
pub mod errno;
pub mod error;
pub mod logging;
pub mod reply;
pub mod response_code;
pub mod sequence;

pub use config::{ArielFwConfig, LogConfig, ReplyConfig};
pub use errno::{convert_from_errno, parse_errno, LastError, ERRNO_CLASSES};
pub use error::ArielFwError;
pub use reply::Reply;
pub use response_code::{CodeFamily, ResponseCode};
pub use sequence::{CommandReplies, ReplyState};

pub use nix::errno::Errno;
