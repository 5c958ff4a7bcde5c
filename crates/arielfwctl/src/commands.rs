//! Command implementations for arielfwctl
//!
//! Each command renders its output to a String; main prints it.

use anyhow::{anyhow, Context, Result};
use arielfw_common::{
    parse_errno, ArielFwConfig, CommandReplies, LastError, Reply, ResponseCode,
};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Serialize)]
struct CodeRow {
    code: u16,
    name: &'static str,
    family: &'static str,
    terminal: bool,
    description: &'static str,
    errnos: Vec<String>,
}

fn code_row(code: ResponseCode) -> CodeRow {
    let mut errnos: Vec<String> = code
        .mapped_errnos()
        .iter()
        .map(|e| format!("{:?}", e))
        .collect();
    if code == ResponseCode::OperationFailed {
        errnos.push("(default)".to_string());
    }

    CodeRow {
        code: code.as_u16(),
        name: code.name(),
        family: code.family().as_str(),
        terminal: code.is_terminal(),
        description: code.description(),
        errnos,
    }
}

/// `arielfwctl codes`
pub fn codes(json: bool) -> Result<String> {
    let rows: Vec<CodeRow> = ResponseCode::ALL.iter().copied().map(code_row).collect();

    if json {
        return Ok(serde_json::to_string_pretty(&rows)?);
    }

    let mut out = String::new();
    for row in &rows {
        out.push_str(&format!(
            "{}  {:<26} {:<12} {}\n",
            row.code, row.name, row.family, row.description
        ));
        if !row.errnos.is_empty() {
            out.push_str(&format!("     errno: {}\n", row.errnos.join(", ")));
        }
    }
    Ok(out)
}

#[derive(Debug, Serialize)]
struct ErrnoReport {
    errno: i32,
    name: String,
    description: &'static str,
    code: ResponseCode,
    code_name: &'static str,
}

/// `arielfwctl errno <VALUE>`
pub fn errno(value: &str, json: bool) -> Result<String> {
    let errno = parse_errno(value).ok_or_else(|| anyhow!("Unknown errno '{}'", value))?;
    let last = LastError::from_errno(errno);
    let code = last.response_code();
    debug!(errno = %last, code = %code, "Classified errno");

    let report = ErrnoReport {
        errno: last.raw(),
        name: format!("{:?}", errno),
        description: last.description(),
        code,
        code_name: code.name(),
    };

    if json {
        return Ok(serde_json::to_string_pretty(&report)?);
    }

    Ok(format!(
        "{} ({}): {}\n-> {} {}\n",
        report.name, report.errno, report.description, report.code, report.code_name
    ))
}

/// `arielfwctl frame <CODE> [MESSAGE...]`
pub fn frame(code: u16, message: &[String], config: &ArielFwConfig, json: bool) -> Result<String> {
    let code = ResponseCode::try_from(code)?;
    let reply = Reply::new(code, message.join(" "))
        .truncated(config.replies.effective_max_message_len());

    if json {
        return Ok(serde_json::to_string_pretty(&reply)?);
    }
    Ok(reply.to_line())
}

/// `arielfwctl parse <LINE>`
pub fn parse(line: &str, json: bool) -> Result<String> {
    let reply = Reply::parse(line).with_context(|| format!("Cannot parse '{}'", line.trim_end()))?;

    if json {
        return Ok(serde_json::to_string_pretty(&reply)?);
    }

    Ok(format!(
        "code:     {}\nname:     {}\nfamily:   {}\nterminal: {}\nmessage:  {}\n",
        reply.code,
        reply.code.name(),
        reply.code.family(),
        if reply.is_terminal() { "yes" } else { "no" },
        reply.message
    ))
}

/// `arielfwctl simulate`
pub fn simulate(
    steps: usize,
    fail_errno: Option<&str>,
    config: &ArielFwConfig,
    json: bool,
) -> Result<String> {
    let failure = fail_errno
        .map(|value| parse_errno(value).ok_or_else(|| anyhow!("Unknown errno '{}'", value)))
        .transpose()?;

    let mut replies = CommandReplies::with_config("firewall enable", &config.replies);
    for step in 1..=steps {
        replies.operational(format!("Firewall operation in progress ({}/{})", step, steps))?;
    }

    match failure {
        Some(errno) => {
            replies.failed_from(LastError::from_errno(errno), "Firewall operation failed")?;
        }
        None => {
            replies.okay("Firewall operation complete")?;
        }
    }

    if json {
        return Ok(serde_json::to_string_pretty(replies.replies())?);
    }
    Ok(replies.wire())
}
