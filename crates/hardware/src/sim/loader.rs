//! Request Trace Loader.
//!
//! Parses plain-text request traces. One operation per line:
//!
//! ```text
//! # preload the backing store, then read it through the cache
//! p 0x0010 0xDEADBEEF
//! r 0x0010
//! w 0x0010 0xCAFEBABE
//! ```
//!
//! - `r <addr>` reads, `w <addr> <data>` writes, `p <addr> <data>` preloads the
//!   backing store without involving the cache.
//! - Numbers are decimal or `0x`-prefixed hexadecimal; `_` separators are allowed.
//! - Opcodes are case-insensitive. `#` starts a comment; blank lines are skipped.

use std::fs;
use std::path::Path;

use crate::common::error::TraceError;

/// One trace operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TraceOp {
    /// Read through the cache.
    Read {
        /// Word address.
        address: u64,
    },
    /// Write through the cache.
    Write {
        /// Word address.
        address: u64,
        /// Payload.
        data: u64,
    },
    /// Write directly into the backing store.
    Preload {
        /// Word address.
        address: u64,
        /// Payload.
        data: u64,
    },
}

/// Reads and parses a trace file.
///
/// # Errors
///
/// Returns [`TraceError::Io`] if the file cannot be read and
/// [`TraceError::Syntax`] for the first malformed line.
pub fn load_trace(path: impl AsRef<Path>) -> Result<Vec<TraceOp>, TraceError> {
    let text = fs::read_to_string(path)?;
    parse_trace(&text)
}

/// Parses trace text.
///
/// # Errors
///
/// Returns [`TraceError::Syntax`] for the first malformed line.
pub fn parse_trace(text: &str) -> Result<Vec<TraceOp>, TraceError> {
    let mut ops = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let body = raw.split('#').next().unwrap_or("").trim();
        if body.is_empty() {
            continue;
        }
        ops.push(parse_line(body, line)?);
    }
    Ok(ops)
}

fn parse_line(body: &str, line: usize) -> Result<TraceOp, TraceError> {
    let syntax = |message: String| TraceError::Syntax { line, message };
    let fields: Vec<&str> = body.split_whitespace().collect();
    let (op, args) = fields
        .split_first()
        .ok_or_else(|| syntax("empty operation".to_owned()))?;

    let expect_args = |n: usize| {
        if args.len() == n {
            Ok(())
        } else {
            Err(syntax(format!(
                "`{op}` takes {n} operand(s), found {}",
                args.len()
            )))
        }
    };
    let number = |s: &str| parse_number(s).ok_or_else(|| syntax(format!("invalid number `{s}`")));

    match op.to_ascii_lowercase().as_str() {
        "r" | "read" => {
            expect_args(1)?;
            Ok(TraceOp::Read {
                address: number(args[0])?,
            })
        }
        "w" | "write" => {
            expect_args(2)?;
            Ok(TraceOp::Write {
                address: number(args[0])?,
                data: number(args[1])?,
            })
        }
        "p" | "preload" => {
            expect_args(2)?;
            Ok(TraceOp::Preload {
                address: number(args[0])?,
                data: number(args[1])?,
            })
        }
        other => Err(syntax(format!("unknown operation `{other}`"))),
    }
}

/// Parses a decimal or `0x` hexadecimal number.
fn parse_number(s: &str) -> Option<u64> {
    let cleaned = s.replace('_', "");
    match cleaned
        .strip_prefix("0x")
        .or_else(|| cleaned.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => cleaned.parse().ok(),
    }
}
