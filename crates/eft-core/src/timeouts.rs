//! Per-operation deadlines
//!
//! The session bounds each HTTP call at 60 seconds; resources additionally
//! bound each logical operation (which may span a re-authentication and a
//! retried call). Dropping the wrapped future aborts whatever request is in
//! flight.

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

use crate::error::{Error, Result};

/// Deadline applied when the plan does not set one
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// Resource operation kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Operation::Create => "create",
            Operation::Read => "read",
            Operation::Update => "update",
            Operation::Delete => "delete",
        })
    }
}

/// Optional per-operation deadlines, as written in a plan
///
/// Values are duration strings such as `90s`, `10m` or `1h30m`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeouts {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete: Option<String>,
}

impl Timeouts {
    /// Deadline for `op`, or `default` when unset
    pub fn get(&self, op: Operation, default: Duration) -> Result<Duration> {
        let raw = match op {
            Operation::Create => &self.create,
            Operation::Read => &self.read,
            Operation::Update => &self.update,
            Operation::Delete => &self.delete,
        };
        match raw {
            Some(raw) => parse_duration(raw),
            None => Ok(default),
        }
    }

    /// Run `fut` under the deadline for `op`
    ///
    /// # Errors
    ///
    /// [`Error::Timeout`] when the deadline passes first; otherwise whatever
    /// `fut` returns.
    pub async fn run<T, F>(&self, op: Operation, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let limit = self.get(op, DEFAULT_OPERATION_TIMEOUT)?;
        tokio::time::timeout(limit, fut)
            .await
            .map_err(|_| Error::timeout(format!("{} did not finish within {:?}", op, limit)))?
    }
}

/// Parse a sequence of `<number><unit>` pairs such as `90s`, `1h30m` or `1.5h`
///
/// Units: `ns`, `us` (or `µs`), `ms`, `s`, `m`, `h`. Numbers may be
/// fractional; signs are not accepted.
pub fn parse_duration(raw: &str) -> Result<Duration> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(Error::validation("duration must not be empty"));
    }

    let is_number = |c: char| c.is_ascii_digit() || c == '.';
    let mut total = Duration::ZERO;
    let mut rest = raw;

    while !rest.is_empty() {
        let split = rest
            .find(|c: char| !is_number(c))
            .ok_or_else(|| Error::validation(format!("duration {:?} is missing a unit", raw)))?;
        let (number, tail) = rest.split_at(split);
        let (unit, next) = tail.split_at(tail.find(is_number).unwrap_or(tail.len()));

        let amount: f64 = number
            .parse()
            .map_err(|_| Error::validation(format!("invalid duration {:?}", raw)))?;

        let scale = match unit {
            "ns" => 1e-9,
            "us" | "µs" => 1e-6,
            "ms" => 1e-3,
            "s" => 1.0,
            "m" => 60.0,
            "h" => 3600.0,
            _ => {
                return Err(Error::validation(format!(
                    "invalid duration unit {:?} in {:?}",
                    unit, raw
                )));
            }
        };

        let out_of_range = || Error::validation(format!("duration {:?} is out of range", raw));
        let part = Duration::try_from_secs_f64(amount * scale).map_err(|_| out_of_range())?;
        total = total.checked_add(part).ok_or_else(out_of_range)?;
        rest = next;
    }

    Ok(total)
}
