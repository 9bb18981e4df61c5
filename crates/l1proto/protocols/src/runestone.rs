//! Parsing logic for rune payloads.
//!
//! A runestone lives in an output script of the form:
//!
//! ```text
//! OP_RETURN OP_PUSHNUM_13 <push>*
//! ```
//!
//! The pushes are concatenated and the result is read as a sequence of
//! [varints](crate::varint). Giving meaning to those integers is left to
//! callers.

use ordpool_envelope_fmt::read_envelope_push;
use tracing::*;

use crate::error::{RuneError, RuneResult};
use crate::varint;

/// `OP_RETURN`.
pub const OP_RETURN: u8 = 0x6a;

/// `OP_PUSHNUM_13`, identifying a runestone.
pub const RUNE_MAGIC: u8 = 0x5d;

/// Extracts the concatenated push payload of a runestone script.
pub fn runestone_payload(script: &[u8]) -> RuneResult<Vec<u8>> {
    match script {
        [OP_RETURN, RUNE_MAGIC, ..] => {}
        [OP_RETURN, ..] => return Err(RuneError::MissingMagic),
        _ => return Err(RuneError::NotOpReturn),
    }

    let mut payload = Vec::new();
    let mut at = 2;

    while at < script.len() {
        let (data, next) = read_envelope_push(script, at, false)?;
        payload.extend_from_slice(&data);
        at = next;
    }

    Ok(payload)
}

/// Decodes the integer sequence carried by a runestone script.
pub fn decode_runestone(script: &[u8]) -> RuneResult<Vec<u128>> {
    let payload = runestone_payload(script)?;
    Ok(varint::decode_all(&payload)?)
}

/// Returns whether the script opens like a runestone.
pub fn is_runestone_script(script: &[u8]) -> bool {
    script.starts_with(&[OP_RETURN, RUNE_MAGIC])
}

/// Decodes the first runestone among a transaction's output scripts.
///
/// Returns `None` if no output carries the runestone prefix.
pub fn find_runestone<I, S>(scripts: I) -> Option<RuneResult<Vec<u128>>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<[u8]>,
{
    let (vout, script) = scripts
        .into_iter()
        .enumerate()
        .find(|(_, script)| is_runestone_script(script.as_ref()))?;

    let result = decode_runestone(script.as_ref());
    match &result {
        Ok(integers) => debug!(%vout, count = integers.len(), "decoded runestone"),
        Err(e) => debug!(%vout, %e, "malformed runestone"),
    }

    Some(result)
}
