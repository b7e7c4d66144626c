//! Heuristic recovery of printable text runs from undecoded binary payloads.
//!
//! This knows nothing about the structure of the file it scans. It keeps
//! long runs of printable ASCII and discards short ones as record headers,
//! offsets and other binary noise.

use crate::error::{Error, Result};
use crate::format::Format;

/// Accept/reject thresholds for one binary format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SalvagePolicy {
    /// A run is kept only if it is strictly longer than this.
    pub min_run_length: usize,
    /// Minimum length of the cleaned output; anything shorter is a failure.
    pub min_total_length: usize,
    /// Remediation shown to the user when salvage fails.
    pub hint: &'static str,
}

/// Legacy Word binary documents: looser run threshold.
pub const DOC_LEGACY_POLICY: SalvagePolicy = SalvagePolicy {
    min_run_length: 10,
    min_total_length: 50,
    hint: "Please save the document as .docx format for better compatibility.",
};

/// MOBI/AZW e-reader binaries: stricter run threshold.
pub const MOBI_POLICY: SalvagePolicy = SalvagePolicy {
    min_run_length: 20,
    min_total_length: 100,
    hint: "Try converting to EPUB first using Calibre or a similar tool.",
};

fn is_run_byte(byte: u8) -> bool {
    matches!(byte, 0x20..=0x7E | b'\t' | b'\r' | b'\n')
}

/// Scan `bytes` and return the concatenation of every printable run longer
/// than `min_run_length`, collapsed to single spaces.
pub fn salvage(bytes: &[u8], min_run_length: usize) -> String {
    let mut output = String::new();
    let mut run_start = None;

    let flush = |start: usize, end: usize, output: &mut String| {
        if end - start > min_run_length {
            // Run bytes are ASCII by construction
            output.extend(bytes[start..end].iter().map(|&b| b as char));
            output.push(' ');
        }
    };

    for (i, &byte) in bytes.iter().enumerate() {
        match (is_run_byte(byte), run_start) {
            (true, None) => run_start = Some(i),
            (false, Some(start)) => {
                flush(start, i, &mut output);
                run_start = None;
            }
            _ => {}
        }
    }
    if let Some(start) = run_start {
        flush(start, bytes.len(), &mut output);
    }

    // Whitespace collapse leaves only the printable-ASCII set behind
    output
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .filter(|c| matches!(c, ' '..='~' | '\n'))
        .collect()
}

/// Salvage text under `policy`, failing when the result is too short to be
/// presented as a real document.
pub fn salvage_with_policy(bytes: &[u8], format: Format, policy: SalvagePolicy) -> Result<String> {
    let text = salvage(bytes, policy.min_run_length);
    if text.len() < policy.min_total_length {
        log::warn!(
            "salvage of {} bytes produced {} chars (< {}), rejecting",
            bytes.len(),
            text.len(),
            policy.min_total_length
        );
        return Err(Error::UnrecoverableBinaryFormat {
            format,
            hint: policy.hint,
        });
    }
    log::debug!("salvaged {} chars from {} bytes", text.len(), bytes.len());
    Ok(text)
}
