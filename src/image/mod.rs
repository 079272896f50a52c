//! Image generation hand-off between the orchestrator and the worker process.
//!
//! The two sides share only the `ImageJob` channel and the filesystem:
//!
//! ```text
//! orchestrator                       worker process
//!   submit("a cat") ── "a cat;True" ──▶ poll, sees ready
//!                                      generate images
//!   GUI ◀── GeneratedImages listing ── write listing
//!   handle resolves ◀─ "a cat;False" ─ reset (prompt kept)
//! ```
//!
//! Only one job is in flight system-wide; a second submit before completion
//! overwrites the first prompt.

pub mod coordinator;
pub mod huggingface;
pub mod worker;

use std::fmt;
use std::path::{Path, PathBuf};

/// Delimiters accepted when decoding a job.
const JOB_DELIMITERS: [char; 4] = [';', ',', ':', '\n'];

/// The prompt/ready pair stored on the image-job channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageJob {
    pub prompt: String,
    pub ready: bool,
}

impl ImageJob {
    /// A job waiting for the worker.
    pub fn pending(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ready: true,
        }
    }

    /// The same prompt, marked as handled.
    pub fn completed(&self) -> Self {
        Self {
            prompt: self.prompt.clone(),
            ready: false,
        }
    }

    /// Encode as `"<prompt>;<True|False>"`.
    pub fn encode(&self) -> String {
        format!(
            "{};{}",
            self.prompt,
            if self.ready { "True" } else { "False" }
        )
    }

    /// Decode a channel value.
    ///
    /// Any of `;`, `,`, `:` or newline separates the prompt from the ready
    /// flag. The split happens at the last delimiter, not the first, because
    /// the flag never contains one while a prompt may: `"a cat, wearing a
    /// hat;True"` keeps its comma. Returns `None` when no delimiter is
    /// present.
    pub fn decode(raw: &str) -> Option<Self> {
        let data = raw.trim();
        let idx = data.rfind(JOB_DELIMITERS)?;
        let prompt = data[..idx].trim();
        let status = data[idx + 1..].trim();
        Some(Self {
            prompt: prompt.to_owned(),
            ready: status.eq_ignore_ascii_case("true"),
        })
    }
}

impl fmt::Display for ImageJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

/// Turn a prompt into a file-name stem.
///
/// Alphanumerics, spaces, `_` and `-` are kept, everything else becomes `_`;
/// the result is trimmed and spaces become `_`.
pub fn sanitize_filename(prompt: &str) -> String {
    prompt
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, ' ' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect::<String>()
        .trim()
        .replace(' ', "_")
}

/// Render the generated-images listing: the prompt on the first (reserved)
/// line, then one path per line.
pub fn encode_listing(prompt: &str, paths: &[PathBuf]) -> String {
    let mut out = prompt.replace('\n', " ");
    for path in paths {
        out.push('\n');
        out.push_str(&path.to_string_lossy());
    }
    out
}

/// Parse a generated-images listing, ignoring the reserved first line and
/// blank lines.
pub fn decode_listing(raw: &str) -> Vec<PathBuf> {
    raw.lines()
        .skip(1)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(PathBuf::from)
        .collect()
}

/// Output path of the `index`-th (1-based) image for a prompt.
pub fn image_path(dir: &Path, prompt: &str, index: u32) -> PathBuf {
    dir.join(format!("{}{index}.png", sanitize_filename(prompt)))
}
