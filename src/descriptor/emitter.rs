use anyhow::{Context, Result};
use std::io::Write;

use super::Descriptor;

/// First line of every descriptor, making the file directly executable.
pub const HEADER: &str = "#!/usr/bin/env dotslash";

/// Renders the descriptor file: header, blank line, pretty JSON, newline.
pub fn render(descriptor: &Descriptor) -> Result<String> {
    let body = serde_json::to_string_pretty(descriptor)
        .with_context(|| format!("Failed to serialize descriptor {}", descriptor.name))?;
    Ok(format!("{}\n\n{}\n", HEADER, body))
}

/// Writes the rendered descriptor to `out`.
pub fn emit<W: Write>(descriptor: &Descriptor, mut out: W) -> Result<()> {
    let rendered = render(descriptor)?;
    out.write_all(rendered.as_bytes())
        .context("Failed to write descriptor")?;
    out.flush().context("Failed to flush descriptor output")
}
