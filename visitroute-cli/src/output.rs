//! JSON output for CLI commands.

use std::io::Write;

use serde_json::Value;

use crate::CliError;

/// Write `payload` as pretty-printed JSON followed by a newline.
pub(crate) fn write_json(writer: &mut dyn Write, payload: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(payload).map_err(CliError::SerializeOutput)?;
    writer
        .write_all(rendered.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}
