/*!
 * JSON output for stat records
 */

use std::io::Write;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::config::Config;
use crate::error::Result;
use crate::types::StatRecord;

/// Writes the list of records as a JSON array
pub struct JsonWriter {
    /// Single-line output instead of indented output
    compact: bool,
}

impl JsonWriter {
    pub fn new(config: &Config) -> Self {
        Self {
            compact: config.compact,
        }
    }

    pub fn compact(compact: bool) -> Self {
        Self { compact }
    }

    /// Serialize `records` to `out`, followed by a newline
    pub fn write<W: Write>(&self, records: &[StatRecord], mut out: W) -> Result<()> {
        if self.compact {
            serde_json::to_writer(&mut out, records)?;
        } else {
            let formatter = PrettyFormatter::with_indent(b"    ");
            let mut ser = Serializer::with_formatter(&mut out, formatter);
            records.serialize(&mut ser)?;
        }
        writeln!(out)?;
        out.flush()?;
        Ok(())
    }

    /// Serialize `records` into a string
    pub fn to_string(&self, records: &[StatRecord]) -> Result<String> {
        let mut buf = Vec::new();
        self.write(records, &mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}
