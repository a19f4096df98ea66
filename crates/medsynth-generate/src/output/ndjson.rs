use std::io::Write;

use serde::Serialize;

use crate::errors::GenerationError;

use super::csv::CountingWriter;

/// Write one compact JSON object per line, each terminated by `\n`.
pub fn write_ndjson<W: Write, T: Serialize>(
    writer: W,
    records: &[T],
) -> Result<u64, GenerationError> {
    let mut writer = CountingWriter::new(writer);
    for record in records {
        serde_json::to_writer(&mut writer, record)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(writer.bytes_written())
}
