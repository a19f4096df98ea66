use std::io::Write;

use bytes::Bytes;
use parquet::arrow::ArrowWriter;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;

use crate::claims::ClaimsTable;
use crate::errors::GenerationError;

/// Write the claims table as a single-row-group Parquet file.
pub fn write_claims_parquet<W: Write + Send>(
    writer: W,
    table: &ClaimsTable,
) -> Result<(), GenerationError> {
    let batch = table.to_record_batch()?;
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();
    let mut writer = ArrowWriter::try_new(writer, table.schema(), Some(props))?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

/// Read a claims table back from Parquet bytes.
pub fn read_claims_parquet(data: Bytes) -> Result<ClaimsTable, GenerationError> {
    let reader = ParquetRecordBatchReaderBuilder::try_new(data)?.build()?;
    let mut claims = Vec::new();
    for batch in reader {
        let batch = batch?;
        claims.extend(ClaimsTable::from_record_batch(&batch)?.into_claims());
    }
    Ok(ClaimsTable::new(claims))
}
