//! CSV reader construction, delimiter resolution and field decoding.
//!
//! All source files flow through this module. Delimiters default from the
//! file extension (`.tsv` → tab, anything else → comma) unless overridden,
//! and raw field bytes are decoded with `encoding_rs`, defaulting to UTF-8.

use std::{
    fs::File,
    io::{BufReader, Read},
    path::Path,
};

use encoding_rs::{Encoding, UTF_8};

use crate::error::{LoadError, Result};

pub const DEFAULT_CSV_DELIMITER: u8 = b',';
pub const DEFAULT_TSV_DELIMITER: u8 = b'\t';

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    if let Some(value) = label {
        Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| LoadError::UnknownEncoding(value.to_string()))
    } else {
        Ok(UTF_8)
    }
}

pub fn resolve_input_delimiter(path: &Path, provided: Option<u8>) -> u8 {
    provided.unwrap_or_else(|| match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => DEFAULT_TSV_DELIMITER,
        _ => DEFAULT_CSV_DELIMITER,
    })
}

/// Header-first reader that rejects rows whose field count differs from the header.
pub fn open_csv_reader<R>(reader: R, delimiter: u8) -> csv::Reader<R>
where
    R: Read,
{
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(true)
        .delimiter(delimiter)
        .double_quote(true)
        .flexible(false);
    builder.from_reader(reader)
}

pub fn open_csv_reader_from_path(path: &Path, delimiter: u8) -> Result<csv::Reader<BufReader<File>>> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(open_csv_reader(BufReader::new(file), delimiter))
}

pub fn decode_bytes(bytes: &[u8], encoding: &'static Encoding) -> Option<String> {
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        None
    } else {
        Some(text.into_owned())
    }
}

/// Decodes every field of `record`, or `None` if any field is malformed.
pub fn decode_record(record: &csv::ByteRecord, encoding: &'static Encoding) -> Option<Vec<String>> {
    record
        .iter()
        .map(|field| decode_bytes(field, encoding))
        .collect()
}

/// Reads and decodes the header row of `reader`, which was opened on `path`.
pub fn reader_headers<R>(
    reader: &mut csv::Reader<R>,
    path: &Path,
    encoding: &'static Encoding,
) -> Result<Vec<String>>
where
    R: Read,
{
    let headers = reader
        .byte_headers()
        .map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            line: 1,
            source,
        })?
        .clone();
    decode_record(&headers, encoding).ok_or_else(|| LoadError::Decode {
        path: path.to_path_buf(),
        line: 1,
        encoding: encoding.name(),
    })
}
