//! Single-file dataset blobs.
//!
//! # File Format
//!
//! 1. **Magic bytes**: `DSB1` (4 bytes)
//! 2. **Version**: `u32` little-endian (4 bytes), currently 1
//! 3. **Flags**: `u32` little-endian (4 bytes), reserved
//! 4. **Payload**: bincode-encoded inputs array, labels array and class count
//!
//! Paths without the `.dsb` extension get it appended.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use ndarray::ArrayD;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::dataset::Dataset;
use super::error::{DatasetError, Result};

pub const DATASET_MAGIC: [u8; 4] = *b"DSB1";

pub const DATASET_FORMAT_VERSION: u32 = 1;

pub const DATASET_HEADER_SIZE: usize = 12;

pub const DATASET_EXTENSION: &str = "dsb";

#[derive(Serialize)]
struct DatasetPayloadRef<'a> {
    inputs: &'a ArrayD<f32>,
    labels: &'a ArrayD<i64>,
    class_count: usize,
}

#[derive(Deserialize)]
struct DatasetPayload {
    inputs: ArrayD<f32>,
    labels: ArrayD<i64>,
    class_count: usize,
}

/// `path` with the dataset extension appended if it is missing.
pub fn dataset_path<P: AsRef<Path>>(path: P) -> PathBuf {
    let path = path.as_ref();
    if path.extension().and_then(|ext| ext.to_str()) == Some(DATASET_EXTENSION) {
        return path.to_path_buf();
    }

    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(DATASET_EXTENSION);
    PathBuf::from(name)
}

/// Writes inputs, labels and class count, creating or truncating the file.
/// Returns the path actually written.
pub fn save_dataset<P: AsRef<Path>>(dataset: &Dataset, path: P) -> Result<PathBuf> {
    let path = dataset_path(path);
    let mut writer = BufWriter::new(File::create(&path)?);
    write_dataset(dataset, &mut writer)?;
    writer.flush()?;

    info!(path = %path.display(), items = dataset.len(), "saved dataset");
    Ok(path)
}

/// Loaded datasets start in stored order with the default seed.
pub fn load_dataset<P: AsRef<Path>>(path: P) -> Result<Dataset> {
    let path = dataset_path(path);
    let mut reader = BufReader::new(File::open(&path)?);
    let dataset = read_dataset(&mut reader)?;

    info!(path = %path.display(), items = dataset.len(), "loaded dataset");
    Ok(dataset)
}

pub fn write_dataset<W: Write>(dataset: &Dataset, writer: &mut W) -> Result<()> {
    writer.write_all(&DATASET_MAGIC)?;
    writer.write_all(&DATASET_FORMAT_VERSION.to_le_bytes())?;
    writer.write_all(&0u32.to_le_bytes())?;

    let (inputs, labels) = dataset.unpack();
    let payload = DatasetPayloadRef {
        inputs,
        labels,
        class_count: dataset.class_count(),
    };
    bincode::serialize_into(&mut *writer, &payload)?;

    Ok(())
}

pub fn read_dataset<R: Read>(reader: &mut R) -> Result<Dataset> {
    let mut header = [0u8; DATASET_HEADER_SIZE];
    reader.read_exact(&mut header).map_err(|e| match e.kind() {
        io::ErrorKind::UnexpectedEof => {
            DatasetError::InvalidFormat("file too short for header".into())
        }
        _ => DatasetError::IoError(e),
    })?;

    if header[0..4] != DATASET_MAGIC {
        return Err(DatasetError::InvalidFormat(format!(
            "bad magic bytes {:?}",
            &header[0..4]
        )));
    }

    let version = u32::from_le_bytes([header[4], header[5], header[6], header[7]]);
    if version != DATASET_FORMAT_VERSION {
        return Err(DatasetError::InvalidFormat(format!(
            "unsupported version {version}"
        )));
    }

    let payload: DatasetPayload = bincode::deserialize_from(&mut *reader)?;
    Dataset::new(payload.inputs, payload.labels, payload.class_count)
}

pub fn to_bytes(dataset: &Dataset) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    write_dataset(dataset, &mut bytes)?;
    Ok(bytes)
}

pub fn from_bytes(mut bytes: &[u8]) -> Result<Dataset> {
    read_dataset(&mut bytes)
}
