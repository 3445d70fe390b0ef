use thiserror::Error;

pub type Result<T> = std::result::Result<T, DatasetError>;

#[derive(Error, Debug)]
pub enum DatasetError {
    // Construction and shape errors
    #[error("Inputs and labels differ in length. Inputs: {inputs}, labels: {labels}")]
    ShapeMismatch { inputs: usize, labels: usize },

    #[error("Item shapes differ. Expected: {expected:?}, found: {found:?}")]
    SampleShapeMismatch {
        expected: Vec<usize>,
        found: Vec<usize>,
    },

    #[error("Cannot join datasets with different class counts. Left: {left}, right: {right}")]
    ClassCountMismatch { left: usize, right: usize },

    #[error("Dataset is empty")]
    EmptyDataset,

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Array error: {0}")]
    Array(#[from] ndarray::ShapeError),

    // Storage errors
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid dataset file: {0}")]
    InvalidFormat(String),
}

impl From<bincode::Error> for DatasetError {
    fn from(err: bincode::Error) -> Self {
        DatasetError::Serialization(err.to_string())
    }
}
