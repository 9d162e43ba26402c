use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("unknown scale kind `{0}`")]
    UnknownScaleKind(String),

    #[error("dataset {dataset_index} references unregistered axis id `{axis_id}`")]
    MissingScale {
        axis_id: String,
        dataset_index: usize,
    },
}
