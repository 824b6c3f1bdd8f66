use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("nothing to render: {0}")]
    EmptyInput(&'static str),
    #[error("failed to render plot: {0}")]
    Plot(String),
    #[error("failed to write image: {0}")]
    Io(#[from] std::io::Error),
}

impl<E: std::error::Error + Send + Sync + 'static> From<plotters::drawing::DrawingAreaErrorKind<E>>
    for RenderError
{
    fn from(value: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        RenderError::Plot(format!("{value:?}"))
    }
}

impl From<png::EncodingError> for RenderError {
    fn from(value: png::EncodingError) -> Self {
        RenderError::Plot(format!("PNG encoding failed: {value}"))
    }
}
