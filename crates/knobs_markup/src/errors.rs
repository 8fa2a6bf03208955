use knobs_core::PanelError;

#[derive(Debug, thiserror::Error)]
pub enum MarkupError {
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("No <highcharts-controls> element found")]
    MissingRoot,

    #[error("Unknown control type '{0}'")]
    UnknownControlType(String),

    #[error(transparent)]
    Panel(#[from] PanelError),
}

pub type MarkupResult<T> = Result<T, MarkupError>;
