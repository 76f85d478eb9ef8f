//! Error taxonomy shared by the mixer and pixel editor pages.

use thiserror::Error;

/// Failures a page handler can report. None of them are fatal: handlers keep
/// the previous state and surface the message to the user.
#[derive(Debug, Error)]
pub enum Error {
    /// Upload or import could not be read as a raster image.
    #[error("could not decode image: {message}")]
    ImageDecode { message: String },

    /// A color string on the canvas was not `#RRGGBB`.
    #[error("malformed color {value:?}: expected #RRGGBB")]
    Format { value: String },

    /// A canvas drawing document could not be parsed.
    #[error("malformed canvas drawing: {0}")]
    Drawing(#[from] serde_json::Error),

    /// A stage of the mixer pipeline rejected its input.
    #[error("processing failed: {message}")]
    Processing { message: String },
}

impl Error {
    pub(crate) fn decode(err: &anyhow::Error) -> Self {
        Self::ImageDecode {
            message: format!("{err:#}"),
        }
    }

    pub(crate) fn format(value: impl Into<String>) -> Self {
        Self::Format {
            value: value.into(),
        }
    }

    pub(crate) fn processing(message: impl Into<String>) -> Self {
        Self::Processing {
            message: message.into(),
        }
    }

    /// Whether the failure belongs to the format class (bad color or bad drawing JSON).
    pub const fn is_format(&self) -> bool {
        matches!(self, Self::Format { .. } | Self::Drawing(_))
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
