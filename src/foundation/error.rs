use crate::composite::state::RunState;
use std::path::PathBuf;

/// Convenience result type used across the crate.
pub type VersusResult<T> = Result<T, VersusError>;

/// Top-level error taxonomy.
#[derive(thiserror::Error, Debug)]
pub enum VersusError {
    /// A portrait, overlay clip or font could not be located.
    #[error("asset not found: {what} ('{}')", .path.display())]
    AssetNotFound {
        /// Human readable description of the missing resource.
        what: String,
        /// Location that was searched.
        path: PathBuf,
    },

    /// Comparison input is malformed (empty name, negative or non-numeric stat).
    #[error("invalid comparison spec: {0}")]
    InvalidSpec(String),

    /// Container/codec failure reported by the encoder or decoder process.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Invalid configuration or internal contract violation.
    #[error("validation error: {0}")]
    Validation(String),

    /// Rasterization failure.
    #[error("render error: {0}")]
    Render(String),

    /// The run was cancelled through its [`CancelToken`](crate::CancelToken).
    #[error("run cancelled")]
    Cancelled,

    /// Failure of a compositor run, tagged with the stage it happened in.
    #[error("composition failed while {stage}: {source}")]
    Composition {
        /// Run state active when the failure occurred.
        stage: RunState,
        /// Underlying failure.
        source: Box<VersusError>,
    },

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl VersusError {
    /// Build a [`VersusError::AssetNotFound`] value.
    pub fn asset_not_found(what: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::AssetNotFound {
            what: what.into(),
            path: path.into(),
        }
    }

    /// Build a [`VersusError::InvalidSpec`] value.
    pub fn invalid_spec(msg: impl Into<String>) -> Self {
        Self::InvalidSpec(msg.into())
    }

    /// Build a [`VersusError::Encoding`] value.
    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }

    /// Build a [`VersusError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`VersusError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Wrap `self` as a [`VersusError::Composition`] failure at `stage`.
    ///
    /// Already wrapped errors are returned unchanged so the innermost stage wins.
    pub fn in_stage(self, stage: RunState) -> Self {
        match self {
            Self::Composition { .. } => self,
            other => Self::Composition {
                stage,
                source: Box::new(other),
            },
        }
    }

    /// Return the underlying error, looking through composition wrappers.
    pub fn root(&self) -> &VersusError {
        match self {
            Self::Composition { source, .. } => source.root(),
            other => other,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
