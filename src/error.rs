//! Crate-wide error type.

use crate::config::ConfigError;

/// Errors produced by the scene core.
///
/// The first five variants are argument errors: the call was rejected before
/// touching any state, so the caller keeps whatever it had before.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A viewport dimension was zero, negative, or not finite.
    #[error("invalid viewport size {width}x{height}")]
    InvalidViewport { width: f32, height: f32 },

    /// An aspect ratio that is not a positive finite number.
    #[error("invalid aspect ratio {0}")]
    InvalidAspectRatio(f32),

    /// A pixel-ratio cap that is not a positive finite number.
    #[error("invalid pixel ratio cap {0}")]
    InvalidPixelRatio(f32),

    /// Field of view or clip planes outside their domain.
    #[error("invalid projection: {0}")]
    InvalidProjection(String),

    /// A placement spec with an empty or inverted range.
    #[error("invalid placement: {0}")]
    InvalidPlacement(String),

    /// Configuration could not be loaded or saved.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// GPU surface or device setup failed.
    #[error("GPU error: {0}")]
    Gpu(String),

    /// The windowing event loop could not start or create a window.
    #[error(transparent)]
    EventLoop(#[from] winit::error::EventLoopError),

    /// The OS refused to open a window.
    #[error("window creation failed: {0}")]
    Window(#[from] winit::error::OsError),
}

impl Error {
    /// Returns `true` for errors caused by a bad argument rather than the environment.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Error::InvalidViewport { .. }
                | Error::InvalidAspectRatio(_)
                | Error::InvalidPixelRatio(_)
                | Error::InvalidProjection(_)
                | Error::InvalidPlacement(_)
        )
    }
}

/// Shorthand result type.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argument_errors_are_classified() {
        assert!(Error::InvalidAspectRatio(0.0).is_invalid_argument());
        assert!(
            Error::InvalidViewport {
                width: 0.0,
                height: 1.0
            }
            .is_invalid_argument()
        );
        assert!(Error::InvalidPixelRatio(-1.0).is_invalid_argument());
        assert!(!Error::Gpu("lost".into()).is_invalid_argument());
    }

    #[test]
    fn messages_name_the_bad_value() {
        let err = Error::InvalidViewport {
            width: 640.0,
            height: 0.0,
        };
        assert_eq!(err.to_string(), "invalid viewport size 640x0");
    }
}
