use smoothing_core::SmoothingError;

/// An error type for the smoothing element.
#[derive(thiserror::Error, Debug)]
pub enum ElementError {
    /// An error from the smoothing engine.
    #[error(transparent)]
    SmoothingError(#[from] SmoothingError),

    /// The negotiated caps still contain ranges or lists.
    #[error("Caps not fixed")]
    CapsNotFixed,

    /// The caps do not carry a width and a height.
    #[error("No width/height available")]
    MissingDimensions,

    /// The caps do not carry a pixel format.
    #[error("No pixel format available")]
    MissingFormat,

    /// The property does not exist on the element.
    #[error("Unknown property: {0}")]
    UnknownProperty(String),

    /// The property value has the wrong type or is out of range.
    #[error("Invalid value {value:?} for property {name}")]
    InvalidPropertyValue {
        /// The property name.
        name: &'static str,
        /// The rejected value.
        value: String,
    },

    /// The filter mutex was poisoned by a panicking thread.
    #[error("Could not lock the mutex")]
    MutexPoisoned,
}
