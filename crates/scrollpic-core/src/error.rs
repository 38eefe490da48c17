#![forbid(unsafe_code)]

//! Error types for configuration, host adapters, and controller state.

use core::fmt;

/// Invalid or incomplete widget configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The container id is empty.
    MissingId,
    /// A dimension is missing, non-finite, or not positive.
    InvalidDimension {
        field: &'static str,
        value: f64,
    },
    /// A timing field is zero.
    InvalidTiming(&'static str),
    /// The container holds no element children.
    NoSlides,
    /// No element with the configured id exists in the host document.
    ContainerNotFound(String),
    /// The options object could not be parsed.
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingId => f.write_str("container id is required"),
            Self::InvalidDimension { field, value } => {
                write!(f, "{field} must be a positive finite number, got {value}")
            }
            Self::InvalidTiming(field) => write!(f, "{field} must be greater than zero"),
            Self::NoSlides => f.write_str("container has no element children to carousel"),
            Self::ContainerNotFound(id) => write!(f, "no container element with id `{id}`"),
            Self::Parse(msg) => write!(f, "invalid options: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Failure reported by a [`Dom`](crate::dom::Dom) adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostError {
    op: &'static str,
    detail: String,
}

impl HostError {
    /// Create an error for the DOM operation `op`.
    pub fn new(op: &'static str, detail: impl Into<String>) -> Self {
        Self {
            op,
            detail: detail.into(),
        }
    }

    /// Name of the adapter operation that failed.
    #[must_use]
    pub fn op(&self) -> &'static str {
        self.op
    }
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.detail.is_empty() {
            write!(f, "host operation `{}` failed", self.op)
        } else {
            write!(f, "host operation `{}` failed: {}", self.op, self.detail)
        }
    }
}

impl std::error::Error for HostError {}

/// Top-level controller error.
#[derive(Debug, Clone, PartialEq)]
pub enum CarouselError {
    /// Configuration was rejected.
    Config(ConfigError),
    /// The host DOM refused an operation while mounting.
    Host(HostError),
    /// An operation that needs a mounted strip ran before `initialize`.
    NotInitialized,
    /// `initialize` was called on an already mounted widget.
    AlreadyInitialized,
    /// The widget was torn down with `destroy`.
    Destroyed,
    /// An index control referred to a slide that does not exist.
    IndexOutOfRange { index: usize, count: usize },
}

impl fmt::Display for CarouselError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "configuration error: {err}"),
            Self::Host(err) => err.fmt(f),
            Self::NotInitialized => f.write_str("carousel is not initialized"),
            Self::AlreadyInitialized => f.write_str("carousel is already initialized"),
            Self::Destroyed => f.write_str("carousel has been destroyed"),
            Self::IndexOutOfRange { index, count } => {
                write!(f, "slide index {index} is outside 1..={count}")
            }
        }
    }
}

impl std::error::Error for CarouselError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Host(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConfigError> for CarouselError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<HostError> for CarouselError {
    fn from(err: HostError) -> Self {
        Self::Host(err)
    }
}
