use std::fmt;

/// Errors raised by the reconciliation engine.
///
/// Every variant is a programming or configuration error on the caller's
/// side; none of them is transient, so nothing in the crate retries. Public
/// functions return `anyhow::Result` and callers that care about the kind can
/// `downcast_ref::<ImError>()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImError {
    /// The cursor stack was not in the expected shape (unbalanced frames,
    /// residue at a refresh boundary, or ending a frame that isn't on top).
    CursorStackCorrupted { depth: usize },
    /// A namespace pop did not match the corresponding push, or a pass ended
    /// with namespaces still open.
    NamespaceCorrupted {
        expected: Option<String>,
        found: Option<String>,
    },
    /// A refresh was started while another context on this thread was
    /// already refreshing.
    ReentrantActivation,
    /// A layout operation was requested outside of a refresh pass.
    NoActiveCursor,
    /// The installed native factory does not provide this widget kind.
    UnknownWidgetKind { kind: &'static str },
    /// An option value outside of its accepted set.
    InvalidOption { option: &'static str, value: String },
}

impl fmt::Display for ImError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CursorStackCorrupted { depth } => {
                write!(f, "cursor stack corrupted (depth {})", depth)
            }
            Self::NamespaceCorrupted { expected, found } => write!(
                f,
                "namespace stack corrupted: expected {:?}, found {:?}",
                expected, found
            ),
            Self::ReentrantActivation => {
                write!(f, "tried to activate a context while another one is active")
            }
            Self::NoActiveCursor => write!(f, "no active cursor"),
            Self::UnknownWidgetKind { kind } => write!(
                f,
                "widget kind '{}' is not installed in this native factory",
                kind
            ),
            Self::InvalidOption { option, value } => {
                write!(f, "invalid value {:?} for option '{}'", value, option)
            }
        }
    }
}

impl std::error::Error for ImError {}

/// Returns the [`ImError`] carried by an `anyhow::Error`, if any.
pub fn im_error(err: &anyhow::Error) -> Option<&ImError> {
    err.downcast_ref::<ImError>()
}
