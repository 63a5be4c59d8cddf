#![forbid(unsafe_code)]

//! Error type shared by the core state objects and the web frontend.

/// Page interaction error.
///
/// Filtering, overlay, navigation, scroll and reveal logic cannot fail; only
/// configuration, preference storage and DOM wiring produce these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageError {
    /// A required element is absent from the page markup.
    MissingElement(String),
    /// Host-supplied options could not be parsed or failed validation.
    InvalidConfig(String),
    /// The preference store rejected a read or write.
    Storage(String),
    /// A DOM call returned an exception.
    Dom(String),
}

impl core::fmt::Display for PageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::MissingElement(selector) => write!(f, "missing required element: {selector}"),
            Self::InvalidConfig(msg) => write!(f, "invalid page config: {msg}"),
            Self::Storage(msg) => write!(f, "preference storage: {msg}"),
            Self::Dom(msg) => write!(f, "dom: {msg}"),
        }
    }
}

impl std::error::Error for PageError {}
