//! Storefront error types.

use thiserror::Error;
use turbo_data::FetchError;
use turbo_fragment::FragmentError;
use turbo_variants::SelectionError;

/// Errors surfaced by panel loading and cart actions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorefrontError {
    /// The request failed or the server answered with a non-2xx status.
    #[error("Network failure: {0}")]
    NetworkFailure(FetchError),

    /// The server answered, but not with what was expected.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// The current selection cannot be submitted.
    #[error(transparent)]
    Selection(#[from] SelectionError),

    /// The cart endpoint refused the change.
    #[error("Cart update rejected: {0}")]
    CartRejected(String),

    /// An add-to-cart request is already in flight.
    #[error("An add-to-cart request is already in flight")]
    SubmissionInFlight,

    /// No product panel with a bound selection is open.
    #[error("No product panel is open")]
    NoOpenPanel,

    /// The fragment markup could not be used.
    #[error(transparent)]
    Fragment(#[from] FragmentError),
}

impl From<FetchError> for StorefrontError {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::ParseError(message) | FetchError::JsonError(message) => {
                StorefrontError::MalformedResponse(message)
            }
            other => StorefrontError::NetworkFailure(other),
        }
    }
}

impl StorefrontError {
    /// Status code when the server answered with a non-2xx response.
    pub fn status(&self) -> Option<u16> {
        match self {
            StorefrontError::NetworkFailure(e) => e.status(),
            _ => None,
        }
    }

    /// True when the shop could not be reached at all.
    pub fn is_transport(&self) -> bool {
        matches!(self, StorefrontError::NetworkFailure(e) if e.is_transport())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use turbo_variants::OptionKind;

    #[test]
    fn test_fetch_error_mapping() {
        assert_eq!(
            StorefrontError::from(FetchError::Timeout),
            StorefrontError::NetworkFailure(FetchError::Timeout)
        );
        assert!(matches!(
            StorefrontError::from(FetchError::HttpError {
                status: 500,
                message: "boom".to_string()
            }),
            StorefrontError::NetworkFailure(_)
        ));
        assert_eq!(
            StorefrontError::from(FetchError::ParseError("bad".to_string())),
            StorefrontError::MalformedResponse("bad".to_string())
        );
    }

    #[test]
    fn test_status_and_transport() {
        let http = StorefrontError::from(FetchError::HttpError {
            status: 404,
            message: "missing".to_string(),
        });
        assert_eq!(http.status(), Some(404));
        assert!(!http.is_transport());

        let offline = StorefrontError::from(FetchError::RequestError("refused".to_string()));
        assert_eq!(offline.status(), None);
        assert!(offline.is_transport());
        assert!(StorefrontError::from(FetchError::Timeout).is_transport());

        assert!(!StorefrontError::SubmissionInFlight.is_transport());
        assert_eq!(StorefrontError::CartRejected("no".to_string()).status(), None);
    }

    #[test]
    fn test_selection_error_is_transparent() {
        let err =
            StorefrontError::from(SelectionError::IncompleteSelection(vec![OptionKind::Size]));
        assert_eq!(err.to_string(), "Incomplete selection: missing size");
    }
}
