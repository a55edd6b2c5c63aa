//! Error types for SparkHub operations.
//!
//! Cryptographic and codec failures are deliberately coarse: callers learn
//! that an operation failed, never which check rejected the input.

use std::fmt;

/// Numeric code for each [`SparkhubError`] variant. Values never change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum SparkhubErrorCode {
    /// See [`SparkhubError::Unimplemented`]
    Unimplemented = 1000,
    /// HTTP request to the wallet or an LNURL server broke
    Transport = 2000,
    /// Peer unreachable
    ConnectionFailed = 2001,
    /// Peer too slow
    ConnectionTimeout = 2002,
    /// Wallet or LNURL server said no
    Upstream = 2003,
    /// Sealing or unsealing failed
    CryptoFailure = 3000,
    /// Address failed to decode
    InvalidAddress = 3001,
    /// Resource not found
    NotFound = 4000,
    /// Username already registered
    UsernameTaken = 4001,
    /// Address already bound to another username
    AddressClaimed = 4002,
    /// A field failed validation
    InvalidData = 5000,
    /// Username or amount absent
    MissingParameters = 5001,
    /// JSON in or out
    Serialization = 5002,
    /// Key-value store or database
    Storage = 7000,
    /// Wallet sidecar throttled us
    RateLimited = 8000,
    /// Bug or broken invariant
    Internal = 9999,
}

/// Error type shared by every SparkHub component.
#[derive(Debug)]
pub enum SparkhubError {
    /// The operation needs a cargo feature this build lacks. Holds its name.
    Unimplemented(&'static str),

    /// The HTTP exchange failed below the application layer.
    Transport(String),

    /// Could not reach the wallet sidecar or LNURL host.
    ConnectionFailed {
        /// URL that was dialed
        target: String,
        /// What the HTTP client reported
        reason: String,
    },

    /// A wallet or LNURL request exceeded its deadline.
    ConnectionTimeout {
        /// Request that was abandoned
        operation: String,
        /// Deadline that elapsed, in ms
        timeout_ms: u64,
    },

    /// An upstream collaborator (wallet, remote LNURL server) refused the request.
    Upstream(String),

    /// Sealing or unsealing a secret failed. Carries no detail.
    CryptoFailure,

    /// The input is not a decodable Spark address. Carries no detail.
    InvalidAddress,

    /// Nothing stored under the given key (username, address, secret).
    NotFound {
        /// What was looked up, e.g. `"username"`
        resource_type: String,
        /// The key that missed
        identifier: String,
    },

    /// The username is already registered.
    UsernameTaken {
        /// The requested username
        username: String,
    },

    /// The address is already bound to a different username.
    AddressClaimed {
        /// The requested address
        address: String,
        /// Username currently holding the address
        existing_username: String,
    },

    /// A caller-supplied value was rejected.
    InvalidData {
        /// Offending field, e.g. `"username"` or `"amount"`
        field: String,
        /// Constraint it broke
        reason: String,
    },

    /// Required parameters were not supplied.
    MissingParameters,

    /// A JSON body or stored value could not be (de)serialized.
    Serialization(String),

    /// The key-value store or the registry database failed.
    Storage(String),

    /// The wallet sidecar answered 429.
    RateLimited {
        /// Back-off the sidecar asked for, in ms
        retry_after_ms: u64,
    },

    /// Anything else; indicates a bug.
    Internal(String),
}

impl SparkhubError {
    /// Numeric code of this error.
    pub fn code(&self) -> SparkhubErrorCode {
        match self {
            Self::Unimplemented(_) => SparkhubErrorCode::Unimplemented,
            Self::Transport(_) => SparkhubErrorCode::Transport,
            Self::ConnectionFailed { .. } => SparkhubErrorCode::ConnectionFailed,
            Self::ConnectionTimeout { .. } => SparkhubErrorCode::ConnectionTimeout,
            Self::Upstream(_) => SparkhubErrorCode::Upstream,
            Self::CryptoFailure => SparkhubErrorCode::CryptoFailure,
            Self::InvalidAddress => SparkhubErrorCode::InvalidAddress,
            Self::NotFound { .. } => SparkhubErrorCode::NotFound,
            Self::UsernameTaken { .. } => SparkhubErrorCode::UsernameTaken,
            Self::AddressClaimed { .. } => SparkhubErrorCode::AddressClaimed,
            Self::InvalidData { .. } => SparkhubErrorCode::InvalidData,
            Self::MissingParameters => SparkhubErrorCode::MissingParameters,
            Self::Serialization(_) => SparkhubErrorCode::Serialization,
            Self::Storage(_) => SparkhubErrorCode::Storage,
            Self::RateLimited { .. } => SparkhubErrorCode::RateLimited,
            Self::Internal(_) => SparkhubErrorCode::Internal,
        }
    }

    /// Whether the same request might succeed later.
    ///
    /// Advisory only: the resolver makes exactly one attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Transport(_)
                | Self::ConnectionFailed { .. }
                | Self::ConnectionTimeout { .. }
                | Self::RateLimited { .. }
                | Self::Storage(_)
        )
    }

    /// Wrap an HTTP client error.
    pub fn transport<E: std::error::Error>(err: E) -> Self {
        Self::Transport(err.to_string())
    }

    /// `NotFound` for `identifier` of kind `resource_type`.
    pub fn not_found(resource_type: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
            identifier: identifier.into(),
        }
    }

    /// `InvalidData` for `field`.
    pub fn invalid_data(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidData {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for SparkhubError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unimplemented(label) => write!(f, "{} is not available in this build", label),
            Self::Transport(msg) => write!(f, "HTTP request failed: {}", msg),
            Self::ConnectionFailed { target, reason } => {
                write!(f, "could not reach {}: {}", target, reason)
            }
            Self::ConnectionTimeout {
                operation,
                timeout_ms,
            } => write!(f, "{} gave no answer within {} ms", operation, timeout_ms),
            Self::Upstream(msg) => write!(f, "rejected upstream: {}", msg),
            Self::CryptoFailure => write!(f, "Failed to decrypt data"),
            Self::InvalidAddress => write!(f, "Invalid Spark address"),
            Self::NotFound {
                resource_type,
                identifier,
            } => write!(f, "no {} {}", resource_type, identifier),
            Self::UsernameTaken { username } => {
                write!(f, "Username {} already exists", username)
            }
            Self::AddressClaimed { .. } => {
                write!(
                    f,
                    "Spark address is already associated with another username"
                )
            }
            Self::InvalidData { field, reason } => write!(f, "bad {}: {}", field, reason),
            Self::MissingParameters => write!(f, "Missing required parameters"),
            Self::Serialization(msg) => write!(f, "malformed JSON: {}", msg),
            Self::Storage(msg) => write!(f, "store unavailable: {}", msg),
            Self::RateLimited { retry_after_ms } => {
                write!(f, "wallet busy, back off for {} ms", retry_after_ms)
            }
            Self::Internal(msg) => write!(f, "bug: {}", msg),
        }
    }
}

impl std::error::Error for SparkhubError {}

impl From<serde_json::Error> for SparkhubError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = SparkhubError::RateLimited {
            retry_after_ms: 1000,
        };
        assert_eq!(err.code(), SparkhubErrorCode::RateLimited);
        assert!(err.is_retryable());

        assert!(!SparkhubError::CryptoFailure.is_retryable());
        assert_eq!(SparkhubErrorCode::CryptoFailure as i32, 3000);
    }

    #[test]
    fn test_crypto_failure_carries_no_detail() {
        assert_eq!(SparkhubError::CryptoFailure.to_string(), "Failed to decrypt data");
        assert_eq!(SparkhubError::InvalidAddress.to_string(), "Invalid Spark address");
    }

    #[test]
    fn test_conflict_display() {
        let err = SparkhubError::UsernameTaken {
            username: "alice".to_string(),
        };
        assert_eq!(err.to_string(), "Username alice already exists");

        let err = SparkhubError::AddressClaimed {
            address: "spark1xyz".to_string(),
            existing_username: "bob".to_string(),
        };
        assert!(err.to_string().contains("another username"));
        assert_eq!(err.code(), SparkhubErrorCode::AddressClaimed);
    }

    #[test]
    fn test_constructors_and_messages() {
        let err = SparkhubError::not_found("username", "carol");
        assert_eq!(err.code(), SparkhubErrorCode::NotFound);
        assert_eq!(err.to_string(), "no username carol");

        let err = SparkhubError::invalid_data("amount", "must be numeric");
        assert_eq!(err.code(), SparkhubErrorCode::InvalidData);
        assert_eq!(err.to_string(), "bad amount: must be numeric");
    }
}
