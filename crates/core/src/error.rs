use reqwest::StatusCode;
use thiserror::Error;

/// Errors from the Waktu Solat API client.
///
/// Only two kinds matter to callers: `InvalidArgument` for caller-supplied
/// values that fail validation, and everything else, which counts as an
/// upstream failure.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Caller-supplied zone/month/year failed validation.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Upstream returned a non-2xx status.
    #[error("upstream returned {status} for {path}")]
    UpstreamStatus { status: StatusCode, path: String },

    /// Network-level failure (connect, TLS, timeout).
    #[error("upstream request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Upstream responded 2xx but the payload did not parse.
    #[error("malformed upstream payload: {0}")]
    Malformed(String),
}

impl ApiError {
    /// True when the error is worth retrying: network failures, timeouts,
    /// rate limiting, and upstream server errors.
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Network(_) => true,
            ApiError::UpstreamStatus { status, .. } => {
                *status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
            }
            ApiError::InvalidArgument(_) | ApiError::Malformed(_) => false,
        }
    }

    /// True when the failure originated upstream rather than from the caller.
    pub fn is_upstream(&self) -> bool {
        !matches!(self, ApiError::InvalidArgument(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_statuses() {
        let rate_limited = ApiError::UpstreamStatus {
            status: StatusCode::TOO_MANY_REQUESTS,
            path: "/zones".to_string(),
        };
        let server_error = ApiError::UpstreamStatus {
            status: StatusCode::BAD_GATEWAY,
            path: "/zones".to_string(),
        };
        assert!(rate_limited.is_transient());
        assert!(server_error.is_transient());
    }

    #[test]
    fn permanent_statuses() {
        let not_found = ApiError::UpstreamStatus {
            status: StatusCode::NOT_FOUND,
            path: "/v2/solat/XXX99".to_string(),
        };
        assert!(!not_found.is_transient());
        assert!(not_found.is_upstream());
    }

    #[test]
    fn invalid_argument_is_not_upstream() {
        let err = ApiError::InvalidArgument("month 13 out of range".to_string());
        assert!(!err.is_transient());
        assert!(!err.is_upstream());
    }
}
