/// Structured error types for the chart bot
///
/// One enum per failure family. None of these ever reach the polling loop:
/// the callback router and the command handlers convert them into a
/// user-visible text message or a log line.
use thiserror::Error;

// =============================================================================
// MARKET DATA ERRORS
// =============================================================================

/// Upstream exchange API failure (transport, HTTP status or decoding)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarketDataError {
    #[error("Request to {endpoint} timed out after {timeout_secs}s")]
    Timeout { endpoint: String, timeout_secs: u64 },

    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {status} from {endpoint}: {body}")]
    HttpStatus {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("Failed to parse {what}: {reason}")]
    Parse { what: String, reason: String },
}

impl MarketDataError {
    pub fn parse(what: &str, reason: impl Into<String>) -> Self {
        MarketDataError::Parse {
            what: what.to_string(),
            reason: reason.into(),
        }
    }

    /// Map a reqwest failure onto the taxonomy above
    pub fn from_reqwest(endpoint: &str, timeout_secs: u64, error: reqwest::Error) -> Self {
        if error.is_timeout() {
            MarketDataError::Timeout {
                endpoint: endpoint.to_string(),
                timeout_secs,
            }
        } else if error.is_decode() {
            MarketDataError::parse("response body", error.to_string())
        } else {
            MarketDataError::Network(error.to_string())
        }
    }
}

pub type MarketDataResult<T> = Result<T, MarketDataError>;

// =============================================================================
// CHART ERRORS
// =============================================================================

/// Unexpected rendering fault. An empty series is not one of these.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChartError {
    #[error("PNG encoding failed: {0}")]
    Encode(String),

    #[error("Render worker failed: {0}")]
    Worker(String),
}

// =============================================================================
// TRANSPORT ERRORS
// =============================================================================

/// A chat API call failed
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{operation} failed: {reason}")]
pub struct TransportError {
    pub operation: &'static str,
    pub reason: String,
}

impl TransportError {
    pub fn new(operation: &'static str, reason: impl ToString) -> Self {
        Self {
            operation,
            reason: reason.to_string(),
        }
    }
}

pub type TransportResult<T> = Result<T, TransportError>;

// =============================================================================
// CALLBACK PAYLOAD ERRORS
// =============================================================================

/// Malformed button payload
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PayloadError {
    #[error("Unrecognized callback payload: {0:?}")]
    UnknownShape(String),

    #[error("Unsupported interval: {0:?}")]
    InvalidInterval(String),

    #[error("Invalid symbol: {0:?}")]
    InvalidSymbol(String),
}

// =============================================================================
// ROUTER ERRORS
// =============================================================================

/// Fault inside a callback branch. Always ends in the router's recovery path.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RouterError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Render(#[from] ChartError),

    #[error("Callback has no originating message")]
    MissingMessage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_market_data_error_display() {
        let err = MarketDataError::Timeout {
            endpoint: "/api/v3/klines".to_string(),
            timeout_secs: 12,
        };
        assert_eq!(err.to_string(), "Request to /api/v3/klines timed out after 12s");

        let err = MarketDataError::HttpStatus {
            endpoint: "/api/v3/ticker/24hr".to_string(),
            status: 400,
            body: "Invalid symbol.".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "HTTP 400 from /api/v3/ticker/24hr: Invalid symbol."
        );
    }

    #[test]
    fn test_router_error_wraps_transport() {
        let err: RouterError = TransportError::new("send_photo", "Bad Request").into();
        assert_eq!(err.to_string(), "send_photo failed: Bad Request");
    }
}
