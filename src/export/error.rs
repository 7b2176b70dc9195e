use thiserror::Error;

use crate::api::ApiError;

/// Errors from the export pipeline. Decode failures are fatal to the
/// affected notebook; what they do to the batch depends on the configured
/// failure mode.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("invalid base64 content for {path}")]
    Decode {
        path: String,
        #[source]
        source: base64::DecodeError,
    },

    #[error("exported content for {path} is not valid UTF-8")]
    Utf8 {
        path: String,
        #[source]
        source: std::string::FromUtf8Error,
    },

    #[error("checkpoint write failed: {0}")]
    Checkpoint(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine as _;

    #[test]
    fn test_decode_error_names_the_notebook() {
        let source = base64::engine::general_purpose::STANDARD
            .decode("not!base64")
            .unwrap_err();
        let e = ExportError::Decode {
            path: "/etl/daily".into(),
            source,
        };
        assert!(e.to_string().contains("/etl/daily"));
    }

    #[test]
    fn test_api_error_passes_through() {
        let e = ExportError::from(ApiError::Request {
            status: 500,
            reason: "Internal Server Error".into(),
            body: String::new(),
        });
        assert!(matches!(e, ExportError::Api(ApiError::Request { status: 500, .. })));
    }
}
