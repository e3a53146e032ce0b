//! Error types for Shroud.
//!
//! One `thiserror` enum covers every crate in the workspace. Variants are
//! grouped by tier so callers can tell a lookup miss ("not yet published")
//! from corrupted data or a broken cryptographic invariant.

use thiserror::Error;

/// Result type alias using `ShroudError`.
pub type Result<T> = std::result::Result<T, ShroudError>;

/// Main error type for all Shroud operations.
#[derive(Debug, Error)]
pub enum ShroudError {
    // ═══════════════════════════════════════════════════════════════════════════
    // KEY DERIVATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════
    /// Wallet signature has the wrong length.
    #[error("Invalid signature length: expected {expected} bytes, got {actual}")]
    InvalidSignatureLength { expected: usize, actual: usize },

    /// Re-hashing never produced a valid secp256k1 scalar.
    #[error("Key derivation exhausted after {attempts} attempts")]
    KeyDerivationExhausted { attempts: usize },

    /// Invalid key size.
    #[error("Invalid key: expected {expected} bytes, got {actual}")]
    InvalidKeySize { expected: usize, actual: usize },

    /// Bytes do not encode a point on secp256k1.
    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),

    /// Signature could not be parsed or recovered.
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // CODEC & FIELD ERRORS
    // ═══════════════════════════════════════════════════════════════════════════
    /// Meta-address string is not `st:eth:` followed by 132 hex characters.
    #[error("Malformed meta-address: {0}")]
    MalformedMetaAddress(String),

    /// A burn-address input does not fit in the BN254 scalar field.
    #[error("Field overflow: {input} is not below the field modulus")]
    FieldOverflow { input: String },

    /// Invalid Ethereum address.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // REGISTRY ERRORS
    // ═══════════════════════════════════════════════════════════════════════════
    /// Name has no record, resolver, or reverse name.
    #[error("Registry record not found: {0}")]
    RegistryNotFound(String),

    /// Configured account may not write records for this name.
    #[error("Registry write denied for '{name}': {reason}")]
    RegistryWriteDenied { name: String, reason: String },

    // ═══════════════════════════════════════════════════════════════════════════
    // SCANNER ERRORS
    // ═══════════════════════════════════════════════════════════════════════════
    /// Log query failed. The scanner logs this and returns no entries.
    #[error("Log query failed: {0}")]
    LogQueryFailed(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // RELAY ERRORS
    // ═══════════════════════════════════════════════════════════════════════════
    /// Relay endpoint not configured or unreachable.
    #[error("Relay unavailable: {0}")]
    RelayUnavailable(String),

    /// Relay answered with a non-2xx status or an unreadable body.
    #[error("Relay rejected submission (status {status}): {reason}")]
    RelaySubmissionRejected { status: u16, reason: String },

    // ═══════════════════════════════════════════════════════════════════════════
    // NETWORK ERRORS
    // ═══════════════════════════════════════════════════════════════════════════
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// RPC call failed.
    #[error("RPC call failed: {0}")]
    RpcError(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // SERIALIZATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════
    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Invalid hex encoding.
    #[error("Invalid hex encoding: {0}")]
    HexError(#[from] hex::FromHexError),

    // ═══════════════════════════════════════════════════════════════════════════
    // VALIDATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════
    /// Input validation failed.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // INTERNAL ERRORS
    // ═══════════════════════════════════════════════════════════════════════════
    /// Internal invariant violation (should never happen).
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ShroudError {
    /// Returns true if this error is recoverable (can retry).
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ShroudError::HttpError(_) | ShroudError::RpcError(_) | ShroudError::LogQueryFailed(_)
        )
    }

    /// Returns true if this is a cryptographic or field-arithmetic error.
    ///
    /// These are always fatal to the calling operation.
    pub fn is_crypto_error(&self) -> bool {
        matches!(
            self,
            ShroudError::KeyDerivationExhausted { .. }
                | ShroudError::FieldOverflow { .. }
                | ShroudError::InvalidKeySize { .. }
                | ShroudError::InvalidPublicKey(_)
                | ShroudError::InvalidSignature(_)
                | ShroudError::InvalidSignatureLength { .. }
        )
    }

    /// Returns true if this error means "nothing there" rather than "broken".
    pub fn is_lookup_miss(&self) -> bool {
        matches!(
            self,
            ShroudError::RegistryNotFound(_) | ShroudError::LogQueryFailed(_)
        )
    }

    /// Returns true if this is a validation error.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            ShroudError::ValidationError(_)
                | ShroudError::MalformedMetaAddress(_)
                | ShroudError::InvalidAddress(_)
                | ShroudError::HexError(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ShroudError::InvalidSignatureLength {
            expected: 65,
            actual: 64,
        };
        assert!(err.to_string().contains("65"));
        assert!(err.to_string().contains("64"));

        let err = ShroudError::RelaySubmissionRejected {
            status: 502,
            reason: "bad gateway".into(),
        };
        assert!(err.to_string().contains("502"));
    }

    #[test]
    fn test_error_classification() {
        assert!(ShroudError::HttpError("test".into()).is_recoverable());
        assert!(ShroudError::RpcError("test".into()).is_recoverable());
        assert!(!ShroudError::RelayUnavailable("unset".into()).is_recoverable());

        assert!(ShroudError::KeyDerivationExhausted { attempts: 16 }.is_crypto_error());
        assert!(ShroudError::FieldOverflow { input: "0x".into() }.is_crypto_error());
        assert!(!ShroudError::HttpError("test".into()).is_crypto_error());

        assert!(ShroudError::RegistryNotFound("alice.eth".into()).is_lookup_miss());
        assert!(!ShroudError::MalformedMetaAddress("x".into()).is_lookup_miss());
        assert!(ShroudError::MalformedMetaAddress("x".into()).is_validation_error());
    }

    #[test]
    fn test_json_error_conversion() {
        let json_result: std::result::Result<serde_json::Value, _> = serde_json::from_str("invalid");
        let shroud_result: Result<serde_json::Value> = json_result.map_err(ShroudError::from);
        assert!(matches!(shroud_result, Err(ShroudError::JsonError(_))));
    }
}
