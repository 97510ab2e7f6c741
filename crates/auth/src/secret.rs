use thiserror::Error;

/// Minimum accepted length of the HMAC signing secret, in bytes.
pub const MIN_SECRET_LEN: usize = 32;

/// Placeholder values that have shipped in sample configs and must never sign
/// a real session.
const KNOWN_INSECURE: &[&str] = &["your-secret-key", "dev-secret", "secret", "changeme"];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SecretError {
    #[error("signing secret is empty")]
    Empty,

    #[error("signing secret is a known placeholder value")]
    KnownDefault,

    #[error("signing secret is {len} bytes; at least {min} required")]
    TooShort { len: usize, min: usize },
}

/// Process-wide symmetric key for session artifacts.
///
/// There is no default: a value must be supplied and pass validation before
/// the issuer can be built. `Debug` never prints the key material.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningSecret(Vec<u8>);

impl SigningSecret {
    pub fn new(raw: impl Into<String>) -> Result<Self, SecretError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(SecretError::Empty);
        }
        if KNOWN_INSECURE
            .iter()
            .any(|known| raw.trim().eq_ignore_ascii_case(known))
        {
            return Err(SecretError::KnownDefault);
        }
        if raw.len() < MIN_SECRET_LEN {
            return Err(SecretError::TooShort {
                len: raw.len(),
                min: MIN_SECRET_LEN,
            });
        }
        Ok(Self(raw.into_bytes()))
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl core::fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "SigningSecret(<{} bytes>)", self.0.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_missing_placeholder_and_short_secrets() {
        assert_eq!(SigningSecret::new("").unwrap_err(), SecretError::Empty);
        assert_eq!(SigningSecret::new("   ").unwrap_err(), SecretError::Empty);
        assert_eq!(
            SigningSecret::new("your-secret-key").unwrap_err(),
            SecretError::KnownDefault
        );
        assert_eq!(
            SigningSecret::new("Dev-Secret").unwrap_err(),
            SecretError::KnownDefault
        );
        assert_eq!(
            SigningSecret::new("short").unwrap_err(),
            SecretError::TooShort { len: 5, min: MIN_SECRET_LEN }
        );
    }

    #[test]
    fn accepts_long_secret_and_redacts_debug() {
        let secret = SigningSecret::new("k".repeat(MIN_SECRET_LEN)).unwrap();
        let printed = format!("{secret:?}");
        assert!(!printed.contains('k'));
        assert!(printed.contains("32 bytes"));
    }
}
