use serde::{Deserialize, Serialize};
use std::fmt;

use super::errors::ValidationError;

// ============================================================================
// PhoneNumber Value Object
// ============================================================================

/// Phone number identifying a user, E.164-like (`+` followed by digits)
///
/// The value is otherwise opaque: it is used verbatim as the key suffix in the
/// OTP store and as the token subject.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PhoneNumber(String);

impl PhoneNumber {
  const MAX_DIGITS: usize = 15;

  /// Creates a new PhoneNumber after validation
  pub fn new(phone: impl Into<String>) -> Result<Self, ValidationError> {
    let phone = phone.into().trim().to_string();

    if phone.is_empty() {
      return Err(ValidationError::MissingField {
        field: "phone".to_string(),
      });
    }

    let digits = phone.strip_prefix('+').unwrap_or(&phone);
    if digits.is_empty()
      || digits.len() > Self::MAX_DIGITS
      || !digits.chars().all(|c| c.is_ascii_digit())
    {
      return Err(ValidationError::InvalidField {
        field: "phone".to_string(),
      });
    }

    Ok(Self(phone))
  }

  /// Returns the phone number as a string slice
  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// Consumes self and returns the inner String
  pub fn into_inner(self) -> String {
    self.0
  }
}

impl fmt::Display for PhoneNumber {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl AsRef<str> for PhoneNumber {
  fn as_ref(&self) -> &str {
    &self.0
  }
}

// ============================================================================
// OtpCode Value Object
// ============================================================================

/// Six digit one-time passcode in the range 100000..=999999
#[derive(Clone, PartialEq, Eq)]
pub struct OtpCode(String);

impl OtpCode {
  pub const LENGTH: usize = 6;
  pub const MIN: u32 = 100_000;
  pub const MAX: u32 = 999_999;

  /// Parses a user supplied code
  ///
  /// Only the shape is checked here. Codes outside the generated range
  /// (for example `000000`) are well-formed and simply never match.
  pub fn new(code: impl Into<String>) -> Result<Self, ValidationError> {
    let code = code.into().trim().to_string();

    if code.is_empty() {
      return Err(ValidationError::MissingField {
        field: "code".to_string(),
      });
    }

    if code.len() != Self::LENGTH || !code.chars().all(|c| c.is_ascii_digit()) {
      return Err(ValidationError::InvalidField {
        field: "code".to_string(),
      });
    }

    Ok(Self(code))
  }

  /// Builds a code from a number drawn from the generated range
  pub fn from_number(value: u32) -> Result<Self, ValidationError> {
    if !(Self::MIN..=Self::MAX).contains(&value) {
      return Err(ValidationError::InvalidField {
        field: "code".to_string(),
      });
    }

    Ok(Self(value.to_string()))
  }

  /// Returns the code as a string slice
  pub fn as_str(&self) -> &str {
    &self.0
  }
}

// Keep codes out of debug output; delivery logging uses `as_str` explicitly
impl fmt::Debug for OtpCode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("OtpCode(******)")
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_phone_number_accepts_e164() {
    let phone = PhoneNumber::new("+1234567890").unwrap();
    assert_eq!(phone.as_str(), "+1234567890");
  }

  #[test]
  fn test_phone_number_trims_whitespace() {
    let phone = PhoneNumber::new("  +100 ").unwrap();
    assert_eq!(phone.as_str(), "+100");
  }

  #[test]
  fn test_phone_number_without_plus() {
    assert!(PhoneNumber::new("989121234567").is_ok());
  }

  #[test]
  fn test_phone_number_empty_is_missing() {
    assert!(matches!(
      PhoneNumber::new("   "),
      Err(ValidationError::MissingField { .. })
    ));
  }

  #[test]
  fn test_phone_number_rejects_letters_and_bare_plus() {
    assert!(PhoneNumber::new("+12ab").is_err());
    assert!(PhoneNumber::new("+").is_err());
    assert!(PhoneNumber::new("+1 234").is_err());
    assert!(PhoneNumber::new("1234567890123456").is_err());
  }

  #[test]
  fn test_otp_code_shape() {
    assert!(OtpCode::new("123456").is_ok());
    assert!(OtpCode::new("000000").is_ok());
    assert!(OtpCode::new("12345").is_err());
    assert!(OtpCode::new("1234567").is_err());
    assert!(OtpCode::new("12a456").is_err());
    assert!(matches!(
      OtpCode::new(""),
      Err(ValidationError::MissingField { .. })
    ));
  }

  #[test]
  fn test_otp_code_from_number_bounds() {
    assert_eq!(OtpCode::from_number(100_000).unwrap().as_str(), "100000");
    assert_eq!(OtpCode::from_number(999_999).unwrap().as_str(), "999999");
    assert!(OtpCode::from_number(99_999).is_err());
    assert!(OtpCode::from_number(1_000_000).is_err());
  }

  #[test]
  fn test_otp_code_debug_is_redacted() {
    let code = OtpCode::new("654321").unwrap();
    assert!(!format!("{:?}", code).contains("654321"));
  }
}
