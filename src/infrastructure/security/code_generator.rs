use rand::RngCore;

use crate::domain::auth::errors::GeneratorError;
use crate::domain::auth::ports::CodeGenerator;
use crate::domain::auth::value_objects::OtpCode;

/// Number of distinct codes in 100000..=999999
const CODE_SPAN: u64 = (OtpCode::MAX - OtpCode::MIN + 1) as u64;

/// Largest multiple of `CODE_SPAN` representable in 32 bits; draws at or
/// above it are rejected so every code is equally likely
const ACCEPT_BELOW: u64 = (1u64 << 32) / CODE_SPAN * CODE_SPAN;

/// One-time code generator backed by the operating system's CSPRNG
pub struct SecureCodeGenerator;

impl SecureCodeGenerator {
  /// Creates a new instance of SecureCodeGenerator
  pub fn new() -> Self {
    Self
  }

  /// Draws a code from `rng` using rejection sampling
  ///
  /// Fails instead of falling back to a weaker source when the random
  /// source reports an error.
  fn draw<R: RngCore>(rng: &mut R) -> Result<OtpCode, GeneratorError> {
    let mut buf = [0u8; 4];
    loop {
      rng
        .try_fill_bytes(&mut buf)
        .map_err(|e| GeneratorError::RandomnessUnavailable(e.to_string()))?;

      let value = u64::from(u32::from_le_bytes(buf));
      if value < ACCEPT_BELOW {
        let number = OtpCode::MIN + (value % CODE_SPAN) as u32;
        return OtpCode::from_number(number)
          .map_err(|e| GeneratorError::RandomnessUnavailable(e.to_string()));
      }
    }
  }
}

impl Default for SecureCodeGenerator {
  fn default() -> Self {
    Self::new()
  }
}

impl CodeGenerator for SecureCodeGenerator {
  fn generate(&self) -> Result<OtpCode, GeneratorError> {
    Self::draw(&mut rand::rngs::OsRng)
  }
}
