use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Script};

use crate::domain::auth::entities::OneTimePasscode;
use crate::domain::auth::errors::StoreError;
use crate::domain::auth::ports::{ConsumeOutcome, OtpStore};
use crate::domain::auth::value_objects::{OtpCode, PhoneNumber};

const KEY_PREFIX: &str = "otp";

// Compare-and-delete in one round trip so a code is consumed at most once
const CONSUME_SCRIPT: &str = r#"
local stored = redis.call('GET', KEYS[1])
if not stored then
  return 0
end
if stored == ARGV[1] then
  redis.call('DEL', KEYS[1])
  return 1
end
return 2
"#;

/// Redis implementation of the OtpStore trait
///
/// One key per phone (`otp:<phone>`) holding the code, with the code's
/// time-to-live as key expiry.
pub struct RedisOtpStore {
  conn: ConnectionManager,
  consume_script: Script,
}

impl RedisOtpStore {
  /// Creates a new instance of RedisOtpStore
  pub fn new(conn: ConnectionManager) -> Self {
    Self {
      conn,
      consume_script: Script::new(CONSUME_SCRIPT),
    }
  }

  fn key(phone: &PhoneNumber) -> String {
    format!("{}:{}", KEY_PREFIX, phone)
  }
}

#[async_trait]
impl OtpStore for RedisOtpStore {
  async fn issue(&self, otp: &OneTimePasscode) -> Result<(), StoreError> {
    let mut conn = self.conn.clone();
    let ttl_seconds = otp.ttl.as_secs().max(1);

    let _: () = conn
      .set_ex(Self::key(&otp.phone), otp.code.as_str(), ttl_seconds)
      .await?;

    Ok(())
  }

  async fn consume(
    &self,
    phone: &PhoneNumber,
    supplied: &OtpCode,
  ) -> Result<ConsumeOutcome, StoreError> {
    let mut conn = self.conn.clone();

    let reply: i64 = self
      .consume_script
      .key(Self::key(phone))
      .arg(supplied.as_str())
      .invoke_async(&mut conn)
      .await?;

    match reply {
      0 => Ok(ConsumeOutcome::NotFound),
      1 => Ok(ConsumeOutcome::Valid),
      2 => Ok(ConsumeOutcome::Invalid),
      other => Err(StoreError::UnexpectedReply(other.to_string())),
    }
  }

  async fn ping(&self) -> Result<(), StoreError> {
    let mut conn = self.conn.clone();
    super::ping(&mut conn).await
  }
}
