use crate::auth::messages;
use crate::types::{AppError, Result};
use chrono::Utc;
use parking_lot::Mutex;
use rand::Rng;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use tracing::info;

/// A verification code waiting to be confirmed.
#[derive(Debug, Clone)]
struct PendingCode {
    /// sha256 of the code; the plaintext is never stored.
    code_hash: String,
    expires_at: i64,
}

/// Phone one-time verification codes.
///
/// `start_verification` issues a 6-digit code keyed by (email, phone) and
/// returns it for delivery by the external SMS channel; only its hash is
/// retained. `confirm` checks the code and consumes it on success so a
/// code can never be replayed.
pub struct OtpService {
    ttl_seconds: i64,
    pending: Mutex<HashMap<(String, String), PendingCode>>,
}

impl OtpService {
    pub fn new(ttl_seconds: i64) -> Self {
        Self {
            ttl_seconds,
            pending: Mutex::new(HashMap::new()),
        }
    }

    fn hash_code(code: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(code.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Issue a fresh code for this (email, phone) pair, replacing any
    /// earlier one still pending.
    pub fn start_verification(&self, email: &str, phone: &str) -> String {
        let code = format!("{:06}", rand::rng().random_range(0..1_000_000));

        let entry = PendingCode {
            code_hash: Self::hash_code(&code),
            expires_at: Utc::now().timestamp() + self.ttl_seconds,
        };
        self.pending
            .lock()
            .insert((email.to_string(), phone.to_string()), entry);

        info!(email, phone, "phone verification code issued");
        code
    }

    /// Confirm a code. Consumes it on success; expired or wrong codes map
    /// to the fixed auth error messages.
    pub fn confirm(&self, email: &str, phone: &str, code: &str) -> Result<()> {
        let key = (email.to_string(), phone.to_string());
        let mut pending = self.pending.lock();

        let entry = pending
            .get(&key)
            .ok_or_else(|| AppError::Auth(messages::human_message("auth/invalid-verification-code")))?
            .clone();

        if Utc::now().timestamp() > entry.expires_at {
            pending.remove(&key);
            return Err(AppError::Auth(messages::human_message("auth/code-expired")));
        }

        if entry.code_hash != Self::hash_code(code) {
            return Err(AppError::Auth(messages::human_message(
                "auth/invalid-verification-code",
            )));
        }

        pending.remove(&key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirm_accepts_issued_code_once() {
        let otp = OtpService::new(300);
        let code = otp.start_verification("a@campus.edu", "+15550100");

        assert!(otp.confirm("a@campus.edu", "+15550100", &code).is_ok());
        // Consumed: a second confirm fails.
        assert!(otp.confirm("a@campus.edu", "+15550100", &code).is_err());
    }

    #[test]
    fn test_wrong_code_rejected_but_not_consumed() {
        let otp = OtpService::new(300);
        let code = otp.start_verification("a@campus.edu", "+15550100");

        let err = otp
            .confirm("a@campus.edu", "+15550100", "000000")
            .expect_err("wrong code");
        assert!(err.to_string().contains("verification code is incorrect"));

        // The real code still works afterwards.
        assert!(otp.confirm("a@campus.edu", "+15550100", &code).is_ok());
    }

    #[test]
    fn test_expired_code_rejected() {
        let otp = OtpService::new(-1); // already expired on issue
        let code = otp.start_verification("a@campus.edu", "+15550100");

        let err = otp
            .confirm("a@campus.edu", "+15550100", &code)
            .expect_err("expired code");
        assert!(err.to_string().contains("expired"));
    }

    #[test]
    fn test_reissue_replaces_previous_code() {
        let otp = OtpService::new(300);
        let first = otp.start_verification("a@campus.edu", "+15550100");
        let second = otp.start_verification("a@campus.edu", "+15550100");

        if first != second {
            assert!(otp.confirm("a@campus.edu", "+15550100", &first).is_err());
        }
        assert!(otp.confirm("a@campus.edu", "+15550100", &second).is_ok());
    }

    #[test]
    fn test_codes_are_six_digits() {
        let otp = OtpService::new(300);
        for _ in 0..20 {
            let code = otp.start_verification("a@campus.edu", "+15550100");
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }
}
