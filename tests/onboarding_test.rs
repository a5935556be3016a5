//! Tests for the credential gate in front of the Oracle.

use async_trait::async_trait;
use nebula_sage::{CredentialValidator, Onboarding};
use std::sync::Mutex;

/// Accepts exactly one key and remembers what it was asked.
struct OneKey {
    accepted: &'static str,
    seen: Mutex<Vec<String>>,
}

impl OneKey {
    fn new(accepted: &'static str) -> Self {
        Self {
            accepted,
            seen: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl CredentialValidator for OneKey {
    async fn validate_credential(&self, key: &str) -> bool {
        self.seen.lock().unwrap().push(key.to_string());
        key == self.accepted
    }
}

#[tokio::test]
async fn test_valid_key_is_accepted_trimmed() {
    let mut onboarding = Onboarding::new(OneKey::new("AIza-good"));
    let key = onboarding.verify("  AIza-good\n").await.unwrap();
    assert_eq!(key, "AIza-good");
    assert_eq!(onboarding.failures(), 0);
}

#[tokio::test]
async fn test_rejected_key_can_be_retried() {
    let mut onboarding = Onboarding::new(OneKey::new("AIza-good"));

    let err = onboarding.verify("AIza-bad").await.unwrap_err();
    assert!(!err.message.is_empty());
    assert_eq!(onboarding.failures(), 1);

    assert_eq!(onboarding.verify("AIza-good").await.unwrap(), "AIza-good");
    assert_eq!(onboarding.failures(), 1);
}

#[tokio::test]
async fn test_blank_key_skips_validator() {
    let validator = OneKey::new("AIza-good");
    let mut onboarding = Onboarding::new(validator);

    assert!(onboarding.verify("").await.is_err());
    assert!(onboarding.verify("   ").await.is_err());
    assert_eq!(onboarding.failures(), 2);

    onboarding.verify("AIza-good").await.unwrap();
    assert_eq!(onboarding.failures(), 2);
}

#[tokio::test]
async fn test_validator_sees_each_attempt() {
    let mut onboarding = Onboarding::new(OneKey::new("third"));
    for key in ["first", "second", "third"] {
        let _ = onboarding.verify(key).await;
    }
    assert_eq!(onboarding.failures(), 2);
}
