//! Shared fixtures for JOSE integration tests
#![allow(dead_code)]

use std::sync::Once;

use tracing_subscriber::EnvFilter;

pub const PAYLOAD: &str = "eyJ0ZXN0IjoxfQ";
pub const PROTECTED: &str = "eyJhbGciOiJFUzI1NksifQ";
pub const SIGNATURE: &str =
    "pUOZfYTxJ5g1DAm97yzbFxv0HtPkpfgIry_rDFYmMAnH70Wv1klLyLtEtSdM4uRtkeulrYtxNqaTgpvqS71aWQ";

pub const JWE_PROTECTED: &str = "eyJhbGciOiJFQ0RILUVTIiwiZW5jIjoiQTI1NkdDTSJ9";
pub const IV: &str = "AQIDBAUGBwgJCgsM";
pub const CIPHERTEXT: &str = "ZW5jcnlwdGVkLWJ5dGVzLWhlcmU";
pub const TAG: &str = "MDEyMzQ1Njc4OWFiY2RlZg";
pub const ENCRYPTED_KEY: &str = "d3JhcHBlZC1rZXktbWF0ZXJpYWwtMzItYnl0ZXMhISE";
pub const AAD: &str = "YWFkLWJ5dGVz";

static TRACING: Once = Once::new();

/// Route library logs to the test writer; `RUST_LOG` picks the level.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// General serialization JWS with one signature, keys already sorted
pub fn general_jws() -> String {
    format!(
        r#"{{"payload":"{PAYLOAD}","signatures":[{{"protected":"{PROTECTED}","signature":"{SIGNATURE}"}}]}}"#
    )
}

/// The same JWS as [`general_jws`], flattened and shuffled
pub fn flattened_jws() -> String {
    format!(r#"{{"signature":"{SIGNATURE}","protected":"{PROTECTED}","payload":"{PAYLOAD}"}}"#)
}

/// General serialization JWE with two recipients
pub fn general_jwe() -> String {
    format!(
        r#"{{"protected":"{JWE_PROTECTED}","unprotected":{{"jku":"https://example.com/keys"}},"recipients":[{{"header":{{"kid":"r1"}},"encrypted_key":"{ENCRYPTED_KEY}"}},{{"header":{{"kid":"r2"}}}}],"aad":"{AAD}","iv":"{IV}","ciphertext":"{CIPHERTEXT}","tag":"{TAG}"}}"#
    )
}

/// Flattened JWE with a single recipient
pub fn flattened_jwe() -> String {
    format!(
        r#"{{"tag":"{TAG}","ciphertext":"{CIPHERTEXT}","iv":"{IV}","encrypted_key":"{ENCRYPTED_KEY}","header":{{"kid":"r1"}},"protected":"{JWE_PROTECTED}"}}"#
    )
}

/// [`flattened_jwe`] in the general serialization
pub fn general_single_recipient_jwe() -> String {
    format!(
        r#"{{"ciphertext":"{CIPHERTEXT}","iv":"{IV}","protected":"{JWE_PROTECTED}","recipients":[{{"encrypted_key":"{ENCRYPTED_KEY}","header":{{"kid":"r1"}}}}],"tag":"{TAG}"}}"#
    )
}
