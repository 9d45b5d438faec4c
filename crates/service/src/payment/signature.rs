use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Hex-encoded HMAC-SHA256 over `"{order_id}|{payment_id}"`.
pub fn sign(secret: &str, order_id: &str, payment_id: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(format!("{}|{}", order_id, payment_id).as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Constant-time check of a provider-supplied signature.
///
/// Garbage hex or a wrong length is a plain mismatch, never an error.
pub fn verify(secret: &str, order_id: &str, payment_id: &str, signature: &str) -> bool {
    let Ok(provided) = hex::decode(signature) else {
        return false;
    };
    let mut mac = match HmacSha256::new_from_slice(secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => return false,
    };
    mac.update(format!("{}|{}", order_id, payment_id).as_bytes());
    mac.verify_slice(&provided).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test_key_secret";

    #[test]
    fn sign_then_verify_roundtrip() {
        let sig = sign(SECRET, "order_abc", "pay_123");
        assert!(verify(SECRET, "order_abc", "pay_123", &sig));
    }

    #[test]
    fn tampering_any_input_breaks_verification() {
        let sig = sign(SECRET, "order_abc", "pay_123");
        assert!(!verify(SECRET, "order_XYZ", "pay_123", &sig));
        assert!(!verify(SECRET, "order_abc", "pay_999", &sig));
        assert!(!verify("wrong_secret", "order_abc", "pay_123", &sig));
    }

    #[test]
    fn tampered_signature_rejected() {
        let mut sig = sign(SECRET, "order_abc", "pay_123");
        let last = sig.pop().unwrap();
        sig.push(if last == '0' { '1' } else { '0' });
        assert!(!verify(SECRET, "order_abc", "pay_123", &sig));
    }

    #[test]
    fn garbage_signature_is_plain_mismatch() {
        assert!(!verify(SECRET, "order_abc", "pay_123", "not hex at all"));
        assert!(!verify(SECRET, "order_abc", "pay_123", ""));
        assert!(!verify(SECRET, "order_abc", "pay_123", "deadbeef"));
    }

    #[test]
    fn signature_is_hex_of_expected_length() {
        let sig = sign(SECRET, "order_abc", "pay_123");
        assert_eq!(sig.len(), 64);
        assert!(sig.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
