use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

fn payment_mac(secret: &str, intent_id: &str, payment_id: &str) -> Option<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(intent_id.as_bytes());
    mac.update(b"|");
    mac.update(payment_id.as_bytes());
    Some(mac)
}

// hex HMAC-SHA256 over `intent_id|payment_id`
pub fn sign_payment(secret: &str, intent_id: &str, payment_id: &str) -> Option<String> {
    payment_mac(secret, intent_id, payment_id).map(|mac| hex::encode(mac.finalize().into_bytes()))
}

pub fn verify_payment_signature(
    secret: &str,
    intent_id: &str,
    payment_id: &str,
    signature: &str,
) -> bool {
    let Ok(sig_bytes) = hex::decode(signature) else {
        return false;
    };

    payment_mac(secret, intent_id, payment_id)
        .map(|mac| mac.verify_slice(&sig_bytes).is_ok())
        .unwrap_or(false)
}
