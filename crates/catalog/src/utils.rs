// Utility helpers shared across the catalog pipeline.

use rand::Rng;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Convert Option<Decimal> to Option<f64> for JSON-facing payloads
/// (review-queue candidates, sync progress messages).
pub fn decimal_to_f64(decimal: Option<Decimal>) -> Option<f64> {
    decimal.and_then(|d| d.to_f64())
}

const SKU_SUFFIX_LEN: usize = 8;
const SKU_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Generate a collision-resistant `internal_sku` for a newly created product
/// (spec §4.6: "prefix + random collision-resistant suffix; retry on unique
/// violation"). Callers retry with a fresh call on a unique-constraint error.
pub fn generate_internal_sku(prefix: &str) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..SKU_SUFFIX_LEN)
        .map(|_| SKU_ALPHABET[rng.gen_range(0..SKU_ALPHABET.len())] as char)
        .collect();
    format!("{}-{}", prefix.trim_end_matches('-'), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_conversion_round_trips() {
        let d = Some(Decimal::new(52099, 2));
        assert_eq!(decimal_to_f64(d), Some(520.99));
        assert_eq!(decimal_to_f64(None), None);
    }

    #[test]
    fn generated_sku_has_expected_shape() {
        let sku = generate_internal_sku("SKU");
        assert!(sku.starts_with("SKU-"));
        assert_eq!(sku.len(), "SKU-".len() + SKU_SUFFIX_LEN);
    }
}
