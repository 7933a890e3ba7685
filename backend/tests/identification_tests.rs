//! Identification parsing tests
//!
//! Tests for reading the model's PLANT/DISEASE/CONFIDENCE answer including:
//! - Tolerance to ordering, casing and noise lines
//! - Confidence clamping
//! - Failure on missing plant or malformed confidence

use proptest::prelude::*;
use shared::{parse_identification, IdentificationError, IdentificationRecord};

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Chatty answers still parse
    #[test]
    fn test_noise_lines_ignored() {
        let raw = "Sure! Here is my analysis.\n\nplant: Tomato\nDisease: Early Blight\nConfidence: 77\nHope this helps";
        let record: IdentificationRecord = raw.parse().unwrap();
        assert_eq!(record.plant, "Tomato");
        assert_eq!(record.disease, "Early Blight");
        assert_eq!(record.confidence, 77);
    }

    /// Missing disease becomes Unknown and missing confidence becomes 0
    #[test]
    fn test_defaults() {
        let record: IdentificationRecord = "PLANT: Maize".parse().unwrap();
        assert_eq!(record.disease, "Unknown");
        assert_eq!(record.confidence, 0);
    }

    /// Out-of-range confidence is clamped
    #[test]
    fn test_confidence_clamped() {
        assert_eq!(parse_identification("CONFIDENCE: 250").unwrap().confidence, 100);
        assert_eq!(parse_identification("CONFIDENCE: -5").unwrap().confidence, 0);
    }

    /// Integers wider than i64 clamp by sign instead of failing
    #[test]
    fn test_confidence_overflow_clamped() {
        assert_eq!(
            parse_identification("CONFIDENCE: 100000000000000000000").unwrap().confidence,
            100
        );
        assert_eq!(
            parse_identification("CONFIDENCE: 9223372036854775808").unwrap().confidence,
            100
        );
        assert_eq!(
            parse_identification("CONFIDENCE: -100000000000000000000").unwrap().confidence,
            0
        );
        assert_eq!(
            parse_identification("PLANT: Rice\nCONFIDENCE: 1e30"),
            Err(IdentificationError::InvalidConfidence("1e30".to_string()))
        );
    }

    /// Non-integer confidence is rejected
    #[test]
    fn test_malformed_confidence() {
        assert_eq!(
            parse_identification("PLANT: Rice\nCONFIDENCE: 85%"),
            Err(IdentificationError::InvalidConfidence("85%".to_string()))
        );
    }

    /// A reply without a plant cannot be used
    #[test]
    fn test_missing_plant() {
        assert_eq!(
            "DISEASE: Rust\nCONFIDENCE: 50".parse::<IdentificationRecord>(),
            Err(IdentificationError::MissingPlant)
        );
        assert_eq!(
            "PLANT:   \nDISEASE: Rust".parse::<IdentificationRecord>(),
            Err(IdentificationError::MissingPlant)
        );
        assert_eq!(
            "  \n ".parse::<IdentificationRecord>(),
            Err(IdentificationError::EmptyResponse)
        );
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Strategy for generating plant and disease names
    fn name_strategy() -> impl Strategy<Value = String> {
        "[A-Z][a-z]{2,10}( [A-Z][a-z]{2,8})?"
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Field order does not matter
        #[test]
        fn prop_field_order_irrelevant(
            plant in name_strategy(),
            disease in name_strategy(),
            confidence in 0u8..=100u8,
            rotation in 0usize..3
        ) {
            let mut lines = vec![
                format!("PLANT: {}", plant),
                format!("DISEASE: {}", disease),
                format!("CONFIDENCE: {}", confidence),
            ];
            lines.rotate_left(rotation);

            let record: IdentificationRecord = lines.join("\n").parse().unwrap();
            prop_assert_eq!(record.plant, plant);
            prop_assert_eq!(record.disease, disease);
            prop_assert_eq!(record.confidence, confidence);
        }

        /// Any integer confidence lands in 0..=100
        #[test]
        fn prop_confidence_in_range(value in any::<i32>()) {
            let parsed = parse_identification(&format!("PLANT: Rice\nCONFIDENCE: {}", value)).unwrap();
            prop_assert!(parsed.confidence <= 100);
            prop_assert_eq!(i64::from(parsed.confidence), i64::from(value).clamp(0, 100));
        }
    }
}
