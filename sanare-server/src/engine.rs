//! Verification engine: pass payloads, partnership matching, discounts
//!
//! Pure lookups and arithmetic over the seeded entity/partnership lists.
//! Monetary values use rust_decimal internally and round to whole
//! currency units, half away from zero.

use crate::analyzer::IdExtraction;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use shared::models::{Entity, Partnership};

/// Discount applied on a successful entity-pass verification
pub const PASS_DISCOUNT_PERCENT: u8 = 25;

/// Validity date reported with entity-pass discounts
pub const PASS_VALIDITY_DATE: &str = "2026-12-31";

/// Wire format of a membership pass: base64 of this JSON object.
/// `member_id` is carried on the pass but unused by verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassPayload {
    pub entity_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_id: Option<String>,
}

/// Encode a pass payload (used by demos and tests)
pub fn encode_pass(payload: &PassPayload) -> String {
    // Serializing a two-string struct cannot fail
    let json = serde_json::to_string(payload).unwrap_or_default();
    BASE64.encode(json)
}

/// Decode a pass payload. Any failure (bad base64, bad JSON, missing
/// `entity_id`) yields `None`; nothing propagates past this boundary.
pub fn decode_pass(raw: &str) -> Option<PassPayload> {
    let bytes = BASE64.decode(raw.trim()).ok()?;
    let payload: PassPayload = serde_json::from_slice(&bytes).ok()?;
    if payload.entity_id.is_empty() {
        return None;
    }
    Some(payload)
}

/// Pricing breakdown attached to successful verifications
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingQuote {
    pub original_price: i64,
    pub discount_percentage: u8,
    pub discount_amount: i64,
    pub final_price: i64,
    /// `YYYY-MM-DD`
    pub valid_until: String,
}

/// Outcome of verifying an entity pass
#[derive(Debug, Clone)]
pub enum PassVerification {
    /// Payload failed to decode
    InvalidPayload,
    /// Decoded, but the entity is not in partnership records
    UnknownEntity,
    /// Entity recognized; discount applied
    Granted { entity: Entity, quote: PricingQuote },
}

/// Outcome of verifying an AI-extracted institution name.
///
/// Every variant is a business outcome carrying a price: partnership
/// grants the discount, the other two fall back to standard pricing.
/// Infrastructure failure (the analyzer being down) is not represented
/// here; it never reaches the engine.
#[derive(Debug, Clone)]
pub enum NameVerification {
    /// Extraction says this is not a valid member ID; standard pricing
    NotMemberId { quote: PricingQuote },
    /// Institution matched a partnership
    Partnered {
        institution_name: String,
        quote: PricingQuote,
    },
    /// Recognized institution, but no partnership; standard pricing
    NotPartnered {
        institution_name: String,
        quote: PricingQuote,
    },
}

/// Partnership/discount computation over static reference data
#[derive(Clone)]
pub struct VerificationEngine {
    entities: Vec<Entity>,
    partnerships: Vec<Partnership>,
    base_price: i64,
}

impl VerificationEngine {
    pub fn new(entities: Vec<Entity>, partnerships: Vec<Partnership>, base_price: i64) -> Self {
        Self {
            entities,
            partnerships,
            base_price,
        }
    }

    /// Standard (non-discounted) price
    pub fn base_price(&self) -> i64 {
        self.base_price
    }

    /// Partner display names, in list order (candidates for the analyzer)
    pub fn partner_names(&self) -> Vec<String> {
        self.partnerships
            .iter()
            .map(|p| p.institution_name.clone())
            .collect()
    }

    /// Compute a quote for a discount percentage.
    ///
    /// Discount rounds to the nearest whole unit; the final price is the
    /// remainder, so `original - discount == final` always holds.
    pub fn quote(&self, discount_percentage: u8, valid_until: impl Into<String>) -> PricingQuote {
        let base = Decimal::from(self.base_price);
        let percent = Decimal::from(discount_percentage);
        let discount_amount = (base * percent / Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
            .unwrap_or(0);

        PricingQuote {
            original_price: self.base_price,
            discount_percentage,
            discount_amount,
            final_price: self.base_price - discount_amount,
            valid_until: valid_until.into(),
        }
    }

    /// Standard (non-discounted) quote
    pub fn standard_quote(&self) -> PricingQuote {
        self.quote(0, PASS_VALIDITY_DATE)
    }

    /// Partnership covering an institution, looked up through the
    /// entity's display name
    pub fn institution_partnership(&self, institution_id: &str) -> Option<&Partnership> {
        let entity = self.entities.iter().find(|e| e.id == institution_id)?;
        self.partnerships.iter().find(|p| p.matches_name(&entity.name))
    }

    /// Verify a scanned membership pass (base64 JSON payload)
    pub fn verify_entity_payload(&self, raw: &str) -> PassVerification {
        let Some(payload) = decode_pass(raw) else {
            return PassVerification::InvalidPayload;
        };

        let Some(entity) = self.entities.iter().find(|e| e.id == payload.entity_id) else {
            return PassVerification::UnknownEntity;
        };

        PassVerification::Granted {
            entity: entity.clone(),
            quote: self.quote(PASS_DISCOUNT_PERCENT, PASS_VALIDITY_DATE),
        }
    }

    /// Verify an extracted institution name against the partnership list.
    ///
    /// First bidirectional case-insensitive substring match in list order
    /// wins; the quote's validity prefers the extracted expiry date over
    /// the contract end date.
    pub fn verify_extracted(&self, extraction: &IdExtraction) -> NameVerification {
        if !extraction.is_valid_member_id {
            return NameVerification::NotMemberId {
                quote: self.standard_quote(),
            };
        }

        let matched = self
            .partnerships
            .iter()
            .find(|p| p.matches_name(&extraction.institution_name));

        match matched {
            Some(partnership) => {
                let valid_until = extraction
                    .expiry_date
                    .clone()
                    .unwrap_or_else(|| partnership.contract_end_date.clone());
                NameVerification::Partnered {
                    institution_name: partnership.institution_name.clone(),
                    quote: self.quote(partnership.discount_percentage, valid_until),
                }
            }
            None => NameVerification::NotPartnered {
                institution_name: extraction.institution_name.clone(),
                quote: self.standard_quote(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;

    fn engine() -> VerificationEngine {
        VerificationEngine::new(seed::entities(), seed::partnerships(), seed::BASE_PRICE)
    }

    #[test]
    fn test_pass_codec_round_trip() {
        let payload = PassPayload {
            entity_id: "ENT-001".into(),
            member_id: Some("STU-123".into()),
        };
        let encoded = encode_pass(&payload);
        assert_eq!(decode_pass(&encoded), Some(payload));
    }

    #[test]
    fn test_decode_garbage_is_none() {
        assert_eq!(decode_pass("invalid_payload_data"), None);
        assert_eq!(decode_pass(""), None);
        // Valid base64, not JSON
        assert_eq!(decode_pass(&BASE64.encode("hello")), None);
        // Valid JSON, missing entity_id
        assert_eq!(decode_pass(&BASE64.encode("{\"member_id\":\"X\"}")), None);
    }

    #[test]
    fn test_quote_arithmetic() {
        let quote = engine().quote(25, "2026-12-31");
        assert_eq!(quote.original_price, 4500);
        assert_eq!(quote.discount_amount, 1125);
        assert_eq!(quote.final_price, 3375);
    }

    #[test]
    fn test_quote_identity_holds_for_all_percentages() {
        let engine = engine();
        for percent in 0..=100u8 {
            let q = engine.quote(percent, "2026-12-31");
            assert_eq!(q.original_price - q.discount_amount, q.final_price);
        }
    }

    #[test]
    fn test_institution_partnership() {
        let engine = engine();
        assert!(engine.institution_partnership("ENT-002").is_some());
        assert!(engine.institution_partnership("ENT-999").is_none());
    }

    #[test]
    fn test_verify_known_entity() {
        let encoded = encode_pass(&PassPayload {
            entity_id: "ENT-001".into(),
            member_id: Some("STU-123".into()),
        });
        match engine().verify_entity_payload(&encoded) {
            PassVerification::Granted { entity, quote } => {
                assert_eq!(entity.id, "ENT-001");
                assert_eq!(quote.final_price, 3375);
                assert_eq!(quote.valid_until, PASS_VALIDITY_DATE);
            }
            other => panic!("expected Granted, got {other:?}"),
        }
    }

    #[test]
    fn test_verify_unknown_entity() {
        let encoded = encode_pass(&PassPayload {
            entity_id: "ENT-999".into(),
            member_id: None,
        });
        assert!(matches!(
            engine().verify_entity_payload(&encoded),
            PassVerification::UnknownEntity
        ));
        assert!(matches!(
            engine().verify_entity_payload("not-base64!!"),
            PassVerification::InvalidPayload
        ));
    }

    #[test]
    fn test_verify_extracted_partnered() {
        let extraction = crate::analyzer::IdExtraction {
            institution_name: "delhi public school".into(),
            holder_name: None,
            expiry_date: Some("2026-03-31".into()),
            is_valid_member_id: true,
        };
        match engine().verify_extracted(&extraction) {
            NameVerification::Partnered {
                institution_name,
                quote,
            } => {
                assert_eq!(institution_name, "Delhi Public School, R.K. Puram");
                // Extracted expiry preferred over the contract end date
                assert_eq!(quote.valid_until, "2026-03-31");
                assert_eq!(quote.final_price, 3375);
            }
            other => panic!("expected Partnered, got {other:?}"),
        }
    }

    #[test]
    fn test_verify_extracted_not_partnered_keeps_standard_price() {
        let extraction = crate::analyzer::IdExtraction {
            institution_name: "Unknown Academy".into(),
            holder_name: None,
            expiry_date: None,
            is_valid_member_id: true,
        };
        match engine().verify_extracted(&extraction) {
            NameVerification::NotPartnered {
                institution_name,
                quote,
            } => {
                assert_eq!(institution_name, "Unknown Academy");
                assert_eq!(quote.discount_amount, 0);
                assert_eq!(quote.final_price, 4500);
            }
            other => panic!("expected NotPartnered, got {other:?}"),
        }
    }

    #[test]
    fn test_verify_extracted_invalid_id_keeps_standard_price() {
        let extraction = crate::analyzer::IdExtraction {
            institution_name: "Delhi Public School, R.K. Puram".into(),
            holder_name: None,
            expiry_date: None,
            is_valid_member_id: false,
        };
        match engine().verify_extracted(&extraction) {
            NameVerification::NotMemberId { quote } => {
                assert_eq!(quote.discount_amount, 0);
                assert_eq!(quote.final_price, 4500);
            }
            other => panic!("expected NotMemberId, got {other:?}"),
        }
    }
}
