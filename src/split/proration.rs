//! Proration of a receipt across fractional item claims.
//!
//! Each participant pays their claimed share of each item, plus tax and tip
//! in proportion to how much of the subtotal they claimed. All arithmetic is
//! exact decimal at the internal scale; rounding to cents happens only when
//! the result is displayed.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::{Money, ReceiptRecord};

/// One participant's claim on a fraction of one line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    /// Who is claiming.
    pub participant: String,
    /// Index into the receipt's item list.
    pub item_index: usize,
    /// Fraction of the item claimed, in `(0, 1]`.
    pub share: Decimal,
}

impl Claim {
    /// Creates a claim.
    pub fn new(participant: impl Into<String>, item_index: usize, share: Decimal) -> Self {
        Self {
            participant: participant.into(),
            item_index,
            share,
        }
    }
}

/// What one participant owes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantShare {
    /// The participant.
    pub participant: String,
    /// Sum of claimed item fractions.
    pub items_amount: Money,
    /// Prorated tax.
    pub tax_share: Money,
    /// Prorated tip (negative when the tip is a discount).
    pub tip_share: Money,
    /// Items plus tax and tip.
    pub total: Money,
}

/// The split of one receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillSplit {
    /// Per-participant amounts, in order of each participant's first claim.
    pub shares: Vec<ParticipantShare>,
    /// Indexes of items not fully claimed.
    pub unclaimed_items: Vec<usize>,
    /// Receipt total minus everything allocated to participants.
    pub unclaimed_amount: Money,
}

fn invalid(claim: &Claim, message: String) -> EngineError {
    EngineError::InvalidClaim {
        participant: claim.participant.clone(),
        message,
    }
}

/// Splits a receipt across fractional item claims.
///
/// The receipt should already be reconciled, so that its subtotal matches its
/// items; tax and tip are prorated against the subtotal.
///
/// # Errors
///
/// Returns [`EngineError::InvalidClaim`] when a claim names an item that does
/// not exist, has a share outside `(0, 1]`, or pushes the shares claimed on
/// an item above 1.
///
/// # Example
///
/// ```
/// use receipt_engine::models::{LineItem, Money, ReceiptRecord};
/// use receipt_engine::split::{Claim, split_bill};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let money = |s: &str| s.parse::<Money>().unwrap();
/// let receipt = ReceiptRecord {
///     restaurant_name: "Dumpling House".to_string(),
///     date: NaiveDate::from_ymd_opt(2026, 6, 20).unwrap(),
///     items: vec![LineItem::new("Dumplings", 1, money("20.00"), money("20.00"))],
///     subtotal: money("20.00"),
///     tax: money("2.00"),
///     tip: money("4.00"),
///     total: money("26.00"),
///     confidence_score: 0.9,
///     provenance_text: String::new(),
/// };
/// let half = Decimal::new(5, 1);
/// let split = split_bill(&receipt, &[Claim::new("ana", 0, half), Claim::new("ben", 0, half)]).unwrap();
/// assert_eq!(split.shares[0].total, money("13.00"));
/// assert_eq!(split.unclaimed_amount, Money::ZERO);
/// ```
pub fn split_bill(record: &ReceiptRecord, claims: &[Claim]) -> EngineResult<BillSplit> {
    let mut claimed_per_item = vec![Decimal::ZERO; record.items.len()];
    let mut participants: Vec<(&str, Money)> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for claim in claims {
        if claim.share <= Decimal::ZERO || claim.share > Decimal::ONE {
            return Err(invalid(
                claim,
                format!("share {} must be greater than 0 and at most 1", claim.share),
            ));
        }

        let item = record.items.get(claim.item_index).ok_or_else(|| {
            invalid(
                claim,
                format!(
                    "item {} does not exist (receipt has {} items)",
                    claim.item_index,
                    record.items.len()
                ),
            )
        })?;

        let claimed = &mut claimed_per_item[claim.item_index];
        *claimed += claim.share;
        if *claimed > Decimal::ONE {
            return Err(invalid(
                claim,
                format!(
                    "item {} ('{}') would be claimed {} times over",
                    claim.item_index,
                    item.name,
                    claimed.normalize()
                ),
            ));
        }

        let amount = item.total_price.scale_by(claim.share);
        let position = *positions
            .entry(claim.participant.as_str())
            .or_insert_with(|| {
                participants.push((claim.participant.as_str(), Money::ZERO));
                participants.len() - 1
            });
        participants[position].1 += amount;
    }

    let shares: Vec<ParticipantShare> = participants
        .into_iter()
        .map(|(participant, items_amount)| {
            let tax_share = record.tax.prorate(items_amount, record.subtotal);
            let tip_share = record.tip.prorate(items_amount, record.subtotal);
            ParticipantShare {
                participant: participant.to_string(),
                items_amount,
                tax_share,
                tip_share,
                total: items_amount + tax_share + tip_share,
            }
        })
        .collect();

    let allocated: Money = shares.iter().map(|share| share.total).sum();
    let unclaimed_items = claimed_per_item
        .iter()
        .enumerate()
        .filter(|(_, claimed)| **claimed < Decimal::ONE)
        .map(|(index, _)| index)
        .collect();

    debug!(
        participants = shares.len(),
        %allocated,
        total = %record.total,
        "Split receipt across claims"
    );

    Ok(BillSplit {
        shares,
        unclaimed_items,
        unclaimed_amount: record.total - allocated,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LineItem;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn money(d: Decimal) -> Money {
        Money::new(d)
    }

    fn dinner() -> ReceiptRecord {
        ReceiptRecord {
            restaurant_name: "Golden Wok".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 2, 7).unwrap(),
            items: vec![
                LineItem::new("Peking Duck", 1, money(dec!(45.00)), money(dec!(45.00))),
                LineItem::new("Fried Rice", 1, money(dec!(12.00)), money(dec!(12.00))),
                LineItem::new("Tea", 3, money(dec!(2.00)), money(dec!(6.00))),
            ],
            subtotal: money(dec!(63.00)),
            tax: money(dec!(5.67)),
            tip: money(dec!(12.60)),
            total: money(dec!(81.27)),
            confidence_score: 0.95,
            provenance_text: String::new(),
        }
    }

    #[test]
    fn test_fully_claimed_receipt_allocates_total() {
        let third = dec!(1) / dec!(3);
        let claims = vec![
            Claim::new("ana", 0, third),
            Claim::new("ben", 0, third),
            Claim::new("cal", 0, dec!(1) - third - third),
            Claim::new("ana", 1, dec!(1)),
            Claim::new("ben", 2, dec!(0.5)),
            Claim::new("cal", 2, dec!(0.5)),
        ];

        let split = split_bill(&dinner(), &claims).unwrap();

        assert_eq!(split.shares.len(), 3);
        assert!(split.unclaimed_items.is_empty());
        assert!(split.unclaimed_amount.abs() <= money(dec!(0.01)));
        let allocated: Money = split.shares.iter().map(|s| s.total).sum();
        assert!(allocated.approx_eq(money(dec!(81.27)), money(dec!(0.01))));
    }

    #[test]
    fn test_tax_and_tip_prorated_by_item_amount() {
        let claims = vec![Claim::new("ana", 1, dec!(1))];
        let split = split_bill(&dinner(), &claims).unwrap();
        let ana = &split.shares[0];

        // 12 / 63 of 5.67 = 1.08, of 12.60 = 2.40
        assert_eq!(ana.items_amount, money(dec!(12.00)));
        assert_eq!(ana.tax_share, money(dec!(1.08)));
        assert_eq!(ana.tip_share, money(dec!(2.40)));
        assert_eq!(ana.total, money(dec!(15.48)));
        assert_eq!(split.unclaimed_items, vec![0, 2]);
        assert_eq!(split.unclaimed_amount, money(dec!(65.79)));
    }

    #[test]
    fn test_participants_in_first_claim_order() {
        let claims = vec![
            Claim::new("zoe", 2, dec!(1)),
            Claim::new("amy", 1, dec!(1)),
            Claim::new("zoe", 0, dec!(1)),
        ];
        let split = split_bill(&dinner(), &claims).unwrap();
        let names: Vec<&str> = split.shares.iter().map(|s| s.participant.as_str()).collect();
        assert_eq!(names, vec!["zoe", "amy"]);
        assert_eq!(split.shares[0].items_amount, money(dec!(51.00)));
    }

    #[test]
    fn test_negative_tip_discount_is_shared() {
        let mut receipt = dinner();
        receipt.tax = Money::ZERO;
        receipt.tip = money(dec!(-6.30));
        receipt.total = money(dec!(56.70));
        let claims = vec![Claim::new("ana", 0, dec!(1)), Claim::new("ben", 1, dec!(1)), Claim::new("ben", 2, dec!(1))];

        let split = split_bill(&receipt, &claims).unwrap();

        assert_eq!(split.shares[0].tip_share, money(dec!(-4.50)));
        assert_eq!(split.shares[1].tip_share, money(dec!(-1.80)));
        assert_eq!(split.unclaimed_amount, Money::ZERO);
    }

    #[test]
    fn test_zero_subtotal_prorates_nothing() {
        let mut receipt = dinner();
        receipt.items = vec![LineItem::new("Free Bread", 1, Money::ZERO, Money::ZERO)];
        receipt.subtotal = Money::ZERO;
        let split = split_bill(&receipt, &[Claim::new("ana", 0, dec!(1))]).unwrap();
        assert_eq!(split.shares[0].tax_share, Money::ZERO);
        assert_eq!(split.shares[0].tip_share, Money::ZERO);
    }

    #[test]
    fn test_unknown_item_rejected() {
        let result = split_bill(&dinner(), &[Claim::new("ana", 9, dec!(1))]);
        match result {
            Err(EngineError::InvalidClaim { participant, message }) => {
                assert_eq!(participant, "ana");
                assert!(message.contains("does not exist"));
            }
            other => panic!("expected InvalidClaim, got {other:?}"),
        }
    }

    #[test]
    fn test_share_out_of_range_rejected() {
        assert!(split_bill(&dinner(), &[Claim::new("ana", 0, dec!(0))]).is_err());
        assert!(split_bill(&dinner(), &[Claim::new("ana", 0, dec!(-0.5))]).is_err());
        assert!(split_bill(&dinner(), &[Claim::new("ana", 0, dec!(1.5))]).is_err());
    }

    #[test]
    fn test_over_claimed_item_rejected() {
        let claims = vec![Claim::new("ana", 0, dec!(0.6)), Claim::new("ben", 0, dec!(0.6))];
        match split_bill(&dinner(), &claims) {
            Err(EngineError::InvalidClaim { participant, .. }) => assert_eq!(participant, "ben"),
            other => panic!("expected InvalidClaim, got {other:?}"),
        }
    }

    #[test]
    fn test_no_claims_leaves_everything_unclaimed() {
        let split = split_bill(&dinner(), &[]).unwrap();
        assert!(split.shares.is_empty());
        assert_eq!(split.unclaimed_items, vec![0, 1, 2]);
        assert_eq!(split.unclaimed_amount, money(dec!(81.27)));
    }
}
