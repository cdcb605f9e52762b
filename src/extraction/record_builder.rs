//! Receipt record construction.
//!
//! The builder turns a parsed model payload into a [`ReceiptRecord`]. It never
//! fails: every missing or malformed field degrades to its configured default,
//! and malformed item entries are dropped. Each degradation is logged and
//! returned as a warning so callers can surface it.

use chrono::{NaiveDate, Utc};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::config::FieldDefaults;
use crate::models::{LineItem, Money, ReceiptRecord};

use super::coerce::{self, CoercionError};

/// A freshly built record and the degradations applied while building it.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltRecord {
    /// The populated receipt record.
    pub record: ReceiptRecord,
    /// Human-readable notes about dropped items and defaulted fields.
    pub warnings: Vec<String>,
}

/// Builds receipt records from parsed model payloads.
///
/// # Example
///
/// ```
/// use receipt_engine::extraction::RecordBuilder;
/// use serde_json::json;
///
/// let payload = json!({
///     "restaurant_name": "Corner Cafe",
///     "date": "2026-04-02",
///     "items": [{"name": "Latte", "quantity": 2, "unit_price": 4.5, "total_price": 9.0}],
///     "subtotal": 9.0,
///     "total": 9.0
/// });
/// let built = RecordBuilder::default().build(payload.as_object().unwrap(), "raw");
/// assert_eq!(built.record.items.len(), 1);
/// assert_eq!(built.record.tax.to_string(), "0.00");
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecordBuilder {
    defaults: FieldDefaults,
}

impl RecordBuilder {
    /// Creates a builder with the given field defaults.
    pub fn new(defaults: FieldDefaults) -> Self {
        Self { defaults }
    }

    /// Builds a record, substituting today's date when none is usable.
    pub fn build(&self, payload: &Map<String, Value>, provenance_text: &str) -> BuiltRecord {
        self.build_with_today(payload, provenance_text, Utc::now().date_naive())
    }

    /// Builds a record, substituting `today` when no usable date was extracted.
    pub fn build_with_today(
        &self,
        payload: &Map<String, Value>,
        provenance_text: &str,
        today: NaiveDate,
    ) -> BuiltRecord {
        let mut warnings = Vec::new();

        let restaurant_name = degrade(
            coerce::text("restaurant_name", payload.get("restaurant_name")),
            || self.defaults.restaurant_name.clone(),
            &mut warnings,
        );

        let date = match coerce::date(payload.get("date")) {
            Ok(Some(date)) => date,
            Ok(None) => {
                debug!(%today, "No date extracted, using current date");
                today
            }
            Err(err) => {
                warn!(error = %err, %today, "Unparseable receipt date, using current date");
                warnings.push(format!("{} (used {})", err, today));
                today
            }
        };

        let items = self.build_items(payload.get("items"), &mut warnings);

        let subtotal = degrade_money("subtotal", payload, &mut warnings);
        let tax = degrade_money("tax", payload, &mut warnings);
        let tip = degrade_money("tip", payload, &mut warnings);
        let total = degrade_money("total", payload, &mut warnings);

        let confidence_score = self.confidence(payload.get("confidence_score"), &mut warnings);

        debug!(
            restaurant = %restaurant_name,
            item_count = items.len(),
            warning_count = warnings.len(),
            "Built receipt record"
        );

        BuiltRecord {
            record: ReceiptRecord {
                restaurant_name,
                date,
                items,
                subtotal,
                tax,
                tip,
                total,
                confidence_score,
                provenance_text: provenance_text.to_string(),
            },
            warnings,
        }
    }

    fn build_items(&self, value: Option<&Value>, warnings: &mut Vec<String>) -> Vec<LineItem> {
        let entries = match value {
            None | Some(Value::Null) => return Vec::new(),
            Some(Value::Array(entries)) => entries,
            Some(_) => {
                warn!("Extracted 'items' is not a list, ignoring it");
                warnings.push("items: expected a list, ignored".to_string());
                return Vec::new();
            }
        };

        let mut items = Vec::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            match self.build_item(entry) {
                Ok(item) => items.push(item),
                Err(err) => {
                    warn!(item_index = index, error = %err, "Dropping malformed line item");
                    warnings.push(format!("item {} dropped: {}", index, err));
                }
            }
        }
        items
    }

    fn build_item(&self, entry: &Value) -> Result<LineItem, CoercionError> {
        let fields = entry.as_object().ok_or_else(|| CoercionError {
            field: "item",
            message: "expected an object".to_string(),
        })?;

        let name = coerce::text("name", fields.get("name"))?
            .unwrap_or_else(|| self.defaults.item_name.clone());
        let quantity = coerce::quantity(fields.get("quantity"))?.unwrap_or(1);
        let unit_price = coerce::money("unit_price", fields.get("unit_price"))?.unwrap_or_default();
        let total_price =
            coerce::money("total_price", fields.get("total_price"))?.unwrap_or_default();

        Ok(LineItem {
            name,
            quantity,
            unit_price,
            total_price,
        })
    }

    fn confidence(&self, value: Option<&Value>, warnings: &mut Vec<String>) -> f64 {
        let raw = degrade(
            coerce::score(value),
            || self.defaults.confidence_score,
            warnings,
        );
        if (0.0..=1.0).contains(&raw) {
            return raw;
        }
        let clamped = raw.clamp(0.0, 1.0);
        warn!(raw, clamped, "Confidence score out of range, clamping");
        warnings.push(format!(
            "confidence_score: {} is outside [0, 1], clamped to {}",
            raw, clamped
        ));
        clamped
    }
}

/// Unwraps a coerced value, falling back to `default` on absence or error.
fn degrade<T>(
    coerced: Result<Option<T>, CoercionError>,
    default: impl FnOnce() -> T,
    warnings: &mut Vec<String>,
) -> T {
    match coerced {
        Ok(Some(value)) => value,
        Ok(None) => default(),
        Err(err) => {
            warn!(field = err.field, error = %err, "Malformed field, using default");
            warnings.push(format!("{} (used default)", err));
            default()
        }
    }
}

fn degrade_money(
    field: &'static str,
    payload: &Map<String, Value>,
    warnings: &mut Vec<String>,
) -> Money {
    degrade(coerce::money(field, payload.get(field)), || Money::ZERO, warnings)
}
