//! Calculation records produced by the pricing engines.
//!
//! These are the values returned by previews and stored verbatim by the
//! archive operation. Money is carried as `Decimal` and serialized as JSON
//! numbers; deserialization also accepts decimal strings.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Map, Value};
use uuid::Uuid;

use super::store::Collection;

/// Discriminator stored on every UK record.
pub const UK_CALCULATOR_TYPE: &str = "uk";

pub(crate) fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn uk_calculator_type() -> String {
    UK_CALCULATOR_TYPE.to_string()
}

/// Ground fixing method for international installs
///
/// Any other spelling is kept as given and priced like angle steel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroundFixingMethod {
    #[default]
    #[serde(rename = "Angle Steel")]
    AngleSteel,
    #[serde(rename = "Inner GMS Post with Baseplate")]
    InnerGmsPostWithBaseplate,
    #[serde(untagged)]
    Other(String),
}

impl GroundFixingMethod {
    pub fn as_str(&self) -> &str {
        match self {
            GroundFixingMethod::AngleSteel => "Angle Steel",
            GroundFixingMethod::InnerGmsPostWithBaseplate => "Inner GMS Post with Baseplate",
            GroundFixingMethod::Other(name) => name,
        }
    }

    /// Field deserializer treating `null` like an absent method.
    pub(crate) fn deserialize_or_default<'de, D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<Self>::deserialize(deserializer)?.unwrap_or_default())
    }
}

/// Markup tiers offered to the customer and internal overrun cases.
///
/// Built only by [`crate::pricing::calculators::scenarios`] so every figure
/// stays a function of the breakdown's raw total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenarios {
    pub markup_30: Decimal,
    pub markup_40: Decimal,
    pub markup_50: Decimal,
    pub markup_60: Decimal,
    pub bad_case_20: Decimal,
    pub more_bad_case_40: Decimal,
    pub worst_case_80: Decimal,
}

/// International cost breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub work_days: Decimal,
    pub daily_rate_per_man: Decimal,
    pub labor_cost: Decimal,
    pub tools_cost: Decimal,
    pub supervision_cost: Decimal,
    pub flight_ticket: Decimal,
    pub ground_fixing_cost: Decimal,
    pub raw_total: Decimal,
    pub rate_per_meter: Decimal,
    #[serde(flatten)]
    pub scenarios: Scenarios,
}

/// UK cost breakdown
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UkCostBreakdown {
    pub work_days: Decimal,
    pub num_labourers: u32,
    pub daily_rate_per_man: Decimal,
    pub labor_cost: Decimal,
    pub tools_cost: Decimal,
    pub accommodation_cost: Decimal,
    pub transportation_cost: Decimal,
    pub concrete_cost: Decimal,
    pub raw_total: Decimal,
    pub rate_per_meter: Decimal,
    #[serde(flatten)]
    pub scenarios: Scenarios,
}

/// International calculation record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Calculation {
    #[serde(default = "new_id")]
    pub id: String,
    pub user_name: String,
    pub project_name: String,
    pub country: String,
    pub fence_type: String,
    pub meters: Decimal,
    pub gates: u32,
    #[serde(default, deserialize_with = "GroundFixingMethod::deserialize_or_default")]
    pub ground_fixing_method: GroundFixingMethod,
    pub breakdown: CostBreakdown,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

/// UK calculation record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UkCalculation {
    #[serde(default = "new_id")]
    pub id: String,
    #[serde(default = "uk_calculator_type")]
    pub calculator_type: String,
    pub user_name: String,
    pub project_name: String,
    pub fence_type: String,
    pub meters: Decimal,
    pub gates: u32,
    pub is_time_sensitive: bool,
    #[serde(default)]
    pub days_available: Option<u32>,
    pub num_labourers: u32,
    #[serde(default)]
    pub delivery_lead: Option<String>,
    #[serde(default)]
    pub delivery_copilot: Option<String>,
    pub breakdown: UkCostBreakdown,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

/// A calculation that can be archived in a record store collection.
pub trait StoredCalculation: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const COLLECTION: Collection;

    fn id(&self) -> &str;

    fn recorded_at(&self) -> DateTime<Utc>;

    /// Normalise fields that are fixed for the collection before storing.
    fn prepare_for_archive(&mut self) {}

    /// Backfill fields that older documents lack before validation.
    fn upgrade_document(_document: &mut Value) {}
}

impl StoredCalculation for Calculation {
    const COLLECTION: Collection = Collection::International;

    fn id(&self) -> &str {
        &self.id
    }

    fn recorded_at(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn upgrade_document(document: &mut Value) {
        upgrade_international_document(document);
    }
}

impl StoredCalculation for UkCalculation {
    const COLLECTION: Collection = Collection::Uk;

    fn id(&self) -> &str {
        &self.id
    }

    fn recorded_at(&self) -> DateTime<Utc> {
        self.timestamp
    }

    fn prepare_for_archive(&mut self) {
        self.calculator_type = uk_calculator_type();
    }
}

/// Bring an older international document up to the current shape.
///
/// - missing `ground_fixing_method` becomes "Angle Steel"
/// - missing `breakdown.daily_rate_per_man` becomes 0.0
/// - `breakdown.ground_fixing_screws` is renamed to `ground_fixing_cost`,
///   otherwise a missing `ground_fixing_cost` becomes 0.0
pub fn upgrade_international_document(document: &mut Value) {
    let Some(record) = document.as_object_mut() else {
        return;
    };

    if is_missing(record, "ground_fixing_method") {
        record.insert(
            "ground_fixing_method".to_string(),
            json!(GroundFixingMethod::AngleSteel.as_str()),
        );
    }

    if let Some(Value::Object(breakdown)) = record.get_mut("breakdown") {
        if is_missing(breakdown, "daily_rate_per_man") {
            breakdown.insert("daily_rate_per_man".to_string(), json!(0.0));
        }

        if !breakdown.contains_key("ground_fixing_cost") {
            let legacy = breakdown
                .remove("ground_fixing_screws")
                .unwrap_or_else(|| json!(0.0));
            breakdown.insert("ground_fixing_cost".to_string(), legacy);
        }
    }
}

fn is_missing(map: &Map<String, Value>, key: &str) -> bool {
    matches!(map.get(key), None | Some(Value::Null))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn legacy_document() -> Value {
        json!({
            "id": "legacy-1",
            "user_name": "Sam",
            "project_name": "Ascot",
            "country": "Ireland",
            "fence_type": "PR",
            "meters": 240.0,
            "gates": 0,
            "breakdown": {
                "work_days": 2.0,
                "labor_cost": 3456.0,
                "tools_cost": 400.0,
                "supervision_cost": 500.0,
                "flight_ticket": 500.0,
                "ground_fixing_screws": 240.0,
                "raw_total": 5096.0,
                "rate_per_meter": 21.23,
                "markup_30": 6624.8,
                "markup_40": 7134.4,
                "markup_50": 7644.0,
                "markup_60": 8153.6,
                "bad_case_20": 6115.2,
                "more_bad_case_40": 7134.4,
                "worst_case_80": 9172.8
            },
            "timestamp": "2024-05-01T09:30:00.123456+00:00"
        })
    }

    #[test]
    fn test_upgrade_backfills_daily_rate_and_method() {
        let mut doc = legacy_document();
        upgrade_international_document(&mut doc);

        let calc: Calculation = serde_json::from_value(doc).unwrap();
        assert_eq!(calc.breakdown.daily_rate_per_man, Decimal::ZERO);
        assert_eq!(calc.ground_fixing_method, GroundFixingMethod::AngleSteel);
        assert_eq!(calc.breakdown.rate_per_meter, dec!(21.23));
    }

    #[test]
    fn test_upgrade_renames_ground_fixing_screws() {
        let mut doc = legacy_document();
        upgrade_international_document(&mut doc);

        assert!(doc["breakdown"].get("ground_fixing_screws").is_none());
        let calc: Calculation = serde_json::from_value(doc).unwrap();
        assert_eq!(calc.breakdown.ground_fixing_cost, dec!(240));
    }

    #[test]
    fn test_upgrade_defaults_missing_ground_fixing_cost() {
        let mut doc = legacy_document();
        doc["breakdown"]
            .as_object_mut()
            .unwrap()
            .remove("ground_fixing_screws");
        upgrade_international_document(&mut doc);

        let calc: Calculation = serde_json::from_value(doc).unwrap();
        assert_eq!(calc.breakdown.ground_fixing_cost, Decimal::ZERO);
    }

    #[test]
    fn test_upgrade_keeps_existing_values() {
        let mut doc = legacy_document();
        doc["ground_fixing_method"] = json!("Inner GMS Post with Baseplate");
        doc["breakdown"]["daily_rate_per_man"] = json!("216.00");
        upgrade_international_document(&mut doc);

        let calc: Calculation = serde_json::from_value(doc).unwrap();
        assert_eq!(
            calc.ground_fixing_method,
            GroundFixingMethod::InnerGmsPostWithBaseplate
        );
        assert_eq!(calc.breakdown.daily_rate_per_man, dec!(216.00));
    }

    #[test]
    fn test_upgrade_ignores_non_objects() {
        let mut doc = json!("not a record");
        upgrade_international_document(&mut doc);
        assert_eq!(doc, json!("not a record"));
    }

    #[test]
    fn test_breakdown_serializes_flat_money_numbers() {
        let mut doc = legacy_document();
        upgrade_international_document(&mut doc);
        let calc: Calculation = serde_json::from_value(doc).unwrap();

        let value = serde_json::to_value(&calc).unwrap();
        let breakdown = &value["breakdown"];
        assert!(breakdown["work_days"].is_f64());
        assert_eq!(breakdown["work_days"].as_f64(), Some(2.0));
        assert!(breakdown["markup_40"].is_number());
        assert_eq!(breakdown["markup_40"], breakdown["more_bad_case_40"]);
        assert!(breakdown.get("scenarios").is_none());
        assert_eq!(value["ground_fixing_method"], json!("Angle Steel"));
        assert!(value["meters"].is_number());

        // and the numbers read back to the same record
        let reread: Calculation = serde_json::from_value(value).unwrap();
        assert_eq!(reread.breakdown.scenarios.markup_40, dec!(7134.4));
    }

    #[test]
    fn test_null_ground_fixing_method_is_angle_steel() {
        let mut doc = legacy_document();
        upgrade_international_document(&mut doc);
        doc["ground_fixing_method"] = Value::Null;

        let calc: Calculation = serde_json::from_value(doc).unwrap();
        assert_eq!(calc.ground_fixing_method, GroundFixingMethod::AngleSteel);
    }

    #[test]
    fn test_unknown_ground_fixing_method_is_kept() {
        let mut doc = legacy_document();
        doc["ground_fixing_method"] = json!("Angle steel (galv)");
        upgrade_international_document(&mut doc);

        let calc: Calculation = serde_json::from_value(doc).unwrap();
        assert_eq!(
            calc.ground_fixing_method,
            GroundFixingMethod::Other("Angle steel (galv)".to_string())
        );
        let value = serde_json::to_value(&calc).unwrap();
        assert_eq!(value["ground_fixing_method"], json!("Angle steel (galv)"));
    }

    #[test]
    fn test_uk_record_defaults_calculator_type() {
        let doc = json!({
            "id": "uk-1",
            "user_name": "Alex",
            "project_name": "Cheltenham",
            "fence_type": "OR",
            "meters": "100",
            "gates": 0,
            "is_time_sensitive": false,
            "num_labourers": 2,
            "breakdown": {
                "work_days": "2",
                "num_labourers": 2,
                "daily_rate_per_man": "200.0",
                "labor_cost": "800.00",
                "tools_cost": "400",
                "accommodation_cost": "300.00",
                "transportation_cost": "250.0",
                "concrete_cost": "0",
                "raw_total": "1750.00",
                "rate_per_meter": "17.50",
                "markup_30": "2275.00",
                "markup_40": "2450.00",
                "markup_50": "2625.00",
                "markup_60": "2800.00",
                "bad_case_20": "2100.00",
                "more_bad_case_40": "2450.00",
                "worst_case_80": "3150.00"
            },
            "timestamp": "2024-05-01T09:30:00Z"
        });

        let calc: UkCalculation = serde_json::from_value(doc).unwrap();
        assert_eq!(calc.calculator_type, UK_CALCULATOR_TYPE);
        assert_eq!(calc.delivery_lead, None);
    }
}
