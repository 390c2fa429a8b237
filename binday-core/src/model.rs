//! Domain data structures for councils, lookup requests, and collection schedules.

use std::collections::HashMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Identifier for a council portal known to binday.
pub struct CouncilId(pub String);

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Metadata describing a council and where residents can check schedules themselves.
pub struct CouncilMeta {
    /// Unique identifier.
    pub id: CouncilId,
    /// Display name.
    pub name: String,
    /// Public address of the council's lookup page, without scheme.
    pub portal: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Kinds of bin the council collects.
pub enum BinType {
    /// General (black) waste.
    General,
    /// Dry recycling.
    Recycling,
    /// Garden and food waste (brown bin).
    Compost,
    /// Any other bin, named as the portal names it.
    Other(String),
}

impl BinType {
    /// Position of this bin type when several are collected on the same day.
    #[must_use]
    pub fn preference_rank(&self) -> u8 {
        match self {
            BinType::General => 0,
            BinType::Recycling => 1,
            BinType::Compost => 2,
            BinType::Other(_) => u8::MAX,
        }
    }

    /// Inverse of the [`fmt::Display`] rendering.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label {
            "General" => BinType::General,
            "Recycling" => BinType::Recycling,
            "Compost" => BinType::Compost,
            other => BinType::Other(other.to_owned()),
        }
    }
}

impl fmt::Display for BinType {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BinType::General => "General",
            BinType::Recycling => "Recycling",
            BinType::Compost => "Compost",
            BinType::Other(name) => name,
        };
        write!(formatter, "{label}")
    }
}

impl Serialize for BinType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BinType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(BinType::from_label(&label))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Next scheduled collection for one kind of bin.
pub struct Collection {
    /// Kind of bin.
    #[serde(rename = "type")]
    pub bin_type: BinType,
    /// Date of the next collection.
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Outcome of a successful lookup.
pub struct LookupResult {
    /// Short display form of the matched address.
    pub address: String,
    /// Collections, soonest first.
    pub collections: Vec<Collection>,
}

impl LookupResult {
    /// Build a result from the per-type mapping, sorting by date and then by bin preference.
    #[must_use]
    pub fn from_entries(address: String, entries: HashMap<BinType, NaiveDate>) -> Self {
        let mut collections: Vec<Collection> = entries
            .into_iter()
            .map(|(bin_type, date)| Collection { bin_type, date })
            .collect();

        collections.sort_by(|left, right| {
            left.date
                .cmp(&right.date)
                .then_with(|| left.bin_type.preference_rank().cmp(&right.bin_type.preference_rank()))
                .then_with(|| left.bin_type.to_string().cmp(&right.bin_type.to_string()))
        });

        Self {
            address,
            collections,
        }
    }

    /// Whether the portal listed no collections for the address.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
/// Input of a single lookup.
pub struct LookupRequest {
    /// Postcode to search for.
    pub postcode: String,
    /// Optional fragment of the address, used to pick one of several matches.
    pub address_hint: Option<String>,
    /// Record a debug trace and attach it to failures.
    pub debug: bool,
}

impl LookupRequest {
    /// Construct a new request.
    #[must_use]
    pub fn new<P: Into<String>, H: Into<String>>(postcode: P, address_hint: Option<H>) -> Self {
        Self {
            postcode: postcode.into(),
            address_hint: address_hint.map(Into::into),
            debug: false,
        }
    }

    /// Enable or disable the debug trace.
    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
    }

    #[test]
    fn collections_sort_by_date_then_preference() {
        let entries = HashMap::from([
            (BinType::Other("Glass".to_owned()), date(2025, 9, 1)),
            (BinType::Compost, date(2025, 9, 1)),
            (BinType::General, date(2025, 9, 8)),
            (BinType::Recycling, date(2025, 9, 1)),
        ]);

        let result = LookupResult::from_entries("12 Example Street".to_owned(), entries);
        let order: Vec<BinType> = result
            .collections
            .iter()
            .map(|collection| collection.bin_type.clone())
            .collect();

        assert_eq!(
            order,
            vec![
                BinType::Recycling,
                BinType::Compost,
                BinType::Other("Glass".to_owned()),
                BinType::General,
            ]
        );
    }

    #[test]
    fn same_day_ties_prefer_general_first() {
        let entries = HashMap::from([
            (BinType::Compost, date(2025, 9, 4)),
            (BinType::Recycling, date(2025, 9, 4)),
            (BinType::General, date(2025, 9, 4)),
        ]);

        let result = LookupResult::from_entries(String::new(), entries);
        let order: Vec<String> = result
            .collections
            .iter()
            .map(|collection| collection.bin_type.to_string())
            .collect();

        assert_eq!(order, ["General", "Recycling", "Compost"]);
    }

    #[test]
    fn bin_type_label_round_trips_through_display() {
        for bin_type in [
            BinType::General,
            BinType::Recycling,
            BinType::Compost,
            BinType::Other("Glass Box".to_owned()),
        ] {
            assert_eq!(BinType::from_label(&bin_type.to_string()), bin_type);
        }
    }

    #[test]
    fn empty_result_is_not_an_error() {
        let result = LookupResult::from_entries("1 Main Road".to_owned(), HashMap::new());
        assert!(result.is_empty());
        assert_eq!(result.address, "1 Main Road");
    }
}
