//! Renderings of a lookup result for terminals and machine consumers.

use crate::model::{CouncilMeta, LookupResult};

const SHORT_DATE: &str = "%d/%m/%y";

/// Render a result as plain text, one collection per line.
#[must_use]
pub fn render_text(result: &LookupResult, council: &CouncilMeta) -> String {
    let mut lines = vec![format!("{} bin collections", result.address)];

    if result.is_empty() {
        lines.push("No upcoming collections listed".to_owned());
    }
    lines.extend(result.collections.iter().map(|collection| {
        format!(
            "{} - {}",
            collection.bin_type,
            collection.date.format(SHORT_DATE)
        )
    }));
    lines.push(format!("Visit {}", council.portal));

    lines.join("\n")
}

/// Render a result as JSON: `{"address": ..., "collections": [{"type": ..., "date": ...}]}`.
///
/// # Errors
///
/// Returns the serializer error, which cannot happen for well-formed results.
pub fn render_json(result: &LookupResult) -> Result<String, serde_json::Error> {
    serde_json::to_string(result)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::model::{BinType, Collection, CouncilId};

    fn council() -> CouncilMeta {
        CouncilMeta {
            id: CouncilId("belfast".to_owned()),
            name: "Belfast".to_owned(),
            portal: "online.belfastcity.gov.uk/find-bin-collection-day".to_owned(),
        }
    }

    fn sample() -> LookupResult {
        LookupResult {
            address: "12 Example Street".to_owned(),
            collections: vec![
                Collection {
                    bin_type: BinType::General,
                    date: NaiveDate::from_ymd_opt(2025, 9, 1).expect("valid date"),
                },
                Collection {
                    bin_type: BinType::Other("Glass".to_owned()),
                    date: NaiveDate::from_ymd_opt(2025, 9, 4).expect("valid date"),
                },
            ],
        }
    }

    #[test]
    fn text_lists_collections_with_short_dates() {
        let text = render_text(&sample(), &council());

        assert_eq!(
            text,
            "12 Example Street bin collections\n\
             General - 01/09/25\n\
             Glass - 04/09/25\n\
             Visit online.belfastcity.gov.uk/find-bin-collection-day"
        );
    }

    #[test]
    fn text_notes_an_empty_schedule() {
        let result = LookupResult {
            address: "1 Main Road".to_owned(),
            collections: Vec::new(),
        };

        let text = render_text(&result, &council());
        assert!(text.contains("No upcoming collections listed"));
    }

    #[test]
    fn json_uses_type_and_iso_date_keys() {
        let json = render_json(&sample()).expect("serializable");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");

        assert_eq!(value["address"], "12 Example Street");
        assert_eq!(value["collections"][0]["type"], "General");
        assert_eq!(value["collections"][0]["date"], "2025-09-01");
        assert_eq!(value["collections"][1]["type"], "Glass");
    }
}
