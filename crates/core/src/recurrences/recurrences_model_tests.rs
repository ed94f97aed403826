#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;
    use serde_json::json;
    use std::collections::BTreeSet;

    use crate::ledger::EntryKind;
    use crate::recurrences::recurrences_model::{
        Frequency, MaterializationFailure, MaterializationReport, RecurrenceDefinition,
    };
    use crate::recurrences::RecurrenceError;
    use crate::utils::time_utils::MonthKey;

    fn make_definition() -> RecurrenceDefinition {
        let mut skipped_months = BTreeSet::new();
        skipped_months.insert(MonthKey::new(2024, 3));
        RecurrenceDefinition {
            id: "rec-1".to_string(),
            owner_id: "user-1".to_string(),
            name: "Rent".to_string(),
            amount: dec!(1500),
            kind: EntryKind::Expense,
            category: "Housing".to_string(),
            frequency: Frequency::Monthly,
            start_date: Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap(),
            end_date: None,
            is_active: true,
            skipped_months,
        }
    }

    #[test]
    fn test_frequency_serializes_lowercase() {
        assert_eq!(serde_json::to_value(Frequency::Biweekly).unwrap(), json!("biweekly"));
        let parsed: Frequency = serde_json::from_value(json!("quarterly")).unwrap();
        assert_eq!(parsed, Frequency::Quarterly);
    }

    #[test]
    fn test_frequency_as_str_round_trips() {
        let all = [
            Frequency::Weekly,
            Frequency::Biweekly,
            Frequency::Monthly,
            Frequency::Quarterly,
            Frequency::Yearly,
        ];
        for frequency in all {
            assert_eq!(frequency.as_str().parse::<Frequency>().unwrap(), frequency);
        }
    }

    #[test]
    fn test_frequency_rejects_unknown_value() {
        let err = "fortnightly".parse::<Frequency>().unwrap_err();
        assert!(matches!(err, RecurrenceError::InvalidFrequency(ref v) if v == "fortnightly"));
    }

    #[test]
    fn test_definition_serializes_camel_case() {
        let json = serde_json::to_value(make_definition()).unwrap();

        assert_eq!(json["ownerId"], json!("user-1"));
        assert_eq!(json["frequency"], json!("monthly"));
        assert_eq!(json["startDate"], json!("2024-01-15T00:00:00+00:00"));
        assert_eq!(json["isActive"], json!(true));
        assert_eq!(json["skippedMonths"], json!(["2024-03"]));
        // Absent end dates are omitted rather than serialized as null.
        assert!(json.get("endDate").is_none());
    }

    #[test]
    fn test_definition_round_trips() {
        let mut definition = make_definition();
        definition.end_date = Some(Utc.with_ymd_and_hms(2025, 6, 30, 0, 0, 0).unwrap());

        let json = serde_json::to_string(&definition).unwrap();
        let back: RecurrenceDefinition = serde_json::from_str(&json).unwrap();
        assert_eq!(back, definition);
    }

    #[test]
    fn test_definition_accepts_date_only_start() {
        let json = json!({
            "id": "rec-1",
            "ownerId": "user-1",
            "name": "Rent",
            "amount": 1500.0,
            "kind": "expense",
            "category": "Housing",
            "frequency": "monthly",
            "startDate": "2024-01-15",
            "isActive": true
        });

        let definition: RecurrenceDefinition = serde_json::from_value(json).unwrap();
        assert_eq!(
            definition.start_date,
            Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap()
        );
        assert!(definition.skipped_months.is_empty());
    }

    #[test]
    fn test_report_partial_flag_tracks_failures() {
        let mut report = MaterializationReport::new(MonthKey::new(2024, 3));
        assert!(!report.is_partial());

        report.failures.push(MaterializationFailure {
            recurrence_id: "rec-1".to_string(),
            message: "write failed".to_string(),
        });
        assert!(report.is_partial());
    }
}
