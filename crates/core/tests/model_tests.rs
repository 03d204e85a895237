use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use portfolio_timeline_core::clock::{Clock, FixedClock};
use portfolio_timeline_core::errors::CoreError;
use portfolio_timeline_core::models::asset::AssetWithHistory;
use portfolio_timeline_core::models::asset_value::{sort_chronologically, AssetValuePoint};
use portfolio_timeline_core::models::change::{percentage_change, ChangeSummary};
use portfolio_timeline_core::models::history::{AssetValueChange, PortfolioHistoryTimePoint};
use portfolio_timeline_core::models::range::DateRangeQuery;
use portfolio_timeline_core::models::settings::{TimelineSettings, DEFAULT_MAX_RANGE_DAYS};

fn dt(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ═══════════════════════════════════════════════════════════════════
//  AssetValuePoint
// ═══════════════════════════════════════════════════════════════════

mod asset_value_point {
    use super::*;

    #[test]
    fn new_has_identity() {
        let p = AssetValuePoint::new("isa", 100.0, dt(2024, 1, 1));
        assert!(p.id.is_some());
        assert!(!p.is_synthetic());
        assert_eq!(p.asset_id, "isa");
        assert_eq!(p.created_at, p.recorded_at);
        assert_eq!(p.updated_at, p.recorded_at);
    }

    #[test]
    fn new_generates_distinct_ids() {
        let a = AssetValuePoint::new("isa", 1.0, dt(2024, 1, 1));
        let b = AssetValuePoint::new("isa", 1.0, dt(2024, 1, 1));
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn synthetic_has_no_identity() {
        let p = AssetValuePoint::synthetic("isa", 50.0, dt(2024, 3, 1));
        assert!(p.is_synthetic());
        assert_eq!(p.value, 50.0);
        assert_eq!(p.recorded_at, dt(2024, 3, 1));
    }

    #[test]
    fn day_discards_time_of_day() {
        let at = Utc.with_ymd_and_hms(2024, 5, 6, 23, 59, 59).unwrap();
        let p = AssetValuePoint::new("isa", 1.0, at);
        assert_eq!(p.day(), day(2024, 5, 6));
    }

    #[test]
    fn sort_is_stable_for_equal_timestamps() {
        let mut points = vec![
            AssetValuePoint::new("a", 3.0, dt(2024, 1, 3)),
            AssetValuePoint::new("a", 1.0, dt(2024, 1, 1)),
            AssetValuePoint::new("a", 2.0, dt(2024, 1, 1)),
        ];
        sort_chronologically(&mut points);
        let values: Vec<f64> = points.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn serializes_camel_case_with_null_id() {
        let p = AssetValuePoint::synthetic("isa", 10.0, dt(2024, 1, 1));
        let json = serde_json::to_value(&p).unwrap();
        assert!(json["id"].is_null());
        assert_eq!(json["assetId"], "isa");
        assert!(json.get("recordedAt").is_some());
    }

    #[test]
    fn deserializes_persisted_row() {
        let json = r#"{
            "id": "6f1c2b9e-6a43-4f0e-9a55-3b0f3f1f2d11",
            "assetId": "pension",
            "value": 1234.5,
            "recordedAt": "2024-01-02T10:00:00Z",
            "createdAt": "2024-01-02T10:00:00Z",
            "updatedAt": "2024-01-03T08:00:00Z"
        }"#;
        let p: AssetValuePoint = serde_json::from_str(json).unwrap();
        assert!(!p.is_synthetic());
        assert_eq!(p.asset_id, "pension");
        assert_eq!(p.value, 1234.5);
        assert_eq!(p.day(), day(2024, 1, 2));
    }
}

// ═══════════════════════════════════════════════════════════════════
//  DateRangeQuery
// ═══════════════════════════════════════════════════════════════════

mod date_range_query {
    use super::*;

    #[test]
    fn parse_rfc3339() {
        let q = DateRangeQuery::parse(Some("2024-01-01T00:00:00Z"), Some("2024-01-31T12:00:00+02:00"))
            .unwrap();
        assert_eq!(q.start, Some(dt(2024, 1, 1)));
        assert_eq!(
            q.end,
            Some(Utc.with_ymd_and_hms(2024, 1, 31, 10, 0, 0).unwrap())
        );
    }

    #[test]
    fn parse_plain_date_is_utc_midnight() {
        let q = DateRangeQuery::parse(Some("2024-02-29"), None).unwrap();
        assert_eq!(q.start, Some(dt(2024, 2, 29)));
        assert_eq!(q.end, None);
    }

    #[test]
    fn parse_empty_string_is_absent() {
        let q = DateRangeQuery::parse(Some(""), Some("   ")).unwrap();
        assert_eq!(q, DateRangeQuery::default());
    }

    #[test]
    fn parse_rejects_garbage() {
        let err = DateRangeQuery::parse(Some("yesterday"), None).unwrap_err();
        assert!(matches!(err, CoreError::InvalidDate(msg) if msg.contains("yesterday")));
    }

    #[test]
    fn parse_rejects_impossible_date() {
        assert!(DateRangeQuery::parse(None, Some("2024-02-30")).is_err());
    }

    #[test]
    fn resolve_fills_missing_start_from_earliest() {
        let q = DateRangeQuery::new(None, Some(dt(2024, 3, 1)));
        let r = q.resolve(Some(dt(2024, 1, 5)), dt(2030, 1, 1));
        assert_eq!(r.start, Some(dt(2024, 1, 5)));
        assert_eq!(r.end, dt(2024, 3, 1));
    }

    #[test]
    fn resolve_fills_missing_end_from_now() {
        let q = DateRangeQuery::new(Some(dt(2024, 1, 1)), None);
        let r = q.resolve(None, dt(2024, 6, 1));
        assert_eq!(r.start, Some(dt(2024, 1, 1)));
        assert_eq!(r.end, dt(2024, 6, 1));
    }

    #[test]
    fn resolved_contains_is_inclusive() {
        let r = DateRangeQuery::between(dt(2024, 1, 1), dt(2024, 1, 31)).resolve(None, dt(2030, 1, 1));
        assert!(r.contains(dt(2024, 1, 1)));
        assert!(r.contains(dt(2024, 1, 31)));
        assert!(!r.contains(dt(2024, 2, 1)));
        assert_eq!(r.start_day(), Some(day(2024, 1, 1)));
        assert_eq!(r.end_day(), day(2024, 1, 31));
    }

    #[test]
    fn deserializes_with_missing_fields() {
        let q: DateRangeQuery = serde_json::from_str(r#"{"start":"2024-01-01T00:00:00Z"}"#).unwrap();
        assert_eq!(q.start, Some(dt(2024, 1, 1)));
        assert_eq!(q.end, None);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  ChangeSummary
// ═══════════════════════════════════════════════════════════════════

mod change_summary {
    use super::*;

    #[test]
    fn between_derives_changes() {
        let s = ChangeSummary::between(dt(2024, 1, 1), dt(2024, 2, 1), 200.0, 250.0);
        assert_eq!(s.currency_change, 50.0);
        assert_eq!(s.percentage_change, 25.0);
    }

    #[test]
    fn zeroed_is_all_zero() {
        let s = ChangeSummary::zeroed(dt(2024, 1, 1));
        assert_eq!(s.start_date, s.end_date);
        assert_eq!(s.start_value, 0.0);
        assert_eq!(s.value, 0.0);
        assert_eq!(s.currency_change, 0.0);
        assert_eq!(s.percentage_change, 0.0);
    }

    #[test]
    fn percentage_from_zero_to_zero_is_zero() {
        assert_eq!(percentage_change(0.0, 0.0), 0.0);
    }

    #[test]
    fn percentage_from_zero_to_positive_is_hundred() {
        assert_eq!(percentage_change(0.0, 5.0), 100.0);
    }

    #[test]
    fn percentage_from_zero_to_negative_is_zero() {
        assert_eq!(percentage_change(0.0, -5.0), 0.0);
    }

    #[test]
    fn percentage_loss() {
        assert_eq!(percentage_change(200.0, 150.0), -25.0);
    }

    #[test]
    fn percentage_is_always_finite() {
        for (a, b) in [(0.0, 0.0), (0.0, 1e12), (1e-9, 1.0), (-100.0, 50.0)] {
            assert!(percentage_change(a, b).is_finite());
        }
    }

    #[test]
    fn serializes_camel_case() {
        let s = ChangeSummary::between(dt(2024, 1, 1), dt(2024, 1, 2), 1.0, 2.0);
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["startValue"], 1.0);
        assert_eq!(json["currencyChange"], 1.0);
        assert_eq!(json["percentageChange"], 100.0);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  PortfolioHistoryTimePoint / AssetWithHistory
// ═══════════════════════════════════════════════════════════════════

mod history {
    use super::*;

    #[test]
    fn time_point_serializes_date_only() {
        let tp = PortfolioHistoryTimePoint {
            date: day(2024, 1, 2),
            value: 300.0,
            changes: vec![AssetValueChange {
                asset_id: "a".into(),
                previous_value: 100.0,
                new_value: 300.0,
                change: 200.0,
            }],
        };
        let json = serde_json::to_value(&tp).unwrap();
        assert_eq!(json["date"], "2024-01-02");
        assert_eq!(json["changes"][0]["previousValue"], 100.0);
        assert_eq!(json["changes"][0]["newValue"], 300.0);
    }

    #[test]
    fn asset_with_history_new() {
        let asset = AssetWithHistory::new("isa", vec![AssetValuePoint::new("isa", 1.0, dt(2024, 1, 1))]);
        assert_eq!(asset.id, "isa");
        assert_eq!(asset.history.len(), 1);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  TimelineSettings / Clock
// ═══════════════════════════════════════════════════════════════════

mod settings {
    use super::*;

    #[test]
    fn defaults() {
        let s = TimelineSettings::default();
        assert_eq!(s.max_range_days, DEFAULT_MAX_RANGE_DAYS);
        assert!(s.require_bounded_history);
    }

    #[test]
    fn from_json_partial_keeps_defaults() {
        let s = TimelineSettings::from_json(r#"{"maxRangeDays": 365}"#).unwrap();
        assert_eq!(s.max_range_days, 365);
        assert!(s.require_bounded_history);
    }

    #[test]
    fn from_json_empty_object() {
        let s = TimelineSettings::from_json("{}").unwrap();
        assert_eq!(s, TimelineSettings::default());
    }

    #[test]
    fn from_json_rejects_malformed() {
        let err = TimelineSettings::from_json("{maxRangeDays").unwrap_err();
        assert!(matches!(err, CoreError::Deserialization(_)));
    }

    #[test]
    fn fixed_clock() {
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 7, 4, 15, 30, 0).unwrap());
        assert_eq!(clock.now().date_naive(), day(2024, 7, 4));
        assert_eq!(clock.now(), clock.now());
    }
}
