//! Proptest strategies shared by the property suites.
#![allow(dead_code)]

use agenda_core::model::{ActivityRecord, RoleKind, Status};
use chrono::{NaiveDate, TimeZone, Utc};
use proptest::prelude::*;

pub fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (1990_i32..2100, 1_u32..=12, 1_u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default())
}

pub fn arb_status() -> impl Strategy<Value = Status> {
    prop_oneof![
        Just(Status::Pending),
        Just(Status::InProgress),
        Just(Status::Completed),
    ]
}

pub fn arb_record() -> impl Strategy<Value = ActivityRecord> {
    (
        "[a-z]{1,8}",
        proptest::option::weighted(0.9, arb_date()),
        arb_status(),
        0_usize..4,
        0_usize..3,
        0_i64..1_000_000,
    )
        .prop_map(|(title, start_date, status, creator, unit, offset)| ActivityRecord {
            id: String::new(),
            title,
            activity_type: "event".into(),
            description: None,
            start_date,
            end_date: None,
            unit_id: format!("u{unit}"),
            created_by_id: format!("s{creator}"),
            created_by_name: format!("Staff {creator}"),
            created_by_role: RoleKind::Staff,
            status,
            images: vec![],
            created_at: Utc
                .timestamp_opt(1_700_000_000 + offset, 0)
                .single()
                .unwrap_or_default(),
        })
}

/// Records with unique ids, in generation order.
pub fn arb_records(max: usize) -> impl Strategy<Value = Vec<ActivityRecord>> {
    proptest::collection::vec(arb_record(), 0..max).prop_map(|records| {
        records
            .into_iter()
            .enumerate()
            .map(|(i, mut record)| {
                record.id = format!("a{i}");
                record
            })
            .collect()
    })
}
