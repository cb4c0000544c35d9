//! Serde roundtrip and JsonSchema validation tests for entity and response types.

use chrono::{NaiveDate, Utc};
use kanri_core::audit_detail::{StatusChangedDetail, UpdatedDetail};
use kanri_core::entities::*;
use kanri_core::enums::*;
use kanri_core::ids::TaskId;
use kanri_core::query::{Page, PageRequest};
use kanri_core::responses::*;
use kanri_core::updates::TaskUpdateBuilder;
use schemars::schema_for;

/// Validate a JSON value against a schemars-generated schema.
fn validate_against_schema(
    schema: &serde_json::Value,
    instance: &serde_json::Value,
) -> Vec<String> {
    let validator = jsonschema::validator_for(schema).expect("schema should be valid");
    validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect()
}

macro_rules! roundtrip_and_validate {
    ($name:ident, $ty:ty, $instance:expr) => {
        #[test]
        fn $name() {
            let val: $ty = $instance;

            let json_str = serde_json::to_string_pretty(&val).unwrap();
            let recovered: $ty = serde_json::from_str(&json_str).unwrap();
            assert_eq!(
                recovered,
                val,
                "serde roundtrip failed for {}",
                stringify!($ty)
            );

            let schema = serde_json::to_value(schema_for!($ty)).unwrap();
            let instance = serde_json::to_value(&val).unwrap();
            let errors = validate_against_schema(&schema, &instance);
            assert!(
                errors.is_empty(),
                "Schema validation failed for {}: {:?}",
                stringify!($ty),
                errors
            );
        }
    };
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn sample_task() -> Task {
    Task {
        id: TaskId(42),
        title: "Call back about lab results".into(),
        description: Some("Patient asked for a phone call.".into()),
        priority: Priority::High,
        status: TaskStatus::Pending,
        start_date: Some(date("2026-03-01")),
        due_date: date("2026-03-04"),
        patient_id: Some("pat-118".into()),
        owner_id: "dr-lee".into(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

roundtrip_and_validate!(task_roundtrip, Task, sample_task());

roundtrip_and_validate!(
    task_without_optionals_roundtrip,
    Task,
    Task {
        description: None,
        start_date: None,
        patient_id: None,
        status: TaskStatus::Overdue,
        ..sample_task()
    }
);

roundtrip_and_validate!(
    new_task_roundtrip,
    NewTask,
    NewTask::new("Order supplies", "front-desk")
        .starting(date("2026-04-01"))
        .with_priority(Priority::Low)
);

roundtrip_and_validate!(
    audit_entry_roundtrip,
    AuditEntry,
    AuditEntry {
        id: 1,
        task_id: TaskId(42),
        action: AuditAction::StatusChanged,
        actor: Some("dr-lee".into()),
        detail: Some(serde_json::json!({"from": "pending", "to": "done", "reason": null})),
        created_at: Utc::now(),
    }
);

roundtrip_and_validate!(
    page_of_tasks_roundtrip,
    Page<Task>,
    Page::new(vec![sample_task()], PageRequest::new(1, 10), 1)
);

roundtrip_and_validate!(
    bulk_response_roundtrip,
    BulkUpdateResponse,
    BulkUpdateResponse { updated_count: 2 }
);

roundtrip_and_validate!(
    sweep_response_roundtrip,
    SweepResponse,
    SweepResponse {
        marked_overdue: 3,
        as_of: date("2026-03-05"),
    }
);

roundtrip_and_validate!(
    column_summary_roundtrip,
    ColumnSummary,
    ColumnSummary {
        status: TaskStatus::InProgress,
        loaded: 10,
        total: 14,
        has_more: true,
    }
);

// --- Audit detail types ---

roundtrip_and_validate!(
    status_changed_detail_roundtrip,
    StatusChangedDetail,
    StatusChangedDetail {
        from: TaskStatus::Pending,
        to: TaskStatus::Overdue,
        reason: Some("due date passed".into()),
    }
);

roundtrip_and_validate!(
    updated_detail_roundtrip,
    UpdatedDetail,
    UpdatedDetail {
        fields: vec!["title".into(), "due_date".into()],
    }
);

#[test]
fn update_serializes_only_set_fields() {
    let update = TaskUpdateBuilder::new()
        .title("Renamed")
        .due_date(date("2026-05-01"))
        .build();
    let json = serde_json::to_value(&update).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"title": "Renamed", "due_date": "2026-05-01"})
    );
}

// --- Schema rejection test ---

#[test]
fn schema_rejects_unknown_status() {
    let schema = serde_json::to_value(schema_for!(Task)).unwrap();
    let mut invalid = serde_json::to_value(sample_task()).unwrap();
    invalid["status"] = serde_json::json!("blocked");
    let errors = validate_against_schema(&schema, &invalid);
    assert!(!errors.is_empty(), "schema should reject status 'blocked'");
}

#[test]
fn schema_rejects_task_without_due_date() {
    let schema = serde_json::to_value(schema_for!(Task)).unwrap();
    let mut invalid = serde_json::to_value(sample_task()).unwrap();
    invalid.as_object_mut().unwrap().remove("due_date");
    let errors = validate_against_schema(&schema, &invalid);
    assert!(!errors.is_empty(), "schema should require due_date");
}
