use time::macros::{date, datetime};
use uuid::Uuid;

use bridge_domain::{
	ActivityEntry, Milestone, MilestoneStatus, NotionTask, Paper, Phase, ResultKind, SectionStatus,
	SourceRecord, TaskSection, WritingSection, normalize,
};

fn sample_paper() -> Paper {
	Paper {
		id: Uuid::nil(),
		title: "A Task-Technology Fit study".to_string(),
		authors: Some("Smith".to_string()),
		year: Some(2023),
		summary: Some("Fit between task and tooling.".to_string()),
		tags: vec!["ttf".to_string()],
		review_status: None,
		doi: None,
		url: Some("https://example.org/ttf".to_string()),
	}
}

fn sample_records() -> Vec<SourceRecord> {
	vec![
		SourceRecord::Paper(sample_paper()),
		SourceRecord::Activity(ActivityEntry {
			id: Uuid::nil(),
			created_at: datetime!(2025-03-04 10:30 UTC),
			crew: "nav".to_string(),
			emoji: None,
			action: "Logged reading session".to_string(),
			detail: None,
			station: None,
		}),
		SourceRecord::Task(NotionTask {
			id: "block-1".to_string(),
			text: "Draft methods chapter".to_string(),
			checked: false,
			section: TaskSection::Main,
		}),
		SourceRecord::Milestone(Milestone {
			id: Uuid::nil(),
			title: "Pilot study complete".to_string(),
			description: None,
			due_date: date!(2025 - 06 - 01),
			phase: Phase::DataCollection,
			status: MilestoneStatus::InProgress,
		}),
		SourceRecord::Writing(WritingSection {
			id: Uuid::nil(),
			title: "Methods".to_string(),
			chapter_order: 3,
			status: SectionStatus::InProgress,
			current_word_count: 1_200,
			target_word_count: Some(4_000),
			notes: None,
			due_date: None,
		}),
	]
}

#[test]
fn normalization_is_total_and_well_formed() {
	for record in sample_records() {
		let result = normalize(record);

		assert!(!result.id.is_empty());
		assert!(!result.title.is_empty());
		assert!(!result.icon.is_empty());
		assert!(result.id.starts_with(&format!("{}-", result.kind.as_str())));
	}
}

#[test]
fn kind_prefix_keeps_ids_unique_across_sources() {
	let ids = sample_records().into_iter().map(|r| normalize(r).id).collect::<Vec<_>>();
	let mut deduped = ids.clone();

	deduped.sort();
	deduped.dedup();

	assert_eq!(deduped.len(), ids.len());
}

#[test]
fn paper_maps_year_authors_and_url() {
	let result = normalize(SourceRecord::Paper(sample_paper()));

	assert_eq!(result.kind, ResultKind::Paper);
	assert_eq!(result.date.as_deref(), Some("2023"));
	assert_eq!(result.meta.as_deref(), Some("Smith · unread"));
	assert_eq!(result.icon, "📄");
	assert_eq!(result.url.as_deref(), Some("https://example.org/ttf"));
}

#[test]
fn activity_formats_date_and_falls_back_to_default_icon() {
	let result = normalize(SourceRecord::Activity(ActivityEntry {
		id: Uuid::nil(),
		created_at: datetime!(2025-03-04 23:59 UTC),
		crew: "nav".to_string(),
		emoji: None,
		action: "Docked".to_string(),
		detail: Some("At station".to_string()),
		station: None,
	}));

	assert_eq!(result.date.as_deref(), Some("Mar 4, 2025"));
	assert_eq!(result.meta.as_deref(), Some("nav @ unknown"));
	assert_eq!(result.icon, "🫧");
}

#[test]
fn checked_state_drives_task_fields() {
	let open = normalize(SourceRecord::Task(NotionTask {
		id: "b1".to_string(),
		text: "Review related work".to_string(),
		checked: false,
		section: TaskSection::Main,
	}));
	let done = normalize(SourceRecord::Task(NotionTask {
		id: "b2".to_string(),
		text: "Review related work".to_string(),
		checked: true,
		section: TaskSection::Backlog,
	}));

	assert_eq!(open.snippet, "Open");
	assert_eq!(open.icon, "📝");
	assert_eq!(done.snippet, "Completed");
	assert_eq!(done.icon, "✅");
	assert_eq!(done.meta.as_deref(), Some("✅ Done"));
}

#[test]
fn complete_milestone_swaps_phase_icon_for_check() {
	let pending = normalize(SourceRecord::Milestone(Milestone {
		id: Uuid::nil(),
		title: "Analysis done".to_string(),
		description: None,
		due_date: date!(2025 - 09 - 15),
		phase: Phase::Analysis,
		status: MilestoneStatus::InProgress,
	}));
	let complete = normalize(SourceRecord::Milestone(Milestone {
		id: Uuid::nil(),
		title: "Analysis done".to_string(),
		description: None,
		due_date: date!(2025 - 09 - 15),
		phase: Phase::Analysis,
		status: MilestoneStatus::Complete,
	}));

	assert_eq!(pending.icon, "📈");
	assert_eq!(pending.meta.as_deref(), Some("Analysis · In progress"));
	assert_eq!(complete.icon, "✅");
	assert_eq!(complete.date.as_deref(), Some("Sep 15, 2025"));
}

#[test]
fn writing_meta_drops_unknown_target() {
	let with_target = normalize(SourceRecord::Writing(WritingSection {
		id: Uuid::nil(),
		title: "Methods".to_string(),
		chapter_order: 3,
		status: SectionStatus::InProgress,
		current_word_count: 1_200,
		target_word_count: Some(4_000),
		notes: None,
		due_date: None,
	}));
	let without_target = normalize(SourceRecord::Writing(WritingSection {
		id: Uuid::nil(),
		title: "Appendix".to_string(),
		chapter_order: 9,
		status: SectionStatus::NotStarted,
		current_word_count: 0,
		target_word_count: None,
		notes: None,
		due_date: None,
	}));

	assert_eq!(with_target.meta.as_deref(), Some("1200/4000 words"));
	assert_eq!(without_target.meta.as_deref(), Some("0 words"));
	assert_eq!(without_target.date, None);
}

#[test]
fn search_result_serializes_with_type_tag_and_nullable_date() {
	let result = normalize(SourceRecord::Task(NotionTask {
		id: "b1".to_string(),
		text: "Ping advisor".to_string(),
		checked: false,
		section: TaskSection::Main,
	}));
	let json = serde_json::to_value(&result).expect("Failed to serialize result.");

	assert_eq!(json["type"], "task");
	assert_eq!(json["id"], "task-Ping advisor");
	assert!(json["date"].is_null());
	assert!(json.get("url").is_none());
}

#[test]
fn records_deserialize_from_backend_json() {
	let paper: Paper = serde_json::from_value(serde_json::json!({
		"id": "6f1e1d8e-6c7a-4b7e-9a6e-0d9f4c6b2a11",
		"title": "Trust calibration in RAG assistants",
		"authors": null,
		"year": null,
		"summary": "How users calibrate trust.",
		"tags": null,
		"review_status": "reading",
		"created_at": "2025-01-05T08:00:00+00:00"
	}))
	.expect("Failed to deserialize paper.");

	assert!(paper.authors.is_none());
	assert!(paper.tags.is_empty());

	let milestone: Milestone = serde_json::from_value(serde_json::json!({
		"id": "6f1e1d8e-6c7a-4b7e-9a6e-0d9f4c6b2a12",
		"title": "Instrument ready",
		"description": "Survey + logging pipeline",
		"due_date": "2025-05-01",
		"phase": "data-collection",
		"status": "not_started",
		"priority": "critical"
	}))
	.expect("Failed to deserialize milestone.");

	assert_eq!(milestone.phase, Phase::DataCollection);
	assert_eq!(milestone.status, MilestoneStatus::NotStarted);
}
