use time::{Date, OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
	record::{MilestoneStatus, SectionStatus, SourceRecord},
	result::{ResultKind, SearchResult},
};

const DISPLAY_DATE: &'static [BorrowedFormatItem<'static>] =
	format_description!("[month repr:short] [day padding:none], [year]");
const TASK_SLUG_CHARS: usize = 20;

/// Maps a source record to its display shape. Total: every record produces
/// exactly one result.
pub fn normalize(record: SourceRecord) -> SearchResult {
	match record {
		SourceRecord::Paper(paper) => SearchResult {
			id: format!("paper-{}", paper.id),
			kind: ResultKind::Paper,
			title: paper.title,
			snippet: paper.summary.unwrap_or_default(),
			date: paper.year.map(|year| year.to_string()),
			meta: join_meta([
				paper.authors.as_deref(),
				Some(paper.review_status.as_deref().unwrap_or("unread")),
			]),
			icon: "📄".to_string(),
			url: paper.url,
		},
		SourceRecord::Activity(entry) => SearchResult {
			id: format!("activity-{}", entry.id),
			kind: ResultKind::Activity,
			title: entry.action,
			snippet: entry.detail.unwrap_or_default(),
			date: display_datetime(entry.created_at),
			meta: Some(format!(
				"{} @ {}",
				entry.crew,
				entry.station.as_deref().unwrap_or("unknown")
			)),
			icon: entry.emoji.unwrap_or_else(|| "🫧".to_string()),
			url: None,
		},
		SourceRecord::Task(task) => {
			let icon = if task.checked { "✅" } else { "📝" };
			let meta = if task.checked { "✅ Done" } else { "⬜ Open" };
			let snippet = if task.checked { "Completed" } else { "Open" };

			SearchResult {
				id: format!("task-{}", task_slug(&task.text)),
				kind: ResultKind::Task,
				title: task.text,
				snippet: snippet.to_string(),
				date: None,
				meta: Some(meta.to_string()),
				icon: icon.to_string(),
				url: None,
			}
		},
		SourceRecord::Milestone(milestone) => {
			let icon = if milestone.status == MilestoneStatus::Complete {
				"✅"
			} else {
				milestone.phase.icon()
			};

			SearchResult {
				id: format!("milestone-{}", milestone.id),
				kind: ResultKind::Milestone,
				title: milestone.title,
				snippet: milestone.description.unwrap_or_default(),
				date: display_date(milestone.due_date),
				meta: join_meta([
					Some(milestone.phase.label()),
					Some(milestone.status.label()),
				]),
				icon: icon.to_string(),
				url: None,
			}
		},
		SourceRecord::Writing(section) => {
			let icon = if section.status == SectionStatus::Complete { "✅" } else { "✍️" };
			let meta = match section.target_word_count {
				Some(target) => format!("{}/{target} words", section.current_word_count),
				None => format!("{} words", section.current_word_count),
			};

			SearchResult {
				id: format!("writing-{}", section.id),
				kind: ResultKind::Writing,
				title: section.title,
				snippet: section.notes.unwrap_or_default(),
				date: section.due_date.and_then(display_date),
				meta: Some(meta),
				icon: icon.to_string(),
				url: None,
			}
		},
	}
}

/// `"Mon D, YYYY"`, e.g. `"Mar 4, 2025"`.
pub fn display_date(date: Date) -> Option<String> {
	date.format(&DISPLAY_DATE).ok()
}

pub fn display_datetime(datetime: OffsetDateTime) -> Option<String> {
	display_date(datetime.date())
}

/// Joins the non-empty parts with a middle dot; `None` when nothing is left.
pub fn join_meta<'a>(parts: impl IntoIterator<Item = Option<&'a str>>) -> Option<String> {
	let joined = parts
		.into_iter()
		.flatten()
		.map(str::trim)
		.filter(|part| !part.is_empty())
		.collect::<Vec<_>>()
		.join(" · ");

	if joined.is_empty() { None } else { Some(joined) }
}

fn task_slug(text: &str) -> String {
	text.chars().take(TASK_SLUG_CHARS).collect()
}
