use serde::{Deserialize, Deserializer, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

// PostgREST sends null, not an absent key, for empty array columns.
fn null_to_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
	D: Deserializer<'de>,
	T: Default + Deserialize<'de>,
{
	Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A row from the `papers` table. Columns the dashboard never reads are
/// ignored on deserialization.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Paper {
	pub id: Uuid,
	pub title: String,
	#[serde(default)]
	pub authors: Option<String>,
	#[serde(default)]
	pub year: Option<i32>,
	#[serde(default)]
	pub summary: Option<String>,
	#[serde(default, deserialize_with = "null_to_default")]
	pub tags: Vec<String>,
	#[serde(default)]
	pub review_status: Option<String>,
	#[serde(default)]
	pub doi: Option<String>,
	#[serde(default)]
	pub url: Option<String>,
}

/// An append-only `activity_log` row.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ActivityEntry {
	pub id: Uuid,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
	pub crew: String,
	#[serde(default)]
	pub emoji: Option<String>,
	pub action: String,
	#[serde(default)]
	pub detail: Option<String>,
	#[serde(default)]
	pub station: Option<String>,
}

/// Fields a caller supplies when logging activity; the backend assigns `id`
/// and `created_at`.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct NewActivityEntry {
	pub crew: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub emoji: Option<String>,
	pub action: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub detail: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub station: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Milestone {
	pub id: Uuid,
	pub title: String,
	#[serde(default)]
	pub description: Option<String>,
	#[serde(with = "crate::date_serde")]
	pub due_date: Date,
	pub phase: Phase,
	pub status: MilestoneStatus,
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
	Build,
	DataCollection,
	Analysis,
	Writing,
	Defense,
}
impl Phase {
	pub fn label(self) -> &'static str {
		match self {
			Self::Build => "System build",
			Self::DataCollection => "Data collection",
			Self::Analysis => "Analysis",
			Self::Writing => "Writing",
			Self::Defense => "Defense",
		}
	}

	pub fn icon(self) -> &'static str {
		match self {
			Self::Build => "🔧",
			Self::DataCollection => "📊",
			Self::Analysis => "📈",
			Self::Writing => "✍️",
			Self::Defense => "🎓",
		}
	}
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneStatus {
	NotStarted,
	InProgress,
	Complete,
	Blocked,
}
impl MilestoneStatus {
	pub fn label(self) -> &'static str {
		match self {
			Self::NotStarted => "Not started",
			Self::InProgress => "In progress",
			Self::Complete => "Complete",
			Self::Blocked => "Blocked",
		}
	}
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct WritingSection {
	pub id: Uuid,
	pub title: String,
	pub chapter_order: i32,
	pub status: SectionStatus,
	pub current_word_count: i64,
	#[serde(default)]
	pub target_word_count: Option<i64>,
	#[serde(default)]
	pub notes: Option<String>,
	#[serde(default, with = "crate::date_serde::option")]
	pub due_date: Option<Date>,
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionStatus {
	NotStarted,
	InProgress,
	Complete,
}

/// A checklist item parsed out of the Notion task page's block tree.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct NotionTask {
	pub id: String,
	pub text: String,
	pub checked: bool,
	pub section: TaskSection,
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskSection {
	Main,
	Backlog,
}

/// Every record shape a search source can hand back. `normalize` must cover
/// each variant, so adding a source without a display mapping fails to
/// compile.
#[derive(Clone, Debug)]
pub enum SourceRecord {
	Paper(Paper),
	Activity(ActivityEntry),
	Task(NotionTask),
	Milestone(Milestone),
	Writing(WritingSection),
}
