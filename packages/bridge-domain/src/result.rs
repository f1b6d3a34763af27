use serde::{Deserialize, Serialize};

/// The display shape every source record is normalized into. `id` carries a
/// kind prefix (`paper-<uuid>`, `task-<slug>`, …) so concatenated result
/// lists stay globally unique without cross-source coordination.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SearchResult {
	pub id: String,
	#[serde(rename = "type")]
	pub kind: ResultKind,
	pub title: String,
	pub snippet: String,
	pub date: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub meta: Option<String>,
	pub icon: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub url: Option<String>,
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultKind {
	Paper,
	Activity,
	Task,
	Milestone,
	Writing,
}
impl ResultKind {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Paper => "paper",
			Self::Activity => "activity",
			Self::Task => "task",
			Self::Milestone => "milestone",
			Self::Writing => "writing",
		}
	}
}
