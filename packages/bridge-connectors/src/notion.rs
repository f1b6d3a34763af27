use std::time::Duration;

use reqwest::{
	Client,
	header::{AUTHORIZATION, HeaderMap, HeaderValue},
};
use serde_json::Value;

use bridge_domain::{NotionTask, TaskSection};

use crate::{Error, Result};

const MAIN_HEADING: &str = "main tasks";
const BACKLOG_HEADING: &str = "backlogged tasks";

/// Bearer-token client for the Notion HTTP API. The task page is a flat block
/// tree: `heading_2` blocks name sections, `to_do` blocks under them are the
/// tasks.
#[derive(Clone)]
pub struct NotionClient {
	http: Client,
	api_base: String,
}
impl NotionClient {
	pub fn new(cfg: &bridge_config::Notion) -> Result<Self> {
		let mut headers = HeaderMap::new();
		let bearer: HeaderValue = format!("Bearer {}", cfg.api_key).parse()?;

		headers.insert(AUTHORIZATION, bearer);
		headers.insert("Notion-Version", cfg.version.parse()?);

		let http = Client::builder()
			.timeout(Duration::from_millis(cfg.timeout_ms))
			.default_headers(headers)
			.build()?;

		Ok(Self { http, api_base: cfg.api_base.clone() })
	}

	/// Fetches the full task list, following pagination until the page's block
	/// children are exhausted.
	pub async fn fetch_tasks(&self, page_id: &str, page_size: u32) -> Result<Vec<NotionTask>> {
		let url = format!("{}/v1/blocks/{page_id}/children", self.api_base);
		let page_size = page_size.to_string();
		let mut blocks = Vec::new();
		let mut cursor: Option<String> = None;

		loop {
			let mut query = vec![("page_size", page_size.as_str())];

			if let Some(cursor) = cursor.as_deref() {
				query.push(("start_cursor", cursor));
			}

			let response = self.http.get(&url).query(&query).send().await?;
			let status = response.status();

			if !status.is_success() {
				let body = response.text().await.unwrap_or_default();

				return Err(Error::Upstream { status: status.as_u16(), body });
			}

			let json: Value = response.json().await?;
			let results = json.get("results").and_then(Value::as_array).ok_or_else(|| {
				Error::InvalidResponse {
					message: "Block children response is missing results array.".to_string(),
				}
			})?;

			blocks.extend(results.iter().cloned());

			let has_more = json.get("has_more").and_then(Value::as_bool).unwrap_or(false);

			cursor = json.get("next_cursor").and_then(Value::as_str).map(str::to_string);

			if !has_more || cursor.is_none() {
				break;
			}
		}

		Ok(parse_tasks(&blocks))
	}

	pub async fn set_task_checked(&self, block_id: &str, checked: bool) -> Result<()> {
		let url = format!("{}/v1/blocks/{block_id}", self.api_base);
		let body = serde_json::json!({ "to_do": { "checked": checked } });
		let response = self.http.patch(url).json(&body).send().await?;
		let status = response.status();

		if !status.is_success() {
			let body = response.text().await.unwrap_or_default();

			return Err(Error::Upstream { status: status.as_u16(), body });
		}

		Ok(())
	}
}

/// Partitions to-do blocks into sections by the last seen `heading_2`. A
/// heading that names neither section turns collection off until the next
/// known one.
pub fn parse_tasks(blocks: &[Value]) -> Vec<NotionTask> {
	let mut tasks = Vec::new();
	let mut section: Option<TaskSection> = None;

	for block in blocks {
		match block.get("type").and_then(Value::as_str) {
			Some("heading_2") => {
				let heading = plain_text(block.pointer("/heading_2/rich_text")).to_lowercase();

				section = if heading.contains(MAIN_HEADING) {
					Some(TaskSection::Main)
				} else if heading.contains(BACKLOG_HEADING) {
					Some(TaskSection::Backlog)
				} else {
					None
				};
			},
			Some("to_do") => {
				let Some(section) = section else {
					continue;
				};
				let text = plain_text(block.pointer("/to_do/rich_text"));

				if text.is_empty() {
					continue;
				}

				let id = block.get("id").and_then(Value::as_str).unwrap_or_default().to_string();
				let checked =
					block.pointer("/to_do/checked").and_then(Value::as_bool).unwrap_or(false);

				tasks.push(NotionTask { id, text, checked, section });
			},
			_ => {},
		}
	}

	tasks
}

fn plain_text(rich_text: Option<&Value>) -> String {
	rich_text
		.and_then(Value::as_array)
		.map(|spans| {
			spans
				.iter()
				.filter_map(|span| span.get("plain_text").and_then(Value::as_str))
				.collect::<String>()
		})
		.unwrap_or_default()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn heading(text: &str) -> Value {
		serde_json::json!({
			"type": "heading_2",
			"heading_2": { "rich_text": [{ "plain_text": text }] }
		})
	}

	fn to_do(id: &str, text: &str, checked: bool) -> Value {
		serde_json::json!({
			"id": id,
			"type": "to_do",
			"to_do": { "rich_text": [{ "plain_text": text }], "checked": checked }
		})
	}

	#[test]
	fn partitions_tasks_by_heading() {
		let blocks = vec![
			heading("Main Tasks"),
			to_do("b1", "Draft intro", false),
			heading("Backlogged Tasks"),
			to_do("b2", "Tidy references", true),
		];
		let tasks = parse_tasks(&blocks);

		assert_eq!(tasks.len(), 2);
		assert_eq!(tasks[0].section, TaskSection::Main);
		assert_eq!(tasks[1].section, TaskSection::Backlog);
		assert!(tasks[1].checked);
	}

	#[test]
	fn unknown_heading_stops_collection() {
		let blocks = vec![
			heading("Main Tasks"),
			to_do("b1", "Draft intro", false),
			heading("Scratchpad"),
			to_do("b2", "Not a task", false),
		];
		let tasks = parse_tasks(&blocks);

		assert_eq!(tasks.len(), 1);
		assert_eq!(tasks[0].text, "Draft intro");
	}

	#[test]
	fn skips_blocks_outside_sections_and_empty_text() {
		let blocks = vec![
			to_do("b0", "Orphan", false),
			heading("Main Tasks"),
			to_do("b1", "", false),
			to_do("b2", "Real task", false),
		];
		let tasks = parse_tasks(&blocks);

		assert_eq!(tasks.len(), 1);
		assert_eq!(tasks[0].id, "b2");
	}

	#[test]
	fn joins_multi_span_rich_text() {
		let blocks = vec![
			heading("Main Tasks"),
			serde_json::json!({
				"id": "b1",
				"type": "to_do",
				"to_do": {
					"rich_text": [
						{ "plain_text": "Review " },
						{ "plain_text": "chapter 2" }
					],
					"checked": false
				}
			}),
		];
		let tasks = parse_tasks(&blocks);

		assert_eq!(tasks[0].text, "Review chapter 2");
	}
}
