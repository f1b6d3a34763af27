use std::time::Duration;

use reqwest::{
	Client, StatusCode,
	header::{AUTHORIZATION, HeaderMap, HeaderValue},
};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use bridge_domain::{
	ActivityEntry, Milestone, MilestoneStatus, NewActivityEntry, Paper, WritingSection,
};

use crate::{Error, Result};

/// Read/write access to the hosted relational backend through its REST layer
/// (PostgREST). One instance per process; every call is a single request.
#[derive(Clone)]
pub struct SupabaseClient {
	http: Client,
	base_url: String,
}
impl SupabaseClient {
	pub fn new(cfg: &bridge_config::Supabase) -> Result<Self> {
		let mut headers = HeaderMap::new();
		let bearer: HeaderValue = format!("Bearer {}", cfg.api_key).parse()?;

		headers.insert("apikey", cfg.api_key.parse()?);
		headers.insert(AUTHORIZATION, bearer);

		let http = Client::builder()
			.timeout(Duration::from_millis(cfg.timeout_ms))
			.default_headers(headers)
			.build()?;

		Ok(Self { http, base_url: cfg.url.clone() })
	}

	pub async fn search_papers(
		&self,
		term: &str,
		columns: &[String],
		limit: u32,
	) -> Result<Vec<Paper>> {
		self.search_rows("papers", term, columns, limit, None).await
	}

	pub async fn search_activity(
		&self,
		term: &str,
		columns: &[String],
		limit: u32,
	) -> Result<Vec<ActivityEntry>> {
		self.search_rows("activity_log", term, columns, limit, Some("created_at.desc")).await
	}

	pub async fn search_milestones(
		&self,
		term: &str,
		columns: &[String],
		limit: u32,
	) -> Result<Vec<Milestone>> {
		self.search_rows("milestones", term, columns, limit, Some("due_date.asc")).await
	}

	pub async fn search_writing_sections(
		&self,
		term: &str,
		columns: &[String],
		limit: u32,
	) -> Result<Vec<WritingSection>> {
		self.search_rows("writing_sections", term, columns, limit, Some("chapter_order.asc")).await
	}

	pub async fn list_papers(&self) -> Result<Vec<Paper>> {
		self.get_rows("papers", &[("select", "*"), ("order", "year.asc")]).await
	}

	pub async fn recent_activity(&self, limit: u32) -> Result<Vec<ActivityEntry>> {
		let limit = limit.to_string();

		self.get_rows(
			"activity_log",
			&[("select", "*"), ("order", "created_at.desc"), ("limit", limit.as_str())],
		)
		.await
	}

	pub async fn list_milestones(&self) -> Result<Vec<Milestone>> {
		self.get_rows("milestones", &[("select", "*"), ("order", "due_date.asc")]).await
	}

	pub async fn list_writing_sections(&self) -> Result<Vec<WritingSection>> {
		self.get_rows("writing_sections", &[("select", "*"), ("order", "chapter_order.asc")]).await
	}

	pub async fn insert_activity(&self, entry: &NewActivityEntry) -> Result<ActivityEntry> {
		let response = self
			.http
			.post(self.table_url("activity_log"))
			.header("Prefer", "return=representation")
			.json(entry)
			.send()
			.await?;
		let rows: Vec<ActivityEntry> = read_json(response).await?;

		rows.into_iter().next().ok_or_else(|| Error::InvalidResponse {
			message: "Insert returned no representation row.".to_string(),
		})
	}

	/// Returns false when no milestone matched the id.
	pub async fn update_milestone_status(&self, id: Uuid, status: MilestoneStatus) -> Result<bool> {
		self.update_row("milestones", id, &serde_json::json!({ "status": status })).await
	}

	pub async fn update_writing_word_count(&self, id: Uuid, current_word_count: i64) -> Result<bool> {
		self.update_row(
			"writing_sections",
			id,
			&serde_json::json!({ "current_word_count": current_word_count }),
		)
		.await
	}

	async fn search_rows<T>(
		&self,
		table: &str,
		term: &str,
		columns: &[String],
		limit: u32,
		order: Option<&str>,
	) -> Result<Vec<T>>
	where
		T: DeserializeOwned,
	{
		let filter = ilike_filter(columns, term);
		let limit = limit.to_string();
		let mut query = vec![("select", "*"), ("or", filter.as_str()), ("limit", limit.as_str())];

		if let Some(order) = order {
			query.push(("order", order));
		}

		self.get_rows(table, &query).await
	}

	async fn get_rows<T>(&self, table: &str, query: &[(&str, &str)]) -> Result<Vec<T>>
	where
		T: DeserializeOwned,
	{
		let response = self.http.get(self.table_url(table)).query(query).send().await?;

		read_json(response).await
	}

	async fn update_row(&self, table: &str, id: Uuid, patch: &serde_json::Value) -> Result<bool> {
		let id_filter = format!("eq.{id}");
		let response = self
			.http
			.patch(self.table_url(table))
			.query(&[("id", id_filter.as_str())])
			.header("Prefer", "return=representation")
			.json(patch)
			.send()
			.await?;
		let rows: Vec<serde_json::Value> = read_json(response).await?;

		Ok(!rows.is_empty())
	}

	fn table_url(&self, table: &str) -> String {
		format!("{}/rest/v1/{table}", self.base_url)
	}
}

async fn read_json<T>(response: reqwest::Response) -> Result<T>
where
	T: DeserializeOwned,
{
	let status = response.status();

	if !status.is_success() {
		let body = response.text().await.unwrap_or_default();

		return Err(Error::Upstream { status: status.as_u16(), body });
	}
	if status == StatusCode::NO_CONTENT {
		return Err(Error::InvalidResponse {
			message: "Expected a representation body, got 204.".to_string(),
		});
	}

	Ok(response.json().await?)
}

/// Renders a PostgREST `or=(col.ilike.*term*,…)` disjunction over the
/// configured columns.
fn ilike_filter(columns: &[String], term: &str) -> String {
	let pattern = format!("*{}*", sanitize_term(term));
	let clauses =
		columns.iter().map(|column| format!("{column}.ilike.{pattern}")).collect::<Vec<_>>();

	format!("({})", clauses.join(","))
}

// Commas, parens, quotes and backslashes are PostgREST filter grammar; a term
// containing them would change the disjunction's shape.
fn sanitize_term(term: &str) -> String {
	term.chars().filter(|c| !matches!(c, ',' | '(' | ')' | '"' | '\\')).collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn renders_ilike_disjunction() {
		let columns = ["title".to_string(), "summary".to_string()];

		assert_eq!(ilike_filter(&columns, "rag"), "(title.ilike.*rag*,summary.ilike.*rag*)");
	}

	#[test]
	fn strips_filter_grammar_from_terms() {
		assert_eq!(sanitize_term(r#"a,b(c)"d\"#), "abcd");
		assert_eq!(sanitize_term("task-technology"), "task-technology");
	}
}
