mod error;

pub use error::{Error, Result};

use std::{
	cmp::Ordering as CmpOrdering,
	collections::{HashMap, HashSet},
	sync::{
		Arc, Mutex,
		atomic::{AtomicUsize, Ordering},
	},
	time::Duration,
};

use axum::{
	Json, Router,
	extract::{Path, Query, State},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{get, patch},
};
use serde_json::{Value, json};
use tokio::{net::TcpListener, task::JoinHandle};
use uuid::Uuid;

const STUB_CREATED_AT: &str = "2025-01-01T00:00:00Z";

/// A spawned stub upstream. The server dies with the handle, so keep the
/// value alive for the duration of the test.
pub struct StubUpstream {
	pub base_url: String,
	hits: Arc<AtomicUsize>,
	handle: JoinHandle<()>,
}
impl StubUpstream {
	/// Requests served so far, across all routes.
	pub fn hits(&self) -> usize {
		self.hits.load(Ordering::SeqCst)
	}
}
impl Drop for StubUpstream {
	fn drop(&mut self) {
		self.handle.abort();
	}
}

/// In-process PostgREST emulator: seeded tables, `or=(col.ilike.*t*,…)`
/// filtering, `order`/`limit`, and the `PGRST205` body for unknown tables.
#[derive(Default)]
pub struct SupabaseStub {
	tables: HashMap<String, Vec<Value>>,
	failing: HashSet<String>,
	delays: HashMap<String, Duration>,
}
impl SupabaseStub {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn table(mut self, name: &str, rows: Vec<Value>) -> Self {
		self.tables.insert(name.to_string(), rows);

		self
	}

	/// Requests against this table answer 500.
	pub fn failing_table(mut self, name: &str) -> Self {
		self.failing.insert(name.to_string());

		self
	}

	/// Requests against this table stall before answering.
	pub fn delayed_table(mut self, name: &str, delay: Duration) -> Self {
		self.delays.insert(name.to_string(), delay);

		self
	}

	pub async fn spawn(self) -> Result<StubUpstream> {
		let hits = Arc::new(AtomicUsize::new(0));
		let state = Arc::new(SupabaseState {
			tables: Mutex::new(self.tables),
			failing: self.failing,
			delays: self.delays,
			hits: hits.clone(),
		});
		let router = Router::new()
			.route(
				"/rest/v1/{table}",
				get(table_select).post(table_insert).patch(table_update),
			)
			.with_state(state);

		spawn_router(router, hits).await
	}
}

struct SupabaseState {
	tables: Mutex<HashMap<String, Vec<Value>>>,
	failing: HashSet<String>,
	delays: HashMap<String, Duration>,
	hits: Arc<AtomicUsize>,
}
impl SupabaseState {
	async fn gate(&self, table: &str) -> Option<Response> {
		self.hits.fetch_add(1, Ordering::SeqCst);

		if let Some(delay) = self.delays.get(table) {
			tokio::time::sleep(*delay).await;
		}
		if self.failing.contains(table) {
			return Some(
				(StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "message": "stub failure" })))
					.into_response(),
			);
		}

		None
	}

	fn missing_table(&self, table: &str) -> Response {
		let body = json!({
			"code": "PGRST205",
			"message": format!("Could not find the table 'public.{table}' in the schema cache"),
		});

		(StatusCode::NOT_FOUND, Json(body)).into_response()
	}
}

async fn table_select(
	State(state): State<Arc<SupabaseState>>,
	Path(table): Path<String>,
	Query(params): Query<HashMap<String, String>>,
) -> Response {
	if let Some(response) = state.gate(&table).await {
		return response;
	}

	let mut rows = {
		let tables = state.tables.lock().unwrap_or_else(|err| err.into_inner());

		match tables.get(&table) {
			Some(rows) => rows.clone(),
			None => return state.missing_table(&table),
		}
	};

	if let Some(filter) = params.get("or") {
		rows.retain(|row| matches_or_filter(filter, row));
	}
	if let Some(order) = params.get("order") {
		apply_order(&mut rows, order);
	}
	if let Some(limit) = params.get("limit").and_then(|raw| raw.parse::<usize>().ok()) {
		rows.truncate(limit);
	}

	Json(rows).into_response()
}

async fn table_insert(
	State(state): State<Arc<SupabaseState>>,
	Path(table): Path<String>,
	Json(mut row): Json<Value>,
) -> Response {
	if let Some(response) = state.gate(&table).await {
		return response;
	}

	let Some(fields) = row.as_object_mut() else {
		return (StatusCode::BAD_REQUEST, Json(json!({ "message": "expected an object" })))
			.into_response();
	};

	fields.entry("id").or_insert_with(|| Value::String(Uuid::new_v4().to_string()));
	fields
		.entry("created_at")
		.or_insert_with(|| Value::String(STUB_CREATED_AT.to_string()));

	let mut tables = state.tables.lock().unwrap_or_else(|err| err.into_inner());
	let Some(rows) = tables.get_mut(&table) else {
		return state.missing_table(&table);
	};

	rows.push(row.clone());

	(StatusCode::CREATED, Json(json!([row]))).into_response()
}

async fn table_update(
	State(state): State<Arc<SupabaseState>>,
	Path(table): Path<String>,
	Query(params): Query<HashMap<String, String>>,
	Json(patch_body): Json<Value>,
) -> Response {
	if let Some(response) = state.gate(&table).await {
		return response;
	}

	let Some(id) = params.get("id").and_then(|raw| raw.strip_prefix("eq.")) else {
		return (StatusCode::BAD_REQUEST, Json(json!({ "message": "expected id=eq.<id>" })))
			.into_response();
	};
	let mut tables = state.tables.lock().unwrap_or_else(|err| err.into_inner());
	let Some(rows) = tables.get_mut(&table) else {
		return state.missing_table(&table);
	};
	let mut updated = Vec::new();

	for row in rows.iter_mut() {
		if row.get("id").and_then(Value::as_str) != Some(id) {
			continue;
		}
		if let (Some(fields), Some(changes)) = (row.as_object_mut(), patch_body.as_object()) {
			for (key, value) in changes {
				fields.insert(key.clone(), value.clone());
			}
		}

		updated.push(row.clone());
	}

	Json(updated).into_response()
}

fn matches_or_filter(filter: &str, row: &Value) -> bool {
	let inner = filter
		.trim()
		.strip_prefix('(')
		.and_then(|rest| rest.strip_suffix(')'))
		.unwrap_or(filter);

	inner.split(',').any(|clause| {
		clause
			.split_once(".ilike.")
			.map(|(column, pattern)| {
				let needle = pattern.trim_matches('*').to_lowercase();

				row.get(column)
					.and_then(Value::as_str)
					.map(|value| value.to_lowercase().contains(&needle))
					.unwrap_or(false)
			})
			.unwrap_or(false)
	})
}

fn apply_order(rows: &mut [Value], spec: &str) {
	let (column, direction) = spec.rsplit_once('.').unwrap_or((spec, "asc"));

	rows.sort_by(|a, b| compare_columns(a.get(column), b.get(column)));

	if direction == "desc" {
		rows.reverse();
	}
}

fn compare_columns(a: Option<&Value>, b: Option<&Value>) -> CmpOrdering {
	match (a, b) {
		(Some(Value::Number(a)), Some(Value::Number(b))) => {
			a.as_f64().unwrap_or(0.0).total_cmp(&b.as_f64().unwrap_or(0.0))
		},
		(Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
		_ => CmpOrdering::Equal,
	}
}

/// In-process Notion emulator: paginated block children per page, plus the
/// to-do check-state PATCH.
#[derive(Default)]
pub struct NotionStub {
	pages: HashMap<String, Vec<Value>>,
}
impl NotionStub {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn page(mut self, page_id: &str, blocks: Vec<Value>) -> Self {
		self.pages.insert(page_id.to_string(), blocks);

		self
	}

	pub async fn spawn(self) -> Result<StubUpstream> {
		let hits = Arc::new(AtomicUsize::new(0));
		let state = Arc::new(NotionState { pages: Mutex::new(self.pages), hits: hits.clone() });
		let router = Router::new()
			.route("/v1/blocks/{id}/children", get(block_children))
			.route("/v1/blocks/{id}", patch(update_block))
			.with_state(state);

		spawn_router(router, hits).await
	}
}

struct NotionState {
	pages: Mutex<HashMap<String, Vec<Value>>>,
	hits: Arc<AtomicUsize>,
}

async fn block_children(
	State(state): State<Arc<NotionState>>,
	Path(page_id): Path<String>,
	Query(params): Query<HashMap<String, String>>,
) -> Response {
	state.hits.fetch_add(1, Ordering::SeqCst);

	let pages = state.pages.lock().unwrap_or_else(|err| err.into_inner());
	let Some(blocks) = pages.get(&page_id) else {
		return (StatusCode::NOT_FOUND, Json(json!({ "code": "object_not_found" }))).into_response();
	};
	let page_size = params
		.get("page_size")
		.and_then(|raw| raw.parse::<usize>().ok())
		.unwrap_or(100)
		.max(1);
	let start = params
		.get("start_cursor")
		.and_then(|raw| raw.parse::<usize>().ok())
		.unwrap_or(0)
		.min(blocks.len());
	let end = (start + page_size).min(blocks.len());
	let has_more = end < blocks.len();
	let body = json!({
		"results": blocks[start..end].to_vec(),
		"has_more": has_more,
		"next_cursor": if has_more { Value::String(end.to_string()) } else { Value::Null },
	});

	Json(body).into_response()
}

async fn update_block(
	State(state): State<Arc<NotionState>>,
	Path(block_id): Path<String>,
	Json(patch_body): Json<Value>,
) -> Response {
	state.hits.fetch_add(1, Ordering::SeqCst);

	let checked = patch_body.pointer("/to_do/checked").and_then(Value::as_bool);
	let mut pages = state.pages.lock().unwrap_or_else(|err| err.into_inner());

	for blocks in pages.values_mut() {
		for block in blocks.iter_mut() {
			if block.get("id").and_then(Value::as_str) != Some(block_id.as_str()) {
				continue;
			}
			if let (Some(checked), Some(slot)) = (checked, block.pointer_mut("/to_do/checked")) {
				*slot = Value::Bool(checked);
			}

			return Json(block.clone()).into_response();
		}
	}

	(StatusCode::NOT_FOUND, Json(json!({ "code": "object_not_found" }))).into_response()
}

async fn spawn_router(router: Router, hits: Arc<AtomicUsize>) -> Result<StubUpstream> {
	let listener = TcpListener::bind("127.0.0.1:0").await?;
	let addr = listener.local_addr()?;
	let handle = tokio::spawn(async move {
		if let Err(err) = axum::serve(listener, router).await {
			eprintln!("Stub upstream failed: {err}.");
		}
	});

	Ok(StubUpstream { base_url: format!("http://{addr}"), hits, handle })
}
