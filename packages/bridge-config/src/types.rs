use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub supabase: Supabase,
	pub notion: Notion,
	pub search: Search,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	#[serde(default = "default_log_level")]
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Supabase {
	pub url: String,
	pub api_key: String,
	#[serde(default = "default_timeout_ms")]
	pub timeout_ms: u64,
}

#[derive(Debug, Deserialize)]
pub struct Notion {
	#[serde(default = "default_notion_api_base")]
	pub api_base: String,
	pub api_key: String,
	#[serde(default = "default_notion_version")]
	pub version: String,
	pub tasks_page_id: String,
	#[serde(default = "default_notion_page_size")]
	pub page_size: u32,
	#[serde(default = "default_timeout_ms")]
	pub timeout_ms: u64,
}

/// Which columns each table search filters on is deployment state, not code;
/// deployments have drifted on this (e.g. whether `key_arguments` is queried).
#[derive(Debug, Deserialize)]
pub struct Search {
	#[serde(default = "default_per_source_limit")]
	pub per_source_limit: u32,
	#[serde(default = "default_task_limit")]
	pub task_limit: u32,
	#[serde(default = "default_timeout_ms")]
	pub source_timeout_ms: u64,
	#[serde(default = "default_paper_columns")]
	pub paper_columns: Vec<String>,
	#[serde(default = "default_activity_columns")]
	pub activity_columns: Vec<String>,
	#[serde(default = "default_milestone_columns")]
	pub milestone_columns: Vec<String>,
	#[serde(default = "default_writing_columns")]
	pub writing_columns: Vec<String>,
}

fn default_log_level() -> String {
	"info".to_string()
}

fn default_timeout_ms() -> u64 {
	3_000
}

fn default_notion_api_base() -> String {
	"https://api.notion.com".to_string()
}

fn default_notion_version() -> String {
	"2022-06-28".to_string()
}

fn default_notion_page_size() -> u32 {
	100
}

fn default_per_source_limit() -> u32 {
	10
}

fn default_task_limit() -> u32 {
	5
}

fn default_paper_columns() -> Vec<String> {
	["title", "summary", "authors", "relevance_notes"].map(str::to_string).to_vec()
}

fn default_activity_columns() -> Vec<String> {
	["action", "detail", "crew"].map(str::to_string).to_vec()
}

fn default_milestone_columns() -> Vec<String> {
	["title", "description"].map(str::to_string).to_vec()
}

fn default_writing_columns() -> Vec<String> {
	["title", "notes"].map(str::to_string).to_vec()
}
