mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, Notion, Search, Service, Supabase};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|source| Error::Read { path: path.to_path_buf(), source })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|source| Error::Parse { path: path.to_path_buf(), source })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation("service.http_bind must be non-empty.".to_string()));
	}
	if cfg.supabase.url.trim().is_empty() {
		return Err(Error::Validation("supabase.url must be non-empty.".to_string()));
	}
	if cfg.supabase.api_key.trim().is_empty() {
		return Err(Error::Validation("supabase.api_key must be non-empty.".to_string()));
	}
	if cfg.notion.api_key.trim().is_empty() {
		return Err(Error::Validation("notion.api_key must be non-empty.".to_string()));
	}
	if cfg.notion.tasks_page_id.trim().is_empty() {
		return Err(Error::Validation("notion.tasks_page_id must be non-empty.".to_string()));
	}
	if !(1..=100).contains(&cfg.notion.page_size) {
		return Err(Error::Validation("notion.page_size must be between 1 and 100.".to_string()));
	}
	if cfg.search.per_source_limit == 0 {
		return Err(Error::Validation(
			"search.per_source_limit must be greater than zero.".to_string(),
		));
	}
	if cfg.search.task_limit == 0 {
		return Err(Error::Validation("search.task_limit must be greater than zero.".to_string()));
	}

	for (label, timeout_ms) in [
		("supabase.timeout_ms", cfg.supabase.timeout_ms),
		("notion.timeout_ms", cfg.notion.timeout_ms),
		("search.source_timeout_ms", cfg.search.source_timeout_ms),
	] {
		if timeout_ms == 0 {
			return Err(Error::Validation(format!("{label} must be greater than zero.")));
		}
	}

	for (label, columns) in [
		("search.paper_columns", &cfg.search.paper_columns),
		("search.activity_columns", &cfg.search.activity_columns),
		("search.milestone_columns", &cfg.search.milestone_columns),
		("search.writing_columns", &cfg.search.writing_columns),
	] {
		if columns.is_empty() {
			return Err(Error::Validation(format!("{label} must be non-empty.")));
		}
		if columns.iter().any(|column| column.trim().is_empty()) {
			return Err(Error::Validation(format!(
				"{label} must not contain empty column names."
			)));
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	while cfg.supabase.url.ends_with('/') {
		cfg.supabase.url.pop();
	}
	while cfg.notion.api_base.ends_with('/') {
		cfg.notion.api_base.pop();
	}
	if cfg.service.log_level.trim().is_empty() {
		cfg.service.log_level = "info".to_string();
	}
}
