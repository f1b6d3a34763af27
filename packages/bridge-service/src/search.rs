use std::time::Duration;

use bridge_domain::{SearchResult, SourceRecord, normalize};

use crate::BridgeService;

impl BridgeService {
	/// Best-effort fan-out over every source. Sources run concurrently, each
	/// behind its own failure boundary and deadline; a source that errors or
	/// misses the deadline contributes nothing. Output order is papers,
	/// activity, tasks, milestones, writing, with each source's own sort
	/// preserved inside its segment.
	pub async fn search(&self, query: &str) -> Vec<SearchResult> {
		let query = query.trim();

		if query.is_empty() {
			return Vec::new();
		}

		let deadline = Duration::from_millis(self.cfg.search.source_timeout_ms);
		let (papers, activity, tasks, milestones, writing) = tokio::join!(
			guarded("papers", deadline, self.search_papers(query)),
			guarded("activity", deadline, self.search_activity(query)),
			guarded("tasks", deadline, self.search_tasks(query)),
			guarded("milestones", deadline, self.search_milestones(query)),
			guarded("writing", deadline, self.search_writing(query)),
		);

		[papers, activity, tasks, milestones, writing].into_iter().flatten().collect()
	}

	async fn search_papers(&self, query: &str) -> bridge_connectors::Result<Vec<SearchResult>> {
		let papers = self
			.supabase
			.search_papers(query, &self.cfg.search.paper_columns, self.cfg.search.per_source_limit)
			.await?;

		Ok(papers.into_iter().map(|paper| normalize(SourceRecord::Paper(paper))).collect())
	}

	async fn search_activity(&self, query: &str) -> bridge_connectors::Result<Vec<SearchResult>> {
		let entries = self
			.supabase
			.search_activity(
				query,
				&self.cfg.search.activity_columns,
				self.cfg.search.per_source_limit,
			)
			.await?;

		Ok(entries.into_iter().map(|entry| normalize(SourceRecord::Activity(entry))).collect())
	}

	// The block API has no server-side text filter, so tasks are fetched in
	// full on every call and matched here.
	async fn search_tasks(&self, query: &str) -> bridge_connectors::Result<Vec<SearchResult>> {
		let tasks = self
			.notion
			.fetch_tasks(&self.cfg.notion.tasks_page_id, self.cfg.notion.page_size)
			.await?;
		let needle = query.to_lowercase();

		Ok(tasks
			.into_iter()
			.filter(|task| task.text.to_lowercase().contains(&needle))
			.take(self.cfg.search.task_limit as usize)
			.map(|task| normalize(SourceRecord::Task(task)))
			.collect())
	}

	async fn search_milestones(&self, query: &str) -> bridge_connectors::Result<Vec<SearchResult>> {
		let milestones = self
			.supabase
			.search_milestones(
				query,
				&self.cfg.search.milestone_columns,
				self.cfg.search.per_source_limit,
			)
			.await?;

		Ok(milestones
			.into_iter()
			.map(|milestone| normalize(SourceRecord::Milestone(milestone)))
			.collect())
	}

	async fn search_writing(&self, query: &str) -> bridge_connectors::Result<Vec<SearchResult>> {
		let sections = self
			.supabase
			.search_writing_sections(
				query,
				&self.cfg.search.writing_columns,
				self.cfg.search.per_source_limit,
			)
			.await?;

		Ok(sections.into_iter().map(|section| normalize(SourceRecord::Writing(section))).collect())
	}
}

async fn guarded(
	source: &'static str,
	deadline: Duration,
	search: impl Future<Output = bridge_connectors::Result<Vec<SearchResult>>>,
) -> Vec<SearchResult> {
	match tokio::time::timeout(deadline, search).await {
		Ok(Ok(results)) => results,
		Ok(Err(err)) if err.is_missing_table() => {
			tracing::info!(source, "Source table is not provisioned; contributing no results.");

			Vec::new()
		},
		Ok(Err(err)) => {
			tracing::warn!(source, error = %err, "Source search failed; contributing no results.");

			Vec::new()
		},
		Err(_) => {
			tracing::warn!(source, "Source search missed the deadline; contributing no results.");

			Vec::new()
		},
	}
}
