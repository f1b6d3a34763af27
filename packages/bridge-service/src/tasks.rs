use bridge_domain::{NotionTask, TaskSection};

use crate::{BridgeService, ServiceError, ServiceResult};

#[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
pub struct TaskListResponse {
	pub main_tasks: Vec<NotionTask>,
	pub backlogged_tasks: Vec<NotionTask>,
}

#[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
pub struct SetTaskCheckedRequest {
	pub block_id: String,
	pub checked: bool,
}

impl BridgeService {
	pub async fn list_tasks(&self) -> ServiceResult<TaskListResponse> {
		let tasks = self
			.notion
			.fetch_tasks(&self.cfg.notion.tasks_page_id, self.cfg.notion.page_size)
			.await?;
		let (main_tasks, backlogged_tasks) =
			tasks.into_iter().partition(|task| task.section == TaskSection::Main);

		Ok(TaskListResponse { main_tasks, backlogged_tasks })
	}

	pub async fn set_task_checked(&self, req: SetTaskCheckedRequest) -> ServiceResult<()> {
		if req.block_id.trim().is_empty() {
			return Err(ServiceError::InvalidRequest {
				message: "block_id is required.".to_string(),
			});
		}

		self.notion.set_task_checked(&req.block_id, req.checked).await?;

		Ok(())
	}
}
