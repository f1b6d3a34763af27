use uuid::Uuid;

use bridge_domain::{Milestone, MilestoneStatus};

use crate::{BridgeService, ServiceError, ServiceResult};

#[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
pub struct SetMilestoneStatusRequest {
	pub status: MilestoneStatus,
}

impl BridgeService {
	pub async fn list_milestones(&self) -> ServiceResult<Vec<Milestone>> {
		Ok(self.supabase.list_milestones().await?)
	}

	pub async fn set_milestone_status(
		&self,
		id: Uuid,
		req: SetMilestoneStatusRequest,
	) -> ServiceResult<()> {
		if !self.supabase.update_milestone_status(id, req.status).await? {
			return Err(ServiceError::NotFound { entity: "Milestone", id: id.to_string() });
		}

		Ok(())
	}
}
