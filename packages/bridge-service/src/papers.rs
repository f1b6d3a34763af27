use bridge_domain::Paper;

use crate::{BridgeService, ServiceResult};

impl BridgeService {
	pub async fn list_papers(&self) -> ServiceResult<Vec<Paper>> {
		Ok(self.supabase.list_papers().await?)
	}
}
