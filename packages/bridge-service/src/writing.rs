use uuid::Uuid;

use bridge_domain::WritingSection;

use crate::{BridgeService, ServiceError, ServiceResult};

#[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
pub struct SetWordCountRequest {
	pub current_word_count: i64,
}

impl BridgeService {
	pub async fn list_writing_sections(&self) -> ServiceResult<Vec<WritingSection>> {
		Ok(self.supabase.list_writing_sections().await?)
	}

	pub async fn set_word_count(&self, id: Uuid, req: SetWordCountRequest) -> ServiceResult<()> {
		if req.current_word_count < 0 {
			return Err(ServiceError::InvalidRequest {
				message: "current_word_count must be zero or greater.".to_string(),
			});
		}
		if !self.supabase.update_writing_word_count(id, req.current_word_count).await? {
			return Err(ServiceError::NotFound { entity: "Writing section", id: id.to_string() });
		}

		Ok(())
	}
}
