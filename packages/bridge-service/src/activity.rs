use bridge_domain::{ActivityEntry, NewActivityEntry};

use crate::{BridgeService, ServiceError, ServiceResult};

const RECENT_LIMIT: u32 = 100;

#[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
pub struct LogActivityRequest {
	pub crew: String,
	#[serde(default)]
	pub emoji: Option<String>,
	pub action: String,
	#[serde(default)]
	pub detail: Option<String>,
	#[serde(default)]
	pub station: Option<String>,
}

impl BridgeService {
	/// Latest entries, newest first. An unprovisioned log degrades to an
	/// empty feed.
	pub async fn recent_activity(&self) -> ServiceResult<Vec<ActivityEntry>> {
		match self.supabase.recent_activity(RECENT_LIMIT).await {
			Ok(entries) => Ok(entries),
			Err(err) if err.is_missing_table() => {
				tracing::info!("Activity log table is not provisioned; returning an empty feed.");

				Ok(Vec::new())
			},
			Err(err) => Err(err.into()),
		}
	}

	pub async fn log_activity(&self, req: LogActivityRequest) -> ServiceResult<ActivityEntry> {
		if req.crew.trim().is_empty() || req.action.trim().is_empty() {
			return Err(ServiceError::InvalidRequest {
				message: "crew and action are required.".to_string(),
			});
		}

		let entry = NewActivityEntry {
			crew: req.crew,
			emoji: req.emoji,
			action: req.action,
			detail: req.detail,
			station: req.station,
		};

		Ok(self.supabase.insert_activity(&entry).await?)
	}
}
