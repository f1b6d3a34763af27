pub mod activity;
pub mod milestones;
pub mod papers;
pub mod search;
pub mod tasks;
pub mod writing;

pub use activity::LogActivityRequest;
pub use milestones::SetMilestoneStatusRequest;
pub use tasks::{SetTaskCheckedRequest, TaskListResponse};
pub use writing::SetWordCountRequest;

use bridge_config::Config;
use bridge_connectors::{NotionClient, SupabaseClient};

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
	#[error("{message}")]
	InvalidRequest { message: String },
	#[error("{entity} {id} was not found.")]
	NotFound { entity: &'static str, id: String },
	#[error("Upstream request failed: {0}")]
	Upstream(#[from] bridge_connectors::Error),
	#[error("Unexpected internal failure: {message}")]
	Internal { message: String },
}

/// One instance per process; every operation is a stateless pass-through to
/// the upstreams.
pub struct BridgeService {
	pub cfg: Config,
	pub supabase: SupabaseClient,
	pub notion: NotionClient,
}
impl BridgeService {
	// A client that cannot be built is a local misconfiguration, not an
	// upstream failure.
	pub fn new(cfg: Config) -> ServiceResult<Self> {
		let supabase = SupabaseClient::new(&cfg.supabase)
			.map_err(|err| ServiceError::Internal { message: err.to_string() })?;
		let notion = NotionClient::new(&cfg.notion)
			.map_err(|err| ServiceError::Internal { message: err.to_string() })?;

		Ok(Self { cfg, supabase, notion })
	}
}
