use std::sync::Arc;

use bridge_service::BridgeService;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<BridgeService>,
}
impl AppState {
	pub fn new(config: bridge_config::Config) -> color_eyre::Result<Self> {
		let service = BridgeService::new(config)?;

		Ok(Self { service: Arc::new(service) })
	}
}
