pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Reqwest(#[from] reqwest::Error),
	#[error(transparent)]
	SerdeJson(#[from] serde_json::Error),
	#[error(transparent)]
	InvalidHeaderValue(#[from] reqwest::header::InvalidHeaderValue),
	#[error("Upstream request failed with status {status}: {body}")]
	Upstream { status: u16, body: String },
	#[error("{message}")]
	InvalidResponse { message: String },
}
impl Error {
	/// PostgREST reports an unprovisioned table as code `PGRST205`; callers
	/// degrade that to an empty result set instead of a failure.
	pub fn is_missing_table(&self) -> bool {
		matches!(self, Self::Upstream { body, .. } if body.contains("PGRST205"))
	}
}
