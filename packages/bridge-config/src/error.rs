pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Unable to read config file {path:?}.")]
	Read { path: std::path::PathBuf, source: std::io::Error },
	#[error("Config file {path:?} is not valid TOML.")]
	Parse { path: std::path::PathBuf, source: toml::de::Error },
	#[error("{0}")]
	Validation(String),
}
