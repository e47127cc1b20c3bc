pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl From<uasrc_storage::Error> for Error {
	fn from(err: uasrc_storage::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}
