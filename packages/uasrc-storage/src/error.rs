use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Sqlx(#[from] sqlx::Error),
	#[error("Document {id} in {collection} is not a JSON object.")]
	InvalidDocument { collection: String, id: Uuid },
}
