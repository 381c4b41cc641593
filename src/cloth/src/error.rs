use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClothError {
	#[error("config codec: {0}")]
	Config(#[from] bincode::Error),
	#[error("collision volume not found: {0}")]
	VolumeNotFound(String),
	#[error("collision volume {0} is not a sphere")]
	NotASphere(String),
	#[error(transparent)]
	Protocol(#[from] protocol::ProtocolError),
}
