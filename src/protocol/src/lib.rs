pub mod pr_mesh;
pub mod sock;
pub mod user_event;

use std::sync::mpsc::Sender;

use pr_mesh::PrMesh;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use user_event::UpdateInfo;

#[derive(Debug, Error)]
pub enum ProtocolError {
	#[error("codec: {0}")]
	Codec(#[from] bincode::Error),
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	#[error("mesh receiver disconnected")]
	Disconnected,
	#[error("frame of {0} bytes exceeds the limit")]
	FrameTooLarge(usize),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum Message {
	MeshUpdate(PrMesh, UpdateInfo),
	Nop,
}

impl Message {
	pub fn to_bytes(&self) -> Result<Vec<u8>, ProtocolError> {
		Ok(bincode::serialize(&self)?)
	}

	pub fn from_bytes(bytes: &[u8]) -> Result<Self, ProtocolError> {
		Ok(bincode::deserialize(bytes)?)
	}
}

/// Receiving end of the simulation: whatever uploads and draws the mesh.
pub trait MeshSink {
	fn submit(
		&mut self,
		mesh: &PrMesh,
		info: &UpdateInfo,
	) -> Result<(), ProtocolError>;
}

impl MeshSink for Sender<Message> {
	fn submit(
		&mut self,
		mesh: &PrMesh,
		info: &UpdateInfo,
	) -> Result<(), ProtocolError> {
		self.send(Message::MeshUpdate(mesh.clone(), info.clone()))
			.map_err(|_| ProtocolError::Disconnected)
	}
}
