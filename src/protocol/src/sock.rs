use std::io::{Read, Write};
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::Path;

use crate::pr_mesh::PrMesh;
use crate::user_event::UpdateInfo;
use crate::{Message, MeshSink, ProtocolError};

// frames are length-prefixed (u32 le)
const MAX_FRAME: usize = 256 * 1024 * 1024;

pub struct SockServer {
	listener: UnixListener,
	stream: Option<UnixStream>,
}

impl SockServer {
	pub fn bind(path: impl AsRef<Path>) -> Result<Self, ProtocolError> {
		let _ = std::fs::remove_file(path.as_ref());
		let listener = UnixListener::bind(path)?;
		Ok(Self {
			listener,
			stream: None,
		})
	}

	fn listen(&mut self) -> Result<(), ProtocolError> {
		let (stream, _) = self.listener.accept()?;
		self.stream = Some(stream);
		Ok(())
	}

	/// Blocks until a client is connected and the whole frame is written.
	pub fn send_msg(&mut self, msg: &Message) -> Result<(), ProtocolError> {
		let bytes = msg.to_bytes()?;
		if bytes.len() > MAX_FRAME {
			return Err(ProtocolError::FrameTooLarge(bytes.len()));
		}
		let len = (bytes.len() as u32).to_le_bytes();
		loop {
			if let Some(stream) = self.stream.as_mut() {
				let written =
					stream.write_all(&len).and_then(|_| stream.write_all(&bytes));
				if written.is_ok() {
					return Ok(());
				}
				self.stream = None;
			}
			log::info!("waiting for renderer");
			self.listen()?;
			log::info!("renderer connected");
		}
	}
}

impl MeshSink for SockServer {
	fn submit(
		&mut self,
		mesh: &PrMesh,
		info: &UpdateInfo,
	) -> Result<(), ProtocolError> {
		self.send_msg(&Message::MeshUpdate(mesh.clone(), info.clone()))
	}
}

pub struct SockClient {
	stream: UnixStream,
	buf: Vec<u8>,
}

impl SockClient {
	pub fn connect(path: impl AsRef<Path>) -> Result<Self, ProtocolError> {
		Ok(Self {
			stream: UnixStream::connect(path)?,
			buf: Vec::new(),
		})
	}

	pub fn read_msg(&mut self) -> Result<Message, ProtocolError> {
		let mut len = [0u8; 4];
		self.stream.read_exact(&mut len)?;
		let len = u32::from_le_bytes(len) as usize;
		if len > MAX_FRAME {
			return Err(ProtocolError::FrameTooLarge(len));
		}
		self.buf.resize(len, 0);
		self.stream.read_exact(&mut self.buf)?;
		Message::from_bytes(&self.buf)
	}
}
