// pr_mesh: triangle mesh for rendering

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

pub const VERTEX_FLOATS: usize = 8;

#[repr(C)]
#[derive(
	Zeroable, Pod, Default, Debug, Clone, Copy, PartialEq, Serialize, Deserialize,
)]
pub struct Vertex {
	pub pos: [f32; 3],
	pub tex_coord: [f32; 2],
	pub normal: [f32; 3],
}

/// Unshared triangle list: every triangle owns three consecutive vertices
/// and the index buffer is simply `0..vertices.len()`.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrMesh {
	pub vertices: Vec<Vertex>,
	pub indices: Vec<u32>,
}

impl PrMesh {
	pub fn clear(&mut self) {
		self.vertices.clear();
		self.indices.clear();
	}

	pub fn push_triangle(&mut self, vs: [Vertex; 3]) {
		let base = self.vertices.len() as u32;
		self.vertices.extend_from_slice(&vs);
		self.indices.extend_from_slice(&[base, base + 1, base + 2]);
	}

	pub fn triangle_count(&self) -> usize {
		self.indices.len() / 3
	}

	pub fn is_empty(&self) -> bool {
		self.indices.is_empty()
	}

	/// Interleaved position/texcoord/normal floats, ready for upload.
	pub fn floats(&self) -> &[f32] {
		bytemuck::cast_slice(&self.vertices)
	}

	pub fn triangles(&self) -> impl Iterator<Item = [&Vertex; 3]> {
		self.indices.chunks_exact(3).map(move |t| {
			[
				&self.vertices[t[0] as usize],
				&self.vertices[t[1] as usize],
				&self.vertices[t[2] as usize],
			]
		})
	}
}
