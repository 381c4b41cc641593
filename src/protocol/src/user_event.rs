use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateInfo {
	pub frame: u64,
	pub load: f32,
	pub particle_len: usize,
	pub broken_particle_len: usize,
	pub constraint_len: usize,
	pub broken_constraint_len: usize,
}
