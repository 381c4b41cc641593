use fnv::FnvHashMap;
use serde::{Deserialize, Serialize};

use crate::error::ClothError;
use crate::V3;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum CollisionVolume {
	/// Horizontal ground plane, solid below `height`.
	Plane { height: f32 },
	Sphere { center: V3, radius: f32 },
}

impl CollisionVolume {
	pub fn plane(height: f32) -> Self {
		Self::Plane { height }
	}

	pub fn sphere(center: V3, radius: f32) -> Self {
		Self::Sphere { center, radius }
	}
}

/// Named collision volumes owned by the scene, read by cloths each frame.
#[derive(Clone, Debug, Default)]
pub struct VolumeRegistry {
	volumes: FnvHashMap<String, CollisionVolume>,
}

impl VolumeRegistry {
	pub fn insert(
		&mut self,
		name: impl Into<String>,
		volume: CollisionVolume,
	) -> Option<CollisionVolume> {
		self.volumes.insert(name.into(), volume)
	}

	pub fn remove(&mut self, name: &str) -> Option<CollisionVolume> {
		self.volumes.remove(name)
	}

	pub fn get(&self, name: &str) -> Option<&CollisionVolume> {
		self.volumes.get(name)
	}

	pub fn get_mut(&mut self, name: &str) -> Option<&mut CollisionVolume> {
		self.volumes.get_mut(name)
	}

	pub fn sphere(&self, name: &str) -> Result<CollisionVolume, ClothError> {
		match self.volumes.get(name) {
			Some(v @ CollisionVolume::Sphere { .. }) => Ok(*v),
			Some(_) => Err(ClothError::NotASphere(name.to_string())),
			None => Err(ClothError::VolumeNotFound(name.to_string())),
		}
	}

	pub fn len(&self) -> usize {
		self.volumes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.volumes.is_empty()
	}
}

pub fn default_gravity() -> V3 {
	V3::new(0.0, -9.81, 0.0)
}

/// Scene state shared by every cloth during one update.
#[derive(Clone, Copy, Debug)]
pub struct SimContext<'a> {
	pub gravity: V3,
	pub volumes: &'a VolumeRegistry,
}

impl<'a> SimContext<'a> {
	pub fn new(volumes: &'a VolumeRegistry) -> Self {
		Self {
			gravity: default_gravity(),
			volumes,
		}
	}

	pub fn with_gravity(mut self, gravity: V3) -> Self {
		self.gravity = gravity;
		self
	}
}
