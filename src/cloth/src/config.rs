// topology fields (dimensions, divisions, mass, hooks) need a rebuild,
// the rest is read every frame

use serde::{Deserialize, Serialize};

use crate::error::ClothError;
use crate::V3;

pub const MIN_DIVISIONS: usize = 2;
pub const MIN_HOOKS: usize = 1;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VolumeKind {
	#[default]
	None,
	Sphere,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClothConfig {
	pub width: f32,
	pub length: f32,
	pub width_divisions: usize,
	pub height_divisions: usize,
	pub mass: f32,
	pub stiffness: f32,
	/// Velocity retention of the Verlet step, also the drag coefficient.
	pub damping: f32,
	pub hooks: usize,
	pub hook_distance: f32,
	pub wind_direction: V3,
	pub wind_strength: f32,
	pub smooth_normals: bool,
	pub collider: VolumeKind,
	/// Registry name of the sphere used when `collider` is `Sphere`.
	pub collider_name: String,
	pub ground_height: Option<f32>,
	pub collision_padding: f32,
	/// World-space position of particle (0, 0) before any motion.
	pub origin: V3,
}

impl Default for ClothConfig {
	fn default() -> Self {
		let width = 4.0;
		let hooks = 5;
		Self {
			width,
			length: 4.0,
			width_divisions: 30,
			height_divisions: 30,
			mass: 1.0,
			stiffness: 0.8,
			damping: 0.97,
			hooks,
			hook_distance: width / (hooks - 1) as f32,
			wind_direction: V3::new(0.0, 0.0, 1.0),
			wind_strength: 1.5,
			smooth_normals: true,
			collider: VolumeKind::Sphere,
			collider_name: "sphere".to_string(),
			ground_height: Some(-2.0),
			collision_padding: 0.05,
			origin: V3::new(-2.0, 3.0, 0.0),
		}
	}
}

pub trait ParameterSource {
	fn parameters(&self) -> ClothConfig;
}

impl ParameterSource for ClothConfig {
	fn parameters(&self) -> ClothConfig {
		self.clone()
	}
}

fn finite(name: &str, value: f32, default: f32) -> f32 {
	if value.is_finite() {
		return value;
	}
	log::warn!("{} {} replaced by {}", name, value, default);
	default
}

fn positive(name: &str, value: f32, default: f32) -> f32 {
	// negated comparison also catches NaN
	if !(value > 0.0) || value.is_infinite() {
		log::warn!("{} {} replaced by {}", name, value, default);
		return default;
	}
	value
}

// clamped into [0, 1], NaN falls back to the default
fn unit(name: &str, value: f32, default: f32) -> f32 {
	if (0.0..=1.0).contains(&value) {
		return value;
	}
	let clamped = if value.is_nan() {
		default
	} else {
		value.clamp(0.0, 1.0)
	};
	log::warn!("{} {} clamped to {}", name, value, clamped);
	clamped
}

impl ClothConfig {
	/// Clamps every field into its valid range, logging each correction.
	pub fn sanitized(mut self) -> Self {
		let default = Self::default();
		if self.width_divisions < MIN_DIVISIONS {
			log::warn!("width divisions {} clamped", self.width_divisions);
			self.width_divisions = MIN_DIVISIONS;
		}
		if self.height_divisions < MIN_DIVISIONS {
			log::warn!("height divisions {} clamped", self.height_divisions);
			self.height_divisions = MIN_DIVISIONS;
		}
		self.width = positive("width", self.width, default.width);
		self.length = positive("length", self.length, default.length);
		self.mass = positive("mass", self.mass, default.mass);
		self.stiffness = unit("stiffness", self.stiffness, default.stiffness);
		self.damping = unit("damping", self.damping, default.damping);
		self.wind_strength =
			finite("wind strength", self.wind_strength, default.wind_strength);
		if !self.wind_direction.iter().all(|x| x.is_finite()) {
			log::warn!("wind direction {:?} replaced", self.wind_direction);
			self.wind_direction = default.wind_direction;
		}
		if !self.origin.iter().all(|x| x.is_finite()) {
			log::warn!("origin {:?} replaced", self.origin);
			self.origin = default.origin;
		}
		if let Some(height) = self.ground_height {
			if !height.is_finite() {
				log::warn!("ground height {} dropped", height);
				self.ground_height = None;
			}
		}
		if !(self.collision_padding >= 0.0 && self.collision_padding.is_finite()) {
			log::warn!(
				"collision padding {} replaced by {}",
				self.collision_padding,
				default.collision_padding,
			);
			self.collision_padding = default.collision_padding;
		}
		let hooks = self.hooks.clamp(MIN_HOOKS, self.width_divisions);
		if hooks != self.hooks {
			log::warn!("hook count {} clamped to {}", self.hooks, hooks);
			self.hooks = hooks;
		}
		if !self.hook_distance.is_finite() {
			let auto = self.auto_hook_distance();
			log::warn!("hook distance {} replaced by {}", self.hook_distance, auto);
			self.hook_distance = auto;
		}
		self
	}

	/// Column stride between hooks along row 0; zero for a single hook.
	pub fn hook_spacing(&self) -> f32 {
		if self.hooks <= 1 {
			return 0.0;
		}
		(self.width_divisions - 1) as f32 / (self.hooks - 1) as f32
	}

	/// Hook distance spreading the hooks over the full width; zero for a
	/// single hook.
	pub fn auto_hook_distance(&self) -> f32 {
		if self.hooks <= 1 {
			return 0.0;
		}
		self.width / (self.hooks - 1) as f32
	}

	/// Multiplier on rest length beyond which a constraint tears.
	pub fn break_scale(&self) -> f32 {
		let max_divisions = self.width_divisions.max(self.height_divisions);
		let max_dimension = self.width.max(self.length);
		4.0 * (max_divisions as f32 / max_dimension)
	}

	pub fn wind(&self) -> V3 {
		self.wind_direction
			.try_normalize(f32::EPSILON)
			.map_or_else(V3::zeros, |d| d * self.wind_strength)
	}

	pub fn topology_differs(&self, other: &Self) -> bool {
		self.width != other.width
			|| self.length != other.length
			|| self.width_divisions != other.width_divisions
			|| self.height_divisions != other.height_divisions
			|| self.mass != other.mass
			|| self.hooks != other.hooks
	}

	pub fn to_bytes(&self) -> Result<Vec<u8>, ClothError> {
		Ok(bincode::serialize(self)?)
	}

	pub fn from_bytes(bytes: &[u8]) -> Result<Self, ClothError> {
		let config: Self = bincode::deserialize(bytes)?;
		Ok(config.sanitized())
	}
}
