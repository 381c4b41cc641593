use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::collision::CollisionVolume;
use crate::{V2, V3};

pub const GUST_MIN: f32 = 0.75;
pub const GUST_MAX: f32 = 1.5;
// thickness of collision planes
pub const PLANE_EPSILON: f32 = 0.01;

/// Environmental accelerations for one particle pass.
#[derive(Clone, Copy, Debug, Default)]
pub struct Forces {
	pub gravity: V3,
	pub wind: V3,
}

#[derive(Clone, Debug)]
pub struct Particle {
	pub grid: [usize; 2],
	pub pos: V3,
	pub ppos: V3,
	pub velocity: V3,
	pub accel: V3,
	pub normal: V3,
	pub tex_coord: V2,
	pub damping: f32,
	mass: f32,
	fixed: bool,
	broken: bool,
	constraints: Vec<usize>,
	rng: SmallRng,
}

impl Particle {
	pub fn new(grid: [usize; 2], pos: V3, tex_coord: V2, mass: f32) -> Self {
		let seed = ((grid[1] as u64) << 32) | grid[0] as u64;
		Self {
			grid,
			pos,
			ppos: pos,
			velocity: V3::zeros(),
			accel: V3::zeros(),
			normal: V3::z(),
			tex_coord,
			damping: 0.0,
			mass: if mass > 0.0 { mass } else { 1.0 },
			fixed: false,
			broken: false,
			constraints: Vec::new(),
			rng: SmallRng::seed_from_u64(seed),
		}
	}

	pub fn with_damping(mut self, damping: f32) -> Self {
		self.damping = damping;
		self
	}

	pub fn get_pos(&self) -> V3 {
		self.pos
	}

	pub fn world_pos(&self, origin: V3) -> V3 {
		origin + self.pos
	}

	pub fn mass(&self) -> f32 {
		self.mass
	}

	/// Zero for fixed particles, which absorb no correction.
	pub fn get_imass(&self) -> f32 {
		if self.fixed {
			0.0
		} else {
			1.0 / self.mass
		}
	}

	pub fn is_fixed(&self) -> bool {
		self.fixed
	}

	pub fn set_fixed(&mut self, fixed: bool) {
		self.fixed = fixed;
	}

	pub fn is_broken(&self) -> bool {
		self.broken
	}

	// only the cloth may break particles, it owns the cascade
	pub(crate) fn mark_broken(&mut self) {
		self.broken = true;
	}

	/// Indices of the constraints touching this particle.
	pub fn constraints(&self) -> &[usize] {
		&self.constraints
	}

	pub(crate) fn add_constraint(&mut self, id: usize) {
		self.constraints.push(id);
	}

	pub fn apply_force(&mut self, force: V3) {
		self.accel += force / self.mass;
	}

	/// Constraint correction; a no-op on fixed particles.
	pub fn add_pos(&mut self, dp: V3) {
		if !self.fixed {
			self.pos += dp;
		}
	}

	/// Explicit move, ignores `fixed` and drops any motion.
	pub fn reset_pos(&mut self, p: V3) {
		self.pos = p;
		self.ppos = p;
		self.velocity = V3::zeros();
	}

	pub fn update(&mut self, dt: f32, forces: &Forces) {
		if self.fixed || self.broken {
			return;
		}
		let gust = self.rng.gen_range(GUST_MIN..=GUST_MAX);
		self.apply_force(forces.gravity * self.mass);
		self.apply_force(forces.wind * self.mass * gust);
		self.apply_force(-self.velocity * self.damping);

		let ppos = self.pos;
		let pos = (1.0 + self.damping) * self.pos - self.damping * self.ppos
			+ self.accel * dt * dt;
		// velocity is measured against the pre-step position, not ppos
		self.velocity = pos - ppos;
		self.pos = pos;
		self.ppos = ppos;
		self.accel = V3::zeros();
	}

	pub fn check_collisions(
		&mut self,
		origin: V3,
		volumes: &[CollisionVolume],
		padding: f32,
	) {
		// pinned particles only move explicitly
		if self.fixed || self.broken {
			return;
		}
		for volume in volumes {
			match *volume {
				CollisionVolume::Plane { height } => {
					let surface = height + PLANE_EPSILON;
					if self.world_pos(origin).y < surface {
						self.accel.y = 0.0;
						self.pos.y = surface - origin.y;
						self.ppos = self.pos;
					}
				}
				CollisionVolume::Sphere { center, radius } => {
					let reach = radius + padding;
					let offset = self.world_pos(origin) - center;
					if offset.magnitude() < reach {
						let normal = offset
							.try_normalize(f32::EPSILON)
							.unwrap_or_else(V3::y);
						self.pos = center + normal * reach - origin;
						self.ppos = self.pos;
						self.accel = V3::zeros();
					}
				}
			}
		}
	}
}
