use serde::{Deserialize, Serialize};

use crate::cloth::Cloth;
use crate::V3;

// fraction of the gap to the cursor closed per pull/push
const PULL_RATE: f32 = 0.2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MouseMode {
	Grab,
	Pull,
	Push,
	Tear,
	/// Burns away every particle under the cursor.
	Fire,
	Pin,
}

impl Cloth {
	/// Grid index of the closest live particle within `radius` of a world
	/// point.
	pub fn nearest_particle(&self, point: V3, radius: f32) -> Option<[usize; 2]> {
		let origin = self.config().origin;
		self.particles()
			.iter()
			.filter(|p| !p.is_broken())
			.map(|p| (p.grid, (p.world_pos(origin) - point).magnitude()))
			.filter(|(_, d)| *d <= radius)
			.min_by(|a, b| a.1.total_cmp(&b.1))
			.map(|(grid, _)| grid)
	}

	fn particles_within(&self, point: V3, radius: f32) -> Vec<([usize; 2], f32)> {
		let origin = self.config().origin;
		self.particles()
			.iter()
			.filter(|p| !p.is_broken())
			.map(|p| (p.grid, (p.world_pos(origin) - point).magnitude()))
			.filter(|(_, d)| *d <= radius)
			.collect()
	}

	/// Applies a mouse action at a world point; returns how many particles
	/// it touched.
	pub fn interact(&mut self, mode: MouseMode, point: V3, radius: f32) -> usize {
		let origin = self.config().origin;
		match mode {
			MouseMode::Grab => {
				let Some([x, y]) = self.nearest_particle(point, radius) else {
					return 0;
				};
				if let Some(p) = self.particle_mut(x, y) {
					p.reset_pos(point - origin);
				}
				1
			}
			MouseMode::Pull | MouseMode::Push => {
				let sign = if mode == MouseMode::Pull { 1.0 } else { -1.0 };
				let hits = self.particles_within(point, radius);
				let mut moved = 0;
				for ([x, y], d) in hits {
					let Some(p) = self.particle_mut(x, y) else {
						continue;
					};
					if p.is_fixed() {
						continue;
					}
					let falloff = 1.0 - d / radius.max(f32::EPSILON);
					let gap = point - p.world_pos(origin);
					p.add_pos(gap * (sign * PULL_RATE * falloff));
					moved += 1;
				}
				moved
			}
			MouseMode::Tear => match self.nearest_particle(point, radius) {
				Some([x, y]) => {
					self.break_particle(x, y);
					1
				}
				None => 0,
			},
			MouseMode::Fire => {
				let hits = self.particles_within(point, radius);
				for ([x, y], _) in hits.iter() {
					self.break_particle(*x, *y);
				}
				hits.len()
			}
			MouseMode::Pin => {
				let Some([x, y]) = self.nearest_particle(point, radius) else {
					return 0;
				};
				if let Some(p) = self.particle_mut(x, y) {
					let fixed = p.is_fixed();
					p.set_fixed(!fixed);
				}
				1
			}
		}
	}
}
