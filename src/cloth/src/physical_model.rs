use crate::config::ClothConfig;
use crate::constraint::{ConstraintKind, DistanceConstraint};
use crate::particle::Particle;
use crate::{V2, V3};

/// Freshly built cloth topology: a row-major particle grid and its links.
#[derive(Clone, Debug, Default)]
pub struct PhysicalModel {
	pub size: [usize; 2],
	pub particles: Vec<Particle>,
	pub constraints: Vec<DistanceConstraint>,
}

impl PhysicalModel {
	pub fn new_grid(config: &ClothConfig) -> Self {
		let w = config.width_divisions;
		let h = config.height_divisions;
		let dx = config.width / w as f32;
		let dy = config.length / h as f32;
		let mut particles = Vec::with_capacity(w * h);
		for idy in 0..h {
			for idx in 0..w {
				let pos = V3::new(dx * idx as f32, -dy * idy as f32, 0.);
				let uv = V2::new(
					idx as f32 / (w - 1) as f32,
					idy as f32 / (h - 1) as f32,
				);
				let p = Particle::new([idx, idy], pos, uv, config.mass)
					.with_damping(config.damping);
				particles.push(p);
			}
		}
		let mut model = Self {
			size: [w, h],
			particles,
			constraints: Vec::new(),
		};
		use ConstraintKind::*;
		let (w, h) = (w as isize, h as isize);
		for idy in 0..h {
			for idx in 0..w {
				let links = [
					(Structural, 1, 0),
					(Structural, 0, 1),
					(Shear, 1, -1),
					(Shear, 1, 1),
					(Bend, 2, -2),
					(Bend, 2, 2),
					(Bend, 2, 0),
					(Bend, 0, 2),
				];
				for (ty, ox, oy) in links {
					let (x, y) = (idx + ox, idy + oy);
					if x < 0 || x >= w || y < 0 || y >= h {
						continue;
					}
					model.link(
						(idy * w + idx) as usize,
						(y * w + x) as usize,
						ty,
					);
				}
			}
		}
		model
	}

	fn link(&mut self, p1: usize, p2: usize, ty: ConstraintKind) {
		let id = self.constraints.len();
		let dc = DistanceConstraint::new(&self.particles, p1, p2).with_ty(ty);
		self.constraints.push(dc);
		self.particles[p1].add_constraint(id);
		self.particles[p2].add_constraint(id);
	}
}
