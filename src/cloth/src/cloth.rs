// per frame: integrate, pin hooks, ITERATIONS x (collide, relax), rebind

use protocol::pr_mesh::PrMesh;
use protocol::user_event::UpdateInfo;

use crate::collision::{CollisionVolume, SimContext};
use crate::config::{ClothConfig, VolumeKind};
use crate::constraint::{DistanceConstraint, StepResult};
use crate::mesh;
use crate::particle::{Forces, Particle};
use crate::physical_model::PhysicalModel;
use crate::V3;

pub const ITERATIONS: usize = 4;
pub const HOOK_STAGGER: f32 = 0.02;
// particles within this Chebyshev grid distance share a tear
pub const BREAK_REACH: usize = 2;

pub struct Cloth {
	config: ClothConfig,
	size: [usize; 2],
	particles: Vec<Particle>,
	constraints: Vec<DistanceConstraint>,
	hooks: Vec<usize>,
	mesh: PrMesh,
}

fn hook_stagger(i: usize) -> f32 {
	if i % 2 == 0 {
		HOOK_STAGGER
	} else {
		-HOOK_STAGGER
	}
}

impl Default for Cloth {
	fn default() -> Self {
		Self::new(ClothConfig::default())
	}
}

impl Cloth {
	pub fn new(config: ClothConfig) -> Self {
		let mut cloth = Self {
			config: config.sanitized(),
			size: [0, 0],
			particles: Vec::new(),
			constraints: Vec::new(),
			hooks: Vec::new(),
			mesh: PrMesh::default(),
		};
		cloth.rebuild();
		cloth
	}

	pub fn config(&self) -> &ClothConfig {
		&self.config
	}

	/// Applies new parameters, rebuilding only when the topology changed.
	pub fn set_config(&mut self, config: ClothConfig) {
		let config = config.sanitized();
		let rebuild = self.config.topology_differs(&config);
		self.config = config;
		if rebuild {
			self.rebuild();
		}
	}

	pub fn rebuild(&mut self) {
		let model = PhysicalModel::new_grid(&self.config);
		self.size = model.size;
		self.particles = model.particles;
		self.constraints = model.constraints;
		self.select_hooks();
		self.rebind();
		log::info!(
			"cloth rebuilt: {}x{} particles, {} constraints, {} hooks",
			self.size[0],
			self.size[1],
			self.constraints.len(),
			self.hooks.len(),
		);
	}

	pub fn reset(&mut self) {
		self.config = ClothConfig::default();
		self.rebuild();
	}

	fn select_hooks(&mut self) {
		let spacing = self.config.hook_spacing();
		let last = self.size[0] - 1;
		self.hooks = (0..self.config.hooks)
			.map(|i| ((i as f32 * spacing).round() as usize).min(last))
			.collect();
		for (i, &id) in self.hooks.iter().enumerate() {
			let p = &mut self.particles[id];
			let pos = p.get_pos() + V3::new(0., 0., hook_stagger(i));
			p.reset_pos(pos);
			p.set_fixed(true);
		}
	}

	pub fn size(&self) -> [usize; 2] {
		self.size
	}

	pub fn index(&self, x: usize, y: usize) -> Option<usize> {
		if x < self.size[0] && y < self.size[1] {
			Some(y * self.size[0] + x)
		} else {
			None
		}
	}

	pub fn particle(&self, x: usize, y: usize) -> Option<&Particle> {
		let id = self.index(x, y)?;
		Some(&self.particles[id])
	}

	pub fn particle_mut(&mut self, x: usize, y: usize) -> Option<&mut Particle> {
		let id = self.index(x, y)?;
		Some(&mut self.particles[id])
	}

	pub fn particles(&self) -> &[Particle] {
		&self.particles
	}

	pub fn constraints(&self) -> &[DistanceConstraint] {
		&self.constraints
	}

	/// Particle indices of the hooks, in hook order.
	pub fn hooks(&self) -> &[usize] {
		&self.hooks
	}

	pub fn hook_positions(&self) -> Vec<V3> {
		self.hooks
			.iter()
			.map(|&id| self.particles[id].world_pos(self.config.origin))
			.collect()
	}

	pub fn mesh(&self) -> &PrMesh {
		&self.mesh
	}

	pub fn broken_particle_count(&self) -> usize {
		self.particles.iter().filter(|p| p.is_broken()).count()
	}

	pub fn broken_constraint_count(&self) -> usize {
		self.constraints.iter().filter(|c| c.is_broken()).count()
	}

	pub fn update_info(&self, frame: u64, load: f32) -> UpdateInfo {
		UpdateInfo {
			frame,
			load,
			particle_len: self.particles.len(),
			broken_particle_len: self.broken_particle_count(),
			constraint_len: self.constraints.len(),
			broken_constraint_len: self.broken_constraint_count(),
		}
	}

	/// Tears the particle at (x, y). Returns false when out of bounds.
	pub fn break_particle(&mut self, x: usize, y: usize) -> bool {
		match self.index(x, y) {
			Some(id) => {
				self.break_index(id);
				true
			}
			None => false,
		}
	}

	pub(crate) fn break_index(&mut self, id: usize) {
		if self.particles[id].is_broken() {
			return;
		}
		self.particles[id].mark_broken();
		let [px, py] = self.particles[id].grid;
		let near = |[x, y]: [usize; 2]| {
			x.abs_diff(px) <= BREAK_REACH && y.abs_diff(py) <= BREAK_REACH
		};
		let particles = &self.particles;
		let constraints = &mut self.constraints;
		let mut cascaded = 0;
		let y_range = py.saturating_sub(BREAK_REACH)
			..=(py + BREAK_REACH).min(self.size[1] - 1);
		for y in y_range {
			let x_range = px.saturating_sub(BREAK_REACH)
				..=(px + BREAK_REACH).min(self.size[0] - 1);
			for x in x_range {
				let q = &particles[y * self.size[0] + x];
				for &cid in q.constraints() {
					let c = &mut constraints[cid];
					if c.is_broken() || !c.kind().breaks_in_cascade() {
						continue;
					}
					let [a, b] = c.particles();
					if near(particles[a].grid) && near(particles[b].grid) {
						c.mark_broken();
						cascaded += 1;
					}
				}
			}
		}
		log::debug!("particle ({}, {}) torn, {} links cascaded", px, py, cascaded);
	}

	pub fn auto_distance_hooks(&mut self) {
		self.config.hook_distance = self.config.auto_hook_distance();
	}

	/// Releases every hook, dropping the cloth.
	pub fn unfix_all(&mut self) {
		for &id in self.hooks.iter() {
			self.particles[id].set_fixed(false);
		}
	}

	pub fn update(&mut self, dt: f32, ctx: &SimContext) {
		let forces = Forces {
			gravity: ctx.gravity,
			wind: self.config.wind(),
		};
		self.integrate(dt, &forces);
		self.place_hooks();
		let volumes = self.collision_volumes(ctx);
		let break_scale = self.config.break_scale();
		for _ in 0..ITERATIONS {
			self.check_collisions(&volumes);
			self.relax_constraints(break_scale);
		}
		self.rebind();
	}

	#[cfg(not(debug_assertions))]
	fn integrate(&mut self, dt: f32, forces: &Forces) {
		use rayon::prelude::*;
		let damping = self.config.damping;
		self.particles.par_iter_mut().for_each(|p| {
			p.damping = damping;
			p.update(dt, forces);
		});
	}

	#[cfg(debug_assertions)]
	fn integrate(&mut self, dt: f32, forces: &Forces) {
		let damping = self.config.damping;
		self.particles.iter_mut().for_each(|p| {
			p.damping = damping;
			p.update(dt, forces);
		});
	}

	#[cfg(not(debug_assertions))]
	fn check_collisions(&mut self, volumes: &[CollisionVolume]) {
		use rayon::prelude::*;
		let origin = self.config.origin;
		let padding = self.config.collision_padding;
		self.particles
			.par_iter_mut()
			.for_each(|p| p.check_collisions(origin, volumes, padding));
	}

	#[cfg(debug_assertions)]
	fn check_collisions(&mut self, volumes: &[CollisionVolume]) {
		let origin = self.config.origin;
		let padding = self.config.collision_padding;
		self.particles
			.iter_mut()
			.for_each(|p| p.check_collisions(origin, volumes, padding));
	}

	// hooks slide along a horizontal line, so spreading them needs no rebuild
	fn place_hooks(&mut self) {
		let distance = self.config.hook_distance;
		for (i, &id) in self.hooks.iter().enumerate() {
			let p = &mut self.particles[id];
			if !p.is_fixed() || p.is_broken() {
				continue;
			}
			p.reset_pos(V3::new(i as f32 * distance, 0., hook_stagger(i)));
		}
	}

	fn collision_volumes(&self, ctx: &SimContext) -> Vec<CollisionVolume> {
		let mut volumes = Vec::new();
		if let Some(height) = self.config.ground_height {
			volumes.push(CollisionVolume::plane(height));
		}
		if self.config.collider == VolumeKind::Sphere {
			match ctx.volumes.sphere(&self.config.collider_name) {
				Ok(sphere) => volumes.push(sphere),
				Err(e) => log::debug!("sphere collider skipped: {}", e),
			}
		}
		volumes
	}

	fn relax_constraints(&mut self, break_scale: f32) {
		let stiffness = self.config.stiffness;
		for cid in 0..self.constraints.len() {
			let c = &mut self.constraints[cid];
			let max_length = c.rest_length() * break_scale;
			let k = c.kind().stiffness(stiffness);
			if c.step(&mut self.particles, k, max_length)
				== StepResult::Overstretched
			{
				let [a, b] = c.particles();
				self.break_index(a);
				self.break_index(b);
			}
		}
	}

	/// Rebuilds the render mesh from the current particle state.
	pub fn rebind(&mut self) {
		if self.config.smooth_normals {
			mesh::update_smooth_normals(&mut self.particles, self.size);
		}
		mesh::rebind(
			&mut self.particles,
			self.size,
			self.config.origin,
			self.config.smooth_normals,
			&mut self.mesh,
		);
	}
}
