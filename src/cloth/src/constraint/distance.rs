use crate::constraint::ConstraintKind;
use crate::particle::Particle;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepResult {
	Inert,
	Relaxed,
	/// Stretched past the tear length; the caller breaks both endpoints.
	Overstretched,
}

#[derive(Clone, Debug)]
pub struct DistanceConstraint {
	ps: [usize; 2],
	l0: f32,
	ty: ConstraintKind,
	broken: bool,
}

impl DistanceConstraint {
	pub fn new(particles: &[Particle], p1: usize, p2: usize) -> Self {
		let l0 = (particles[p1].get_pos() - particles[p2].get_pos()).magnitude();
		Self::new_with_l0(p1, p2, l0)
	}

	pub fn new_with_l0(p1: usize, p2: usize, l0: f32) -> Self {
		Self {
			ps: [p1, p2],
			l0,
			ty: ConstraintKind::Structural,
			broken: false,
		}
	}

	pub fn with_ty(mut self, ty: ConstraintKind) -> Self {
		self.ty = ty;
		self
	}

	pub fn particles(&self) -> [usize; 2] {
		self.ps
	}

	pub fn rest_length(&self) -> f32 {
		self.l0
	}

	pub fn kind(&self) -> ConstraintKind {
		self.ty
	}

	pub fn is_broken(&self) -> bool {
		self.broken
	}

	pub fn mark_broken(&mut self) {
		self.broken = true;
	}

	pub fn step(
		&mut self,
		particles: &mut [Particle],
		stiffness: f32,
		max_length: f32,
	) -> StepResult {
		let [i1, i2] = self.ps;
		if self.broken || particles[i1].is_broken() || particles[i2].is_broken()
		{
			return StepResult::Inert;
		}
		let dp = particles[i2].get_pos() - particles[i1].get_pos();
		let l = dp.magnitude();
		if l > max_length {
			return StepResult::Overstretched;
		}
		if !l.is_normal() {
			log::warn!("bad distance {} between {} and {}", l, i1, i2);
			return StepResult::Inert;
		}
		let imass1 = particles[i1].get_imass();
		let imass2 = particles[i2].get_imass();
		let imass = imass1 + imass2;
		if imass == 0.0 {
			return StepResult::Inert;
		}
		let difference = (self.l0 - l) / l;
		let correct = dp * stiffness * difference;
		particles[i1].add_pos(-correct * (imass1 / imass));
		particles[i2].add_pos(correct * (imass2 / imass));
		StepResult::Relaxed
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::{V2, V3};

	fn pair(d: f32) -> Vec<Particle> {
		vec![
			Particle::new([0, 0], V3::zeros(), V2::zeros(), 1.0),
			Particle::new([1, 0], V3::new(d, 0., 0.), V2::zeros(), 1.0),
		]
	}

	#[test]
	fn test_full_stiffness_restores_rest_length() {
		let mut ps = pair(1.0);
		let mut c = DistanceConstraint::new(&ps, 0, 1);
		assert_eq!(c.rest_length(), 1.0);
		ps[1].pos.x = 1.5;
		assert_eq!(c.step(&mut ps, 1.0, 10.0), StepResult::Relaxed);
		assert!((ps[0].pos.x - 0.25).abs() < 1e-6);
		assert!((ps[1].pos.x - 1.25).abs() < 1e-6);
		assert_eq!(c.rest_length(), 1.0);
	}

	#[test]
	fn test_fixed_endpoint_immovable() {
		let mut ps = pair(1.0);
		let mut c = DistanceConstraint::new(&ps, 0, 1);
		ps[0].set_fixed(true);
		ps[1].pos.x = 2.0;
		c.step(&mut ps, 0.5, 10.0);
		assert_eq!(ps[0].pos, V3::zeros());
		assert!((ps[1].pos.x - 1.5).abs() < 1e-6);
	}

	#[test]
	fn test_both_fixed_inert() {
		let mut ps = pair(1.0);
		let mut c = DistanceConstraint::new(&ps, 0, 1);
		ps[0].set_fixed(true);
		ps[1].set_fixed(true);
		ps[1].reset_pos(V3::new(3., 0., 0.));
		assert_eq!(c.step(&mut ps, 1.0, 10.0), StepResult::Inert);
	}

	#[test]
	fn test_break_threshold() {
		let mut ps = pair(1.0);
		let mut c = DistanceConstraint::new(&ps, 0, 1);
		ps[1].pos.x = 3.99;
		assert_eq!(c.step(&mut ps, 1.0, 4.0), StepResult::Relaxed);
		assert!(!c.is_broken());

		// exactly at the limit still relaxes
		let mut ps = pair(1.0);
		ps[1].pos.x = 4.0;
		assert_eq!(c.step(&mut ps, 1.0, 4.0), StepResult::Relaxed);

		let mut ps = pair(1.0);
		ps[1].pos.x = 4.01;
		assert_eq!(c.step(&mut ps, 1.0, 4.0), StepResult::Overstretched);
		// over-stretch leaves positions untouched
		assert_eq!(ps[0].pos, V3::zeros());
		assert_eq!(ps[1].pos.x, 4.01);
	}

	#[test]
	fn test_broken_is_inert() {
		let mut ps = pair(1.0);
		let mut c =
			DistanceConstraint::new(&ps, 0, 1).with_ty(ConstraintKind::Shear);
		c.mark_broken();
		c.mark_broken();
		ps[1].pos.x = 2.0;
		assert_eq!(c.step(&mut ps, 1.0, 10.0), StepResult::Inert);
		assert_eq!(ps[1].pos.x, 2.0);
		assert!(c.is_broken());

		let mut c = DistanceConstraint::new(&ps, 0, 1);
		ps[0].mark_broken();
		assert_eq!(c.step(&mut ps, 1.0, 10.0), StepResult::Inert);
	}

	#[test]
	fn test_coincident_skipped() {
		let mut ps = pair(1.0);
		let mut c = DistanceConstraint::new(&ps, 0, 1);
		ps[1].pos = ps[0].pos;
		assert_eq!(c.step(&mut ps, 1.0, 10.0), StepResult::Inert);
		assert!(ps.iter().all(|p| p.pos.iter().all(|x| x.is_finite())));
	}

	#[test]
	fn test_bend_scale() {
		assert!((ConstraintKind::Bend.stiffness(0.8) - 0.12).abs() < 1e-6);
		assert_eq!(ConstraintKind::Shear.stiffness(0.8), 0.8);
		assert!(!ConstraintKind::Structural.breaks_in_cascade());
		assert!(ConstraintKind::Bend.breaks_in_cascade());
	}
}
