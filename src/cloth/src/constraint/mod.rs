pub mod distance;

pub use distance::{DistanceConstraint, StepResult};

/// Fraction of the cloth stiffness applied to bend links.
pub const BEND_STIFFNESS_SCALE: f32 = 0.15;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConstraintKind {
	Structural,
	Shear,
	Bend,
}

impl ConstraintKind {
	pub fn stiffness(self, base: f32) -> f32 {
		match self {
			Self::Bend => base * BEND_STIFFNESS_SCALE,
			Self::Structural | Self::Shear => base,
		}
	}

	/// Structural links only tear by over-stretch.
	pub fn breaks_in_cascade(self) -> bool {
		self != Self::Structural
	}
}
