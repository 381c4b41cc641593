use protocol::pr_mesh::{PrMesh, Vertex};

use crate::particle::Particle;
use crate::V3;

// clockwise from north, north being row y - 1
const COMPASS: [(isize, isize); 8] = [
	(0, -1),
	(1, -1),
	(1, 0),
	(1, 1),
	(0, 1),
	(-1, 1),
	(-1, 0),
	(-1, -1),
];

fn neighbor(
	[w, h]: [usize; 2],
	x: usize,
	y: usize,
	(ox, oy): (isize, isize),
) -> Option<usize> {
	let nx = x.checked_add_signed(ox)?;
	let ny = y.checked_add_signed(oy)?;
	if nx >= w || ny >= h {
		return None;
	}
	Some(ny * w + nx)
}

/// Area-weighted vertex normal over the fan of up to eight triangles around
/// grid point (x, y); +Z when no triangle is available.
pub fn smooth_normal(
	particles: &[Particle],
	size: [usize; 2],
	x: usize,
	y: usize,
) -> V3 {
	let center = particles[y * size[0] + x].get_pos();
	let mut sum = V3::zeros();
	for i in 0..COMPASS.len() {
		let a = neighbor(size, x, y, COMPASS[i]);
		let b = neighbor(size, x, y, COMPASS[(i + 1) % COMPASS.len()]);
		if let (Some(a), Some(b)) = (a, b) {
			let ea = particles[a].get_pos() - center;
			let eb = particles[b].get_pos() - center;
			sum += ea.cross(&eb);
		}
	}
	(-sum).try_normalize(f32::EPSILON).unwrap_or_else(V3::z)
}

pub(crate) fn update_smooth_normals(particles: &mut [Particle], size: [usize; 2]) {
	let ps: &[Particle] = particles;
	let normals: Vec<V3> = (0..size[1])
		.flat_map(|y| (0..size[0]).map(move |x| (x, y)))
		.map(|(x, y)| smooth_normal(ps, size, x, y))
		.collect();
	for (p, n) in particles.iter_mut().zip(normals) {
		p.normal = n;
	}
}

fn face_normal(a: V3, b: V3, c: V3) -> V3 {
	(b - a).cross(&(c - a)).try_normalize(f32::EPSILON).unwrap_or_else(V3::z)
}

fn vertex(p: &Particle, origin: V3) -> Vertex {
	Vertex {
		pos: p.world_pos(origin).into(),
		tex_coord: p.tex_coord.into(),
		normal: p.normal.into(),
	}
}

fn emit(
	particles: &mut [Particle],
	tri: [usize; 3],
	origin: V3,
	smooth: bool,
	mesh: &mut PrMesh,
) {
	if !smooth {
		// shared particles keep whichever face wrote them last
		let n = face_normal(
			particles[tri[0]].get_pos(),
			particles[tri[1]].get_pos(),
			particles[tri[2]].get_pos(),
		);
		for i in tri {
			particles[i].normal = n;
		}
	}
	mesh.push_triangle(tri.map(|i| vertex(&particles[i], origin)));
}

/// Regenerates the triangle list, skipping torn quads.
pub(crate) fn rebind(
	particles: &mut [Particle],
	[w, h]: [usize; 2],
	origin: V3,
	smooth: bool,
	mesh: &mut PrMesh,
) {
	mesh.clear();
	for y in 0..h - 1 {
		for x in 0..w - 1 {
			let tl = y * w + x;
			let tr = tl + 1;
			let bl = tl + w;
			let br = bl + 1;
			let alive = [tl, tr, bl, br].map(|i| !particles[i].is_broken());
			match alive {
				[true, true, true, true] => {
					emit(particles, [tl, bl, tr], origin, smooth, mesh);
					emit(particles, [tr, bl, br], origin, smooth, mesh);
				}
				[false, true, true, true] => {
					emit(particles, [tr, bl, br], origin, smooth, mesh)
				}
				[true, false, true, true] => {
					emit(particles, [tl, bl, br], origin, smooth, mesh)
				}
				[true, true, false, true] => {
					emit(particles, [tl, br, tr], origin, smooth, mesh)
				}
				[true, true, true, false] => {
					emit(particles, [tl, bl, tr], origin, smooth, mesh)
				}
				_ => {}
			}
		}
	}
}
