use std::time::Instant;

use cloth::pworld::PWorld;

fn main() {
	let start = Instant::now();
	let mut pworld = PWorld::default();
	let rframes = 600;
	for _ in 0..rframes {
		pworld.run();
	}
	let time = rframes as f32 * pworld.dt;
	let duration = start.elapsed().as_secs_f32();
	let info = pworld.update_info(duration / time);
	eprintln!(
		"{:.3}% ({} triangles, {}/{} particles torn)",
		info.load * 100.0,
		pworld.cloth().mesh().triangle_count(),
		info.broken_particle_len,
		info.particle_len,
	);
}
