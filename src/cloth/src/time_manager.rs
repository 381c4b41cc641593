use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeModel {
	/// Frames run back to back, as when rendering offline.
	VideoRender,
	RtFrameLock,
}

pub struct TimeManager {
	pft: f32,
	model: TimeModel,
	start_time: Instant,
}

impl TimeManager {
	pub fn new(pft: f32, model: TimeModel) -> Self {
		Self {
			pft,
			model,
			start_time: Instant::now(),
		}
	}

	/// Closes the current frame and returns its load, the busy time over the
	/// frame budget. Real-time mode sleeps off whatever budget is left.
	pub fn take_time(&mut self) -> f32 {
		let busy = self.start_time.elapsed().as_secs_f32();
		let load = busy / self.pft;
		if self.model == TimeModel::RtFrameLock && busy < self.pft {
			std::thread::sleep(Duration::from_secs_f32(self.pft - busy));
		}
		self.start_time = Instant::now();
		load
	}
}
