use std::sync::mpsc::{Receiver, TryRecvError};

use protocol::user_event::UpdateInfo;
use protocol::MeshSink;

use crate::cloth::Cloth;
use crate::collision::{default_gravity, CollisionVolume, SimContext, VolumeRegistry};
use crate::config::{ClothConfig, ParameterSource};
use crate::controller_message::ControllerMessage;
use crate::error::ClothError;
use crate::time_manager::{TimeManager, TimeModel};
use crate::V3;

pub struct PWorld {
	pub dt: f32,
	pub gravity: V3,
	time_model: TimeModel,
	frame: u64,

	// -1: always play
	// 0: pause
	// n: play n frames
	forward_frames: i32,

	cloth: Cloth,
	volumes: VolumeRegistry,
}

impl Default for PWorld {
	fn default() -> Self {
		let config = ClothConfig::default();
		let mut volumes = VolumeRegistry::default();
		volumes.insert(
			config.collider_name.clone(),
			CollisionVolume::sphere(V3::new(0.0, 0.5, 0.8), 0.6),
		);
		Self {
			dt: 0.016,
			gravity: default_gravity(),
			time_model: TimeModel::RtFrameLock,
			frame: 0,
			forward_frames: -1,
			cloth: Cloth::new(config),
			volumes,
		}
	}
}

impl PWorld {
	pub fn with_dt(mut self, dt: f32) -> Self {
		self.dt = dt;
		self
	}

	pub fn with_gravity(mut self, gravity: V3) -> Self {
		self.gravity = gravity;
		self
	}

	pub fn with_time_model(mut self, time_model: TimeModel) -> Self {
		self.time_model = time_model;
		self
	}

	pub fn with_paused(mut self) -> Self {
		self.forward_frames = 1; // provide first frame
		self
	}

	pub fn with_config(mut self, config: ClothConfig) -> Self {
		self.cloth = Cloth::new(config);
		self
	}

	pub fn with_volume(
		mut self,
		name: impl Into<String>,
		volume: CollisionVolume,
	) -> Self {
		self.volumes.insert(name, volume);
		self
	}

	pub fn cloth(&self) -> &Cloth {
		&self.cloth
	}

	pub fn cloth_mut(&mut self) -> &mut Cloth {
		&mut self.cloth
	}

	pub fn volumes(&self) -> &VolumeRegistry {
		&self.volumes
	}

	pub fn volumes_mut(&mut self) -> &mut VolumeRegistry {
		&mut self.volumes
	}

	pub fn frame(&self) -> u64 {
		self.frame
	}

	pub fn is_paused(&self) -> bool {
		self.forward_frames == 0
	}

	pub fn sync_parameters(&mut self, source: &impl ParameterSource) {
		self.cloth.set_config(source.parameters());
	}

	pub fn run(&mut self) {
		let ctx = SimContext::new(&self.volumes).with_gravity(self.gravity);
		self.cloth.update(self.dt, &ctx);
		self.frame += 1;
	}

	pub fn update_info(&self, load: f32) -> UpdateInfo {
		self.cloth.update_info(self.frame, load)
	}

	/// Returns false once the world should stop.
	pub fn handle_message(&mut self, msg: ControllerMessage) -> bool {
		match msg {
			ControllerMessage::TogglePause => {
				if self.forward_frames == 0 {
					self.forward_frames = -1;
				} else {
					self.forward_frames = 0;
				}
			}
			ControllerMessage::FrameForward => {
				if self.forward_frames == 0 {
					self.forward_frames += 1;
				}
			}
			ControllerMessage::SetConfig(config) => self.cloth.set_config(config),
			ControllerMessage::Rebuild => self.cloth.rebuild(),
			ControllerMessage::Reset => self.cloth.reset(),
			ControllerMessage::UnfixAll => self.cloth.unfix_all(),
			ControllerMessage::AutoDistanceHooks => {
				self.cloth.auto_distance_hooks()
			}
			ControllerMessage::Interact(mode, point, radius) => {
				self.cloth.interact(mode, point, radius);
			}
			ControllerMessage::MoveVolume(name, volume) => {
				if self.volumes.insert(name.clone(), volume).is_none() {
					log::info!("collision volume {} added", name);
				}
			}
			ControllerMessage::Quit => return false,
		}
		true
	}

	/// Steps one frame and hands the mesh to `sink`.
	pub fn run_into<S: MeshSink>(
		&mut self,
		sink: &mut S,
		load: f32,
	) -> Result<(), ClothError> {
		self.run();
		sink.submit(self.cloth.mesh(), &self.update_info(load))?;
		Ok(())
	}

	pub fn run_thread<S: MeshSink>(
		&mut self,
		sink: &mut S,
		rx: Receiver<ControllerMessage>,
	) {
		let mut tm = TimeManager::new(self.dt, self.time_model);
		let mut load = 0.0;
		loop {
			loop {
				match rx.try_recv() {
					Ok(msg) => {
						if !self.handle_message(msg) {
							log::info!("world stopped at frame {}", self.frame);
							return;
						}
					}
					Err(TryRecvError::Empty) => break,
					Err(TryRecvError::Disconnected) => {
						log::info!("controller gone, world stopped");
						return;
					}
				}
			}
			if self.forward_frames != 0 {
				if self.forward_frames > 0 {
					self.forward_frames -= 1;
				}
				if let Err(e) = self.run_into(sink, load) {
					log::info!("mesh sink closed ({}), world stopped", e);
					return;
				}
			}
			load = tm.take_time();
		}
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::interaction::MouseMode;
	use protocol::pr_mesh::PrMesh;
	use protocol::Message;
	use std::sync::mpsc::channel;

	#[derive(Default)]
	struct Collect(Vec<(usize, u64)>);

	impl MeshSink for Collect {
		fn submit(
			&mut self,
			mesh: &PrMesh,
			info: &UpdateInfo,
		) -> Result<(), protocol::ProtocolError> {
			self.0.push((mesh.triangle_count(), info.frame));
			Ok(())
		}
	}

	fn small() -> ClothConfig {
		ClothConfig {
			width_divisions: 8,
			height_divisions: 8,
			..Default::default()
		}
	}

	#[test]
	fn test_run_into_sink() {
		let mut world = PWorld::default().with_config(small());
		let mut sink = Collect::default();
		world.run_into(&mut sink, 0.0).unwrap();
		world.run_into(&mut sink, 0.0).unwrap();
		assert_eq!(sink.0, vec![(98, 1), (98, 2)]);
	}

	#[test]
	fn test_messages() {
		let mut world = PWorld::default().with_config(small());
		assert!(world.handle_message(ControllerMessage::TogglePause));
		assert!(world.is_paused());
		world.handle_message(ControllerMessage::FrameForward);
		assert!(!world.is_paused());
		world.handle_message(ControllerMessage::UnfixAll);
		assert!(world.cloth().particles().iter().all(|p| !p.is_fixed()));
		world.handle_message(ControllerMessage::Interact(
			MouseMode::Fire,
			world.cloth().config().origin,
			0.1,
		));
		assert_eq!(world.cloth().broken_particle_count(), 1);
		world.handle_message(ControllerMessage::Rebuild);
		assert_eq!(world.cloth().broken_particle_count(), 0);
		world.handle_message(ControllerMessage::MoveVolume(
			"floor".to_string(),
			CollisionVolume::plane(-1.0),
		));
		assert!(world.volumes().get("floor").is_some());
		world.handle_message(ControllerMessage::Reset);
		assert_eq!(world.cloth().config(), &ClothConfig::default());
		assert!(!world.handle_message(ControllerMessage::Quit));
	}

	#[test]
	fn test_volume_registry() {
		let center = V3::new(0., 1., 0.1);
		let name = small().collider_name;
		let mut world = PWorld::default()
			.with_config(small())
			.with_volume(name.clone(), CollisionVolume::sphere(center, 0.3));
		world.run();
		let origin = world.cloth().config().origin;
		for p in world.cloth().particles().iter().filter(|p| !p.is_broken()) {
			assert!((p.world_pos(origin) - center).magnitude() > 0.25);
		}
		assert!(world.volumes_mut().remove(&name).is_some());
		world.run();
		assert!(world.volumes().is_empty());
	}

	#[test]
	fn test_sync_parameters() {
		let mut world = PWorld::default().with_config(small());
		let source = ClothConfig {
			width_divisions: 5,
			..small()
		};
		world.sync_parameters(&source);
		assert_eq!(world.cloth().size(), [5, 8]);
	}

	#[test]
	fn test_thread_roundtrip() {
		let (mesh_tx, mesh_rx) = channel();
		let (ctl_tx, ctl_rx) = channel();
		let handle = std::thread::spawn(move || {
			let mut world = PWorld::default()
				.with_config(small())
				.with_time_model(TimeModel::VideoRender);
			let mut sink = mesh_tx;
			world.run_thread(&mut sink, ctl_rx);
			world.frame()
		});
		for _ in 0..3 {
			match mesh_rx.recv().unwrap() {
				Message::MeshUpdate(mesh, info) => {
					assert!(!mesh.is_empty());
					assert!(info.frame > 0);
				}
				Message::Nop => panic!("unexpected nop"),
			}
		}
		ctl_tx.send(ControllerMessage::Quit).unwrap();
		assert!(handle.join().unwrap() >= 3);
	}

	#[test]
	fn test_paused_world_sends_one_frame() {
		let (mesh_tx, mesh_rx) = channel();
		let (ctl_tx, ctl_rx) = channel();
		let handle = std::thread::spawn(move || {
			let mut world = PWorld::default()
				.with_config(small())
				.with_time_model(TimeModel::VideoRender)
				.with_paused();
			let mut sink = mesh_tx;
			world.run_thread(&mut sink, ctl_rx);
			world.frame()
		});
		assert!(mesh_rx.recv().is_ok());
		ctl_tx.send(ControllerMessage::Quit).unwrap();
		assert_eq!(handle.join().unwrap(), 1);
	}
}
