use crate::collision::CollisionVolume;
use crate::config::ClothConfig;
use crate::interaction::MouseMode;
use crate::V3;

pub enum ControllerMessage {
	TogglePause,
	FrameForward,
	SetConfig(ClothConfig),
	Rebuild,
	Reset,
	UnfixAll,
	AutoDistanceHooks,
	Interact(MouseMode, V3, f32),
	MoveVolume(String, CollisionVolume),
	Quit,
}
