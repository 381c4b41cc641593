pub mod cloth;
pub mod collision;
pub mod config;
pub mod constraint;
pub mod controller_message;
pub mod error;
pub mod interaction;
mod mesh;
pub mod particle;
pub mod physical_model;
pub mod pworld;
pub mod time_manager;

pub use mesh::smooth_normal;

pub type V2 = nalgebra::Vector2<f32>;
pub type V3 = nalgebra::Vector3<f32>;
