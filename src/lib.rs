//! skyburst: a tick-driven fireworks simulation
//!
//! Rockets launch from the bottom of a surface, climb under constant gravity,
//! burst at their apex into fading, trailed sparks, and are dropped once the
//! last spark is gone. The crate is host-agnostic: anything implementing
//! [`Surface`] can display it, and the host drives it with one
//! [`Simulation::tick`] and one [`Simulation::render`] per frame.

pub mod color;
pub mod command;
pub mod config;
pub mod error;
pub mod math;
pub mod particles;
pub mod random;
pub mod rocket;
pub mod simulation;
pub mod surface;
pub mod trail;

pub use command::Command;
pub use config::Config;
pub use error::{Result, SkyburstError};
pub use math::Vec2;
pub use particles::{ExplosionParticle, Particle, PlainParticle};
pub use random::RandomSource;
pub use rocket::{Rocket, RocketState};
pub use simulation::{Simulation, SimulationSettings};
pub use surface::{RecordingSurface, Surface};
pub use trail::TrailBuffer;
