//! Arena combat simulation library.
//!
//! Exposes the simulation's ECS components, resources, systems, and
//! events for use in integration tests and as a reusable library. The
//! usual entry point is [`game::Simulation`].

pub mod components;
pub mod error;
pub mod events;
pub mod game;
pub mod registry;
pub mod resources;
pub mod systems;
