//! Orbit sandbox library
//!
//! A 2-D gravitational N-body engine with inelastic merging, a thrust-driven
//! controller and distance-based population loading, plus the Bevy plugin
//! that drives it interactively.
//!
//! The engine modules ([`vector`], [`body`], [`controller`], [`universe`],
//! [`view`]) do not touch the ECS and can be used headless.

pub mod body;
pub mod config;
pub mod constants;
pub mod controller;
pub mod error;
pub mod graphics;
pub mod simulation;
pub mod universe;
pub mod vector;
pub mod view;
