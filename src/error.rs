//! Simulation-specific error types.
//!
//! Construction and binding operations return these instead of panicking.
//! Nothing that fails validation ever reaches the force pass.
//!
//! ## Usage
//!
//! ```rust
//! use orbit_sandbox::body::Body;
//! use orbit_sandbox::error::SimError;
//! use orbit_sandbox::vector::Vector2;
//! use bevy::color::Color;
//!
//! let err = Body::new(-1.0, Vector2::ZERO, Vector2::ZERO, Color::WHITE).unwrap_err();
//! assert!(matches!(err, SimError::InvalidRadius { .. }));
//! ```

use crate::body::BodyId;
use crate::controller::ControllerId;
use std::fmt;

/// Top-level error enum for the orbit sandbox.
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// A body was requested with a radius that is zero, negative or not finite.
    InvalidRadius {
        radius: f64,
    },

    /// A body was requested from a mass that is zero, negative or not finite.
    InvalidMass {
        mass: f64,
    },

    /// A position or velocity contained NaN or infinity.
    NonFiniteVector {
        /// Which vector was rejected (`"position"`, `"velocity"`).
        name: &'static str,
        x: f64,
        y: f64,
    },

    /// No body with this id lives in the universe.
    UnknownBody {
        id: BodyId,
    },

    /// No controller with this id was registered with the universe.
    UnknownController {
        id: ControllerId,
    },

    /// A thruster was fired on a controller that is not bound to any body.
    ControllerUnbound {
        id: ControllerId,
    },

    /// Physics constant is outside its safe operating range.
    UnsafeConstant {
        /// Name of the constant (for logging).
        name: &'static str,
        /// The value that was rejected.
        value: f64,
        /// Human-readable description of the safe range.
        safe_range: &'static str,
    },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::InvalidRadius { radius } => {
                write!(f, "body radius must be finite and > 0, got {}", radius)
            }
            SimError::InvalidMass { mass } => {
                write!(f, "body mass must be finite and > 0, got {}", mass)
            }
            SimError::NonFiniteVector { name, x, y } => {
                write!(f, "body {} is not finite: ({}, {})", name, x, y)
            }
            SimError::UnknownBody { id } => write!(f, "body {} not found", id),
            SimError::UnknownController { id } => write!(f, "controller {} not found", id),
            SimError::ControllerUnbound { id } => {
                write!(f, "controller {} is not bound to a body", id)
            }
            SimError::UnsafeConstant {
                name,
                value,
                safe_range,
            } => write!(
                f,
                "constant '{}' = {} is outside safe range {}",
                name, value, safe_range
            ),
        }
    }
}

impl std::error::Error for SimError {}

/// Convenience alias: a `Result` using `SimError` as the error type.
pub type SimResult<T> = Result<T, SimError>;

// ── Validation helpers ────────────────────────────────────────────────────────

/// Returns an error if `gravity_const` is not a finite, strictly positive value.
pub fn validate_gravity_const(value: f64) -> SimResult<()> {
    if !value.is_finite() || value <= 0.0 {
        Err(SimError::UnsafeConstant {
            name: "GRAVITY_CONST",
            value,
            safe_range: "(0.0, ∞)",
        })
    } else {
        Ok(())
    }
}

/// Returns an error if `value` is not finite and strictly positive.
pub fn validate_positive(name: &'static str, value: f64) -> SimResult<()> {
    if !value.is_finite() || value <= 0.0 {
        Err(SimError::UnsafeConstant {
            name,
            value,
            safe_range: "(0.0, ∞)",
        })
    } else {
        Ok(())
    }
}

/// Returns an error if `value` is not finite or is negative.
pub fn validate_non_negative(name: &'static str, value: f64) -> SimResult<()> {
    if !value.is_finite() || value < 0.0 {
        Err(SimError::UnsafeConstant {
            name,
            value,
            safe_range: "[0.0, ∞)",
        })
    } else {
        Ok(())
    }
}

/// Returns an error unless the unload radius encloses the whole spawn ring,
/// `[load_radius, load_radius + spawn_buffer)`.
///
/// Bodies spawned past the unload radius would be culled on the very next
/// reconcile, so the population would churn forever.
pub fn validate_unload_radius(
    load_radius: f64,
    spawn_buffer: f64,
    unload_radius: f64,
) -> SimResult<()> {
    validate_positive("LOAD_RADIUS", load_radius)?;
    validate_non_negative("SPAWN_BUFFER", spawn_buffer)?;
    if !unload_radius.is_finite() || unload_radius < load_radius + spawn_buffer {
        Err(SimError::UnsafeConstant {
            name: "UNLOAD_RADIUS",
            value: unload_radius,
            safe_range: "[LOAD_RADIUS + SPAWN_BUFFER, ∞)",
        })
    } else {
        Ok(())
    }
}
