//! Time-driven update rules.
//!
//! Every rule is a pure function of elapsed seconds and the entity's own rest
//! pose: [`AnimationRule::pose`] never looks at another entity or at the
//! previous frame. That keeps motion correct under a variable frame rate and
//! makes updates independent of each other.
//!
//! ```
//! use diorama::*;
//!
//! let ghost = AnimationRule::Orbit(Orbit::new(0.5, 4.0).bob(3.0));
//! let pose = ghost.pose(&Transform::new(), 0.0);
//! assert_eq!(pose.position, Vec3::new(4.0, 0.0, 0.0));
//! ```

use std::fmt;
use std::sync::Arc;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::transform::Transform;

/// Circular orbit around the rest position with independent vertical bobbing.
///
/// ```text
/// angle = angular_velocity * t
/// x = cos(angle) * (radius + sin(wobble.x * t) * wobble_amplitude)
/// z = sin(angle) * (radius + sin(wobble.z * t) * wobble_amplitude)
/// y = Σ sin(f * t)   for f in bob_frequencies
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Orbit {
    /// Radians per second; negative orbits clockwise seen from above.
    pub angular_velocity: f32,
    pub radius: f32,
    /// Frequencies of the radius wobble on the x and z axes. `None` keeps a circle.
    pub wobble: Option<Wobble>,
    pub bob_frequencies: Vec<f32>,
}

/// Radius modulation for [`Orbit`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Wobble {
    pub x_frequency: f32,
    pub z_frequency: f32,
    pub amplitude: f32,
}

impl Default for Orbit {
    fn default() -> Self {
        Self {
            angular_velocity: 0.5,
            radius: 4.0,
            wobble: None,
            bob_frequencies: Vec::new(),
        }
    }
}

impl Orbit {
    pub fn new(angular_velocity: f32, radius: f32) -> Self {
        Self {
            angular_velocity,
            radius,
            ..Default::default()
        }
    }

    /// Adds a vertical `sin(frequency * t)` term.
    pub fn bob(mut self, frequency: f32) -> Self {
        self.bob_frequencies.push(frequency);
        self
    }

    pub fn wobble(mut self, x_frequency: f32, z_frequency: f32, amplitude: f32) -> Self {
        self.wobble = Some(Wobble {
            x_frequency,
            z_frequency,
            amplitude,
        });
        self
    }

    /// Offset from the orbit centre at `t` seconds.
    pub fn offset(&self, t: f32) -> Vec3 {
        let angle = self.angular_velocity * t;
        let (radius_x, radius_z) = match self.wobble {
            Some(w) => (
                self.radius + (w.x_frequency * t).sin() * w.amplitude,
                self.radius + (w.z_frequency * t).sin() * w.amplitude,
            ),
            None => (self.radius, self.radius),
        };
        let y: f32 = self.bob_frequencies.iter().map(|f| (f * t).sin()).sum();

        Vec3::new(angle.cos() * radius_x, y, angle.sin() * radius_z)
    }
}

/// A one-shot eased turn, e.g. a full spin triggered from a debug panel.
///
/// Inactive until `started_at` is set. Uses a quadratic ease-out
/// (`1 - (1 - p)²`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpinTween {
    /// Total rotation added over the tween, in radians per axis.
    pub turn: Vec3,
    pub duration: f32,
    pub started_at: Option<f32>,
}

impl SpinTween {
    pub fn new(turn: Vec3, duration: f32) -> Self {
        Self {
            turn,
            duration,
            started_at: None,
        }
    }

    /// Fraction of the turn applied at `t`, in `[0, 1]`.
    pub fn progress(&self, t: f32) -> f32 {
        let Some(start) = self.started_at else {
            return 0.0;
        };
        if self.duration <= 0.0 {
            return if t >= start { 1.0 } else { 0.0 };
        }
        let p = ((t - start) / self.duration).clamp(0.0, 1.0);
        1.0 - (1.0 - p) * (1.0 - p)
    }
}

/// Signature of user-supplied rules.
pub type PoseFn = dyn Fn(&Transform, f32) -> Transform + Send + Sync;

/// How an animated entity's transform follows the clock.
#[derive(Clone)]
pub enum AnimationRule {
    /// Position orbits the rest position.
    Orbit(Orbit),
    /// `rotation = rest + rate * t`, radians per second per axis.
    Spin { rate: Vec3 },
    /// `rotation = rest + amplitude ⊙ (sin ωt, cos ωt, sin ωt)`.
    OscillatingSpin { amplitude: Vec3, frequency: f32 },
    /// `rotation = rest + turn * ease(progress)`.
    Tween(SpinTween),
    Custom(Arc<PoseFn>),
}

impl AnimationRule {
    /// Wraps a closure as a rule. The closure must be a pure function of its inputs.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&Transform, f32) -> Transform + Send + Sync + 'static,
    {
        AnimationRule::Custom(Arc::new(f))
    }

    /// The pose at `t` seconds for an entity whose rest pose is `rest`.
    pub fn pose(&self, rest: &Transform, t: f32) -> Transform {
        match self {
            AnimationRule::Orbit(orbit) => Transform {
                position: rest.position + orbit.offset(t),
                ..*rest
            },
            AnimationRule::Spin { rate } => Transform {
                rotation: rest.rotation + *rate * t,
                ..*rest
            },
            AnimationRule::OscillatingSpin {
                amplitude,
                frequency,
            } => {
                let phase = frequency * t;
                let wave = Vec3::new(phase.sin(), phase.cos(), phase.sin());
                Transform {
                    rotation: rest.rotation + *amplitude * wave,
                    ..*rest
                }
            }
            AnimationRule::Tween(tween) => Transform {
                rotation: rest.rotation + tween.turn * tween.progress(t),
                ..*rest
            },
            AnimationRule::Custom(f) => f(rest, t),
        }
    }
}

impl fmt::Debug for AnimationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnimationRule::Orbit(orbit) => f.debug_tuple("Orbit").field(orbit).finish(),
            AnimationRule::Spin { rate } => f.debug_struct("Spin").field("rate", rate).finish(),
            AnimationRule::OscillatingSpin {
                amplitude,
                frequency,
            } => f
                .debug_struct("OscillatingSpin")
                .field("amplitude", amplitude)
                .field("frequency", frequency)
                .finish(),
            AnimationRule::Tween(tween) => f.debug_tuple("Tween").field(tween).finish(),
            AnimationRule::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Component attached to every entity the scheduler animates.
#[derive(Clone, Debug)]
pub struct Animated {
    /// Static parameters of the entity; the rule is applied on top of these.
    pub rest: Transform,
    pub rule: AnimationRule,
}

impl Animated {
    pub fn new(rest: Transform, rule: AnimationRule) -> Self {
        Self { rest, rule }
    }

    pub fn pose(&self, t: f32) -> Transform {
        self.rule.pose(&self.rest, t)
    }
}
