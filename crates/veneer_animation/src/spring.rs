//! Spring physics
//!
//! Damped harmonic springs, either stepped with RK4 integration (`Spring`) or
//! evaluated in closed form as a unit step response (`SpringConfig::progress`).
//! The closed form is what keyframe segments and spring animations sample, so
//! the same elapsed time always yields the same value.

use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Configuration for a spring animation
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpringConfig {
    pub stiffness: f32,
    pub damping: f32,
    pub mass: f32,
}

impl SpringConfig {
    /// Create a new spring configuration
    pub fn new(stiffness: f32, damping: f32, mass: f32) -> Self {
        Self {
            stiffness,
            damping,
            mass,
        }
    }

    /// Spring described by its response (period of the undamped oscillation,
    /// in milliseconds) and damping fraction (1.0 = critically damped)
    pub fn from_response(response_ms: f32, damping_fraction: f32) -> Self {
        let response = (response_ms / 1000.0).max(1e-3);
        Self {
            stiffness: (2.0 * PI / response).powi(2),
            damping: 4.0 * PI * damping_fraction.max(0.0) / response,
            mass: 1.0,
        }
    }

    /// Spring with the given stiffness and damping ratio, unit mass
    pub fn with_damping_ratio(stiffness: f32, damping_ratio: f32) -> Self {
        let mut config = Self::new(stiffness, 0.0, 1.0);
        config.damping = damping_ratio * config.critical_damping();
        config
    }

    /// A gentle, slow spring (good for page transitions)
    pub fn gentle() -> Self {
        Self::new(120.0, 14.0, 1.0)
    }

    /// A wobbly spring with overshoot (good for playful UI)
    pub fn wobbly() -> Self {
        Self::new(180.0, 12.0, 1.0)
    }

    /// A stiff, snappy spring (good for buttons)
    pub fn stiff() -> Self {
        Self::new(400.0, 30.0, 1.0)
    }

    /// The spring behind the bounce symbol effect
    pub fn bouncy() -> Self {
        Self::with_damping_ratio(200.0, 0.5)
    }

    /// Calculate critical damping for this spring's stiffness and mass
    pub fn critical_damping(&self) -> f32 {
        2.0 * (self.stiffness * self.mass).sqrt()
    }

    pub fn damping_ratio(&self) -> f32 {
        let critical = self.critical_damping();
        if critical <= f32::EPSILON {
            return 1.0;
        }
        self.damping / critical
    }

    /// Check if the spring is underdamped (will oscillate)
    pub fn is_underdamped(&self) -> bool {
        self.damping < self.critical_damping()
    }

    fn natural_frequency(&self) -> f32 {
        (self.stiffness.max(0.0) / self.mass.max(1e-6)).sqrt()
    }

    /// Unit step response: position of a spring released at 0 toward 1,
    /// `elapsed_ms` after release
    pub fn progress(&self, elapsed_ms: f32) -> f32 {
        let t = elapsed_ms.max(0.0) / 1000.0;
        let w0 = self.natural_frequency();
        if w0 <= f32::EPSILON {
            return 1.0;
        }
        let zeta = self.damping_ratio().max(0.0);

        if (zeta - 1.0).abs() < 1e-4 {
            let e = (-w0 * t).exp();
            1.0 - e * (1.0 + w0 * t)
        } else if zeta < 1.0 {
            let root = (1.0 - zeta * zeta).sqrt();
            let wd = w0 * root;
            let e = (-zeta * w0 * t).exp();
            1.0 - e * ((wd * t).cos() + zeta / root * (wd * t).sin())
        } else {
            let z2 = (zeta * zeta - 1.0).sqrt();
            let r1 = -w0 * (zeta - z2);
            let r2 = -w0 * (zeta + z2);
            let c1 = (zeta + z2) / (2.0 * z2);
            let c2 = (zeta - z2) / (2.0 * z2);
            1.0 - (c1 * (r1 * t).exp() - c2 * (r2 * t).exp())
        }
    }

    /// Time until the response stays within 0.1% of the target
    pub fn settling_duration_ms(&self) -> f32 {
        let w0 = self.natural_frequency();
        if w0 <= f32::EPSILON {
            return 0.0;
        }
        let zeta = self.damping_ratio().max(0.0);
        let decay = if zeta <= 1.0 {
            zeta * w0
        } else {
            w0 * (zeta - (zeta * zeta - 1.0).sqrt())
        };
        if decay <= f32::EPSILON {
            return f32::INFINITY;
        }
        let mut seconds = 1000.0_f32.ln() / decay;
        if (zeta - 1.0).abs() < 1e-4 {
            // (1 + w0 t) factor of the critically damped envelope
            seconds *= 1.5;
        }
        seconds * 1000.0
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::stiff()
    }
}

/// A spring-based animator
#[derive(Clone, Copy, Debug)]
pub struct Spring {
    config: SpringConfig,
    value: f32,
    velocity: f32,
    target: f32,
}

impl Spring {
    pub fn new(config: SpringConfig, initial: f32) -> Self {
        Self {
            config,
            value: initial,
            velocity: 0.0,
            target: initial,
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Check if the spring has settled (within epsilon of target with minimal velocity)
    pub fn is_settled(&self) -> bool {
        const EPSILON: f32 = 1e-3;
        const VELOCITY_EPSILON: f32 = 1e-2;

        (self.value - self.target).abs() < EPSILON && self.velocity.abs() < VELOCITY_EPSILON
    }

    /// Step the spring simulation by `dt` seconds using RK4 integration
    pub fn step(&mut self, dt: f32) {
        if self.is_settled() {
            self.value = self.target;
            self.velocity = 0.0;
            return;
        }

        let k1_v = self.acceleration(self.value, self.velocity);
        let k1_x = self.velocity;

        let k2_v = self.acceleration(
            self.value + k1_x * dt * 0.5,
            self.velocity + k1_v * dt * 0.5,
        );
        let k2_x = self.velocity + k1_v * dt * 0.5;

        let k3_v = self.acceleration(
            self.value + k2_x * dt * 0.5,
            self.velocity + k2_v * dt * 0.5,
        );
        let k3_x = self.velocity + k2_v * dt * 0.5;

        let k4_v = self.acceleration(self.value + k3_x * dt, self.velocity + k3_v * dt);
        let k4_x = self.velocity + k3_v * dt;

        self.velocity += (k1_v + 2.0 * k2_v + 2.0 * k3_v + k4_v) * dt / 6.0;
        self.value += (k1_x + 2.0 * k2_x + 2.0 * k3_x + k4_x) * dt / 6.0;
    }

    fn acceleration(&self, x: f32, v: f32) -> f32 {
        let spring_force = -self.config.stiffness * (x - self.target);
        let damping_force = -self.config.damping * v;
        (spring_force + damping_force) / self.config.mass
    }
}
