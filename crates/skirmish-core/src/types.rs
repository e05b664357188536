//! Fundamental geometric and simulation types.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// 3D position in arena space (units).
/// x = East, z = South, y = Up. Robots stand on the y = 0 ground plane.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// 3D velocity in arena space (units/s).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Euler rotation in radians. Only yaw (`y`) is driven by the simulation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rotation {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimTime {
    /// Number of simulated ticks.
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn from_vec(v: DVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }

    pub fn to_vec(self) -> DVec3 {
        DVec3::new(self.x, self.y, self.z)
    }

    /// Straight-line distance to another position.
    pub fn distance_to(&self, other: &Position) -> f64 {
        self.to_vec().distance(other.to_vec())
    }

    /// Distance on the ground plane (ignoring height).
    pub fn ground_distance_to(&self, other: &Position) -> f64 {
        let dx = other.x - self.x;
        let dz = other.z - self.z;
        (dx * dx + dz * dz).sqrt()
    }

    /// Yaw (radians) that faces from this position toward `other`.
    /// 0 faces +z; positive turns toward +x.
    pub fn yaw_to(&self, other: &Position) -> f64 {
        let dx = other.x - self.x;
        let dz = other.z - self.z;
        dx.atan2(dz)
    }

    /// Unit direction toward `other`, or zero if the points coincide.
    pub fn direction_to(&self, other: &Position) -> DVec3 {
        (other.to_vec() - self.to_vec()).normalize_or_zero()
    }

    /// Offset this position by a velocity integrated over `dt`.
    pub fn advanced(&self, velocity: &Velocity, dt: f64) -> Position {
        Position::from_vec(self.to_vec() + velocity.to_vec() * dt)
    }

    /// Linear interpolation toward `other` by `t` in [0, 1].
    pub fn lerp(&self, other: &Position, t: f64) -> Position {
        Position::from_vec(self.to_vec().lerp(other.to_vec(), t))
    }

    /// Shortest distance from this point to the segment `a..b`.
    pub fn distance_to_segment(&self, a: &Position, b: &Position) -> f64 {
        let p = self.to_vec();
        let a = a.to_vec();
        let ab = b.to_vec() - a;
        let len_sq = ab.length_squared();
        if len_sq <= f64::EPSILON {
            return p.distance(a);
        }
        let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
        p.distance(a + ab * t)
    }
}

impl Velocity {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    pub fn from_vec(v: DVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }

    pub fn to_vec(self) -> DVec3 {
        DVec3::new(self.x, self.y, self.z)
    }

    /// Speed magnitude (units/s).
    pub fn speed(&self) -> f64 {
        self.to_vec().length()
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.z == 0.0
    }

    pub fn scaled(&self, factor: f64) -> Velocity {
        Velocity::from_vec(self.to_vec() * factor)
    }
}

impl std::ops::Add for Velocity {
    type Output = Velocity;

    fn add(self, rhs: Velocity) -> Velocity {
        Velocity::from_vec(self.to_vec() + rhs.to_vec())
    }
}

impl Rotation {
    pub fn from_yaw(yaw: f64) -> Self {
        Self {
            x: 0.0,
            y: yaw,
            z: 0.0,
        }
    }

    pub fn yaw(&self) -> f64 {
        self.y
    }

    /// Unit facing vector on the ground plane.
    pub fn forward(&self) -> DVec3 {
        DVec3::new(self.y.sin(), 0.0, self.y.cos())
    }
}

impl SimTime {
    /// Advance by one tick of `dt` seconds.
    pub fn advance(&mut self, dt: f64) {
        self.tick += 1;
        self.elapsed_secs += dt;
    }
}
