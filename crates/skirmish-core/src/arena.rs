//! Arena layout: bounds, spawn zones, obstacles and lighting.
//!
//! The default arena is built in code. Custom arenas load from JSON through
//! [`Arena::from_json_str`], which validates the layout before it can reach
//! the engine.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::Team;
use crate::error::CoreError;
use crate::types::Position;

/// Width/height/depth of the playable volume.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
    pub depth: f64,
}

/// Axis-aligned arena limits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Position,
    pub max: Position,
}

impl Bounds {
    /// Clamp a position into the bounds on every axis.
    pub fn clamp(&self, p: Position) -> Position {
        Position::new(
            p.x.clamp(self.min.x, self.max.x),
            p.y.clamp(self.min.y, self.max.y),
            p.z.clamp(self.min.z, self.max.z),
        )
    }

    pub fn contains(&self, p: &Position) -> bool {
        (self.min.x..=self.max.x).contains(&p.x)
            && (self.min.y..=self.max.y).contains(&p.y)
            && (self.min.z..=self.max.z).contains(&p.z)
    }
}

/// Where a team enters the arena.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnZone {
    pub center: Position,
    pub radius: f64,
    /// Fixed spawn points, one per roster slot.
    pub spawn_points: Vec<Position>,
}

/// A static obstacle. Obstacles flagged `is_cover` are used by the AI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub position: Position,
    pub dimensions: Dimensions,
    #[serde(default)]
    pub is_cover: bool,
}

/// Scene lighting. Carried for the renderer; the simulation never reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightingConfig {
    pub ambient_intensity: f64,
    pub directional_intensity: f64,
    pub shadows_enabled: bool,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            ambient_intensity: 0.4,
            directional_intensity: 1.0,
            shadows_enabled: true,
        }
    }
}

/// Per-team spawn zones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnZones {
    pub red: SpawnZone,
    pub blue: SpawnZone,
}

/// Complete arena description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub dimensions: Dimensions,
    pub boundaries: Bounds,
    pub spawn_zones: SpawnZones,
    #[serde(default)]
    pub obstacles: Vec<Obstacle>,
    #[serde(default)]
    pub lighting: LightingConfig,
}

impl Arena {
    /// Parse and validate an arena from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, CoreError> {
        let arena: Arena = serde_json::from_str(json)?;
        arena.validate()?;
        Ok(arena)
    }

    pub fn spawn_zone(&self, team: Team) -> &SpawnZone {
        match team {
            Team::Red => &self.spawn_zones.red,
            Team::Blue => &self.spawn_zones.blue,
        }
    }

    /// Obstacles the AI may take cover behind.
    pub fn cover_points(&self) -> impl Iterator<Item = Position> + '_ {
        self.obstacles
            .iter()
            .filter(|o| o.is_cover)
            .map(|o| o.position)
    }

    /// Check that each zone has a point per roster slot and that all
    /// points across both teams are more than `MIN_SPAWN_SEPARATION` apart.
    pub fn validate(&self) -> Result<(), CoreError> {
        let mut labelled: Vec<(String, Position)> = Vec::new();
        for team in Team::ALL {
            let zone = self.spawn_zone(team);
            if zone.spawn_points.len() < ROBOTS_PER_TEAM {
                return Err(CoreError::SpawnZone {
                    team,
                    expected: ROBOTS_PER_TEAM,
                    found: zone.spawn_points.len(),
                });
            }
            for (i, p) in zone.spawn_points.iter().take(ROBOTS_PER_TEAM).enumerate() {
                labelled.push((format!("{team}[{i}]"), *p));
            }
        }

        for (i, (label_a, a)) in labelled.iter().enumerate() {
            for (label_b, b) in &labelled[i + 1..] {
                let distance = a.distance_to(b);
                if distance <= MIN_SPAWN_SEPARATION {
                    return Err(CoreError::SpawnSeparation {
                        a: label_a.clone(),
                        b: label_b.clone(),
                        distance,
                    });
                }
            }
        }
        Ok(())
    }
}

impl Default for Arena {
    fn default() -> Self {
        let half = ARENA_HALF_EXTENT;
        Self {
            dimensions: Dimensions {
                width: half * 2.0,
                height: ARENA_HEIGHT,
                depth: half * 2.0,
            },
            boundaries: Bounds {
                min: Position::new(-half, 0.0, -half),
                max: Position::new(half, ARENA_HEIGHT, half),
            },
            spawn_zones: SpawnZones {
                red: default_spawn_zone(-1.0),
                blue: default_spawn_zone(1.0),
            },
            obstacles: default_obstacles(),
            lighting: LightingConfig::default(),
        }
    }
}

/// Two files of five points at the `side` end of the x axis (-1 red, +1 blue).
fn default_spawn_zone(side: f64) -> SpawnZone {
    const FILES: [f64; 2] = [40.0, 36.0];
    const RANKS: [f64; 5] = [-12.0, -6.0, 0.0, 6.0, 12.0];

    let spawn_points = FILES
        .iter()
        .flat_map(|&x| RANKS.iter().map(move |&z| Position::new(side * x, 0.0, z)))
        .collect();

    SpawnZone {
        center: Position::new(side * 38.0, 0.0, 0.0),
        radius: SPAWN_ZONE_RADIUS,
        spawn_points,
    }
}

fn default_obstacles() -> Vec<Obstacle> {
    let block = Dimensions {
        width: 4.0,
        height: 2.0,
        depth: 4.0,
    };
    let wall = Dimensions {
        width: 12.0,
        height: 3.0,
        depth: 1.0,
    };
    let cover = |x: f64, z: f64| Obstacle {
        position: Position::new(x, 0.0, z),
        dimensions: block,
        is_cover: true,
    };

    vec![
        cover(0.0, 0.0),
        cover(-18.0, -14.0),
        cover(-18.0, 14.0),
        cover(18.0, -14.0),
        cover(18.0, 14.0),
        Obstacle {
            position: Position::new(0.0, 0.0, -30.0),
            dimensions: wall,
            is_cover: false,
        },
        Obstacle {
            position: Position::new(0.0, 0.0, 30.0),
            dimensions: wall,
            is_cover: false,
        },
    ]
}
