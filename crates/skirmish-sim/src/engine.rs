//! Simulation engine.
//!
//! `SimulationEngine` owns the battle world, processes management commands,
//! runs all systems in a fixed order, and produces `BattleSnapshot`s.
//! Headless and deterministic: the same config and command sequence always
//! yields the same battle.

use std::collections::VecDeque;

use hecs::Entity;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use skirmish_core::arena::Arena;
use skirmish_core::commands::BattleCommand;
use skirmish_core::components::{Health, Robot, RobotStats};
use skirmish_core::constants::{DT, MAX_TIME_SCALE};
use skirmish_core::enums::{BattleStatus, TargetingRule, Team, WeaponType, Winner};
use skirmish_core::error::CoreError;
use skirmish_core::events::BattleEvent;
use skirmish_core::state::{
    BattleSnapshot, PhysicsSnapshot, PostBattleStats, ProjectileView, RobotView, SimulationState,
    TeamConfig, TeamState, Teams,
};
use skirmish_core::types::{Position, SimTime, Velocity};
use skirmish_core::weapons::weapon_spec;

use crate::systems;
use crate::systems::fire_control::ProjectileLaunch;
use crate::world::BattleWorld;
use crate::world_setup;

/// Configuration for a new simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed. Same seed, same battle.
    pub seed: u64,
    /// Initial time scale (1.0 = normal).
    pub time_scale: f64,
    pub targeting: TargetingRule,
    /// Weapon composition of the first battle.
    pub composition: TeamConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            time_scale: 1.0,
            targeting: TargetingRule::default(),
            composition: TeamConfig::default(),
        }
    }
}

/// A projectile fired by a management tool on behalf of a robot.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectileSpawn {
    pub owner_id: String,
    pub weapon: WeaponType,
    pub position: Position,
    pub velocity: Velocity,
    /// Defaults to the weapon's base damage.
    pub damage: Option<f64>,
}

/// The simulation engine. Owns the battle world and all lifecycle state.
pub struct SimulationEngine {
    world: BattleWorld,
    time: SimTime,
    state: SimulationState,
    targeting: TargetingRule,
    composition: TeamConfig,
    rng: ChaCha8Rng,
    command_queue: VecDeque<BattleCommand>,
    despawn_buffer: Vec<Entity>,
}

impl SimulationEngine {
    /// Create an engine on the default arena. No robots exist until
    /// [`start_battle`](Self::start_battle).
    pub fn new(config: SimConfig) -> Self {
        Self::build(config, Arena::default())
    }

    /// Create an engine on a custom arena, rejecting invalid layouts.
    pub fn with_arena(config: SimConfig, arena: Arena) -> Result<Self, CoreError> {
        arena.validate()?;
        Ok(Self::build(config, arena))
    }

    fn build(config: SimConfig, arena: Arena) -> Self {
        let state = SimulationState {
            time_scale: config.time_scale.clamp(0.0, MAX_TIME_SCALE),
            ..SimulationState::default()
        };
        Self {
            world: BattleWorld::new(arena),
            time: SimTime::default(),
            state,
            targeting: config.targeting,
            composition: config.composition,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
        }
    }

    /// Queue a command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: BattleCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = BattleCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance one fixed tick and return the resulting snapshot.
    pub fn tick(&mut self) -> BattleSnapshot {
        self.step(DT);
        self.snapshot()
    }

    /// Advance by `dt` seconds of wall time, scaled by the time scale.
    ///
    /// Queued commands are always applied. Nothing else happens before the
    /// first battle starts or while the simulation is paused.
    pub fn step(&mut self, dt: f64) {
        self.world.events.clear();
        self.process_commands();

        if matches!(
            self.state.status,
            BattleStatus::Initializing | BattleStatus::Paused
        ) {
            return;
        }
        let dt = dt * self.state.time_scale;
        if dt <= 0.0 {
            return;
        }

        self.run_systems(dt);
        self.time.advance(dt);
        self.state.simulation_time = self.time.elapsed_secs;
    }

    /// Run every system once, in order.
    fn run_systems(&mut self, dt: f64) {
        let now = self.time.elapsed_secs;

        // 1. Squad AI: targets, modes, directives, movement
        systems::squad_ai::run(&mut self.world, self.targeting, dt);

        // 2. Fire control
        systems::fire_control::run(&mut self.world, now);

        // 3. Physics: knockback, projectile flight, collisions
        let hits = systems::physics::run(&mut self.world, dt, now + dt, &mut self.despawn_buffer);

        // 4. Damage and eliminations
        systems::damage::apply_hits(&mut self.world, &hits);

        // 5. Stats
        systems::stats::accrue_time_alive(&mut self.world, dt);
        systems::stats::refresh(&mut self.world);

        // 6. Victory check (only while the battle is undecided)
        if self.state.status == BattleStatus::Running {
            let outcome = systems::victory::evaluate(&self.world);
            systems::victory::conclude(&mut self.state, &mut self.world, outcome, now + dt);
        }

        // 7. Auto-restart countdown
        if systems::victory::tick_countdown(&mut self.state, dt) {
            self.restart();
        }
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    /// Handle a single management command.
    fn handle_command(&mut self, command: BattleCommand) {
        match command {
            BattleCommand::StartBattle => self.start_battle(),
            BattleCommand::Pause => self.pause(),
            BattleCommand::Resume => self.resume(),
            BattleCommand::SetTimeScale { scale } => self.set_time_scale(scale),
            BattleCommand::SetRobotHealth { robot_id, health } => {
                self.set_robot_health(&robot_id, health);
            }
            BattleCommand::SetRobotKills { robot_id, kills } => {
                self.set_robot_kills(&robot_id, kills);
            }
            BattleCommand::SetRobotPosition { robot_id, position } => {
                self.set_robot_position(&robot_id, position);
            }
            BattleCommand::ApplyImpulse { robot_id, impulse } => {
                self.apply_impulse(&robot_id, impulse);
            }
            BattleCommand::EliminateRobot { robot_id } => {
                self.eliminate_robot(&robot_id);
            }
            BattleCommand::ElectCaptain { team } => {
                self.elect_captain(team);
            }
            BattleCommand::SpawnProjectile {
                owner_id,
                weapon,
                position,
                velocity,
                damage,
            } => {
                self.spawn_projectile(ProjectileSpawn {
                    owner_id,
                    weapon,
                    position,
                    velocity,
                    damage,
                });
            }
            BattleCommand::PauseCountdown => self.pause_countdown(),
            BattleCommand::ResumeCountdown => self.resume_countdown(),
            BattleCommand::ResetCountdown => self.reset_countdown(),
            BattleCommand::OpenStats => self.open_stats(),
            BattleCommand::CloseStats => self.close_stats(),
            BattleCommand::OpenSettings => self.open_settings(),
            BattleCommand::CloseSettings => self.close_settings(),
            BattleCommand::SetPendingTeamConfig { config } => {
                self.set_pending_team_config(config);
            }
        }
    }

    // --- Lifecycle ---

    /// Spawn both rosters and start the first battle. Ignored once started.
    pub fn start_battle(&mut self) {
        if self.state.status != BattleStatus::Initializing {
            return;
        }
        self.state.status = BattleStatus::Running;
        self.spawn_battle();
    }

    /// Tear down the current battle and start a fresh one, applying any
    /// pending team composition. Simulation time keeps running.
    pub fn restart(&mut self) {
        if let Some(config) = self.state.pending_team_config.take() {
            self.composition = config;
        }
        self.world.clear_battle();

        self.state.status = BattleStatus::Running;
        self.state.winner = None;
        self.state.auto_restart_countdown = None;
        self.state.countdown_paused = false;
        self.state.post_battle_stats = None;
        self.spawn_battle();
    }

    fn spawn_battle(&mut self) {
        world_setup::setup_battle(&mut self.world, &self.composition, &mut self.rng);
        systems::stats::refresh(&mut self.world);
        self.state.battle_number += 1;

        info!(
            battle = self.state.battle_number,
            robots = self.world.ecs.len(),
            "battle started"
        );
        self.world.events.push(BattleEvent::BattleStarted {
            battle_number: self.state.battle_number,
        });
    }

    /// Freeze a running battle.
    pub fn pause(&mut self) {
        if self.state.status == BattleStatus::Running {
            self.state.status = BattleStatus::Paused;
            debug!("simulation paused");
        }
    }

    pub fn resume(&mut self) {
        if self.state.status == BattleStatus::Paused {
            self.state.status = BattleStatus::Running;
            debug!("simulation resumed");
        }
    }

    /// Set the time scale, clamped to `[0, MAX_TIME_SCALE]`.
    pub fn set_time_scale(&mut self, scale: f64) {
        if scale.is_nan() {
            return;
        }
        self.state.time_scale = scale.clamp(0.0, MAX_TIME_SCALE);
    }

    pub fn pause_countdown(&mut self) {
        systems::victory::pause_countdown(&mut self.state);
    }

    pub fn resume_countdown(&mut self) {
        systems::victory::resume_countdown(&mut self.state);
    }

    pub fn reset_countdown(&mut self) {
        systems::victory::reset_countdown(&mut self.state);
    }

    pub fn open_stats(&mut self) {
        self.state.ui.stats_open = true;
    }

    pub fn close_stats(&mut self) {
        self.state.ui.stats_open = false;
    }

    pub fn open_settings(&mut self) {
        self.state.ui.settings_open = true;
    }

    pub fn close_settings(&mut self) {
        self.state.ui.settings_open = false;
    }

    /// Composition to use from the next restart on.
    pub fn set_pending_team_config(&mut self, config: TeamConfig) {
        self.state.pending_team_config = Some(config);
    }

    // --- Robot management ---
    //
    // Every operation naming an unknown or eliminated robot is a no-op and
    // reports `false` / `None`.

    /// Set a robot's health, clamped to `[0, max]`. Zero eliminates the
    /// robot without crediting a kill.
    pub fn set_robot_health(&mut self, robot_id: &str, health: f64) -> bool {
        let Some(entity) = self.world.robot_entity(robot_id) else {
            return false;
        };
        let Ok(mut h) = self.world.ecs.get::<&mut Health>(entity) else {
            return false;
        };
        if health.is_nan() {
            return false;
        }
        h.set(health);
        let depleted = h.is_depleted();
        drop(h);

        if depleted {
            systems::damage::eliminate(&mut self.world, robot_id, None);
        }
        systems::stats::refresh(&mut self.world);
        true
    }

    pub fn set_robot_kills(&mut self, robot_id: &str, kills: u32) -> bool {
        let Some(entity) = self.world.robot_entity(robot_id) else {
            return false;
        };
        match self.world.ecs.get::<&mut RobotStats>(entity) {
            Ok(mut stats) => {
                stats.kills = kills;
                true
            }
            Err(_) => false,
        }
    }

    /// Teleport a robot. The position is clamped into the arena.
    pub fn set_robot_position(&mut self, robot_id: &str, position: Position) -> bool {
        let Some(entity) = self.world.robot_entity(robot_id) else {
            return false;
        };
        let clamped = self.world.arena.boundaries.clamp(position);
        match self.world.ecs.get::<&mut Position>(entity) {
            Ok(mut pos) => {
                *pos = clamped;
                true
            }
            Err(_) => false,
        }
    }

    /// Add an instantaneous velocity change. Damped by physics each tick.
    pub fn apply_impulse(&mut self, robot_id: &str, impulse: Velocity) -> bool {
        let Some(entity) = self.world.robot_entity(robot_id) else {
            return false;
        };
        match self.world.ecs.get::<&mut Velocity>(entity) {
            Ok(mut vel) => {
                *vel = *vel + impulse;
                true
            }
            Err(_) => false,
        }
    }

    /// Fire a projectile for a living robot. Returns the projectile id.
    pub fn spawn_projectile(&mut self, spawn: ProjectileSpawn) -> Option<u64> {
        let entity = self.world.robot_entity(&spawn.owner_id)?;
        let owner_team = self.world.ecs.get::<&Robot>(entity).ok()?.team;
        let spec = weapon_spec(spawn.weapon);
        let launch = ProjectileLaunch {
            owner_id: spawn.owner_id,
            owner_team,
            weapon: spawn.weapon,
            position: self.world.arena.boundaries.clamp(spawn.position),
            velocity: spawn.velocity,
            damage: spawn.damage.unwrap_or(spec.base_damage).max(0.0),
            max_distance: spec.max_projectile_distance(),
        };
        let now = self.time.elapsed_secs;
        Some(systems::fire_control::launch_projectile(
            &mut self.world,
            launch,
            now,
        ))
    }

    /// Remove a robot as if destroyed, with no kill credit.
    pub fn eliminate_robot(&mut self, robot_id: &str) -> bool {
        let eliminated = systems::damage::eliminate(&mut self.world, robot_id, None);
        if eliminated {
            systems::stats::refresh(&mut self.world);
        }
        eliminated
    }

    /// Re-run captain election for a team.
    pub fn elect_captain(&mut self, team: Team) -> Option<String> {
        systems::captaincy::elect(&mut self.world, team)
    }

    // --- Queries ---

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn status(&self) -> BattleStatus {
        self.state.status
    }

    pub fn winner(&self) -> Option<Winner> {
        self.state.winner
    }

    pub fn time_scale(&self) -> f64 {
        self.state.time_scale
    }

    pub fn countdown(&self) -> Option<f64> {
        self.state.auto_restart_countdown
    }

    pub fn post_battle_stats(&self) -> Option<&PostBattleStats> {
        self.state.post_battle_stats.as_ref()
    }

    pub fn team(&self, team: Team) -> &TeamState {
        self.world.teams.get(team)
    }

    pub fn teams(&self) -> &Teams {
        &self.world.teams
    }

    pub fn arena(&self) -> &Arena {
        &self.world.arena
    }

    /// Composition of the battle in progress.
    pub fn composition(&self) -> &TeamConfig {
        &self.composition
    }

    /// Living robots, sorted by id.
    pub fn robots(&self) -> Vec<RobotView> {
        systems::snapshot::build_robots(&self.world)
    }

    pub fn robot(&self, robot_id: &str) -> Option<RobotView> {
        self.robots().into_iter().find(|r| r.id == robot_id)
    }

    /// Projectiles in flight, sorted by id.
    pub fn projectiles(&self) -> Vec<ProjectileView> {
        systems::snapshot::build_projectiles(&self.world)
    }

    pub fn physics_snapshot(&self) -> PhysicsSnapshot {
        systems::snapshot::build_physics(&self.world)
    }

    /// Events raised during the last step.
    pub fn events(&self) -> &[BattleEvent] {
        &self.world.events
    }

    /// Current observable state.
    pub fn snapshot(&self) -> BattleSnapshot {
        systems::snapshot::build_snapshot(
            &self.world,
            &self.time,
            &self.state,
            self.world.events.clone(),
        )
    }

    /// Read-only access to the battle world.
    pub fn world(&self) -> &BattleWorld {
        &self.world
    }

    /// Mutable access for tests that stage situations directly.
    #[cfg(test)]
    pub fn world_mut(&mut self) -> &mut BattleWorld {
        &mut self.world
    }
}
