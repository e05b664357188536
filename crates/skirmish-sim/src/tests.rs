//! Tests for the battle engine: spawning, squad AI, weapons, physics,
//! captaincy and the victory/restart lifecycle.

use proptest::prelude::*;

use skirmish_core::arena::Arena;
use skirmish_core::commands::BattleCommand;
use skirmish_core::constants::*;
use skirmish_core::enums::*;
use skirmish_core::events::BattleEvent;
use skirmish_core::state::{TeamConfig, WeaponDistribution};
use skirmish_core::types::{Position, Velocity};

use crate::engine::{ProjectileSpawn, SimConfig, SimulationEngine};
use crate::systems::damage;

fn started_engine(seed: u64) -> SimulationEngine {
    let mut engine = SimulationEngine::new(SimConfig {
        seed,
        ..Default::default()
    });
    engine.start_battle();
    engine
}

fn run_secs(engine: &mut SimulationEngine, secs: f64) {
    let steps = (secs / DT).round() as usize;
    for _ in 0..steps {
        engine.step(DT);
    }
}

fn robot_id(team: Team, slot: usize) -> String {
    format!("{}-{}", team, slot)
}

fn eliminate_team(engine: &mut SimulationEngine, team: Team) {
    for slot in 0..ROBOTS_PER_TEAM {
        engine.eliminate_robot(&robot_id(team, slot));
    }
}

fn assert_captain_invariant(engine: &SimulationEngine) {
    let robots = engine.robots();
    for team in Team::ALL {
        let members: Vec<_> = robots.iter().filter(|r| r.team == team).collect();
        let captains: Vec<_> = members.iter().filter(|r| r.is_captain).collect();
        if members.is_empty() {
            assert!(captains.is_empty());
            assert_eq!(engine.team(team).captain_id, None);
        } else {
            assert_eq!(captains.len(), 1, "{team} must have exactly one captain");
            assert_eq!(
                engine.team(team).captain_id.as_deref(),
                Some(captains[0].id.as_str())
            );
        }
    }
}

// ---- Determinism ----

#[test]
fn test_determinism_same_seed() {
    let mut engine_a = SimulationEngine::new(SimConfig {
        seed: 12345,
        ..Default::default()
    });
    let mut engine_b = SimulationEngine::new(SimConfig {
        seed: 12345,
        ..Default::default()
    });

    engine_a.queue_command(BattleCommand::StartBattle);
    engine_b.queue_command(BattleCommand::StartBattle);

    for _ in 0..900 {
        let snap_a = engine_a.tick();
        let snap_b = engine_b.tick();

        let json_a = serde_json::to_string(&snap_a).unwrap();
        let json_b = serde_json::to_string(&snap_b).unwrap();
        assert_eq!(json_a, json_b, "Snapshots diverged with same seed");
        assert_eq!(snap_a.robots, snap_b.robots);
    }
}

#[test]
fn test_determinism_different_seeds() {
    let engine_a = started_engine(111);
    let engine_b = started_engine(222);

    // Formation jitter is seeded, so the rosters differ from the start.
    let json_a = serde_json::to_string(&engine_a.snapshot()).unwrap();
    let json_b = serde_json::to_string(&engine_b.snapshot()).unwrap();
    assert_ne!(json_a, json_b);
}

#[test]
fn test_projectile_ids_are_sequential() {
    let mut engine = started_engine(1);
    let mut ids = Vec::new();
    for _ in 0..3 {
        ids.push(
            engine
                .spawn_projectile(ProjectileSpawn {
                    owner_id: "red-1".into(),
                    weapon: WeaponType::Gun,
                    position: Position::new(0.0, 0.0, 0.0),
                    velocity: Velocity::new(0.0, 0.0, 1.0),
                    damage: None,
                })
                .unwrap(),
        );
    }
    assert_eq!(ids, vec![0, 1, 2]);
}

// ---- Spawning ----

#[test]
fn test_spawn_rosters() {
    let engine = started_engine(42);
    let robots = engine.robots();
    assert_eq!(robots.len(), 2 * ROBOTS_PER_TEAM);

    for team in Team::ALL {
        let members: Vec<_> = robots.iter().filter(|r| r.team == team).collect();
        assert_eq!(members.len(), ROBOTS_PER_TEAM);
        assert!(members
            .iter()
            .all(|r| r.health == ROBOT_MAX_HEALTH && r.max_health == ROBOT_MAX_HEALTH));

        let captains: Vec<_> = members.iter().filter(|r| r.is_captain).collect();
        assert_eq!(captains.len(), 1);
        assert_eq!(captains[0].id, robot_id(team, 0));
        assert_eq!(engine.team(team).captain_id, Some(robot_id(team, 0)));

        let expected =
            WeaponDistribution::from_weapons(engine.composition().weapons(team).iter().copied());
        let actual = WeaponDistribution::from_weapons(members.iter().map(|r| r.weapon));
        assert_eq!(actual, expected);
        assert_eq!(engine.team(team).stats.weapon_distribution, expected);
        assert_eq!(engine.team(team).active_robots, ROBOTS_PER_TEAM as u32);
    }
}

#[test]
fn test_spawn_slot_weapons_follow_composition() {
    let engine = started_engine(42);
    for team in Team::ALL {
        for (slot, weapon) in engine.composition().weapons(team).iter().enumerate() {
            let robot = engine.robot(&robot_id(team, slot)).unwrap();
            assert_eq!(robot.weapon, *weapon);
        }
    }
}

#[test]
fn test_spawn_separation() {
    let engine = started_engine(42);
    let robots = engine.robots();
    for (i, a) in robots.iter().enumerate() {
        for b in &robots[i + 1..] {
            assert!(
                a.position.distance_to(&b.position) > MIN_SPAWN_SEPARATION,
                "{} and {} spawned too close",
                a.id,
                b.id
            );
        }
    }
}

#[test]
fn test_spawn_inside_own_zone_facing_enemy() {
    let engine = started_engine(42);
    for robot in engine.robots() {
        let zone = engine.arena().spawn_zone(robot.team);
        assert!(robot.position.distance_to(&zone.center) <= zone.radius);

        let enemy_center = engine.arena().spawn_zone(robot.team.opponent()).center;
        let to_enemy = robot.position.direction_to(&enemy_center);
        assert!(robot.rotation.forward().dot(to_enemy) > 0.9);
    }
}

#[test]
fn test_spawn_physics_bodies_match_robots() {
    let engine = started_engine(42);
    let physics = engine.physics_snapshot();
    assert_eq!(physics.robots.len(), 2 * ROBOTS_PER_TEAM);
    for robot in engine.robots() {
        let body = physics.robots[&robot.id];
        assert_eq!(body.position, robot.position);
        assert!(body.velocity.is_zero());
    }
}

#[test]
fn test_nothing_runs_before_start() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    run_secs(&mut engine, 1.0);
    assert_eq!(engine.status(), BattleStatus::Initializing);
    assert!(engine.robots().is_empty());
    assert_eq!(engine.time().tick, 0);
}

#[test]
fn test_start_battle_command_emits_event() {
    let mut engine = SimulationEngine::new(SimConfig::default());
    engine.queue_command(BattleCommand::StartBattle);
    let snapshot = engine.tick();
    assert_eq!(snapshot.state.status, BattleStatus::Running);
    assert!(snapshot
        .events
        .contains(&BattleEvent::BattleStarted { battle_number: 1 }));
}

#[test]
fn test_with_arena_rejects_short_zone() {
    let mut arena = Arena::default();
    arena.spawn_zones.blue.spawn_points.truncate(4);
    assert!(SimulationEngine::with_arena(SimConfig::default(), arena).is_err());
}

// ---- Squad AI ----

#[test]
fn test_ai_targets_nearest_enemy_and_follows_captain() {
    let mut engine = started_engine(42);
    let red_captain = engine.robot("red-0").unwrap().position;
    engine.set_robot_position("blue-4", Position::new(red_captain.x + 8.0, 0.0, red_captain.z));
    engine.step(DT);

    for robot in engine.robots().iter().filter(|r| r.team == Team::Red) {
        assert_eq!(robot.ai.target_id.as_deref(), Some("blue-4"), "{}", robot.id);
    }
}

#[test]
fn test_ai_modes_from_health() {
    let mut engine = started_engine(42);
    engine.set_robot_health("red-2", 15.0);
    engine.set_robot_health("red-3", 40.0);
    engine.step(DT);

    let retreating = engine.robot("red-2").unwrap();
    assert_eq!(retreating.ai.behavior_mode, BehaviorMode::Retreating);
    assert!(retreating.ai.cover_position.is_some());

    let defensive = engine.robot("red-3").unwrap();
    assert_eq!(defensive.ai.behavior_mode, BehaviorMode::Defensive);
    assert!(defensive.ai.cover_position.is_some());

    let aggressive = engine.robot("red-4").unwrap();
    assert_eq!(aggressive.ai.behavior_mode, BehaviorMode::Aggressive);
    assert_eq!(aggressive.ai.cover_position, None);
}

#[test]
fn test_ai_outnumbered_team_turns_defensive() {
    let mut engine = started_engine(42);
    for slot in 0..3 {
        engine.eliminate_robot(&robot_id(Team::Blue, slot));
    }
    engine.step(DT);

    // 7 / 10 = 0.7 < 0.85
    for robot in engine.robots().iter().filter(|r| r.team == Team::Blue) {
        assert_eq!(robot.ai.behavior_mode, BehaviorMode::Defensive);
    }
    for robot in engine.robots().iter().filter(|r| r.team == Team::Red) {
        assert_eq!(robot.ai.behavior_mode, BehaviorMode::Aggressive);
    }
}

#[test]
fn test_robots_advance_and_stay_in_bounds() {
    let mut engine = started_engine(42);
    let start = engine.robot("red-0").unwrap().position;
    run_secs(&mut engine, 1.0);
    let after = engine.robot("red-0").unwrap().position;
    assert!(after.x > start.x, "red captain should close on the enemy");

    run_secs(&mut engine, 20.0);
    let bounds = engine.arena().boundaries;
    for robot in engine.robots() {
        assert!(bounds.contains(&robot.position), "{} left the arena", robot.id);
    }
}

// ---- Fire control ----

#[test]
fn test_fire_control_respects_range_and_cooldown() {
    let mut engine = started_engine(42);
    let red_captain = engine.robot("red-0").unwrap().position;
    engine.set_robot_position("blue-4", Position::new(red_captain.x + 10.0, 0.0, red_captain.z));

    let snapshot = engine.tick();
    let shooter = engine.robot("red-0").unwrap();
    assert_eq!(shooter.stats.shots_fired, 1);
    assert_eq!(shooter.ai.last_fire_time, Some(0.0));
    assert!(snapshot.events.iter().any(|e| matches!(
        e,
        BattleEvent::ShotFired { owner_id, .. } if owner_id == "red-0"
    )));

    // Every weapon cycles slower than one tick.
    engine.tick();
    assert_eq!(engine.robot("red-0").unwrap().stats.shots_fired, 1);
}

#[test]
fn test_no_fire_out_of_range() {
    let mut engine = started_engine(42);
    engine.tick();
    assert!(engine.projectiles().is_empty());
    assert!(engine.robots().iter().all(|r| r.stats.shots_fired == 0));
}

#[test]
fn test_fired_projectile_carries_multiplied_damage() {
    let mut engine = started_engine(42);
    let red_captain = engine.robot("red-0").unwrap();
    let target = engine.robot("blue-4").unwrap();
    engine.set_robot_position(
        "blue-4",
        Position::new(red_captain.position.x + 10.0, 0.0, red_captain.position.z),
    );
    engine.step(DT);

    let projectile = engine
        .projectiles()
        .into_iter()
        .find(|p| p.owner_id == "red-0");
    // The shot may already have landed this tick.
    if let Some(projectile) = projectile {
        let expected = skirmish_core::weapons::shot_damage(red_captain.weapon, target.weapon);
        assert!((projectile.damage - expected).abs() < 1e-9);
        let spec = skirmish_core::weapons::weapon_spec(red_captain.weapon);
        assert!((projectile.velocity.speed() - spec.projectile_speed).abs() < 1e-9);
    }
}

// ---- Physics ----

#[test]
fn test_projectile_hit_removes_projectile_same_tick() {
    let mut engine = started_engine(42);
    engine.set_robot_position("blue-0", Position::new(0.0, 0.0, 45.0));
    let id = engine
        .spawn_projectile(ProjectileSpawn {
            owner_id: "red-5".into(),
            weapon: WeaponType::Gun,
            position: Position::new(-4.0, 0.0, 45.0),
            velocity: Velocity::new(30.0, 0.0, 0.0),
            damage: Some(10.0),
        })
        .unwrap();

    let mut hit = false;
    for _ in 0..60 {
        engine.step(DT);
        let in_flight = engine.projectiles().iter().any(|p| p.id == id);
        if !in_flight {
            assert!(!engine.physics_snapshot().projectiles.contains_key(&id));
            hit = engine.events().iter().any(|e| matches!(
                e,
                BattleEvent::RobotHit { target_id, attacker_id: Some(attacker), .. }
                    if target_id == "blue-0" && attacker == "red-5"
            ));
            break;
        }
    }
    assert!(hit, "projectile should hit blue-0 and vanish in the same tick");

    let target = engine.robot("blue-0").unwrap();
    assert!((target.health - 90.0).abs() < 1e-9);
    assert!((target.stats.damage_taken - 10.0).abs() < 1e-9);
    assert!((engine.robot("red-5").unwrap().stats.damage_dealt - 10.0).abs() < 1e-9);
    assert!((engine.team(Team::Red).stats.total_damage_dealt - 10.0).abs() < 1e-9);
    assert!((engine.team(Team::Blue).stats.total_damage_taken - 10.0).abs() < 1e-9);
}

#[test]
fn test_projectile_ignores_own_team() {
    let mut engine = started_engine(42);
    engine.set_robot_position("red-7", Position::new(0.0, 0.0, 45.0));
    engine.spawn_projectile(ProjectileSpawn {
        owner_id: "red-5".into(),
        weapon: WeaponType::Gun,
        position: Position::new(-2.0, 0.0, 45.0),
        velocity: Velocity::new(30.0, 0.0, 0.0),
        damage: Some(10.0),
    });
    run_secs(&mut engine, 0.5);
    assert_eq!(engine.robot("red-7").unwrap().health, ROBOT_MAX_HEALTH);
}

#[test]
fn test_projectile_expires_at_max_distance() {
    let mut engine = started_engine(42);
    let id = engine
        .spawn_projectile(ProjectileSpawn {
            owner_id: "red-1".into(),
            weapon: WeaponType::Gun,
            position: Position::new(0.0, 0.0, 0.0),
            velocity: Velocity::new(0.0, 0.0, 30.0),
            damage: None,
        })
        .unwrap();

    // Gun range 16 → 20 units of flight at 30 u/s ≈ 0.67 s.
    run_secs(&mut engine, 0.5);
    assert!(engine.projectiles().iter().any(|p| p.id == id));
    run_secs(&mut engine, 0.25);
    assert!(!engine.projectiles().iter().any(|p| p.id == id));
}

#[test]
fn test_projectile_expires_at_max_lifetime() {
    let mut engine = started_engine(42);
    let id = engine
        .spawn_projectile(ProjectileSpawn {
            owner_id: "red-1".into(),
            weapon: WeaponType::Rocket,
            position: Position::new(0.0, 0.0, 0.0),
            velocity: Velocity::new(0.0, 0.0, 1.0),
            damage: None,
        })
        .unwrap();

    run_secs(&mut engine, PROJECTILE_MAX_LIFETIME - 0.2);
    assert!(engine.projectiles().iter().any(|p| p.id == id));
    run_secs(&mut engine, 0.4);
    assert!(!engine.projectiles().iter().any(|p| p.id == id));
}

#[test]
fn test_impulse_displaces_and_damps() {
    let mut engine = started_engine(42);
    assert!(engine.apply_impulse("blue-3", Velocity::new(0.0, 0.0, 10.0)));
    engine.step(DT);

    let body = engine.physics_snapshot().robots["blue-3"];
    assert!((body.velocity.z - 10.0 * VELOCITY_DAMPING).abs() < 1e-9);

    run_secs(&mut engine, 2.0);
    let body = engine.physics_snapshot().robots["blue-3"];
    assert!(body.velocity.is_zero(), "knockback should come to rest");
}

#[test]
fn test_set_position_is_clamped() {
    let mut engine = started_engine(42);
    assert!(engine.set_robot_position("red-1", Position::new(500.0, -3.0, -500.0)));
    let pos = engine.robot("red-1").unwrap().position;
    assert_eq!(pos, Position::new(ARENA_HALF_EXTENT, 0.0, -ARENA_HALF_EXTENT));
}

// ---- Damage and elimination ----

#[test]
fn test_kill_credit_on_projectile_elimination() {
    let mut engine = started_engine(42);
    engine.set_robot_health("blue-0", 5.0);
    engine.set_robot_position("blue-0", Position::new(0.0, 0.0, 45.0));
    engine.spawn_projectile(ProjectileSpawn {
        owner_id: "red-5".into(),
        weapon: WeaponType::Rocket,
        position: Position::new(-1.0, 0.0, 45.0),
        velocity: Velocity::new(20.0, 0.0, 0.0),
        damage: Some(28.0),
    });
    engine.step(DT);

    assert!(engine.robot("blue-0").is_none());
    assert_eq!(engine.robot("red-5").unwrap().stats.kills, 1);
    assert_eq!(engine.team(Team::Red).stats.total_kills, 1);
    assert_eq!(engine.team(Team::Blue).active_robots, 9);
    assert_eq!(engine.team(Team::Blue).eliminated_robots, 1);
    // Only the health actually removed counts.
    assert!((engine.team(Team::Blue).stats.total_damage_taken - 5.0).abs() < 1e-9);
    assert_captain_invariant(&engine);
}

#[test]
fn test_set_health_zero_eliminates_without_kill() {
    let mut engine = started_engine(42);
    assert!(engine.set_robot_health("blue-6", 0.0));
    assert!(engine.robot("blue-6").is_none());
    assert!(!engine.physics_snapshot().robots.contains_key("blue-6"));
    assert_eq!(engine.team(Team::Red).stats.total_kills, 0);
    assert_eq!(engine.team(Team::Blue).active_robots, 9);
}

#[test]
fn test_set_health_clamps() {
    let mut engine = started_engine(42);
    engine.set_robot_health("red-1", 250.0);
    assert_eq!(engine.robot("red-1").unwrap().health, ROBOT_MAX_HEALTH);
    engine.set_robot_health("red-1", 33.0);
    assert_eq!(engine.robot("red-1").unwrap().health, 33.0);
}

#[test]
fn test_elimination_clears_stale_targets() {
    let mut engine = started_engine(42);
    let red_captain = engine.robot("red-0").unwrap().position;
    engine.set_robot_position("blue-4", Position::new(red_captain.x + 8.0, 0.0, red_captain.z));
    engine.step(DT);
    assert_eq!(
        engine.robot("red-1").unwrap().ai.target_id.as_deref(),
        Some("blue-4")
    );

    engine.eliminate_robot("blue-4");
    assert!(engine
        .robots()
        .iter()
        .all(|r| r.ai.target_id.as_deref() != Some("blue-4")));
}

// ---- Captaincy ----

#[test]
fn test_captain_highest_health_wins() {
    let mut engine = started_engine(42);
    for slot in 0..ROBOTS_PER_TEAM {
        if slot != 6 {
            engine.set_robot_health(&robot_id(Team::Red, slot), 50.0);
        }
    }
    assert_eq!(engine.elect_captain(Team::Red).as_deref(), Some("red-6"));
    assert_captain_invariant(&engine);
}

#[test]
fn test_captain_kills_break_health_tie() {
    let mut engine = started_engine(42);
    for slot in 0..ROBOTS_PER_TEAM {
        if slot != 3 && slot != 7 {
            engine.set_robot_health(&robot_id(Team::Blue, slot), 50.0);
        }
    }
    engine.set_robot_kills("blue-7", 2);
    assert_eq!(engine.elect_captain(Team::Blue).as_deref(), Some("blue-7"));
    assert!(engine.robot("blue-7").unwrap().is_captain);
    assert!(!engine.robot("blue-0").unwrap().is_captain);
}

#[test]
fn test_captain_reelected_when_health_set_to_zero() {
    let mut engine = started_engine(42);
    assert_eq!(engine.team(Team::Red).captain_id.as_deref(), Some("red-0"));

    engine.set_robot_health("red-0", 0.0);
    let new_captain = engine.team(Team::Red).captain_id.clone().unwrap();
    assert_ne!(new_captain, "red-0");
    let robot = engine.robot(&new_captain).unwrap();
    assert!(robot.is_captain);
    assert!(robot.health > 0.0);
    assert_captain_invariant(&engine);
}

#[test]
fn test_captain_cleared_when_team_wiped() {
    let mut engine = started_engine(42);
    eliminate_team(&mut engine, Team::Blue);
    assert_eq!(engine.team(Team::Blue).captain_id, None);
    assert_eq!(engine.elect_captain(Team::Blue), None);
    assert_captain_invariant(&engine);
}

#[test]
fn test_elect_captain_command() {
    let mut engine = started_engine(42);
    engine.set_robot_health("red-0", 10.0);
    engine.queue_command(BattleCommand::ElectCaptain { team: Team::Red });
    engine.step(DT);
    assert_ne!(engine.team(Team::Red).captain_id.as_deref(), Some("red-0"));
    assert!(engine
        .events()
        .iter()
        .any(|e| matches!(e, BattleEvent::CaptainElected { team: Team::Red, .. })));
}

// ---- Victory & restart ----

#[test]
fn test_victory_flow() {
    let mut engine = started_engine(42);
    eliminate_team(&mut engine, Team::Blue);
    engine.step(DT);

    assert_eq!(engine.status(), BattleStatus::Victory);
    assert_eq!(engine.winner(), Some(Winner::Red));
    let countdown = engine.countdown().unwrap();
    assert!(countdown > 0.0 && countdown <= AUTO_RESTART_SECS);
    assert!(!engine.state().countdown_paused);
    assert!(engine.events().iter().any(|e| matches!(
        e,
        BattleEvent::BattleEnded { status: BattleStatus::Victory, winner: Winner::Red }
    )));
}

#[test]
fn test_countdown_pause_resume_reset() {
    let mut engine = started_engine(42);
    eliminate_team(&mut engine, Team::Blue);
    engine.step(DT);
    let before = engine.countdown().unwrap();

    engine.pause_countdown();
    run_secs(&mut engine, 1.0);
    assert_eq!(engine.countdown(), Some(before));

    engine.resume_countdown();
    run_secs(&mut engine, 1.0);
    let after = engine.countdown().unwrap();
    assert!(after < before);
    assert!((before - after - 1.0).abs() < 1e-6);

    engine.reset_countdown();
    assert_eq!(engine.countdown(), Some(AUTO_RESTART_SECS));
}

#[test]
fn test_countdown_commands() {
    let mut engine = started_engine(42);
    eliminate_team(&mut engine, Team::Red);
    engine.step(DT);
    assert_eq!(engine.winner(), Some(Winner::Blue));

    engine.queue_command(BattleCommand::PauseCountdown);
    engine.step(DT);
    assert!(engine.state().countdown_paused);

    engine.queue_command(BattleCommand::ResetCountdown);
    engine.queue_command(BattleCommand::ResumeCountdown);
    engine.step(DT);
    assert!(!engine.state().countdown_paused);
    assert!((engine.countdown().unwrap() - (AUTO_RESTART_SECS - DT)).abs() < 1e-9);
}

#[test]
fn test_auto_restart() {
    let mut engine = started_engine(42);
    eliminate_team(&mut engine, Team::Blue);
    engine.step(DT);
    assert_eq!(engine.status(), BattleStatus::Victory);

    run_secs(&mut engine, 6.0);
    assert_eq!(engine.status(), BattleStatus::Running);
    assert_eq!(engine.winner(), None);
    assert_eq!(engine.countdown(), None);
    assert!(engine.post_battle_stats().is_none());
    assert_eq!(engine.state().battle_number, 2);
    for team in Team::ALL {
        assert_eq!(engine.team(team).active_robots, ROBOTS_PER_TEAM as u32);
        assert_eq!(engine.team(team).eliminated_robots, 0);
        assert_eq!(engine.team(team).stats.total_kills, 0);
    }
    assert_eq!(engine.robots().len(), 2 * ROBOTS_PER_TEAM);
    assert_captain_invariant(&engine);
}

#[test]
fn test_restart_clears_projectiles() {
    let mut engine = started_engine(42);
    engine.spawn_projectile(ProjectileSpawn {
        owner_id: "red-1".into(),
        weapon: WeaponType::Laser,
        position: Position::new(0.0, 0.0, 0.0),
        velocity: Velocity::new(0.0, 0.0, 1.0),
        damage: None,
    });
    engine.restart();
    assert!(engine.projectiles().is_empty());
    assert!(engine.physics_snapshot().projectiles.is_empty());
}

#[test]
fn test_simultaneous_elimination() {
    let mut engine = started_engine(42);
    eliminate_team(&mut engine, Team::Red);
    eliminate_team(&mut engine, Team::Blue);
    engine.step(DT);

    assert_eq!(engine.status(), BattleStatus::SimultaneousElimination);
    assert_eq!(engine.winner(), Some(Winner::Draw));
    assert!(engine.countdown().is_some());
    assert_eq!(
        engine.post_battle_stats().unwrap().status,
        BattleStatus::SimultaneousElimination
    );
}

#[test]
fn test_post_battle_stats_captured_once_and_isolated() {
    let mut engine = started_engine(42);
    engine.set_robot_kills("red-1", 3);
    eliminate_team(&mut engine, Team::Blue);
    engine.step(DT);

    let captured = engine.post_battle_stats().unwrap().clone();
    assert_eq!(captured.winner, Winner::Red);
    assert_eq!(captured.robots.len(), 2 * ROBOTS_PER_TEAM);
    assert_eq!(captured.robots.iter().filter(|r| r.eliminated).count(), ROBOTS_PER_TEAM);
    assert_eq!(
        captured.robots.iter().find(|r| r.id == "red-1").unwrap().stats.kills,
        3
    );

    // Live mutation after capture must not leak into the capture.
    engine.set_robot_kills("red-1", 99);
    engine.set_robot_health("red-2", 10.0);
    engine.eliminate_robot("red-3");
    run_secs(&mut engine, 1.0);

    assert_eq!(engine.status(), BattleStatus::Victory);
    assert_eq!(engine.post_battle_stats(), Some(&captured));
}

#[test]
fn test_pending_team_config_applied_at_restart() {
    let mut engine = started_engine(42);
    let lasers = TeamConfig::new(
        vec![WeaponType::Laser; ROBOTS_PER_TEAM],
        vec![WeaponType::Rocket; ROBOTS_PER_TEAM],
    )
    .unwrap();
    engine.queue_command(BattleCommand::SetPendingTeamConfig {
        config: lasers.clone(),
    });
    engine.step(DT);

    // Not applied to the battle in progress.
    assert_eq!(engine.composition(), &TeamConfig::default());
    assert!(engine.robots().iter().any(|r| r.weapon == WeaponType::Gun));

    engine.restart();
    assert_eq!(engine.composition(), &lasers);
    assert!(engine.state().pending_team_config.is_none());
    for robot in engine.robots() {
        let expected = match robot.team {
            Team::Red => WeaponType::Laser,
            Team::Blue => WeaponType::Rocket,
        };
        assert_eq!(robot.weapon, expected);
    }
}

// ---- Lifecycle controls ----

#[test]
fn test_pause_stops_simulation() {
    let mut engine = started_engine(42);
    run_secs(&mut engine, 0.5);
    let frozen = serde_json::to_string(&engine.robots()).unwrap();
    let tick = engine.time().tick;

    engine.queue_command(BattleCommand::Pause);
    run_secs(&mut engine, 1.0);
    assert_eq!(engine.status(), BattleStatus::Paused);
    assert_eq!(engine.time().tick, tick);
    assert_eq!(serde_json::to_string(&engine.robots()).unwrap(), frozen);

    engine.queue_command(BattleCommand::Resume);
    engine.step(DT);
    assert_eq!(engine.status(), BattleStatus::Running);
    assert_eq!(engine.time().tick, tick + 1);
}

#[test]
fn test_set_time_scale() {
    let mut engine = started_engine(42);
    engine.queue_command(BattleCommand::SetTimeScale { scale: 10.0 });
    engine.step(DT);
    assert_eq!(engine.time_scale(), MAX_TIME_SCALE);
    assert!((engine.time().elapsed_secs - DT * MAX_TIME_SCALE).abs() < 1e-12);

    engine.set_time_scale(0.0);
    engine.step(DT);
    assert!((engine.time().elapsed_secs - DT * MAX_TIME_SCALE).abs() < 1e-12);
}

#[test]
fn test_ui_flags() {
    let mut engine = started_engine(42);
    engine.queue_commands([BattleCommand::OpenStats, BattleCommand::OpenSettings]);
    engine.step(DT);
    assert!(engine.state().ui.stats_open);
    assert!(engine.state().ui.settings_open);

    engine.close_stats();
    engine.close_settings();
    assert!(!engine.state().ui.stats_open);
    assert!(!engine.state().ui.settings_open);
}

#[test]
fn test_missing_ids_are_noops() {
    let mut engine = started_engine(42);
    let before = serde_json::to_string(&engine.snapshot()).unwrap();

    assert!(!engine.set_robot_health("ghost-1", 10.0));
    assert!(!engine.set_robot_kills("ghost-1", 4));
    assert!(!engine.set_robot_position("ghost-1", Position::new(1.0, 0.0, 1.0)));
    assert!(!engine.apply_impulse("ghost-1", Velocity::new(1.0, 0.0, 0.0)));
    assert!(!engine.eliminate_robot("ghost-1"));
    assert_eq!(
        engine.spawn_projectile(ProjectileSpawn {
            owner_id: "ghost-1".into(),
            weapon: WeaponType::Gun,
            position: Position::default(),
            velocity: Velocity::new(1.0, 0.0, 0.0),
            damage: None,
        }),
        None
    );

    assert_eq!(serde_json::to_string(&engine.snapshot()).unwrap(), before);
}

#[test]
fn test_eliminated_robot_is_unknown_afterwards() {
    let mut engine = started_engine(42);
    assert!(engine.eliminate_robot("blue-2"));
    assert!(!engine.eliminate_robot("blue-2"));
    assert!(!engine.set_robot_health("blue-2", 50.0));
    assert_eq!(engine.team(Team::Blue).eliminated_robots, 1);
}

// ---- Long-run invariants ----

#[test]
fn test_full_battle_invariants() {
    let mut engine = started_engine(7);
    let mut decided = false;
    for _ in 0..(90.0 / DT) as usize {
        let snapshot = engine.tick();
        for robot in &snapshot.robots {
            assert!(robot.health >= 0.0 && robot.health <= robot.max_health);
        }
        assert_captain_invariant(&engine);
        if snapshot.state.status.is_terminal() {
            decided = true;
            break;
        }
    }
    assert!(decided, "a default battle should finish within 90 s");
    let stats = engine.post_battle_stats().unwrap();
    assert_eq!(stats.robots.len(), 2 * ROBOTS_PER_TEAM);
    let kills: u32 = stats.teams.iter().map(|t| t.stats.total_kills).sum();
    let shots: u32 = stats.robots.iter().map(|r| r.stats.shots_fired).sum();
    assert!(kills > 0);
    assert!(shots > 0);
}

#[test]
fn test_battles_finish_and_restart_across_seeds() {
    for targeting in [TargetingRule::Nearest, TargetingRule::WeaponAdvantage] {
        for seed in 1..=6u64 {
            let mut engine = SimulationEngine::new(SimConfig {
                seed,
                targeting,
                ..Default::default()
            });
            engine.start_battle();

            let mut ticks = 0;
            while !engine.status().is_terminal() {
                engine.step(DT);
                ticks += 1;
                assert!(
                    ticks < (120.0 / DT) as usize,
                    "seed {seed} with {targeting:?} did not finish within 120 s"
                );
            }
            assert!(engine.post_battle_stats().is_some());
            assert!(engine.winner().is_some());

            run_secs(&mut engine, AUTO_RESTART_SECS + 0.5);
            assert_eq!(engine.status(), BattleStatus::Running);
            assert_eq!(engine.state().battle_number, 2);
            assert_eq!(engine.robots().len(), 2 * ROBOTS_PER_TEAM);
        }
    }
}

#[test]
fn test_pinned_captain_does_not_hold_back_squad() {
    let mut engine = started_engine(7);
    // A retreating captain parks at its spawn center.
    engine.set_robot_health("red-0", 5.0);
    run_secs(&mut engine, 8.0);

    let captain = engine.robot("red-0").unwrap();
    assert_eq!(captain.ai.behavior_mode, BehaviorMode::Retreating);
    let advanced = engine
        .robots()
        .into_iter()
        .filter(|r| r.team == Team::Red && !r.is_captain)
        .filter(|r| r.position.distance_to(&captain.position) > 10.0)
        .count();
    assert!(advanced > 0, "squad should close on the enemy without its captain");
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn test_health_bounded_under_random_damage(
        hits in proptest::collection::vec((0usize..20, -50.0f64..250.0), 1..60)
    ) {
        let mut engine = started_engine(3);
        let mut removed = [0.0f64; 2];
        for (slot, amount) in hits {
            let team = if slot < ROBOTS_PER_TEAM { Team::Red } else { Team::Blue };
            let id = robot_id(team, slot % ROBOTS_PER_TEAM);
            let before = engine.robot(&id).map(|r| r.health).unwrap_or(0.0);
            damage::apply_damage(engine.world_mut(), &id, amount, None);
            let after = engine.robot(&id).map(|r| r.health).unwrap_or(0.0);
            removed[team as usize] += before - after;

            for robot in engine.robots() {
                prop_assert!(robot.health > 0.0 && robot.health <= robot.max_health);
            }
        }
        engine.step(DT);
        assert_captain_invariant(&engine);

        for team in Team::ALL {
            let taken = engine.team(team).stats.total_damage_taken;
            prop_assert!((taken - removed[team as usize]).abs() < 1e-6);
        }
    }
}
