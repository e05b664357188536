//! The battle context passed into every system.
//!
//! `BattleWorld` owns the hecs world together with the bookkeeping that does
//! not belong on entities: team state, the id → entity index, the casualty
//! ledger and the pending event list.

use std::collections::BTreeMap;

use hecs::{Entity, World};

use skirmish_core::arena::Arena;
use skirmish_core::enums::Team;
use skirmish_core::events::BattleEvent;
use skirmish_core::state::{RobotRecord, TeamState, Teams};

pub struct BattleWorld {
    /// Robots and projectiles.
    pub ecs: World,
    pub arena: Arena,
    pub teams: Teams,
    /// Events raised since the start of the current tick.
    pub events: Vec<BattleEvent>,
    /// Robot id → entity. Only living robots are indexed.
    roster: BTreeMap<String, Entity>,
    /// Final records of robots eliminated this battle.
    casualties: Vec<RobotRecord>,
    next_projectile_id: u64,
}

impl BattleWorld {
    pub fn new(arena: Arena) -> Self {
        let teams = Teams {
            red: TeamState::new(Team::Red, arena.spawn_zone(Team::Red).clone()),
            blue: TeamState::new(Team::Blue, arena.spawn_zone(Team::Blue).clone()),
        };
        Self {
            ecs: World::new(),
            arena,
            teams,
            events: Vec::new(),
            roster: BTreeMap::new(),
            casualties: Vec::new(),
            next_projectile_id: 0,
        }
    }

    /// Entity of a living robot.
    pub fn robot_entity(&self, id: &str) -> Option<Entity> {
        self.roster.get(id).copied()
    }

    pub fn register_robot(&mut self, id: String, entity: Entity) {
        self.roster.insert(id, entity);
    }

    /// Drop a robot from the index. The caller despawns the entity.
    pub fn unregister_robot(&mut self, id: &str) -> Option<Entity> {
        self.roster.remove(id)
    }

    pub fn record_casualty(&mut self, record: RobotRecord) {
        self.casualties.push(record);
    }

    pub fn casualties(&self) -> &[RobotRecord] {
        &self.casualties
    }

    /// Next projectile id. Monotonic for the life of the engine.
    pub fn allocate_projectile_id(&mut self) -> u64 {
        let id = self.next_projectile_id;
        self.next_projectile_id += 1;
        id
    }

    /// Remove every entity and reset both teams for a fresh battle.
    pub fn clear_battle(&mut self) {
        self.ecs.clear();
        self.roster.clear();
        self.casualties.clear();
        for team in Team::ALL {
            self.teams.get_mut(team).reset();
        }
    }
}
