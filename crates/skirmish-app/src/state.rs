//! Application state shared between the controlling thread and the game loop.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, bail, Result};

use skirmish_core::commands::BattleCommand;
use skirmish_core::state::BattleSnapshot;
use skirmish_sim::SimulationEngine;

use crate::game_loop;

/// Commands sent to the game loop thread.
#[derive(Debug)]
pub enum LoopCommand {
    /// A command to forward to the simulation engine.
    Battle(BattleCommand),
    /// Shut down the game loop thread gracefully.
    Shutdown,
}

/// Handle to a running game loop.
///
/// The loop thread owns the engine. Observers only ever see the last
/// published snapshot, never the live world.
pub struct AppState {
    /// `None` before [`AppState::start`].
    pub command_tx: Mutex<Option<mpsc::Sender<LoopCommand>>>,
    /// Latest snapshot, replaced by the loop after each tick.
    pub latest_snapshot: Arc<Mutex<Option<BattleSnapshot>>>,
    pub running: Mutex<bool>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            command_tx: Mutex::new(None),
            latest_snapshot: Arc::new(Mutex::new(None)),
            running: Mutex::new(false),
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand the engine to a new game loop thread.
    pub fn start(&self, engine: SimulationEngine) -> Result<()> {
        let mut running = self.running.lock().map_err(|e| anyhow!(e.to_string()))?;
        if *running {
            bail!("simulation already running");
        }

        let cmd_tx = game_loop::spawn_game_loop(engine, self.latest_snapshot.clone())?;

        let mut tx_lock = self.command_tx.lock().map_err(|e| anyhow!(e.to_string()))?;
        *tx_lock = Some(cmd_tx);
        *running = true;
        Ok(())
    }

    /// Forward a command to the engine.
    pub fn send_command(&self, command: BattleCommand) -> Result<()> {
        let tx_lock = self.command_tx.lock().map_err(|e| anyhow!(e.to_string()))?;
        match tx_lock.as_ref() {
            Some(tx) => tx
                .send(LoopCommand::Battle(command))
                .map_err(|e| anyhow!("failed to send command: {e}")),
            None => bail!("simulation not started"),
        }
    }

    /// Latest published snapshot, if the loop has produced one.
    pub fn snapshot(&self) -> Result<Option<BattleSnapshot>> {
        let lock = self
            .latest_snapshot
            .lock()
            .map_err(|e| anyhow!(e.to_string()))?;
        Ok(lock.clone())
    }

    /// Ask the loop to stop. Safe to call when it is not running.
    pub fn shutdown(&self) -> Result<()> {
        let mut tx_lock = self.command_tx.lock().map_err(|e| anyhow!(e.to_string()))?;
        if let Some(tx) = tx_lock.take() {
            let _ = tx.send(LoopCommand::Shutdown);
        }
        *self.running.lock().map_err(|e| anyhow!(e.to_string()))? = false;
        Ok(())
    }
}
