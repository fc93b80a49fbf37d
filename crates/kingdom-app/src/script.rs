//! Scripted defense round for the headless binary.
//!
//! Starts a round, plays the most expensive affordable card whenever one is
//! ready, and stops when the camp falls, the hub falls or time runs out.

use serde::Serialize;
use tracing::{debug, info};

use kingdom_core::commands::PlayerCommand;
use kingdom_core::constants::TICK_RATE;
use kingdom_core::enums::{EntityKind, GamePhase, Team};
use kingdom_core::events::SimEvent;
use kingdom_core::state::GameStateSnapshot;
use kingdom_core::types::Position;
use kingdom_sim::engine::SimulationEngine;

/// Distance in front of the hub where cards are played.
const DEPLOY_OFFSET: f64 = 3.0;
/// Lateral spread of the two deployment lanes.
const LANE_SPREAD: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
    CampDestroyed,
    HubDestroyed,
    TimeUp,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoundSummary {
    pub outcome: Outcome,
    pub ticks: u64,
    pub sim_secs: f64,
    pub cards_played: u32,
    pub enemy_spawns: u32,
    pub minion_deaths: u32,
    pub rejected_commands: u32,
    pub gold: u32,
    pub level: u32,
    pub hub_health_ratio: f64,
}

impl RoundSummary {
    fn new() -> Self {
        Self {
            outcome: Outcome::TimeUp,
            ticks: 0,
            sim_secs: 0.0,
            cards_played: 0,
            enemy_spawns: 0,
            minion_deaths: 0,
            rejected_commands: 0,
            gold: 0,
            level: 0,
            hub_health_ratio: 0.0,
        }
    }
}

pub fn play_defense_round(engine: &mut SimulationEngine, duration_secs: f64) -> RoundSummary {
    let max_ticks = (duration_secs.max(0.0) * TICK_RATE as f64).ceil() as u64;
    let mut summary = RoundSummary::new();

    engine.queue_command(PlayerCommand::StartDefense);
    let mut lane = 0u32;
    let mut snapshot = engine.tick();
    let mut ticks_left = max_ticks;

    loop {
        tally(&snapshot, &mut summary);
        if snapshot.phase == GamePhase::GameOver {
            summary.outcome = Outcome::HubDestroyed;
            break;
        }
        if camp_destroyed(&snapshot) {
            summary.outcome = Outcome::CampDestroyed;
            break;
        }
        if ticks_left == 0 {
            break;
        }
        ticks_left -= 1;

        if let Some(slot) = best_playable(&snapshot) {
            let side = if lane % 2 == 0 { 1.0 } else { -1.0 };
            lane += 1;
            let hub = hub_position(&snapshot).unwrap_or_default();
            let position = hub.offset(DEPLOY_OFFSET, side * LANE_SPREAD);
            debug!(slot, x = position.x, y = position.y, "script plays card");
            engine.queue_command(PlayerCommand::PlayCard { slot, position });
        }
        snapshot = engine.tick();
    }

    if summary.outcome == Outcome::CampDestroyed {
        engine.queue_command(PlayerCommand::GrantExperience { amount: 1 });
        snapshot = engine.tick();
        tally(&snapshot, &mut summary);
    }

    summary.ticks = snapshot.time.tick;
    summary.sim_secs = snapshot.time.elapsed_secs;
    summary.gold = snapshot.hub.gold;
    summary.level = snapshot.hub.level;
    summary.hub_health_ratio = snapshot.hub.health_ratio;
    info!(
        outcome = ?summary.outcome,
        secs = summary.sim_secs,
        cards = summary.cards_played,
        gold = summary.gold,
        "defense round finished"
    );
    summary
}

/// Most expensive playable card; ties keep the lower slot.
fn best_playable(snapshot: &GameStateSnapshot) -> Option<usize> {
    snapshot
        .deck
        .iter()
        .filter(|c| c.playable)
        .fold(None, |best: Option<(usize, u32)>, c| match best {
            Some((_, cost)) if cost >= c.mana_cost => best,
            _ => Some((c.slot, c.mana_cost)),
        })
        .map(|(slot, _)| slot)
}

fn hub_position(snapshot: &GameStateSnapshot) -> Option<Position> {
    let id = snapshot.hub.id?;
    snapshot
        .entities
        .iter()
        .find(|v| v.id == id)
        .map(|v| v.position)
}

fn camp_destroyed(snapshot: &GameStateSnapshot) -> bool {
    snapshot
        .events
        .iter()
        .any(|e| matches!(e, SimEvent::CampDestroyed { .. }))
}

/// Only the script plays cards, so player spawns are accepted cards.
fn tally(snapshot: &GameStateSnapshot, summary: &mut RoundSummary) {
    for event in &snapshot.events {
        match event {
            SimEvent::Spawned {
                team: Team::Player, ..
            } => summary.cards_played += 1,
            SimEvent::Spawned {
                team: Team::Enemy, ..
            } => summary.enemy_spawns += 1,
            SimEvent::Death {
                kind: EntityKind::Minion,
                ..
            } => summary.minion_deaths += 1,
            SimEvent::CommandRejected { .. } => summary.rejected_commands += 1,
            _ => {}
        }
    }
}
