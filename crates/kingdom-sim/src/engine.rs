//! Simulation engine: the core of the game.
//!
//! `SimulationEngine` owns the hecs ECS world, processes player commands,
//! runs all systems, and produces `GameStateSnapshot`s. Completely headless,
//! enabling deterministic testing.

use std::collections::VecDeque;
use std::sync::Arc;

use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use kingdom_ai::economy;
use kingdom_campaign::PlayerProfile;
use kingdom_core::commands::PlayerCommand;
use kingdom_core::components::{Health, ManaPool, Spellcaster};
use kingdom_core::enums::{GameMode, GamePhase, Kingdom, Team};
use kingdom_core::error::{CommandError, ConfigError, SimError};
use kingdom_core::events::SimEvent;
use kingdom_core::state::GameStateSnapshot;
use kingdom_core::types::{EntityId, Position, SimTime};
use kingdom_core::units::{UnitCatalog, UnitSpec};

use crate::context::{entity_from_id, entity_id, SimContext};
use crate::deck::Deck;
use crate::defense::{self, DefenseCycle, RoundSetup};
use crate::scenario::ScenarioConfig;
use crate::systems;
use crate::systems::snapshot::SnapshotInput;
use crate::world_setup;

/// Configuration for starting a new simulation.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// Initial player state; written back through `SimulationEngine::profile`.
    pub profile: PlayerProfile,
    pub catalog: UnitCatalog,
    pub scenario: ScenarioConfig,
    /// Whether the Heal ability includes its caster.
    pub heal_includes_caster: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        let catalog = UnitCatalog::builtin();
        let profile = PlayerProfile::starter("Player", Kingdom::GreatZoey, &catalog);
        Self {
            seed: 42,
            profile,
            catalog,
            scenario: ScenarioConfig::default(),
            heal_includes_caster: true,
        }
    }
}

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    time: SimTime,
    phase: GamePhase,
    ctx: SimContext,
    rng: ChaCha8Rng,
    catalog: UnitCatalog,
    scenario: ScenarioConfig,
    profile: PlayerProfile,
    deck: Deck,
    defense: DefenseCycle,
    command_queue: VecDeque<PlayerCommand>,
    despawn_buffer: Vec<Entity>,
    events: Vec<SimEvent>,
}

impl SimulationEngine {
    /// Create a new simulation engine with the given config.
    pub fn new(config: SimConfig) -> Self {
        let SimConfig {
            seed,
            mut profile,
            catalog,
            scenario,
            heal_includes_caster,
        } = config;

        let mut world = World::new();
        let hub = world_setup::setup_base(&mut world, &scenario, &profile);
        let mut ctx = SimContext::new(heal_includes_caster);
        ctx.player_hub = Some(hub);

        let (deck, rejected) = Deck::from_profile(&profile, &catalog, scenario.card_cooldown_secs);
        for err in &rejected {
            warn!(%err, "deck entry skipped");
        }
        profile.deck = deck.names();
        profile.is_new = false;

        info!(
            profile = %profile.name,
            kingdom = ?profile.kingdom,
            level = profile.level,
            units = catalog.len(),
            "simulation created"
        );

        Self {
            world,
            time: SimTime::default(),
            phase: GamePhase::default(),
            ctx,
            rng: ChaCha8Rng::seed_from_u64(seed),
            defense: DefenseCycle::new(scenario.defense_cooldown_secs),
            catalog,
            scenario,
            profile,
            deck,
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Advance the simulation by one tick and return the resulting snapshot.
    pub fn tick(&mut self) -> GameStateSnapshot {
        self.ctx.now_secs = self.time.elapsed_secs;
        self.process_commands();

        if self.phase == GamePhase::Active {
            self.run_systems();
            self.time.advance();
            self.profile.play_time_secs += self.ctx.dt;
        }

        self.snapshot()
    }

    /// Snapshot of the current state, draining pending events.
    fn snapshot(&mut self) -> GameStateSnapshot {
        let events = std::mem::take(&mut self.events);
        systems::snapshot::build_snapshot(
            &self.world,
            &SnapshotInput {
                time: &self.time,
                phase: self.phase,
                ctx: &self.ctx,
                deck: &self.deck,
                profile: &self.profile,
                defense: &self.defense,
            },
            events,
        )
    }

    /// Get the current game phase.
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn mode(&self) -> GameMode {
        self.ctx.mode
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn context(&self) -> &SimContext {
        &self.ctx
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn catalog(&self) -> &UnitCatalog {
        &self.catalog
    }

    /// The player profile with gold, level stats, deck and play time
    /// written back.
    pub fn profile(&self) -> PlayerProfile {
        let mut profile = self.profile.clone();
        profile.deck = self.deck.names();
        profile
    }

    pub fn player_hub(&self) -> Option<Entity> {
        self.ctx.player_hub
    }

    pub fn enemy_camp(&self) -> Option<Entity> {
        self.ctx.enemy_camp
    }

    /// Resolve an external handle to a live arena entity.
    pub fn entity(&self, id: EntityId) -> Option<Entity> {
        entity_from_id(id).filter(|e| self.world.contains(*e))
    }

    /// Spawn a unit directly (scene collaborators, scripted scenarios).
    pub fn spawn_unit(
        &mut self,
        unit: &str,
        team: Team,
        level: u32,
        position: Position,
    ) -> Result<Entity, SimError> {
        let spec = self
            .catalog
            .get(unit)
            .cloned()
            .ok_or_else(|| ConfigError::UnknownUnit(unit.to_string()))?;
        Ok(self.spawn_from_spec(&spec, team, level, position))
    }

    /// Spawn a unit from an explicit template, outside the catalog.
    pub fn spawn_from_spec(
        &mut self,
        spec: &Arc<UnitSpec>,
        team: Team,
        level: u32,
        position: Position,
    ) -> Entity {
        let home = match team {
            Team::Player => self.ctx.player_hub,
            Team::Enemy => self.ctx.enemy_camp,
            Team::Neutral => None,
        };
        let entity = world_setup::spawn_minion(&mut self.world, spec, team, level, position, home);
        self.events.push(SimEvent::Spawned {
            entity: entity_id(entity),
            unit: spec.name.clone(),
            team,
            position,
        });
        entity
    }

    /// Get a mutable reference to the ECS world (for test setup).
    #[cfg(test)]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            if let Err(err) = self.handle_command(command) {
                warn!(%err, "command rejected");
                self.events.push(SimEvent::CommandRejected {
                    reason: err.to_string(),
                });
            }
        }
        systems::cleanup::flush(&mut self.world, &mut self.despawn_buffer);
    }

    /// Handle a single player command.
    fn handle_command(&mut self, command: PlayerCommand) -> Result<(), CommandError> {
        match command {
            PlayerCommand::Pause => {
                if self.phase == GamePhase::Active {
                    self.phase = GamePhase::Paused;
                }
            }
            PlayerCommand::Resume => {
                if self.phase == GamePhase::Paused {
                    self.phase = GamePhase::Active;
                }
            }
            PlayerCommand::SwitchMode { mode } => self.switch_mode(mode),
            PlayerCommand::StartDefense => {
                self.switch_mode(GameMode::Defense);
                if self.ctx.enemy_camp.is_none() {
                    let setup = RoundSetup {
                        scenario: &self.scenario,
                        catalog: &self.catalog,
                        player_kingdom: self.profile.kingdom,
                    };
                    defense::start_round(
                        &mut self.world,
                        &mut self.ctx,
                        &mut self.defense,
                        &setup,
                        &mut self.rng,
                        &mut self.events,
                    )?;
                }
            }
            PlayerCommand::PlayCard { slot, position } => self.play_card(slot, position)?,
            PlayerCommand::AddCard { unit } => {
                self.deck.add(&unit, &self.profile, &self.catalog)?;
            }
            PlayerCommand::RemoveCard { slot } => {
                self.deck.remove(slot)?;
            }
            PlayerCommand::GrantExperience { amount } => {
                debug!(amount, "experience granted");
                self.level_up();
            }
            PlayerCommand::SetTowerSpell { tower, spell } => {
                let entity = self.entity(tower).ok_or(CommandError::UnknownEntity)?;
                let mut caster = self
                    .world
                    .get::<&mut Spellcaster>(entity)
                    .map_err(|_| CommandError::UnknownEntity)?;
                caster.spell = spell;
            }
        }
        Ok(())
    }

    fn switch_mode(&mut self, mode: GameMode) {
        if self.ctx.mode == mode {
            return;
        }
        if mode == GameMode::Hub {
            defense::end_round(&mut self.world, &mut self.ctx, &mut self.despawn_buffer);
        }
        self.defense.cooldown_remaining_secs = self.scenario.defense_cooldown_secs;
        self.ctx.mode = mode;
        info!(?mode, "game mode changed");
        self.events.push(SimEvent::ModeChanged { mode });
    }

    fn play_card(&mut self, slot: usize, position: Position) -> Result<(), CommandError> {
        if self.ctx.mode != GameMode::Defense {
            return Err(CommandError::WrongMode {
                required: GameMode::Defense,
            });
        }
        let hub = self
            .ctx
            .player_hub
            .ok_or(SimError::MissingReference("player hub"))?;
        let (spec, level) = {
            let mut pool = self
                .world
                .get::<&mut ManaPool>(hub)
                .map_err(|_| SimError::MissingReference("player hub"))?;
            let card = self.deck.playable(slot, &pool)?;
            let (spec, level) = (card.unit.clone(), card.level);
            economy::try_spend(&mut pool, spec.mana_cost as f64);
            (spec, level)
        };
        self.deck.start_cooldown(slot);
        let entity = self.spawn_from_spec(&spec, Team::Player, level, position);
        debug!(?entity, unit = %spec.name, slot, "card played");
        Ok(())
    }

    /// One level for the player: profile stats, hub, deck.
    fn level_up(&mut self) {
        let old_max = self.profile.max_health;
        let stats = self.profile.level_up();
        if let Some(hub) = self.ctx.player_hub {
            if let Ok(mut health) = self.world.get::<&mut Health>(hub) {
                health.max = stats.max_health;
                if !health.dead {
                    let gained = (stats.max_health - old_max).max(0.0);
                    health.current = (health.current + gained).min(health.max);
                }
                health.defense = stats.defense;
            }
            if let Ok(mut pool) = self.world.get::<&mut ManaPool>(hub) {
                economy::set_capacity(&mut pool, stats.max_mana);
                pool.regen_rate = stats.mana_regen;
            }
        }
        self.deck
            .on_level_up(stats.max_deck_size as usize, self.profile.level);
        info!(level = self.profile.level, "player levelled up");
        self.events.push(SimEvent::LevelUp {
            level: self.profile.level,
        });
    }

    /// Run all systems in order.
    fn run_systems(&mut self) {
        // 1. Player hub mana (Defense mode only)
        systems::hub::regenerate_mana(&mut self.world, &self.ctx);
        // 2. Card cooldowns (Defense mode only)
        if self.ctx.mode == GameMode::Defense {
            self.deck.tick(self.ctx.dt);
        }
        // 3. Defense cycle: countdown and camp placement
        let setup = RoundSetup {
            scenario: &self.scenario,
            catalog: &self.catalog,
            player_kingdom: self.profile.kingdom,
        };
        defense::run(
            &mut self.world,
            &mut self.ctx,
            &mut self.defense,
            &setup,
            &mut self.rng,
            &mut self.events,
        );
        // 4. Camp spawn economy
        systems::spawner::run(&mut self.world, &self.ctx, &mut self.rng, &mut self.events);
        // 5. Targeting
        systems::targeting::run(&mut self.world, &self.ctx);
        // 6. Attacks, abilities, steering
        systems::combat::run(&mut self.world, &self.ctx, &mut self.events);
        // 7. Projectiles
        systems::projectile::run(
            &mut self.world,
            &self.ctx,
            &mut self.events,
            &mut self.despawn_buffer,
        );
        // 8. Movement integration
        systems::movement::run(&mut self.world, self.ctx.dt);
        // 9. Camp destruction and reward
        self.process_destroyed_camps();
        // 10. Game over
        if systems::hub::is_destroyed(&self.world, &self.ctx) {
            info!("player hub destroyed");
            self.phase = GamePhase::GameOver;
        }
        // 11. Cleanup
        systems::cleanup::run(&mut self.world, &mut self.despawn_buffer);
    }

    fn process_destroyed_camps(&mut self) {
        let destroyed =
            systems::spawner::collect_destroyed(&mut self.world, &mut self.despawn_buffer);
        for (camp, kingdom) in destroyed {
            let reward = self.scenario.camp_reward_gold;
            self.profile.add_gold(reward);
            if self.ctx.enemy_camp == Some(camp) {
                self.ctx.enemy_camp = None;
                self.defense.cooldown_remaining_secs = self.scenario.defense_cooldown_secs;
            }
            self.events.push(SimEvent::CampDestroyed {
                camp: entity_id(camp),
                kingdom,
                reward_gold: reward,
            });
        }
    }
}
