//! Session lifecycle and the per-tick driver.
//!
//! A [`Simulation`] owns the world and everything that acts on it. The
//! host calls [`Simulation::tick`] at a fixed rate; state changes
//! (start, pause, restart) happen only between ticks.

use crate::archetypes::{self, EntityKind};
use crate::components::{self, Health, Movement, Translation};
use crate::config::GameConfig;
use crate::error::{SimError, SimResult};
use crate::events::{GameEvent, Scoreboard};
use crate::input::TickInput;
use crate::pool::BulletPool;
use crate::render::{render_snapshot, RenderInstance};
use crate::spawner::{SpawnTrigger, Spawner};
use crate::systems::{self, collision, health, movement, pool_upkeep, spatial_query, steering, Stage};
use horde_core::ecs::{CommandBuffer, Entity, SpatialHashGrid, SystemRegistry, World};
use horde_core::math::Vec3;
use horde_core::time::{SimulationTime, TimerQueue};
use horde_metrics::{time_scope, Counters, SystemProfiler};
use std::fmt;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SessionState {
    #[default]
    Inactive,
    Running,
    Paused,
    GameOver,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Inactive => "inactive",
            SessionState::Running => "running",
            SessionState::Paused => "paused",
            SessionState::GameOver => "game over",
        };
        f.write_str(name)
    }
}

/// Result of one [`Simulation::tick`].
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    /// Ticks completed so far, including this one.
    pub tick: u64,
    /// State after the tick.
    pub state: SessionState,
    pub events: Vec<GameEvent>,
}

/// What the HUD shows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hud {
    pub current: f32,
    pub max: f32,
    pub score: u64,
}

pub struct Simulation {
    config: GameConfig,
    world: World,
    state: SessionState,
    player: Option<Entity>,
    pool: Option<BulletPool>,
    spawner: Spawner,
    timers: TimerQueue<SpawnTrigger>,
    time: SimulationTime,
    schedule: SystemRegistry,
    /// Stages in the order the schedule registered them.
    stages: Vec<Stage>,
    grid: SpatialHashGrid,
    commands: CommandBuffer,
    /// Last non-zero heading; fire requests without a direction use it.
    facing: Vec3,
    pending_taps: Vec<Vec3>,
    pending_events: Vec<GameEvent>,
    scoreboard: Scoreboard,
    defeat_raised: bool,
    last_health: Option<f32>,
    profiler: SystemProfiler,
    counters: Counters,
}

impl Simulation {
    /// Validate `config` and prepare an inactive session.
    pub fn new(config: GameConfig) -> SimResult<Self> {
        config.validate()?;
        components::register_all();
        let schedule = systems::schedule()?;
        let stages = schedule
            .iter()
            .filter_map(|(_, descriptor)| Stage::from_name(descriptor.name()))
            .collect();
        tracing::debug!(systems = schedule.len(), seed = config.seed, "simulation created");

        Ok(Self {
            spawner: Spawner::new(config.seed),
            config,
            world: World::new(),
            state: SessionState::Inactive,
            player: None,
            pool: None,
            timers: TimerQueue::new(),
            time: SimulationTime::new(),
            schedule,
            stages,
            grid: SpatialHashGrid::default(),
            commands: CommandBuffer::new(),
            facing: Vec3::X,
            pending_taps: Vec::new(),
            pending_events: Vec::new(),
            scoreboard: Scoreboard::default(),
            defeat_raised: false,
            last_health: None,
            profiler: SystemProfiler::default(),
            counters: Counters::default(),
        })
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Spawn the player and the bullet pool, arm the spawn timers.
    pub fn start(&mut self) -> SimResult<()> {
        self.expect_state(SessionState::Inactive, "start")?;
        let player = self.world.spawn(archetypes::player(&self.config, Vec3::ZERO))?;
        let pool = BulletPool::create(&mut self.world, &self.config)?;
        self.player = Some(player);
        self.pool = Some(pool);
        self.arm_timers()?;
        self.state = SessionState::Running;
        tracing::info!(player = %player, bullets = self.config.bullet_pool_size, "session started");
        Ok(())
    }

    /// Freeze systems and timers.
    pub fn pause(&mut self) -> SimResult<()> {
        self.expect_state(SessionState::Running, "pause")?;
        self.state = SessionState::Paused;
        tracing::info!("session paused");
        Ok(())
    }

    pub fn resume(&mut self) -> SimResult<()> {
        self.expect_state(SessionState::Paused, "resume")?;
        self.state = SessionState::Running;
        tracing::info!("session resumed");
        Ok(())
    }

    /// Clear enemies and food, park every bullet, heal the player and
    /// start over. Only valid after a defeat.
    pub fn restart(&mut self) -> SimResult<()> {
        self.expect_state(SessionState::GameOver, "restart")?;
        let cleared = self.world.despawn_matching(&archetypes::transient_query())?;
        let parked = match self.pool.as_mut() {
            Some(pool) => pool.park_all(&mut self.world)?,
            None => 0,
        };

        let player = self.player_entity()?;
        self.world.get_mut::<Health>(player)?.reset();
        self.world.get_mut::<Movement>(player)?.direction = Vec3::ZERO;

        self.arm_timers()?;
        self.pending_taps.clear();
        self.pending_events.clear();
        self.scoreboard.reset();
        self.defeat_raised = false;
        self.last_health = None;
        self.state = SessionState::Running;
        tracing::info!(cleared, parked, "session restarted");
        Ok(())
    }

    fn on_player_defeated(&mut self, events: &mut Vec<GameEvent>) {
        self.defeat_raised = true;
        self.timers.disarm_all();
        self.state = SessionState::GameOver;
        events.push(GameEvent::PlayerDefeated);
        tracing::info!(
            score = self.scoreboard.score,
            kills = self.scoreboard.kills,
            tick = self.time.tick_count(),
            "player defeated"
        );
    }

    fn arm_timers(&mut self) -> SimResult<()> {
        self.timers.disarm_all();
        self.timers
            .arm(SpawnTrigger::EnemyWave, f64::from(self.config.enemy_spawn_interval), 0.0)?;
        let food = f64::from(self.config.food_spawn_interval);
        self.timers.arm(SpawnTrigger::Food, food, food)?;
        Ok(())
    }

    fn expect_state(&self, expected: SessionState, action: &'static str) -> SimResult<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(SimError::InvalidTransition {
                from: self.state,
                action,
            })
        }
    }

    // ------------------------------------------------------------------
    // Commands from the host
    // ------------------------------------------------------------------

    /// Launch a bullet from the player.
    ///
    /// A zero `direction` fires along the player's last heading.
    pub fn fire(&mut self, direction: Vec3) -> SimResult<Entity> {
        self.expect_state(SessionState::Running, "fire")?;
        let player = self.player_entity()?;
        let origin = self.world.get::<Translation>(player)?.position;
        let direction = match direction.normalize_or_zero() {
            d if d == Vec3::ZERO => self.facing,
            d => d,
        };
        let pool = self.pool.as_mut().ok_or(SimError::InvalidTransition {
            from: self.state,
            action: "fire",
        })?;
        let bullet = pool.fire(&mut self.world, origin, direction, self.config.bullet_speed)?;
        self.counters.add("bullets_fired", 1);
        Ok(bullet)
    }

    /// Queue a tap, resolved during the next tick's spatial query pass.
    pub fn tap(&mut self, point: Vec3) {
        self.pending_taps.push(point);
    }

    /// Spawn a wave of `count` enemies right away.
    pub fn spawn_enemies(&mut self, count: usize) -> SimResult<Vec<Entity>> {
        self.expect_state(SessionState::Running, "spawn enemies")?;
        let mut events = std::mem::take(&mut self.pending_events);
        let spawned = self.spawn_wave(count, &mut events);
        self.pending_events = events;
        spawned
    }

    /// Drop one food item on the ring around `position`.
    pub fn spawn_food(&mut self, position: Vec3) -> SimResult<Entity> {
        self.expect_state(SessionState::Running, "spawn food")?;
        let mut events = std::mem::take(&mut self.pending_events);
        let spawned = self.drop_food(position, &mut events);
        self.pending_events = events;
        spawned
    }

    fn spawn_wave(&mut self, count: usize, events: &mut Vec<GameEvent>) -> SimResult<Vec<Entity>> {
        let spawned = self.spawner.spawn_wave(&mut self.world, &self.config, count)?;
        self.counters.add("enemies_spawned", spawned.len() as u64);
        events.push(GameEvent::EnemiesSpawned { count: spawned.len() });
        Ok(spawned)
    }

    fn drop_food(&mut self, near: Vec3, events: &mut Vec<GameEvent>) -> SimResult<Entity> {
        let (entity, position) = self.spawner.spawn_food_near(&mut self.world, &self.config, near)?;
        self.counters.add("food_spawned", 1);
        events.push(GameEvent::FoodSpawned { entity, position });
        Ok(entity)
    }

    // ------------------------------------------------------------------
    // Tick
    // ------------------------------------------------------------------

    /// Advance the session by `dt` seconds.
    ///
    /// Outside `Running` nothing moves and the report is empty. A negative or
    /// non-finite `dt` is refused before anything changes.
    pub fn tick(&mut self, dt: f32, input: TickInput) -> SimResult<TickReport> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(SimError::InvalidTimeStep { dt });
        }
        if self.state != SessionState::Running {
            return Ok(self.report(Vec::new()));
        }
        let mut events = std::mem::take(&mut self.pending_events);
        self.time.advance(dt);

        for trigger in self.timers.advance(f64::from(dt)) {
            match trigger {
                SpawnTrigger::EnemyWave => {
                    self.spawn_wave(self.config.num_enemies as usize, &mut events)?;
                }
                SpawnTrigger::Food => {
                    let near = self.player_position()?;
                    self.drop_food(near, &mut events)?;
                }
            }
        }

        self.apply_input(input)?;

        #[cfg_attr(not(feature = "metrics"), allow(unused_mut))]
        let mut profiler = std::mem::take(&mut self.profiler);
        let stages = std::mem::take(&mut self.stages);
        let mut player_depleted = false;
        let mut outcome = Ok(());
        for &stage in &stages {
            match time_scope!(profiler, stage.name(), { self.run_stage(stage, dt, &mut events) }) {
                Ok(depleted) => player_depleted |= depleted,
                Err(err) => {
                    outcome = Err(err);
                    break;
                }
            }
        }
        self.stages = stages;
        self.profiler = profiler;
        outcome?;

        if player_depleted && !self.defeat_raised {
            self.on_player_defeated(&mut events);
        }
        let health = self.world.get::<Health>(self.player_entity()?)?;
        if self.last_health != Some(health.current) {
            self.last_health = Some(health.current);
            events.push(GameEvent::HealthChanged {
                current: health.current,
                max: health.max,
            });
        }

        for event in &events {
            self.scoreboard.record(event);
            match event {
                GameEvent::EnemyDestroyed { .. } => self.counters.add("enemies_destroyed", 1),
                GameEvent::EnemyConsumed { .. } => self.counters.add("enemies_consumed", 1),
                GameEvent::BulletRecycled { .. } => self.counters.add("bullets_recycled", 1),
                GameEvent::FoodConsumed { .. } => self.counters.add("food_consumed", 1),
                _ => {}
            }
        }

        Ok(self.report(events))
    }

    fn apply_input(&mut self, input: TickInput) -> SimResult<()> {
        let heading = input.heading();
        if heading != Vec3::ZERO {
            self.facing = heading;
        }
        let player = self.player_entity()?;
        self.world.get_mut::<Movement>(player)?.direction = heading;

        if let Some(direction) = input.fire {
            match self.fire(direction) {
                Ok(_) | Err(SimError::PoolExhausted { .. }) => {}
                Err(err) => return Err(err),
            }
        }
        self.pending_taps.extend(input.taps);
        Ok(())
    }

    /// Run one stage. Returns whether the player's health ran out during it.
    fn run_stage(&mut self, stage: Stage, dt: f32, events: &mut Vec<GameEvent>) -> SimResult<bool> {
        let mut player_depleted = false;
        match stage {
            Stage::Steering => {
                let player = self.player_position()?;
                let params = steering::SteeringParams {
                    separation_radius: self.config.separation_radius,
                    separation_force: self.config.separation_force,
                };
                steering::run(&mut self.world, &mut self.grid, player, params);
            }
            Stage::Movement => {
                movement::run(&mut self.world, dt);
            }
            Stage::SpatialQuery => {
                let taps = std::mem::take(&mut self.pending_taps);
                spatial_query::run(&mut self.world, &taps, self.config.grow_step)?;
            }
            Stage::Collision => {
                let pool = self.pool.as_mut().ok_or(SimError::InvalidTransition {
                    from: self.state,
                    action: "resolve collisions",
                })?;
                let outcome = collision::run(&mut self.world, pool, &mut self.grid, &mut self.commands)?;
                player_depleted = outcome.player_depleted;
                events.extend(outcome.events);
            }
            Stage::Health => {
                let player = self.player_entity()?;
                player_depleted = health::run(&mut self.world, dt).contains(&player);
            }
            Stage::PoolUpkeep => {
                if let Some(pool) = self.pool.as_mut() {
                    let recycled = pool_upkeep::run(
                        &mut self.world,
                        pool,
                        self.config.bullet_lifetime,
                        self.config.arena_radius,
                        dt,
                    )?;
                    events.extend(recycled.into_iter().map(|entity| GameEvent::BulletRecycled { entity }));
                }
            }
        }
        Ok(player_depleted)
    }

    fn report(&self, events: Vec<GameEvent>) -> TickReport {
        TickReport {
            tick: self.time.tick_count(),
            state: self.state,
            events,
        }
    }

    fn player_entity(&self) -> SimResult<Entity> {
        self.player.ok_or(SimError::InvalidTransition {
            from: self.state,
            action: "use the player",
        })
    }

    fn player_position(&self) -> SimResult<Vec3> {
        Ok(self.world.get::<Translation>(self.player_entity()?)?.position)
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// The player, once the session has started.
    pub fn player(&self) -> Option<Entity> {
        self.player
    }

    pub fn pool(&self) -> Option<&BulletPool> {
        self.pool.as_ref()
    }

    pub fn score(&self) -> Scoreboard {
        self.scoreboard
    }

    pub fn hud(&self) -> Option<Hud> {
        let health = self.world.get::<Health>(self.player?).ok()?;
        Some(Hud {
            current: health.current,
            max: health.max,
            score: self.scoreboard.score,
        })
    }

    pub fn time(&self) -> &SimulationTime {
        &self.time
    }

    pub fn schedule(&self) -> &SystemRegistry {
        &self.schedule
    }

    /// Live entities of one kind.
    pub fn count(&self, kind: EntityKind) -> usize {
        self.world.count(&kind.query())
    }

    pub fn render_snapshot(&self) -> Vec<RenderInstance> {
        render_snapshot(&self.world)
    }

    pub fn profiler(&self) -> &SystemProfiler {
        &self.profiler
    }

    pub fn counters(&self) -> &Counters {
        &self.counters
    }
}
