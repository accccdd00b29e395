//! Movement, pickup and level progression rules for the active session.

use motion_maze_core::{
    CellCoord, Direction, Event, GameStateKind, MazeDimensions, PickupRoute, StatusEffect,
};

use crate::{
    entities::{DelegatedEffect, Obstacle, PowerUp},
    maze::Maze,
    player::EffectOutcome,
    World,
};

/// Score deducted for running into an obstacle.
const COLLISION_PENALTY: i64 = 50;
/// Score awarded for finishing a level.
const LEVEL_BONUS: i64 = 100;

impl World {
    /// Resolves a movement attempt while playing.
    pub(crate) fn resolve_movement(
        &mut self,
        direction: Direction,
        out_events: &mut Vec<Event>,
    ) -> Option<GameStateKind> {
        let from = self.player.cell();
        let target = from.offset(direction, 1, self.maze.dimensions())?;
        if self.config.respect_walls && !self.maze.is_passage(from, direction) {
            return None;
        }

        let destination = match self.player.planned_steps(&mut self.rng) {
            0 => from,
            1 => target,
            _ => self.hastened_landing(target, direction),
        };
        self.relocate(destination, out_events);

        let cell = self.player.cell();
        if self.maze.is_finish(cell) {
            return Some(GameStateKind::Completed);
        }
        if let Some(obstacle) = self.maze.take_obstacle_at(cell) {
            self.resolve_obstacle(obstacle, COLLISION_PENALTY, out_events);
        }
        if let Some(power_up) = self.maze.take_power_up_at(cell) {
            self.collect_power_up(power_up, PickupRoute::Movement, out_events);
        }
        self.player.is_defeated().then_some(GameStateKind::GameOver)
    }

    /// Places the player directly on `cell`, ignoring status effects.
    pub(crate) fn resolve_teleport(
        &mut self,
        cell: CellCoord,
        out_events: &mut Vec<Event>,
    ) -> Option<GameStateKind> {
        if !self.maze.contains(cell) {
            return None;
        }

        self.relocate(cell, out_events);
        if let Some(power_up) = self.maze.take_power_up_at(cell) {
            self.collect_power_up(power_up, PickupRoute::Teleport, out_events);
        }
        self.maze
            .is_finish(cell)
            .then_some(GameStateKind::Completed)
    }

    /// Applies every obstacle left on the player's cell without a score penalty.
    pub(crate) fn sweep_lingering_obstacles(
        &mut self,
        out_events: &mut Vec<Event>,
    ) -> Option<GameStateKind> {
        let cell = self.player.cell();
        while let Some(obstacle) = self.maze.take_obstacle_at(cell) {
            self.resolve_obstacle(obstacle, 0, out_events);
        }
        self.player.is_defeated().then_some(GameStateKind::GameOver)
    }

    /// Starts over from level one with a zero score on a base-size maze.
    pub(crate) fn restart(&mut self, out_events: &mut Vec<Event>) {
        let dimensions = self.config.base_dimensions;
        self.replace_maze(dimensions, 1);
        self.player.reset_score();
        out_events.push(Event::GameStarted { dimensions });
    }

    /// Moves on to the next level on a maze that grows with the level.
    pub(crate) fn advance_level(&mut self, out_events: &mut Vec<Event>) {
        let level = self.maze.level().saturating_add(1);
        let base = self.config.base_dimensions;
        let dimensions = MazeDimensions::new(
            base.columns().saturating_add(level),
            base.rows().saturating_add(level),
        );
        self.player.add_score(LEVEL_BONUS);
        self.replace_maze(dimensions, level);
        out_events.push(Event::LevelStarted { level, dimensions });
    }

    /// Inserts a power-up, ignoring cells outside the maze.
    pub(crate) fn spawn_power_up(&mut self, power_up: PowerUp, out_events: &mut Vec<Event>) {
        if !self.maze.contains(power_up.cell()) {
            return;
        }
        self.maze.add_power_up(power_up);
        out_events.push(Event::PowerUpSpawned {
            cell: power_up.cell(),
            kind: power_up.kind(),
        });
    }

    /// Inserts an obstacle, ignoring cells outside the maze.
    pub(crate) fn spawn_obstacle(&mut self, obstacle: Obstacle, out_events: &mut Vec<Event>) {
        if !self.maze.contains(obstacle.cell()) {
            return;
        }
        self.maze.add_obstacle(obstacle);
        out_events.push(Event::ObstacleSpawned {
            cell: obstacle.cell(),
            kind: obstacle.kind(),
        });
    }

    fn replace_maze(&mut self, dimensions: MazeDimensions, level: u32) {
        self.maze = Maze::generate_unchecked(dimensions, level, &mut self.rng);
        self.player.move_to(self.maze.start());
        self.player.reset();
    }

    fn hastened_landing(&self, target: CellCoord, direction: Direction) -> CellCoord {
        let Some(beyond) = target.offset(direction, 1, self.maze.dimensions()) else {
            return target;
        };
        if self.config.respect_walls && !self.maze.is_passage(target, direction) {
            return target;
        }
        beyond
    }

    fn relocate(&mut self, to: CellCoord, out_events: &mut Vec<Event>) {
        let from = self.player.cell();
        if from == to {
            return;
        }
        self.player.move_to(to);
        out_events.push(Event::PlayerMoved { from, to });
    }

    fn resolve_obstacle(&mut self, obstacle: Obstacle, penalty: i64, out_events: &mut Vec<Event>) {
        let outcome = obstacle.apply(&mut self.player);
        self.player.add_score(-penalty);
        out_events.push(Event::ObstacleHit {
            cell: obstacle.cell(),
            kind: obstacle.kind(),
            damage: outcome.damage,
        });
        if outcome.shield_consumed {
            out_events.push(Event::ShieldConsumed);
        }
        if let Some(effect) = outcome.delegated {
            self.apply_delegated(effect, out_events);
        }
    }

    fn collect_power_up(
        &mut self,
        power_up: PowerUp,
        route: PickupRoute,
        out_events: &mut Vec<Event>,
    ) {
        let delegated = power_up.apply(&mut self.player);
        self.player.add_score(route.score_award());
        out_events.push(Event::PowerUpCollected {
            cell: power_up.cell(),
            kind: power_up.kind(),
            route,
        });
        if let Some(effect) = delegated {
            self.apply_delegated(effect, out_events);
        }
    }

    fn apply_delegated(&mut self, effect: DelegatedEffect, out_events: &mut Vec<Event>) {
        let now = self.clock;
        let durations = self.config.durations;
        let event = match effect {
            DelegatedEffect::Haste => Event::StatusApplied {
                effect: StatusEffect::Hastened,
                expires_at: self.player.haste(durations.haste, now),
            },
            DelegatedEffect::Shield => Event::StatusApplied {
                effect: StatusEffect::Shielded,
                expires_at: self.player.add_shield(durations.shield, now),
            },
            DelegatedEffect::Slow => match self.player.slow(durations.slow, now) {
                EffectOutcome::Applied { expires_at } => Event::StatusApplied {
                    effect: StatusEffect::Slowed,
                    expires_at,
                },
                EffectOutcome::Absorbed => Event::ShieldConsumed,
            },
        };
        out_events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use motion_maze_core::{ObstacleKind, PowerUpKind};

    use super::*;
    use crate::{state::GameState, WorldConfig};

    /// Playing world on an open, entity-free maze with the player at `cell`.
    fn world_at(columns: u32, rows: u32, cell: CellCoord) -> World {
        let config = WorldConfig::new(17).with_base_dimensions(MazeDimensions::new(columns, rows));
        let mut world = World::new(config).expect("world");
        world.maze = Maze::walled(MazeDimensions::new(columns, rows), 1);
        world.player.move_to(cell);
        world.state = GameState::entering(GameStateKind::Playing);
        world
    }

    #[test]
    fn hastened_move_skips_intermediate_cell() {
        let mut world = world_at(5, 5, CellCoord::new(1, 1));
        let _ = world.player.haste(Duration::from_secs(5), Duration::ZERO);
        world
            .maze
            .add_power_up(PowerUp::new(CellCoord::new(2, 1), PowerUpKind::Key));

        let mut events = Vec::new();
        assert_eq!(world.resolve_movement(Direction::Right, &mut events), None);

        assert_eq!(world.player.cell(), CellCoord::new(3, 1));
        assert!(world.maze.power_up_at(CellCoord::new(2, 1)).is_some());
        assert!(!world.player.has_key());
        assert_eq!(
            events,
            vec![Event::PlayerMoved {
                from: CellCoord::new(1, 1),
                to: CellCoord::new(3, 1)
            }]
        );
    }

    #[test]
    fn hastened_move_at_edge_lands_on_single_step() {
        let mut world = world_at(5, 5, CellCoord::new(3, 0));
        let _ = world.player.haste(Duration::from_secs(5), Duration::ZERO);

        let mut events = Vec::new();
        let _ = world.resolve_movement(Direction::Right, &mut events);
        assert_eq!(world.player.cell(), CellCoord::new(4, 0));
    }

    #[test]
    fn trapped_player_still_resolves_current_cell() {
        let mut world = world_at(4, 4, CellCoord::new(1, 1));
        let _ = world.player.trap(Duration::from_secs(3), Duration::ZERO);
        world
            .maze
            .add_obstacle(Obstacle::new(CellCoord::new(1, 1), ObstacleKind::Fire));

        let mut events = Vec::new();
        assert_eq!(world.resolve_movement(Direction::Down, &mut events), None);

        assert_eq!(world.player.cell(), CellCoord::new(1, 1));
        assert_eq!(world.player.health(), 85);
        assert_eq!(world.player.score(), -50);
    }

    #[test]
    fn finish_check_precedes_death_check() {
        let mut world = world_at(3, 3, CellCoord::new(1, 2));
        let _ = world.player.apply_damage(95);
        world
            .maze
            .add_obstacle(Obstacle::new(CellCoord::new(2, 2), ObstacleKind::Pit));

        let mut events = Vec::new();
        assert_eq!(
            world.resolve_movement(Direction::Right, &mut events),
            Some(GameStateKind::Completed)
        );
        assert_eq!(world.player.health(), 5);
        assert!(world.maze.obstacle_at(CellCoord::new(2, 2)).is_some());
    }

    #[test]
    fn obstacle_then_power_up_on_same_cell() {
        let mut world = world_at(4, 4, CellCoord::new(0, 1));
        let cell = CellCoord::new(1, 1);
        world
            .maze
            .add_obstacle(Obstacle::new(cell, ObstacleKind::Enemy));
        world.maze.add_power_up(PowerUp::new(cell, PowerUpKind::Health));

        let mut events = Vec::new();
        assert_eq!(world.resolve_movement(Direction::Right, &mut events), None);

        assert_eq!(world.player.health(), 100);
        assert_eq!(world.player.score(), -25);
        assert!(!world.maze.is_occupied(cell));
        assert_eq!(
            events,
            vec![
                Event::PlayerMoved {
                    from: CellCoord::new(0, 1),
                    to: cell
                },
                Event::ObstacleHit {
                    cell,
                    kind: ObstacleKind::Enemy,
                    damage: 20
                },
                Event::PowerUpCollected {
                    cell,
                    kind: PowerUpKind::Health,
                    route: PickupRoute::Movement
                },
            ]
        );
    }

    #[test]
    fn lethal_obstacle_ends_the_game() {
        let mut world = world_at(4, 4, CellCoord::new(0, 1));
        let _ = world.player.apply_damage(80);
        world
            .maze
            .add_obstacle(Obstacle::new(CellCoord::new(1, 1), ObstacleKind::Pit));

        let mut events = Vec::new();
        assert_eq!(
            world.resolve_movement(Direction::Right, &mut events),
            Some(GameStateKind::GameOver)
        );
        assert_eq!(world.player.health(), 0);
    }

    #[test]
    fn shield_absorbs_ice() {
        let mut world = world_at(4, 4, CellCoord::new(0, 1));
        let _ = world.player.add_shield(Duration::from_secs(5), Duration::ZERO);
        world
            .maze
            .add_obstacle(Obstacle::new(CellCoord::new(1, 1), ObstacleKind::Ice));

        let mut events = Vec::new();
        let _ = world.resolve_movement(Direction::Right, &mut events);

        assert!(events.contains(&Event::ShieldConsumed));
        assert_eq!(world.player.status(), motion_maze_core::StatusFlags::default());
    }

    #[test]
    fn walls_block_movement_when_respected() {
        let origin = CellCoord::new(0, 0);
        let mut world = world_at(3, 3, origin);
        world.config.respect_walls = true;
        world.maze = Maze::generate_unchecked(MazeDimensions::new(3, 3), 1, &mut world.rng);
        for cell in world.maze.dimensions().cells() {
            while world.maze.take_power_up_at(cell).is_some() {}
            while world.maze.take_obstacle_at(cell).is_some() {}
        }

        for direction in [Direction::Right, Direction::Down] {
            world.player.move_to(origin);
            let mut events = Vec::new();
            let _ = world.resolve_movement(direction, &mut events);

            let expected = if world.maze.is_passage(origin, direction) {
                origin.offset(direction, 1, world.maze.dimensions()).expect("in bounds")
            } else {
                origin
            };
            assert_eq!(world.player.cell(), expected);
        }
    }

    #[test]
    fn teleport_collects_power_up_with_reduced_award() {
        let mut world = world_at(4, 4, CellCoord::new(0, 0));
        let cell = CellCoord::new(2, 3);
        world.maze.add_power_up(PowerUp::new(cell, PowerUpKind::Speed));

        let mut events = Vec::new();
        assert_eq!(world.resolve_teleport(cell, &mut events), None);

        assert_eq!(world.player.cell(), cell);
        assert_eq!(world.player.score(), 10);
        assert_eq!(
            world.player.status().hastened,
            Some(Duration::from_secs(5))
        );
    }

    #[test]
    fn teleport_outside_maze_is_ignored() {
        let mut world = world_at(4, 4, CellCoord::new(1, 1));
        let mut events = Vec::new();
        assert_eq!(world.resolve_teleport(CellCoord::new(4, 0), &mut events), None);
        assert_eq!(world.player.cell(), CellCoord::new(1, 1));
        assert!(events.is_empty());
    }
}
