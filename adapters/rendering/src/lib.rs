#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Motion Maze adapters.
//!
//! Rendering is a pure projection of a [`GameSnapshot`]: a text [`Frame`]
//! showing walls and occupants, and a [`StatusReport`] summarising the
//! player for periodic telemetry. Backends decide where the output goes.

use std::{
    fmt,
    io::{self, Write},
};

use anyhow::{Context, Result as AnyResult};
use motion_maze_core::{
    CellCoord, CellWalls, GameSnapshot, GameStateKind, MazeSnapshot, ObstacleKind, PowerUpKind,
    StatusEffect,
};
use serde::Serialize;

const CORNER: char = '+';
const HORIZONTAL_WALL: &str = "---";
const VERTICAL_WALL: char = '|';
const OPEN_HORIZONTAL: &str = "   ";
const OPEN_VERTICAL: char = ' ';

/// Glyph drawn for the player.
pub const PLAYER_GLYPH: char = '@';
/// Glyph drawn for the finish cell.
pub const FINISH_GLYPH: char = '#';
/// Glyph drawn for an empty cell.
pub const EMPTY_GLYPH: char = ' ';

/// Glyph drawn for a power-up of the provided kind.
#[must_use]
pub const fn power_up_glyph(kind: PowerUpKind) -> char {
    match kind {
        PowerUpKind::Health => '+',
        PowerUpKind::Speed => '>',
        PowerUpKind::Key => 'k',
        PowerUpKind::ScoreBoost => '$',
        PowerUpKind::Invincibility => '*',
    }
}

/// Glyph drawn for an obstacle of the provided kind.
#[must_use]
pub const fn obstacle_glyph(kind: ObstacleKind) -> char {
    match kind {
        ObstacleKind::Trap => 'x',
        ObstacleKind::Enemy => 'E',
        ObstacleKind::Pit => 'O',
        ObstacleKind::Fire => '^',
        ObstacleKind::Ice => '~',
    }
}

/// Text rendition of a maze, one string per output line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    header: String,
    lines: Vec<String>,
}

impl Frame {
    /// Builds the frame for the provided snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: &GameSnapshot) -> Self {
        let header = format!(
            "level {} | {} | hp {} | score {}{}",
            snapshot.level,
            state_label(snapshot.state),
            snapshot.player.health,
            snapshot.player.score,
            if snapshot.player.has_key { " | key" } else { "" },
        );
        Self {
            header,
            lines: maze_lines(&snapshot.maze, snapshot.player.cell),
        }
    }

    /// Summary line printed above the maze.
    #[must_use]
    pub fn header(&self) -> &str {
        &self.header
    }

    /// Maze lines, top border first.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.header)?;
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

fn maze_lines(maze: &MazeSnapshot, player: CellCoord) -> Vec<String> {
    let columns = maze.dimensions.columns();
    let rows = maze.dimensions.rows();
    let walls = |column: u32, row: u32| {
        maze
            .walls_at(CellCoord::new(column, row))
            .unwrap_or(CellWalls::CLOSED)
    };

    let mut lines = Vec::with_capacity(rows as usize * 2 + 1);
    for row in 0..rows {
        let mut border = String::new();
        let mut body = String::new();
        for column in 0..columns {
            let cell = walls(column, row);
            border.push(CORNER);
            border.push_str(if cell.top {
                HORIZONTAL_WALL
            } else {
                OPEN_HORIZONTAL
            });

            body.push(if cell.left { VERTICAL_WALL } else { OPEN_VERTICAL });
            body.push(' ');
            body.push(glyph_at(maze, player, CellCoord::new(column, row)));
            body.push(' ');
        }
        border.push(CORNER);
        let east = columns
            .checked_sub(1)
            .map_or(true, |last| walls(last, row).right);
        body.push(if east { VERTICAL_WALL } else { OPEN_VERTICAL });
        lines.push(border);
        lines.push(body);
    }

    let mut bottom = String::new();
    for column in 0..columns {
        let south = rows
            .checked_sub(1)
            .map_or(true, |last| walls(column, last).bottom);
        bottom.push(CORNER);
        bottom.push_str(if south {
            HORIZONTAL_WALL
        } else {
            OPEN_HORIZONTAL
        });
    }
    bottom.push(CORNER);
    lines.push(bottom);
    lines
}

fn glyph_at(maze: &MazeSnapshot, player: CellCoord, cell: CellCoord) -> char {
    if cell == player {
        PLAYER_GLYPH
    } else if let Some(kind) = maze.obstacle_at(cell) {
        obstacle_glyph(kind)
    } else if let Some(kind) = maze.power_up_at(cell) {
        power_up_glyph(kind)
    } else if cell == maze.finish {
        FINISH_GLYPH
    } else {
        EMPTY_GLYPH
    }
}

const fn state_label(state: GameStateKind) -> &'static str {
    match state {
        GameStateKind::Playing => "playing",
        GameStateKind::Paused => "paused",
        GameStateKind::GameOver => "game over",
        GameStateKind::Completed => "level complete",
    }
}

/// Periodic telemetry derived from a snapshot.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StatusReport {
    /// Active game state.
    pub state: GameStateKind,
    /// Current level.
    pub level: u32,
    /// Seconds of simulated time.
    pub clock_secs: f64,
    /// Player position.
    pub position: CellCoord,
    /// Player health.
    pub health: u32,
    /// Player score.
    pub score: i64,
    /// Whether the player holds a key.
    pub has_key: bool,
    /// Effects currently applied to the player.
    pub effects: Vec<StatusEffect>,
    /// Live power-ups in the maze.
    pub power_ups: usize,
    /// Live obstacles in the maze.
    pub obstacles: usize,
    /// Whether motion was seen since the last tick.
    pub motion_detected: bool,
}

impl StatusReport {
    /// Summarises the snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: &GameSnapshot) -> Self {
        Self {
            state: snapshot.state,
            level: snapshot.level,
            clock_secs: snapshot.clock.as_secs_f64(),
            position: snapshot.player.cell,
            health: snapshot.player.health,
            score: snapshot.player.score,
            has_key: snapshot.player.has_key,
            effects: snapshot.player.status.active().collect(),
            power_ups: snapshot.maze.power_ups.len(),
            obstacles: snapshot.maze.obstacles.len(),
            motion_detected: snapshot.motion_detected,
        }
    }
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:>7.1}s] {} level {} at ({}, {}) hp {} score {} key {} power-ups {} obstacles {}",
            self.clock_secs,
            state_label(self.state),
            self.level,
            self.position.column(),
            self.position.row(),
            self.health,
            self.score,
            if self.has_key { "yes" } else { "no" },
            self.power_ups,
            self.obstacles,
        )?;
        if !self.effects.is_empty() {
            write!(f, " effects {:?}", self.effects)?;
        }
        Ok(())
    }
}

/// Destination for rendered frames.
pub trait RenderingBackend {
    /// Presents a frame.
    fn present(&mut self, frame: &Frame) -> AnyResult<()>;
}

/// Backend that writes frames as plain text.
#[derive(Debug)]
pub struct TextBackend<W> {
    writer: W,
}

impl<W: Write> TextBackend<W> {
    /// Wraps the provided writer.
    #[must_use]
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Releases the writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl TextBackend<io::Stdout> {
    /// Backend writing to standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> RenderingBackend for TextBackend<W> {
    fn present(&mut self, frame: &Frame) -> AnyResult<()> {
        write!(self.writer, "{frame}").context("failed to write maze frame")?;
        self.writer.flush().context("failed to flush maze frame")
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use motion_maze_core::{
        MazeDimensions, ObstacleSnapshot, PlayerSnapshot, PowerUpSnapshot, StatusFlags,
    };

    use super::*;

    fn open(top: bool, right: bool, bottom: bool, left: bool) -> CellWalls {
        CellWalls {
            top,
            right,
            bottom,
            left,
        }
    }

    // 2x2 maze with passages (0,0)-(1,0) and (1,0)-(1,1).
    fn snapshot() -> GameSnapshot {
        GameSnapshot {
            state: GameStateKind::Playing,
            level: 1,
            clock: Duration::from_millis(2500),
            motion_detected: false,
            maze: MazeSnapshot {
                dimensions: MazeDimensions::new(2, 2),
                level: 1,
                start: CellCoord::new(0, 0),
                finish: CellCoord::new(1, 1),
                walls: vec![
                    open(true, false, true, true),
                    open(true, true, false, false),
                    open(true, true, true, true),
                    open(false, true, true, true),
                ],
                power_ups: vec![PowerUpSnapshot {
                    cell: CellCoord::new(1, 0),
                    kind: PowerUpKind::Key,
                }],
                obstacles: vec![ObstacleSnapshot {
                    cell: CellCoord::new(0, 1),
                    kind: ObstacleKind::Fire,
                }],
            },
            player: PlayerSnapshot {
                cell: CellCoord::new(0, 0),
                health: 80,
                score: 35,
                has_key: false,
                status: StatusFlags {
                    hastened: Some(Duration::from_secs(7)),
                    ..StatusFlags::default()
                },
            },
        }
    }

    #[test]
    fn frame_draws_walls_and_occupants() {
        let frame = Frame::from_snapshot(&snapshot());

        assert_eq!(
            frame.lines(),
            &[
                "+---+---+".to_owned(),
                "| @   k |".to_owned(),
                "+---+   +".to_owned(),
                "| ^ | # |".to_owned(),
                "+---+---+".to_owned(),
            ]
        );
        assert_eq!(frame.header(), "level 1 | playing | hp 80 | score 35");
    }

    #[test]
    fn text_backend_writes_header_and_maze() {
        let mut backend = TextBackend::new(Vec::new());
        backend
            .present(&Frame::from_snapshot(&snapshot()))
            .expect("present");

        let text = String::from_utf8(backend.into_inner()).expect("utf8");
        assert!(text.starts_with("level 1 | playing"));
        assert_eq!(text.lines().count(), 6);
    }

    #[test]
    fn status_report_lists_active_effects() {
        let report = StatusReport::from_snapshot(&snapshot());

        assert_eq!(report.effects, vec![StatusEffect::Hastened]);
        assert_eq!(report.power_ups, 1);
        assert_eq!(report.obstacles, 1);
        assert!(report.to_string().contains("effects [Hastened]"));

        let json = serde_json::to_value(&report).expect("json");
        assert_eq!(json["state"], "Playing");
        assert_eq!(json["health"], 80);
        assert_eq!(json["clock_secs"], 2.5);
    }
}
