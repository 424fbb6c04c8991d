use super::color::Hsla;
use super::frame::{CellFill, Frame};
use crate::controls::Command;
use tracing::{debug, info};

/// The direction the wave front travels in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Towards the last column
    Forward,
    /// Towards the first column
    Backward,
}

impl Direction {
    pub fn sign(self) -> f32 {
        match self {
            Self::Forward => 1.0,
            Self::Backward => -1.0,
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
        }
    }
}

/// The constants that drive a wave animation.
#[derive(Clone, Debug, PartialEq)]
pub struct WaveParameters {
    pub columns: usize,
    pub rows: usize,
    /// How many columns behind the front stay lit
    pub trail: usize,
    pub initial_speed: f32,
    pub min_speed: f32,
    pub max_speed: f32,
    /// The factor the speed is multiplied/divided by on fast/slow
    pub speed_factor: f32,
    pub initial_hue: f32,
    /// How much the target hue rotates on every bounce
    pub hue_step: f32,
    /// The fraction of the hue distance covered on every frame
    pub hue_easing: f32,
}

impl Default for WaveParameters {
    fn default() -> Self {
        Self {
            columns: 20,
            rows: 15,
            trail: 6,
            initial_speed: 0.15,
            min_speed: 0.05,
            max_speed: 1.0,
            speed_factor: 1.5,
            initial_hue: 180.0,
            hue_step: 60.0,
            hue_easing: 0.005,
        }
    }
}

/// A read-only view of the animation state, used by the display layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaveSnapshot {
    pub position: f32,
    pub direction: Direction,
    pub speed: f32,
    pub display_hue: f32,
    pub target_hue: f32,
    pub bounces: u64,
}

/// The result of running a single frame.
#[derive(Debug)]
pub struct Tick {
    /// The cells painted for this frame
    pub frame: Frame,
    /// Whether the wave bounced off an edge at the end of this frame
    pub bounced: bool,
}

/// Animates a colored wave sweeping back and forth over a grid.
#[derive(Debug)]
pub struct WaveAnimator {
    parameters: WaveParameters,
    position: f32,
    direction: Direction,
    speed: f32,
    display_hue: f32,
    target_hue: f32,
    bounces: u64,
}

impl WaveAnimator {
    pub fn new(parameters: WaveParameters) -> Self {
        Self {
            position: 0.0,
            direction: Direction::Forward,
            speed: parameters.initial_speed,
            display_hue: parameters.initial_hue,
            target_hue: parameters.initial_hue,
            bounces: 0,
            parameters,
        }
    }

    pub fn snapshot(&self) -> WaveSnapshot {
        WaveSnapshot {
            position: self.position,
            direction: self.direction,
            speed: self.speed,
            display_hue: self.display_hue,
            target_hue: self.target_hue,
            bounces: self.bounces,
        }
    }

    /// Run a full frame: ease the hue, paint, then move the wave front.
    pub fn tick(&mut self) -> Tick {
        self.ease_hue();
        let frame = self.paint();
        let bounced = self.step();
        Tick { frame, bounced }
    }

    /// Run a frame without painting it.
    pub fn advance(&mut self) -> bool {
        self.ease_hue();
        self.step()
    }

    /// Paint the grid for the current state.
    pub fn paint(&self) -> Frame {
        let trail = self.parameters.trail as f32;
        let fills = (0..self.parameters.columns)
            .map(|x| {
                let x = x as f32;
                let distance = match self.direction {
                    Direction::Forward => self.position - x,
                    Direction::Backward => x - self.position,
                };
                if (0.0..trail).contains(&distance) {
                    let brightness = 1.0 - distance / trail;
                    CellFill::Lit(Hsla::new(self.display_hue, 100.0, 50.0, brightness))
                } else {
                    CellFill::Background
                }
            })
            .collect();
        Frame::from_columns(fills, self.parameters.rows)
    }

    /// Restore the initial state.
    pub fn reset(&mut self) {
        self.position = 0.0;
        self.direction = Direction::Forward;
        self.speed = self.parameters.initial_speed;
        self.display_hue = self.parameters.initial_hue;
        self.target_hue = self.parameters.initial_hue;
        self.bounces = 0;
    }

    pub fn faster(&mut self) {
        self.speed = (self.speed * self.parameters.speed_factor).min(self.parameters.max_speed);
    }

    pub fn slower(&mut self) {
        self.speed = (self.speed / self.parameters.speed_factor).max(self.parameters.min_speed);
    }

    /// Apply a control command. Returns `false` if the command is not meant for the animator.
    pub fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::Slow => self.slower(),
            Command::Reset => self.reset(),
            Command::Fast => self.faster(),
            Command::Quit => return false,
        };
        info!(%command, speed = self.speed, "applied control");
        true
    }

    fn ease_hue(&mut self) {
        self.display_hue += (self.target_hue - self.display_hue) * self.parameters.hue_easing;
    }

    fn step(&mut self) -> bool {
        self.position += self.speed * self.direction.sign();

        // Edges only count when travelling towards them so a front that overshot an edge can't
        // bounce back and forth in place.
        let last_column = self.parameters.columns.saturating_sub(1) as f32;
        let hit_edge = match self.direction {
            Direction::Forward => self.position >= last_column,
            Direction::Backward => self.position <= 0.0,
        };
        if !hit_edge {
            return false;
        }
        self.direction = self.direction.reversed();
        self.target_hue = (self.target_hue + self.parameters.hue_step).rem_euclid(360.0);
        self.bounces += 1;
        debug!(
            bounces = self.bounces,
            position = self.position,
            target_hue = self.target_hue,
            "wave bounced"
        );
        true
    }
}
