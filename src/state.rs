use serde::{Deserialize, Serialize};
use std::ops::Add;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis { X, Y, Z }

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    pub fn label(self) -> char {
        match self {
            Axis::X => 'X',
            Axis::Y => 'Y',
            Axis::Z => 'Z',
        }
    }
}

/// Spindle location in millimeters.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub const HOME: Position = Position { x: 0.0, y: 0.0, z: 0.0 };

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    pub fn set(&mut self, axis: Axis, value: f64) {
        match axis {
            Axis::X => self.x = value,
            Axis::Y => self.y = value,
            Axis::Z => self.z = value,
        }
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, rhs: Position) -> Position {
        Position::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositioningMode { Absolute, Incremental }

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MotionMode {
    #[default]
    None,
    Rapid,
    Interpolation,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProgramPhase {
    #[default]
    AwaitingHeader,
    AwaitingProgramNumber,
    Executing,
}

/// Modal state of one program run. Created fresh for every run and owned by
/// the interpreter.
#[derive(Serialize, Debug, Clone, PartialEq, Default)]
pub struct MachineState {
    pub current_position: Position,
    // Per-line scratch, cleared by `begin_line`.
    pub pending_axis_values: [Option<f64>; 3],
    pub axis_touched: [bool; 3],
    // None until G90/G91 is seen.
    pub positioning_mode: Option<PositioningMode>,
    pub motion_mode: MotionMode,
    pub work_offset: Position,
    pub feed_rate: f64,
    pub spindle_speed: i64,
    pub tool_name: String,
    pub program_phase: ProgramPhase,
}

impl MachineState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_line(&mut self) {
        self.pending_axis_values = [None; 3];
        self.axis_touched = [false; 3];
    }

    pub fn stage_axis(&mut self, axis: Axis, value: f64) {
        self.pending_axis_values[axis.index()] = Some(value);
        self.axis_touched[axis.index()] = true;
    }

    pub fn is_touched(&self, axis: Axis) -> bool {
        self.axis_touched[axis.index()]
    }

    pub fn any_touched(&self) -> bool {
        self.axis_touched.iter().any(|t| *t)
    }

    pub fn clear_touched(&mut self) {
        self.axis_touched = [false; 3];
    }

    pub fn pending(&self, axis: Axis) -> Option<f64> {
        self.pending_axis_values[axis.index()]
    }

    /// Fold the touched axis values into `current_position` according to the
    /// positioning mode. Returns false, leaving the position alone, while no
    /// positioning mode has been selected.
    pub fn compose_touched(&mut self) -> bool {
        let Some(mode) = self.positioning_mode else {
            return false;
        };
        for axis in Axis::ALL {
            if !self.is_touched(axis) {
                continue;
            }
            let Some(value) = self.pending(axis) else {
                continue;
            };
            let composed = match mode {
                PositioningMode::Absolute => value + self.work_offset.get(axis),
                PositioningMode::Incremental => self.current_position.get(axis) + value,
            };
            self.current_position.set(axis, composed);
        }
        true
    }

    /// Select a work offset. Every selection adds the datum to the current
    /// position, including a repeat of the one already active.
    pub fn apply_work_offset(&mut self, datum: Position) {
        self.work_offset = datum;
        self.current_position = self.current_position + datum;
    }
}
