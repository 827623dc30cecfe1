//! The machine side of the interpreter: the notifications it can receive and
//! two drivers for them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{self, Write};

use crate::state::{Axis, Position};

/// A single notification sent to the machine, in dispatch order.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum MachineCommand {
    Home,
    MoveTo { target: Position },
    MoveAxis { axis: Axis, value: f64 },
    SetFeedRate { value: f64 },
    SetSpindleSpeed { rpm: i64 },
    StopSpindle,
    ChangeTool { tool: String },
    CoolantOn,
    CoolantOff,
    AbsoluteMode,
    IncrementalMode,
    RapidMode,
    InterpolationMode,
    WorkOffset { label: String, datum: Position },
    PlaneSelection { plane: String },
    MetricMode,
    CancelCannedCycle,
    CancelToolLength,
    CancelCutterCompensation,
    CommandInterpretation,
    ProgramQuit,
}

impl fmt::Display for MachineCommand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Home => write!(f, "Moving to home."),
            Self::MoveTo { target } => write!(
                f,
                "Moving to X={:.3} Y={:.3} Z={:.3} [mm].",
                target.x, target.y, target.z
            ),
            Self::MoveAxis { axis, value } => write!(f, "Moving {} to {:.3} [mm].", axis.label(), value),
            Self::SetFeedRate { value } => write!(f, "Using feed rate {:?} [mm/s].", value),
            Self::SetSpindleSpeed { rpm } => write!(f, "Using spindle speed {} [mm/s].", rpm),
            Self::StopSpindle => write!(f, "Spindle stopped from turning."),
            Self::ChangeTool { tool } => write!(f, "Changing tool '{}'.", tool),
            Self::CoolantOn => write!(f, "Coolant turned on."),
            Self::CoolantOff => write!(f, "Coolant turned off."),
            Self::AbsoluteMode => write!(f, "Absolute positioning turned on."),
            Self::IncrementalMode => write!(f, "Incremental positioning turned on."),
            Self::RapidMode => write!(f, "Rapid positioning turned on."),
            Self::InterpolationMode => write!(f, "Linear interpolation turned on."),
            Self::WorkOffset { label, datum } => write!(
                f,
                "Changing work offset to '{}' having fixed point at X = {}, Y = {}, Z = {}.",
                label, datum.x, datum.y, datum.z
            ),
            Self::PlaneSelection { plane } => write!(f, "{} plane selected as rotational axis.", plane),
            Self::MetricMode => write!(f, "Machine has been switched into metric mode."),
            Self::CancelCannedCycle => write!(f, "Canned cycle has been cancelled."),
            Self::CancelToolLength => write!(f, "Tool length compensation has been cancelled."),
            Self::CancelCutterCompensation => write!(f, "Cutter compensation has been turned off."),
            Self::CommandInterpretation => {
                write!(f, "Interpretation of commands are now as mm/minute for linear moves.")
            }
            Self::ProgramQuit => write!(f, "Program quitting..."),
        }
    }
}

/// Receiver for interpreter output. Drivers implement `dispatch`; the
/// interpreter only uses the named operations.
pub trait Machine {
    fn dispatch(&mut self, command: MachineCommand);

    fn home(&mut self) {
        self.dispatch(MachineCommand::Home);
    }

    fn move_to(&mut self, target: Position) {
        self.dispatch(MachineCommand::MoveTo { target });
    }

    fn move_axis(&mut self, axis: Axis, value: f64) {
        self.dispatch(MachineCommand::MoveAxis { axis, value });
    }

    fn set_feed_rate(&mut self, value: f64) {
        self.dispatch(MachineCommand::SetFeedRate { value });
    }

    fn set_spindle_speed(&mut self, rpm: i64) {
        self.dispatch(MachineCommand::SetSpindleSpeed { rpm });
    }

    fn stop_spindle(&mut self) {
        self.dispatch(MachineCommand::StopSpindle);
    }

    fn change_tool(&mut self, tool: &str) {
        self.dispatch(MachineCommand::ChangeTool { tool: tool.to_string() });
    }

    fn coolant_on(&mut self) {
        self.dispatch(MachineCommand::CoolantOn);
    }

    fn coolant_off(&mut self) {
        self.dispatch(MachineCommand::CoolantOff);
    }

    fn absolute_mode(&mut self) {
        self.dispatch(MachineCommand::AbsoluteMode);
    }

    fn incremental_mode(&mut self) {
        self.dispatch(MachineCommand::IncrementalMode);
    }

    fn rapid_mode(&mut self) {
        self.dispatch(MachineCommand::RapidMode);
    }

    fn interpolation_mode(&mut self) {
        self.dispatch(MachineCommand::InterpolationMode);
    }

    fn work_offset(&mut self, label: &str, datum: Position) {
        self.dispatch(MachineCommand::WorkOffset { label: label.to_string(), datum });
    }

    fn plane_selection(&mut self, plane: &str) {
        self.dispatch(MachineCommand::PlaneSelection { plane: plane.to_string() });
    }

    fn metric_mode(&mut self) {
        self.dispatch(MachineCommand::MetricMode);
    }

    fn cancel_canned_cycle(&mut self) {
        self.dispatch(MachineCommand::CancelCannedCycle);
    }

    fn cancel_tool_length(&mut self) {
        self.dispatch(MachineCommand::CancelToolLength);
    }

    fn cancel_cutter_compensation(&mut self) {
        self.dispatch(MachineCommand::CancelCutterCompensation);
    }

    fn command_interpretation(&mut self) {
        self.dispatch(MachineCommand::CommandInterpretation);
    }

    fn program_quit(&mut self) {
        self.dispatch(MachineCommand::ProgramQuit);
    }
}

impl<M: Machine + ?Sized> Machine for &mut M {
    fn dispatch(&mut self, command: MachineCommand) {
        (**self).dispatch(command);
    }
}

// ── Drivers ──────────────────────────────────────────────────────────────

/// Keeps every command in order. Used by tests and the browser binding.
#[derive(Debug, Default, Clone)]
pub struct RecordingMachine {
    commands: Vec<MachineCommand>,
}

impl RecordingMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[MachineCommand] {
        &self.commands
    }

    pub fn take_commands(&mut self) -> Vec<MachineCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn into_commands(self) -> Vec<MachineCommand> {
        self.commands
    }
}

impl Machine for RecordingMachine {
    fn dispatch(&mut self, command: MachineCommand) {
        self.commands.push(command);
    }
}

/// Writes one human-readable line per command. The first write failure is
/// kept and reported by `into_inner`; later commands are dropped.
pub struct ConsoleMachine<W: Write> {
    writer: W,
    error: Option<io::Error>,
}

impl<W: Write> ConsoleMachine<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, error: None }
    }

    pub fn into_inner(mut self) -> io::Result<W> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<W: Write> Machine for ConsoleMachine<W> {
    fn dispatch(&mut self, command: MachineCommand) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = writeln!(self.writer, "{command}") {
            self.error = Some(err);
        }
    }
}
