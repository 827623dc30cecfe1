use serde::Serialize;
use std::io::BufRead;

use crate::codes::{GCode, MCode};
use crate::config::InterpreterConfig;
use crate::error::GcodeError;
use crate::machine::Machine;
use crate::parser::{self, InstructionLine, SourceLine, Word};
use crate::state::{Axis, MachineState, MotionMode, Position, PositioningMode, ProgramPhase};

/// What the caller should do after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub lines_read: usize,
    pub instructions_executed: usize,
    pub program_number: Option<String>,
    pub stopped: bool,
}

/// Executes a program one line at a time against a [`Machine`].
pub struct Interpreter<M: Machine> {
    machine: M,
    config: InterpreterConfig,
    state: MachineState,
    line: usize,
    instructions: usize,
    program_number: Option<String>,
    halted: bool,
}

impl<M: Machine> Interpreter<M> {
    pub fn new(machine: M, config: InterpreterConfig) -> Self {
        Self {
            machine,
            config,
            state: MachineState::new(),
            line: 0,
            instructions: 0,
            program_number: None,
            halted: false,
        }
    }

    pub fn state(&self) -> &MachineState {
        &self.state
    }

    pub fn machine(&self) -> &M {
        &self.machine
    }

    pub fn machine_mut(&mut self) -> &mut M {
        &mut self.machine
    }

    pub fn into_machine(self) -> M {
        self.machine
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            lines_read: self.line,
            instructions_executed: self.instructions,
            program_number: self.program_number.clone(),
            stopped: self.halted,
        }
    }

    // ── Program control ────────────────────────────────────────────────────

    /// Run every line until the source ends or the program stops itself.
    pub fn run<I, S>(&mut self, lines: I) -> Result<RunSummary, GcodeError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            if self.feed_line(line.as_ref())? == Flow::Stop {
                break;
            }
        }
        self.finish()
    }

    pub fn run_reader<R: BufRead>(&mut self, reader: R) -> Result<RunSummary, GcodeError> {
        for line in reader.lines() {
            if self.feed_line(&line?)? == Flow::Stop {
                break;
            }
        }
        self.finish()
    }

    /// Close out the run. A source that never produced the `%` header fails
    /// here, even when it had no lines at all.
    pub fn finish(&self) -> Result<RunSummary, GcodeError> {
        if self.state.program_phase == ProgramPhase::AwaitingHeader {
            return Err(GcodeError::HeaderMissing {
                line: self.line,
                found: "end of input".to_string(),
            });
        }
        Ok(self.summary())
    }

    /// Interpret one raw source line. Once the program has stopped every
    /// further line is ignored.
    pub fn feed_line(&mut self, raw: &str) -> Result<Flow, GcodeError> {
        if self.halted {
            return Ok(Flow::Stop);
        }
        self.line += 1;
        let line = self.line;

        match (self.state.program_phase, parser::classify(raw)) {
            (_, SourceLine::Blank) => Ok(Flow::Continue),
            (ProgramPhase::AwaitingHeader, SourceLine::Header) => {
                self.state.program_phase = ProgramPhase::AwaitingProgramNumber;
                Ok(Flow::Continue)
            }
            (ProgramPhase::AwaitingHeader, _) => Err(GcodeError::HeaderMissing {
                line,
                found: raw.trim().to_string(),
            }),
            (_, SourceLine::Comment) => Ok(Flow::Continue),
            (ProgramPhase::AwaitingProgramNumber, SourceLine::ProgramNumber(number)) => {
                console_log!("Program {}", number);
                self.program_number = Some(number.to_string());
                self.state.program_phase = ProgramPhase::Executing;
                Ok(Flow::Continue)
            }
            (ProgramPhase::AwaitingProgramNumber, _) => {
                self.state.program_phase = ProgramPhase::Executing;
                self.execute_source(line, raw)
            }
            (ProgramPhase::Executing, _) => self.execute_source(line, raw),
        }
    }

    fn execute_source(&mut self, line: usize, raw: &str) -> Result<Flow, GcodeError> {
        let instruction = parser::parse_instruction(line, raw)?;
        console_log!("Line N{}", instruction.number);
        self.instructions += 1;
        Ok(self.execute(&instruction))
    }

    /// Apply one parsed line. Words arrive in parser order, so axis values are
    /// staged before any motion code reads them.
    pub fn execute(&mut self, instruction: &InstructionLine) -> Flow {
        self.state.begin_line();

        for word in &instruction.words {
            match word {
                Word::Axis(axis, value) => self.state.stage_axis(*axis, *value),
                Word::FeedRate(value) => {
                    self.state.feed_rate = *value;
                    self.machine.set_feed_rate(*value);
                }
                Word::SpindleSpeed(rpm) => self.state.spindle_speed = *rpm,
                Word::Tool(name) => self.state.tool_name = name.clone(),
                Word::G(code) => self.run_g(*code),
                Word::M(code) => {
                    if self.run_m(*code) == Flow::Stop {
                        self.halted = true;
                        return Flow::Stop;
                    }
                }
            }
        }
        Flow::Continue
    }

    // ── G codes ────────────────────────────────────────────────────────────

    fn run_g(&mut self, code: GCode) {
        match code {
            GCode::Rapid => self.rapid_move(),
            GCode::Linear => self.linear_move(),
            GCode::PlaneXy => self.machine.plane_selection("XY"),
            GCode::Metric => self.machine.metric_mode(),
            GCode::Home => {
                self.state.current_position = Position::HOME;
                self.machine.home();
            }
            GCode::CutterCompensationOff => self.machine.cancel_cutter_compensation(),
            GCode::ToolLengthCancel => self.machine.cancel_tool_length(),
            GCode::WorkOffset => {
                let datum = self.config.work_offset_datum;
                self.state.apply_work_offset(datum);
                self.machine.work_offset(&self.config.work_offset_label, datum);
            }
            GCode::CannedCycleCancel => self.machine.cancel_canned_cycle(),
            GCode::Absolute => {
                self.state.positioning_mode = Some(PositioningMode::Absolute);
                self.machine.absolute_mode();
            }
            GCode::Incremental => {
                self.state.positioning_mode = Some(PositioningMode::Incremental);
                self.machine.incremental_mode();
            }
            GCode::FeedPerMinute => self.machine.command_interpretation(),
        }
    }

    fn rapid_move(&mut self) {
        if self.state.motion_mode != MotionMode::Rapid {
            self.state.motion_mode = MotionMode::Rapid;
            self.machine.rapid_mode();
        }
        if !self.compose() {
            self.state.clear_touched();
            return;
        }

        // Per-axis notifications, X before Y before Z. At most two fire: a
        // line touching all three axes reports X and Y only.
        let pos = self.state.current_position;
        let x = self.state.is_touched(Axis::X);
        let y = self.state.is_touched(Axis::Y);
        let z = self.state.is_touched(Axis::Z);
        if x {
            self.machine.move_axis(Axis::X, pos.x);
            if y {
                self.machine.move_axis(Axis::Y, pos.y);
            } else if z {
                self.machine.move_axis(Axis::Z, pos.z);
            }
        } else if y {
            self.machine.move_axis(Axis::Y, pos.y);
            if z {
                self.machine.move_axis(Axis::Z, pos.z);
            }
        } else if z {
            self.machine.move_axis(Axis::Z, pos.z);
        }

        self.state.clear_touched();
    }

    fn linear_move(&mut self) {
        if self.state.motion_mode != MotionMode::Interpolation {
            self.state.motion_mode = MotionMode::Interpolation;
            self.machine.interpolation_mode();
        }
        if self.compose() {
            self.machine.move_to(self.state.current_position);
        }
    }

    /// Returns false when no positioning mode is selected; the motion is then
    /// dropped and no move is sent.
    fn compose(&mut self) -> bool {
        if self.state.compose_touched() {
            return true;
        }
        if self.state.any_touched() {
            console_warn!(
                "line {}: motion ignored, no positioning mode (G90/G91) selected",
                self.line
            );
        }
        false
    }

    // ── M codes ────────────────────────────────────────────────────────────

    fn run_m(&mut self, code: MCode) -> Flow {
        match code {
            MCode::SpindleOn => {
                self.machine.set_spindle_speed(self.state.spindle_speed);
                self.machine.coolant_on();
            }
            MCode::SpindleStop => self.machine.stop_spindle(),
            MCode::ToolChange => self.machine.change_tool(&self.state.tool_name),
            MCode::CoolantOff => self.machine.coolant_off(),
            MCode::ProgramEnd => {
                self.machine.coolant_off();
                self.machine.stop_spindle();
                self.state.current_position = Position::HOME;
                self.machine.home();
                self.machine.program_quit();
                console_log!("Program stopped at line {}", self.line);
                return Flow::Stop;
            }
        }
        Flow::Continue
    }
}
