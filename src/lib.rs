//! Line-by-line G-code interpreter.
//!
//! A program is fed one line at a time into an [`Interpreter`], which keeps
//! the modal [`MachineState`] and dispatches notifications to a [`Machine`].

// --- LOGGING ---
#[cfg(target_arch = "wasm32")]
fn log(s: &str) {
    web_sys::console::log_1(&s.into());
}

#[cfg(target_arch = "wasm32")]
fn warn(s: &str) {
    web_sys::console::warn_1(&s.into());
}

#[cfg(not(target_arch = "wasm32"))]
fn log(s: &str) {
    tracing::info!("{s}");
}

#[cfg(not(target_arch = "wasm32"))]
fn warn(s: &str) {
    tracing::warn!("{s}");
}

macro_rules! console_log {
    ($($t:tt)*) => ($crate::log(&format!($($t)*)))
}

macro_rules! console_warn {
    ($($t:tt)*) => ($crate::warn(&format!($($t)*)))
}

pub mod codes;
pub mod config;
pub mod error;
pub mod interpreter;
pub mod machine;
pub mod parser;
pub mod state;
pub mod wasm;

pub use codes::{GCode, MCode};
pub use config::{InterpreterConfig, DEFAULT_WORK_OFFSET};
pub use error::GcodeError;
pub use interpreter::{Flow, Interpreter, RunSummary};
pub use machine::{ConsoleMachine, Machine, MachineCommand, RecordingMachine};
pub use parser::{InstructionLine, Word};
pub use state::{Axis, MachineState, MotionMode, Position, PositioningMode, ProgramPhase};
