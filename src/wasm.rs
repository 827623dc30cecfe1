//! Browser surface. Runs programs against a [`RecordingMachine`] and hands
//! the command log back to JavaScript.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::config::InterpreterConfig;
use crate::interpreter::{Flow, Interpreter, RunSummary};
use crate::machine::{MachineCommand, RecordingMachine};
use crate::state::MachineState;

#[derive(Serialize)]
pub struct ProgramReport {
    pub commands: Vec<MachineCommand>,
    pub final_state: MachineState,
    pub summary: RunSummary,
}

/// Interpret a whole program. Native callers get the typed report; the
/// exported function below wraps it for JavaScript.
pub fn run_program(source: &str, config: InterpreterConfig) -> Result<ProgramReport, crate::GcodeError> {
    let mut interpreter = Interpreter::new(RecordingMachine::new(), config);
    let summary = interpreter.run(source.lines())?;
    let final_state = interpreter.state().clone();
    Ok(ProgramReport {
        commands: interpreter.into_machine().into_commands(),
        final_state,
        summary,
    })
}

fn config_from_js(config: JsValue) -> Result<InterpreterConfig, JsValue> {
    if config.is_undefined() || config.is_null() {
        return Ok(InterpreterConfig::default());
    }
    serde_wasm_bindgen::from_value(config).map_err(JsValue::from)
}

#[wasm_bindgen]
pub fn interpret_program(source: &str, config: JsValue) -> Result<JsValue, JsValue> {
    let config = config_from_js(config)?;
    let report = run_program(source, config).map_err(|e| JsValue::from_str(&e.to_string()))?;
    serde_wasm_bindgen::to_value(&report).map_err(JsValue::from)
}

/// Line-at-a-time session for editors that stream a program as it is typed
/// or stepped through.
#[wasm_bindgen]
pub struct GcodeSession {
    interpreter: Interpreter<RecordingMachine>,
}

#[wasm_bindgen]
impl GcodeSession {
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<GcodeSession, JsValue> {
        let config = config_from_js(config)?;
        console_log!("GcodeSession ready, work offset {}", config.work_offset_label);
        Ok(Self { interpreter: Interpreter::new(RecordingMachine::new(), config) })
    }

    /// Returns false once the program has stopped itself.
    pub fn feed_line(&mut self, line: &str) -> Result<bool, JsValue> {
        let flow = self
            .interpreter
            .feed_line(line)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(flow == Flow::Continue)
    }

    pub fn take_commands(&mut self) -> JsValue {
        let commands = self.interpreter.machine_mut().take_commands();
        serde_wasm_bindgen::to_value(&commands).unwrap_or(JsValue::NULL)
    }

    pub fn get_full_state(&self) -> JsValue {
        serde_wasm_bindgen::to_value(self.interpreter.state()).unwrap_or(JsValue::NULL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Position;

    #[test]
    fn report_carries_commands_and_final_state() {
        let report = run_program(
            "%\nN1 G90 G01 X1 Y2\nN2 M30\nN3 G01 X9\n",
            InterpreterConfig::default(),
        )
        .unwrap();
        assert!(report.summary.stopped);
        assert_eq!(report.summary.instructions_executed, 2);
        assert_eq!(report.final_state.current_position, Position::HOME);
        assert_eq!(report.commands.last(), Some(&MachineCommand::ProgramQuit));
    }

    #[test]
    fn report_propagates_errors() {
        let err = run_program("N1 G90\n", InterpreterConfig::default()).err().unwrap();
        assert!(matches!(err, crate::GcodeError::HeaderMissing { line: 1, .. }));
    }
}
