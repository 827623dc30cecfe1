use serde::{Deserialize, Serialize};

/// G codes the interpreter understands. Anything else under `G` is rejected
/// at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GCode {
    Rapid,                  // G00
    Linear,                 // G01
    PlaneXy,                // G17
    Metric,                 // G21
    Home,                   // G28
    CutterCompensationOff,  // G40
    ToolLengthCancel,       // G49
    WorkOffset,             // G54
    CannedCycleCancel,      // G80
    Absolute,               // G90
    Incremental,            // G91
    FeedPerMinute,          // G94
}

impl GCode {
    /// Resolve the digits after `G`. Leading zeros are insignificant, so `G0`
    /// and `G00` are the same code.
    pub fn from_literal(literal: &str) -> Option<Self> {
        let code = parse_code_number(literal)?;
        Some(match code {
            0 => Self::Rapid,
            1 => Self::Linear,
            17 => Self::PlaneXy,
            21 => Self::Metric,
            28 => Self::Home,
            40 => Self::CutterCompensationOff,
            49 => Self::ToolLengthCancel,
            54 => Self::WorkOffset,
            80 => Self::CannedCycleCancel,
            90 => Self::Absolute,
            91 => Self::Incremental,
            94 => Self::FeedPerMinute,
            _ => return None,
        })
    }

    pub fn number(self) -> u32 {
        match self {
            Self::Rapid => 0,
            Self::Linear => 1,
            Self::PlaneXy => 17,
            Self::Metric => 21,
            Self::Home => 28,
            Self::CutterCompensationOff => 40,
            Self::ToolLengthCancel => 49,
            Self::WorkOffset => 54,
            Self::CannedCycleCancel => 80,
            Self::Absolute => 90,
            Self::Incremental => 91,
            Self::FeedPerMinute => 94,
        }
    }
}

/// Miscellaneous (machine) functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MCode {
    SpindleOn,   // M03
    SpindleStop, // M05
    ToolChange,  // M06
    CoolantOff,  // M09
    ProgramEnd,  // M30
}

impl MCode {
    pub fn from_literal(literal: &str) -> Option<Self> {
        let code = parse_code_number(literal)?;
        Some(match code {
            3 => Self::SpindleOn,
            5 => Self::SpindleStop,
            6 => Self::ToolChange,
            9 => Self::CoolantOff,
            30 => Self::ProgramEnd,
            _ => return None,
        })
    }

    pub fn number(self) -> u32 {
        match self {
            Self::SpindleOn => 3,
            Self::SpindleStop => 5,
            Self::ToolChange => 6,
            Self::CoolantOff => 9,
            Self::ProgramEnd => 30,
        }
    }
}

impl std::fmt::Display for GCode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "G{:02}", self.number())
    }
}

impl std::fmt::Display for MCode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "M{:02}", self.number())
    }
}

// Codes are plain unsigned integers; no sign, no fraction.
fn parse_code_number(literal: &str) -> Option<u32> {
    if literal.is_empty() || !literal.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    literal.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_zeros_do_not_matter() {
        assert_eq!(GCode::from_literal("00"), Some(GCode::Rapid));
        assert_eq!(GCode::from_literal("0"), Some(GCode::Rapid));
        assert_eq!(GCode::from_literal("001"), Some(GCode::Linear));
        assert_eq!(MCode::from_literal("3"), Some(MCode::SpindleOn));
        assert_eq!(MCode::from_literal("30"), Some(MCode::ProgramEnd));
    }

    #[test]
    fn unknown_or_malformed_codes_are_rejected() {
        assert_eq!(GCode::from_literal("02"), None);
        assert_eq!(GCode::from_literal(""), None);
        assert_eq!(GCode::from_literal("-1"), None);
        assert_eq!(GCode::from_literal("1.5"), None);
        assert_eq!(MCode::from_literal("08"), None);
    }

    #[test]
    fn display_uses_two_digit_form() {
        assert_eq!(GCode::Rapid.to_string(), "G00");
        assert_eq!(GCode::WorkOffset.to_string(), "G54");
        assert_eq!(MCode::CoolantOff.to_string(), "M09");
    }
}
