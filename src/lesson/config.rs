use std::path::Path;

use crate::foundation::core::{Canvas, Color, Fps};
use crate::foundation::error::{CycleError, CycleResult};

/// How much of the lesson to show.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    serde::Serialize,
    serde::Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum Detail {
    /// Core execution cycle only, shorter holds.
    Brief,
    /// Architecture overview, multiplication steps, all four flags and a performance analysis.
    #[default]
    Detailed,
}

/// 16-bit register that can be the explicit `MUL` operand.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SourceRegister {
    /// Accumulator.
    Ax,
    /// Count register.
    Cx,
    /// Data register.
    Dx,
    /// Base register.
    #[default]
    Bx,
    /// Stack pointer.
    Sp,
    /// Base pointer.
    Bp,
    /// Source index.
    Si,
    /// Destination index.
    Di,
}

impl SourceRegister {
    /// 3-bit register code used in the ModRM `r/m` field.
    pub fn code(self) -> u8 {
        match self {
            Self::Ax => 0,
            Self::Cx => 1,
            Self::Dx => 2,
            Self::Bx => 3,
            Self::Sp => 4,
            Self::Bp => 5,
            Self::Si => 6,
            Self::Di => 7,
        }
    }

    /// Assembly name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Ax => "AX",
            Self::Cx => "CX",
            Self::Dx => "DX",
            Self::Bx => "BX",
            Self::Sp => "SP",
            Self::Bp => "BP",
            Self::Si => "SI",
            Self::Di => "DI",
        }
    }

    /// Caption shown under the register box.
    pub fn role(self) -> &'static str {
        match self {
            Self::Ax => "Accumulator",
            Self::Cx => "Count Register",
            Self::Dx => "Data Register",
            Self::Bx => "Base Register",
            Self::Sp => "Stack Pointer",
            Self::Bp => "Base Pointer",
            Self::Si => "Source Index",
            Self::Di => "Destination Index",
        }
    }
}

/// Clock cycles used by the performance stage.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CycleTable {
    /// Fewest cycles for `MUL r16`.
    pub mul_min: u32,
    /// Most cycles for `MUL r16`.
    pub mul_max: u32,
    /// Instruction fetch (bus cycle).
    pub fetch: u32,
    /// Decode.
    pub decode: u32,
    /// Flag update.
    pub flags: u32,
    /// Latency of the same multiply on a current x86 core.
    pub modern: u32,
}

impl Default for CycleTable {
    fn default() -> Self {
        Self {
            mul_min: 118,
            mul_max: 133,
            fetch: 4,
            decode: 2,
            flags: 2,
            modern: 3,
        }
    }
}

/// Lesson colors.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Palette {
    /// Registers, memory and data paths.
    pub blue: Color,
    /// Decode and control unit.
    pub red: Color,
    /// ALU and results.
    pub green: Color,
    /// PC, flags and timing.
    pub yellow: Color,
    /// Plain text.
    pub text: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            blue: Color::rgb(0x00, 0xbf, 0xff),
            red: Color::rgb(0xff, 0x00, 0x40),
            green: Color::rgb(0x00, 0xff, 0x80),
            yellow: Color::rgb(0xff, 0xff, 0x00),
            text: Color::WHITE,
        }
    }
}

/// Everything that parameterizes the `MUL` lesson, loadable from JSON.
///
/// Every field has a default, so `{}` is a valid configuration.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LessonConfig {
    /// Output canvas.
    pub canvas: Canvas,
    /// Output frame rate.
    pub fps: Fps,
    /// Background color.
    pub background: Color,
    /// Detail level.
    pub detail: Detail,
    /// Multiplier applied to every beat duration.
    pub pace: f64,
    /// Multiplicand (AX).
    pub ax: u16,
    /// Multiplier (value of the source register).
    pub bx: u16,
    /// Operand register of `MUL`.
    pub source: SourceRegister,
    /// Address of the instruction in memory.
    pub address: u16,
    /// CPU clock in MHz.
    pub clock_mhz: f64,
    /// Cycle counts.
    pub cycles: CycleTable,
    /// Colors.
    pub palette: Palette,
}

impl Default for LessonConfig {
    fn default() -> Self {
        Self {
            canvas: Canvas {
                width: 1920,
                height: 1080,
            },
            fps: Fps { num: 30, den: 1 },
            background: Color::rgb(0x0a, 0x0a, 0x0a),
            detail: Detail::Detailed,
            pace: 1.0,
            ax: 0xFFFF,
            bx: 0xFFFF,
            source: SourceRegister::Bx,
            address: 0x1000,
            clock_mhz: 5.0,
            cycles: CycleTable::default(),
            palette: Palette::default(),
        }
    }
}

impl LessonConfig {
    /// Parse a JSON configuration.
    pub fn from_json(json: &str) -> CycleResult<Self> {
        let cfg: Self =
            serde_json::from_str(json).map_err(|e| CycleError::serde(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load and validate a JSON configuration file.
    pub fn from_path(path: &Path) -> CycleResult<Self> {
        use anyhow::Context as _;

        let json = std::fs::read_to_string(path)
            .with_context(|| format!("read lesson config '{}'", path.display()))?;
        Self::from_json(&json)
    }

    /// Check the configuration.
    pub fn validate(&self) -> CycleResult<()> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(CycleError::validation("canvas width/height must be non-zero"));
        }
        if !self.canvas.width.is_multiple_of(2) || !self.canvas.height.is_multiple_of(2) {
            return Err(CycleError::validation(
                "canvas width/height must be even for yuv420p output",
            ));
        }
        if self.canvas.width > u32::from(u16::MAX) || self.canvas.height > u32::from(u16::MAX) {
            return Err(CycleError::validation("canvas width/height must fit in u16"));
        }
        Fps::new(self.fps.num, self.fps.den)?;
        if !self.pace.is_finite() || self.pace <= 0.0 || self.pace > 10.0 {
            return Err(CycleError::validation("pace must be in (0, 10]"));
        }
        if !self.clock_mhz.is_finite() || self.clock_mhz <= 0.0 {
            return Err(CycleError::validation("clock_mhz must be finite and > 0"));
        }
        if matches!(self.source, SourceRegister::Ax | SourceRegister::Dx) {
            return Err(CycleError::validation(
                "source register must not be AX or DX (they hold the result)",
            ));
        }
        let c = &self.cycles;
        if c.mul_min == 0 || c.mul_min > c.mul_max {
            return Err(CycleError::validation(
                "cycles.mul_min must be > 0 and <= cycles.mul_max",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/lesson/config.rs"]
mod tests;
