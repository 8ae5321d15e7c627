use crate::lesson::config::{CycleTable, LessonConfig, SourceRegister};

/// `MUL r/m16` opcode byte.
pub const MUL_OPCODE: u8 = 0xF7;
/// ModRM `reg` field selecting `MUL` within the `F7` group.
pub const MUL_GROUP_REG: u8 = 4;

/// Every value the lesson displays, derived from the configured operands.
#[derive(Clone, Debug, PartialEq)]
pub struct MulExample {
    /// Multiplicand (AX).
    pub ax: u16,
    /// Multiplier.
    pub src: u16,
    /// Multiplier register.
    pub source: SourceRegister,
    /// Instruction address.
    pub address: u16,
    /// Clock in MHz.
    pub clock_mhz: f64,
    /// Cycle counts.
    pub cycles: CycleTable,
}

impl MulExample {
    /// Values for `cfg`.
    pub fn from_config(cfg: &LessonConfig) -> Self {
        Self {
            ax: cfg.ax,
            src: cfg.bx,
            source: cfg.source,
            address: cfg.address,
            clock_mhz: cfg.clock_mhz,
            cycles: cfg.cycles.clone(),
        }
    }

    /// Full 32-bit product.
    pub fn product(&self) -> u32 {
        u32::from(self.ax) * u32::from(self.src)
    }

    /// High word, written to DX.
    pub fn dx(&self) -> u16 {
        (self.product() >> 16) as u16
    }

    /// Low word, written to AX.
    pub fn ax_after(&self) -> u16 {
        (self.product() & 0xFFFF) as u16
    }

    /// CF: set when the high word is non-zero.
    pub fn carry(&self) -> bool {
        self.dx() != 0
    }

    /// OF: identical to CF for unsigned `MUL`.
    pub fn overflow(&self) -> bool {
        self.carry()
    }

    /// SF as displayed: an unsigned product is never negative.
    pub fn sign(&self) -> bool {
        false
    }

    /// ZF as displayed: set only for a zero product.
    pub fn zero(&self) -> bool {
        self.product() == 0
    }

    /// ModRM byte: register-direct mode, `reg` = 4, `r/m` = source register.
    pub fn modrm(&self) -> u8 {
        0xC0 | (MUL_GROUP_REG << 3) | self.source.code()
    }

    /// Instruction bytes.
    pub fn encoding(&self) -> [u8; 2] {
        [MUL_OPCODE, self.modrm()]
    }

    /// Instruction bytes as `F7 E3`.
    pub fn encoding_text(&self) -> String {
        let [op, modrm] = self.encoding();
        format!("{op:02X} {modrm:02X}")
    }

    /// Assembly mnemonic, e.g. `MUL BX`.
    pub fn mnemonic(&self) -> String {
        format!("MUL {}", self.source.name())
    }

    /// Address of the following instruction (PC + 2).
    pub fn next_address(&self) -> u16 {
        self.address.wrapping_add(2)
    }

    /// Execution time in microseconds for `cycles` at the configured clock.
    pub fn micros(&self, cycles: u32) -> f64 {
        f64::from(cycles) / self.clock_mhz
    }
}

/// `0xFFFF`.
pub fn hex16(v: u16) -> String {
    format!("0x{v:04X}")
}

/// `0xFFFE0001`.
pub fn hex32(v: u32) -> String {
    format!("0x{v:08X}")
}

/// Memory address in Intel notation, `1000h`.
pub fn addr(v: u16) -> String {
    format!("{v:04X}h")
}

/// Byte as 8 binary digits.
pub fn bits8(v: u8) -> String {
    format!("{v:08b}")
}

/// Decimal with thousands separators, `4,294,836,225`.
pub fn grouped(v: u64) -> String {
    let digits = v.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i).is_multiple_of(3) {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// `1` or `0`.
pub fn bit(flag: bool) -> &'static str {
    if flag { "1" } else { "0" }
}

#[cfg(test)]
#[path = "../../tests/unit/lesson/values.rs"]
mod tests;
