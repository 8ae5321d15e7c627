#[derive(Clone, Copy, Debug)]
pub(crate) struct Fnv1a64(u64);

impl Fnv1a64 {
    pub(crate) const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01B3;

    pub(crate) fn new_default() -> Self {
        Self(Self::OFFSET_BASIS)
    }

    pub(crate) fn write_u64(&mut self, v: u64) {
        self.write_bytes(&v.to_le_bytes());
    }

    pub(crate) fn write_f64(&mut self, v: f64) {
        self.write_u64(v.to_bits());
    }

    pub(crate) fn write_bytes(&mut self, bytes: &[u8]) {
        let mut h = self.0;
        for &b in bytes {
            h ^= u64::from(b);
            h = h.wrapping_mul(Self::PRIME);
        }
        self.0 = h;
    }

    pub(crate) fn finish(self) -> u64 {
        self.0
    }
}

pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

/// Linear interpolation for animated property values.
pub trait Lerp: Clone {
    /// Interpolate between `self` (t = 0) and `to` (t = 1).
    fn lerp_to(&self, to: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp_to(&self, to: &Self, t: f64) -> Self {
        self + (to - self) * t
    }
}

impl Lerp for kurbo::Vec2 {
    fn lerp_to(&self, to: &Self, t: f64) -> Self {
        *self + (*to - *self) * t
    }
}

impl Lerp for crate::foundation::core::Color {
    fn lerp_to(&self, to: &Self, t: f64) -> Self {
        let ch = |a: u8, b: u8| -> u8 {
            (f64::from(a) + (f64::from(b) - f64::from(a)) * t)
                .round()
                .clamp(0.0, 255.0) as u8
        };
        Self {
            r: ch(self.r, to.r),
            g: ch(self.g, to.g),
            b: ch(self.b, to.b),
            a: ch(self.a, to.a),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
