pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

/// Integer division rounding half up. `den` must be non-zero.
pub(crate) fn div_round_u32(num: u32, den: u32) -> u32 {
    (num + den / 2) / den
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
