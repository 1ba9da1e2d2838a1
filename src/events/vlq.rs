// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Variable-length quantities.
//!
//! Seven bits per byte, most significant group first, continuation bit set
//! on every byte but the last.

/// Largest value a Standard MIDI File allows in a variable-length quantity
pub const MAX: u32 = 0x0FFF_FFFF;

/// Append the variable-length encoding of `value` to `out`
pub fn write(out: &mut Vec<u8>, mut value: u32) {
    let mut bytes = [0u8; 5];
    let mut len = 0;

    bytes[len] = (value & 0x7F) as u8;
    len += 1;
    value >>= 7;

    while value > 0 {
        bytes[len] = (value & 0x7F) as u8 | 0x80;
        len += 1;
        value >>= 7;
    }

    out.extend(bytes[..len].iter().rev());
}

/// Encode `value` as a variable-length quantity
pub fn encode(value: u32) -> Vec<u8> {
    let mut out = Vec::with_capacity(4);
    write(&mut out, value);
    out
}

/// Decode a variable-length quantity from the start of `bytes`.
///
/// Returns the value and the number of bytes consumed, or `None` if the
/// input ends mid-quantity or does not fit in 32 bits.
pub fn decode(bytes: &[u8]) -> Option<(u32, usize)> {
    let mut value = 0u32;
    for (i, &byte) in bytes.iter().enumerate().take(5) {
        value = value.checked_mul(1 << 7)? | (byte & 0x7F) as u32;
        if byte & 0x80 == 0 {
            return Some((value, i + 1));
        }
    }
    None
}
