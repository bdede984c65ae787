//! Colorizer - one random hex color per device

use rand::Rng;
use std::collections::BTreeMap;

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Random `#RRGGBB` string drawn from uppercase hex digits
pub fn random_hex_color<R: Rng + ?Sized>(rng: &mut R) -> String {
    let mut color = String::with_capacity(7);
    color.push('#');
    for _ in 0..6 {
        color.push(HEX_DIGITS[rng.gen_range(0..HEX_DIGITS.len())] as char);
    }
    color
}

/// Color already assigned to `id`, or a fresh one recorded in `colors`.
///
/// Repeated ids share one entry. Two devices may land on the same color;
/// no attempt is made to keep colors unique.
pub fn color_for<'c, R: Rng + ?Sized>(
    colors: &'c mut BTreeMap<String, String>,
    id: &str,
    rng: &mut R,
) -> &'c str {
    if !colors.contains_key(id) {
        colors.insert(id.to_string(), random_hex_color(rng));
    }
    &colors[id]
}

/// True when `s` looks like `#RRGGBB` with uppercase hex digits
#[cfg(test)]
pub fn is_hex_color(s: &str) -> bool {
    s.len() == 7
        && s.starts_with('#')
        && s[1..].bytes().all(|b| HEX_DIGITS.contains(&b))
}
