//! Common types and helpers shared by the network unit records.

/// Trait implemented by every record that can take part in a power network.
///
/// The simulator works on concrete slices, so this trait only carries the
/// metadata the host layer needs for logging and reporting.
pub trait Unit {
    /// Returns a human-readable type name for the unit.
    fn unit_type(&self) -> &'static str;
}

/// Clamps a quantity to `>= 0`, mapping NaN and infinities to zero.
///
/// Used at every boundary where energy, fuel or capacity enters a unit.
pub fn non_negative(value: f32) -> f32 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}

/// Clamps a ratio to `[0, 1]`, mapping non-finite values to zero.
pub fn unit_ratio(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_negative_handles_special_values() {
        assert_eq!(non_negative(3.5), 3.5);
        assert_eq!(non_negative(-1.0), 0.0);
        assert_eq!(non_negative(f32::NAN), 0.0);
        assert_eq!(non_negative(f32::INFINITY), 0.0);
    }

    #[test]
    fn unit_ratio_clamps() {
        assert_eq!(unit_ratio(1.5), 1.0);
        assert_eq!(unit_ratio(-0.5), 0.0);
        assert_eq!(unit_ratio(0.25), 0.25);
        assert_eq!(unit_ratio(f32::NAN), 0.0);
    }
}
