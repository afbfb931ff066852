//! Extensions for numbers that are not present in the stable standard library.

pub(crate) trait NumExt {
    /// Division with rounding up.
    fn div_ceil(self, other: Self) -> Self;

    /// Division with rounding down.
    ///
    /// Note this is different from truncating, which is rounding toward zero.
    fn div_floor(self, other: Self) -> Self;
}

impl NumExt for i64 {
    fn div_ceil(self, other: Self) -> Self {
        let d = self / other;
        let r = self % other;
        if (r > 0 && other > 0) || (r < 0 && other < 0) {
            d + 1
        } else {
            d
        }
    }

    fn div_floor(self, other: Self) -> Self {
        let d = self / other;
        let r = self % other;
        if (r > 0 && other < 0) || (r < 0 && other > 0) {
            d - 1
        } else {
            d
        }
    }
}

impl NumExt for i128 {
    fn div_ceil(self, other: Self) -> Self {
        let d = self / other;
        let r = self % other;
        if (r > 0 && other > 0) || (r < 0 && other < 0) {
            d + 1
        } else {
            d
        }
    }

    fn div_floor(self, other: Self) -> Self {
        let d = self / other;
        let r = self % other;
        if (r > 0 && other < 0) || (r < 0 && other > 0) {
            d - 1
        } else {
            d
        }
    }
}

/// Narrows an `i128` intermediate back into the `i64` value range, saturating at the extremes.
pub(crate) fn clamp_to_i64(value: i128) -> i64 {
    value.clamp(i64::MIN as i128, i64::MAX as i128) as i64
}
