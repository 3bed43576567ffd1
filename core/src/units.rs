// core/src/units.rs

pub const METERS_PER_KM: f64 = 1000.0;
pub const SECS_PER_HOUR: f64 = 3600.0;

pub fn m_to_km(m: f64) -> f64 {
    m / METERS_PER_KM
}

// --- RoundTo trait (brukt av summary/report) ---
pub trait RoundTo {
    fn round_to(self, dp: u32) -> f64;
}

impl RoundTo for f64 {
    #[inline]
    fn round_to(self, dp: u32) -> f64 {
        if dp == 0 { return self.round(); }
        let factor = 10_f64.powi(dp as i32);
        (self * factor).round() / factor
    }
}

/// Runder til `dp` desimaler og skriver korteste form, alltid med desimalpunkt.
/// 5.0 → "5.0", 2.349 → "2.35", 12.5 → "12.5".
pub fn fmt_rounded(x: f64, dp: u32) -> String {
    let s = format!("{}", x.round_to(dp));
    if x.is_finite() && !s.contains('.') {
        format!("{s}.0")
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fmt_rounded_keeps_decimal_point() {
        assert_eq!(fmt_rounded(5.0, 2), "5.0");
        assert_eq!(fmt_rounded(0.0, 1), "0.0");
        assert_eq!(fmt_rounded(2.349, 2), "2.35");
        assert_eq!(fmt_rounded(12.5, 1), "12.5");
    }
}
