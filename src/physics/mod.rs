//! Closed-form cycling physics: power and metabolic energy from speed.

pub mod power;

pub use power::{
    energy_kcal, estimate_power_watts, estimate_power_watts_with, grade_from, DragModel,
    PhysicsResult, CDA_DEFAULT, CR_DEFAULT, G, RHO_DEFAULT,
};

/// Round a float to a fixed number of decimal places.
pub trait RoundTo {
    fn round_to(self, dp: u32) -> f64;
}

impl RoundTo for f64 {
    #[inline]
    fn round_to(self, dp: u32) -> f64 {
        if dp == 0 {
            return self.round();
        }
        let factor = 10_f64.powi(dp as i32);
        (self * factor).round() / factor
    }
}
