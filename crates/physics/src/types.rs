use serde::{Deserialize, Serialize};

/// Generalized coordinates of a cart carrying a hinged pole.
///
/// `theta` is measured from the upright position; positive angles tilt the
/// pole toward `+x`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CartState {
    pub x: f32,
    pub x_dot: f32,
    pub theta: f32,
    pub theta_dot: f32,
}

impl CartState {
    #[must_use]
    pub const fn new(x: f32, x_dot: f32, theta: f32, theta_dot: f32) -> Self {
        Self { x, x_dot, theta, theta_dot }
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite()
            && self.x_dot.is_finite()
            && self.theta.is_finite()
            && self.theta_dot.is_finite()
    }

    /// Packs the state as `[x, x_dot, theta, theta_dot]`.
    #[must_use]
    pub const fn to_array(self) -> [f32; 4] {
        [self.x, self.x_dot, self.theta, self.theta_dot]
    }

    #[must_use]
    pub const fn from_array(v: [f32; 4]) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
}
