//! Greeks result types.

use std::fmt;

/// A first- or second-order sensitivity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Greek {
    /// ∂V/∂S.
    Delta,
    /// ∂²V/∂S².
    Gamma,
    /// ∂V/∂σ.
    Vega,
    /// Time decay: change in value as maturity shortens.
    Theta,
    /// ∂V/∂r with b held fixed.
    Rho,
    /// ∂V/∂b.
    Carry,
}

impl Greek {
    /// Every greek, in reporting order.
    pub const ALL: [Greek; 6] = [
        Greek::Delta,
        Greek::Gamma,
        Greek::Vega,
        Greek::Theta,
        Greek::Rho,
        Greek::Carry,
    ];
}

impl fmt::Display for Greek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Greek::Delta => "delta",
            Greek::Gamma => "gamma",
            Greek::Vega => "vega",
            Greek::Theta => "theta",
            Greek::Rho => "rho",
            Greek::Carry => "carry",
        };
        f.write_str(name)
    }
}

/// Price and finite-difference greeks of one option side.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::greeks::{Greek, GreeksResult};
///
/// let result = GreeksResult {
///     price: 10.5,
///     delta: 0.55,
///     ..Default::default()
/// };
/// assert_eq!(result.get(Greek::Delta), 0.55);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GreeksResult {
    /// Present value at the unbumped parameters.
    pub price: f64,
    /// Delta: ∂V/∂S.
    pub delta: f64,
    /// Gamma: ∂²V/∂S².
    pub gamma: f64,
    /// Vega: ∂V/∂σ, per unit of volatility.
    pub vega: f64,
    /// Theta: value change per year of elapsed time.
    pub theta: f64,
    /// Rho: ∂V/∂r, per unit of rate.
    pub rho: f64,
    /// Carry sensitivity: ∂V/∂b, per unit of cost-of-carry.
    pub carry: f64,
}

impl GreeksResult {
    /// Value of one greek.
    pub fn get(&self, greek: Greek) -> f64 {
        match greek {
            Greek::Delta => self.delta,
            Greek::Gamma => self.gamma,
            Greek::Vega => self.vega,
            Greek::Theta => self.theta,
            Greek::Rho => self.rho,
            Greek::Carry => self.carry,
        }
    }

    /// `(greek, value)` pairs in reporting order.
    pub fn iter(&self) -> impl Iterator<Item = (Greek, f64)> + '_ {
        Greek::ALL.into_iter().map(move |g| (g, self.get(g)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_and_iter() {
        let result = GreeksResult {
            price: 1.0,
            delta: 2.0,
            gamma: 3.0,
            vega: 4.0,
            theta: 5.0,
            rho: 6.0,
            carry: 7.0,
        };
        let values: Vec<f64> = result.iter().map(|(_, v)| v).collect();
        assert_eq!(values, vec![2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
        assert_eq!(result.get(Greek::Carry), 7.0);
    }

    #[test]
    fn test_display() {
        let names: Vec<String> = Greek::ALL.iter().map(ToString::to_string).collect();
        assert_eq!(names, ["delta", "gamma", "vega", "theta", "rho", "carry"]);
    }
}
