//! Bump sizes for finite-difference greeks.

use thiserror::Error;

/// Bump sizes for finite-difference greeks.
///
/// # Default Values
///
/// | Parameter | Default | Description |
/// |-----------|---------|-------------|
/// | `spot_bump_relative` | 0.01 (1%) | Relative bump for spot price |
/// | `vol_bump_absolute` | 0.01 | Absolute bump for volatility |
/// | `time_bump_years` | 1/252 | Time bump in years (1 trading day) |
/// | `rate_bump_absolute` | 1e-4 | Absolute bump for interest rate |
/// | `carry_bump_absolute` | 1e-4 | Absolute bump for cost-of-carry |
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::greeks::GreeksConfig;
///
/// let config = GreeksConfig::builder()
///     .spot_bump_relative(0.005)
///     .time_bump_years(1.0 / 365.0)
///     .build()
///     .unwrap();
/// assert_eq!(config.vol_bump_absolute, 0.01);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GreeksConfig {
    /// Relative bump for spot; the absolute bump is `spot_bump_relative · S`.
    pub spot_bump_relative: f64,
    /// Absolute bump for volatility.
    pub vol_bump_absolute: f64,
    /// Time bump in years.
    pub time_bump_years: f64,
    /// Absolute bump for the risk-free rate.
    pub rate_bump_absolute: f64,
    /// Absolute bump for the cost-of-carry.
    pub carry_bump_absolute: f64,
}

impl Default for GreeksConfig {
    fn default() -> Self {
        Self {
            spot_bump_relative: 0.01,
            vol_bump_absolute: 0.01,
            time_bump_years: 1.0 / 252.0,
            rate_bump_absolute: 1e-4,
            carry_bump_absolute: 1e-4,
        }
    }
}

impl GreeksConfig {
    /// Creates a new builder for constructing a `GreeksConfig`.
    pub fn builder() -> GreeksConfigBuilder {
        GreeksConfigBuilder::default()
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any bump is non-positive, non-finite or beyond
    /// its sensible range.
    pub fn validate(&self) -> Result<(), GreeksConfigError> {
        check(self.spot_bump_relative, 1.0, GreeksConfigError::InvalidSpotBump)?;
        check(self.vol_bump_absolute, 0.5, GreeksConfigError::InvalidVolBump)?;
        check(self.time_bump_years, 1.0, GreeksConfigError::InvalidTimeBump)?;
        check(self.rate_bump_absolute, 0.1, GreeksConfigError::InvalidRateBump)?;
        check(self.carry_bump_absolute, 0.1, GreeksConfigError::InvalidCarryBump)?;
        Ok(())
    }

    /// Absolute spot bump for a given spot price.
    ///
    /// ```rust
    /// use pricer_pricing::greeks::GreeksConfig;
    ///
    /// let bump = GreeksConfig::default().compute_spot_bump(100.0);
    /// assert!((bump - 1.0).abs() < 1e-10);
    /// ```
    #[inline]
    pub fn compute_spot_bump(&self, spot: f64) -> f64 {
        (self.spot_bump_relative * spot).max(1e-8)
    }
}

fn check(
    bump: f64,
    max: f64,
    err: fn(String) -> GreeksConfigError,
) -> Result<(), GreeksConfigError> {
    if !(bump > 0.0 && bump <= max) {
        return Err(err(format!("{} must be in (0, {}]", bump, max)));
    }
    Ok(())
}

/// Builder for [`GreeksConfig`]. Unset bumps take their defaults.
#[derive(Debug, Default)]
pub struct GreeksConfigBuilder {
    spot_bump_relative: Option<f64>,
    vol_bump_absolute: Option<f64>,
    time_bump_years: Option<f64>,
    rate_bump_absolute: Option<f64>,
    carry_bump_absolute: Option<f64>,
}

impl GreeksConfigBuilder {
    /// Sets the relative spot bump (default: 0.01 = 1%).
    pub fn spot_bump_relative(mut self, bump: f64) -> Self {
        self.spot_bump_relative = Some(bump);
        self
    }

    /// Sets the absolute volatility bump (default: 0.01).
    pub fn vol_bump_absolute(mut self, bump: f64) -> Self {
        self.vol_bump_absolute = Some(bump);
        self
    }

    /// Sets the time bump in years (default: 1/252).
    pub fn time_bump_years(mut self, bump: f64) -> Self {
        self.time_bump_years = Some(bump);
        self
    }

    /// Sets the absolute rate bump (default: 1e-4).
    pub fn rate_bump_absolute(mut self, bump: f64) -> Self {
        self.rate_bump_absolute = Some(bump);
        self
    }

    /// Sets the absolute cost-of-carry bump (default: 1e-4).
    pub fn carry_bump_absolute(mut self, bump: f64) -> Self {
        self.carry_bump_absolute = Some(bump);
        self
    }

    /// Builds the configuration, validating all bumps.
    ///
    /// # Errors
    ///
    /// Returns [`GreeksConfigError`] if any bump is invalid.
    pub fn build(self) -> Result<GreeksConfig, GreeksConfigError> {
        let defaults = GreeksConfig::default();
        let config = GreeksConfig {
            spot_bump_relative: self.spot_bump_relative.unwrap_or(defaults.spot_bump_relative),
            vol_bump_absolute: self.vol_bump_absolute.unwrap_or(defaults.vol_bump_absolute),
            time_bump_years: self.time_bump_years.unwrap_or(defaults.time_bump_years),
            rate_bump_absolute: self.rate_bump_absolute.unwrap_or(defaults.rate_bump_absolute),
            carry_bump_absolute: self
                .carry_bump_absolute
                .unwrap_or(defaults.carry_bump_absolute),
        };

        config.validate()?;
        Ok(config)
    }
}

/// Error type for [`GreeksConfig`] validation.
#[derive(Debug, Clone, PartialEq, Error)]
#[allow(clippy::enum_variant_names)]
pub enum GreeksConfigError {
    /// Invalid spot bump value.
    #[error("Invalid spot bump: {0}")]
    InvalidSpotBump(String),
    /// Invalid volatility bump value.
    #[error("Invalid vol bump: {0}")]
    InvalidVolBump(String),
    /// Invalid time bump value.
    #[error("Invalid time bump: {0}")]
    InvalidTimeBump(String),
    /// Invalid rate bump value.
    #[error("Invalid rate bump: {0}")]
    InvalidRateBump(String),
    /// Invalid cost-of-carry bump value.
    #[error("Invalid carry bump: {0}")]
    InvalidCarryBump(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = GreeksConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(GreeksConfig::builder().build().unwrap(), config);
    }

    #[test]
    fn test_builder_overrides() {
        let config = GreeksConfig::builder()
            .vol_bump_absolute(0.001)
            .rate_bump_absolute(0.01)
            .carry_bump_absolute(0.002)
            .build()
            .unwrap();
        assert_eq!(config.vol_bump_absolute, 0.001);
        assert_eq!(config.rate_bump_absolute, 0.01);
        assert_eq!(config.carry_bump_absolute, 0.002);
        assert_eq!(config.spot_bump_relative, 0.01);
    }

    #[test]
    fn test_invalid_bumps_rejected() {
        assert!(matches!(
            GreeksConfig::builder().spot_bump_relative(0.0).build(),
            Err(GreeksConfigError::InvalidSpotBump(_))
        ));
        assert!(matches!(
            GreeksConfig::builder().vol_bump_absolute(0.6).build(),
            Err(GreeksConfigError::InvalidVolBump(_))
        ));
        assert!(matches!(
            GreeksConfig::builder().time_bump_years(-1.0).build(),
            Err(GreeksConfigError::InvalidTimeBump(_))
        ));
        assert!(matches!(
            GreeksConfig::builder().rate_bump_absolute(f64::NAN).build(),
            Err(GreeksConfigError::InvalidRateBump(_))
        ));
        assert!(matches!(
            GreeksConfig::builder().carry_bump_absolute(0.5).build(),
            Err(GreeksConfigError::InvalidCarryBump(_))
        ));
    }

    #[test]
    fn test_spot_bump_floor() {
        let config = GreeksConfig::default();
        assert_eq!(config.compute_spot_bump(0.0), 1e-8);
    }
}
