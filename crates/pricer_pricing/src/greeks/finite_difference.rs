//! Bump-and-revalue over [`OptionPricer`].

use pricer_core::types::{OptionType, PricingError};
use pricer_models::instruments::{ContractParameters, OptionPricer, ParamField};
use tracing::debug;

use super::config::GreeksConfig;
use super::result::{Greek, GreeksResult};

/// Computes one greek of `pricer`.
///
/// # Errors
///
/// `PricingError::Configuration` for an invalid `config`; otherwise any error
/// raised while building or pricing a bumped pricer. Vega on a contract
/// without sigma is `PricingError::MissingVolatility`.
pub fn finite_difference<P: OptionPricer>(
    pricer: &P,
    option_type: OptionType,
    greek: Greek,
    config: &GreeksConfig,
) -> Result<f64, PricingError> {
    validate(config)?;
    let base = pricer.price(option_type)?;
    let params = pricer.params();

    match greek {
        Greek::Delta | Greek::Gamma => {
            let (delta, gamma) = spot_sensitivities(pricer, option_type, config, base)?;
            Ok(if greek == Greek::Delta { delta } else { gamma })
        }
        Greek::Vega => {
            params.require_volatility("vega")?;
            first_order(pricer, option_type, ParamField::Volatility, config.vol_bump_absolute, base)
        }
        Greek::Theta => theta(pricer, option_type, config.time_bump_years, base),
        Greek::Rho => first_order(pricer, option_type, ParamField::Rate, config.rate_bump_absolute, base),
        Greek::Carry => first_order(
            pricer,
            option_type,
            ParamField::CostOfCarry,
            config.carry_bump_absolute,
            base,
        ),
    }
}

/// Computes the price and every greek of `pricer`.
///
/// Vega is 0 for a contract without sigma; this is only reachable with a
/// pricer that prices without one.
///
/// # Errors
///
/// As [`finite_difference`].
pub fn compute_greeks<P: OptionPricer>(
    pricer: &P,
    option_type: OptionType,
    config: &GreeksConfig,
) -> Result<GreeksResult, PricingError> {
    validate(config)?;
    let price = pricer.price(option_type)?;

    let (delta, gamma) = spot_sensitivities(pricer, option_type, config, price)?;
    let vega = match pricer.params().volatility() {
        Some(_) => first_order(
            pricer,
            option_type,
            ParamField::Volatility,
            config.vol_bump_absolute,
            price,
        )?,
        None => 0.0,
    };
    let theta = theta(pricer, option_type, config.time_bump_years, price)?;
    let rho = first_order(pricer, option_type, ParamField::Rate, config.rate_bump_absolute, price)?;
    let carry = first_order(
        pricer,
        option_type,
        ParamField::CostOfCarry,
        config.carry_bump_absolute,
        price,
    )?;

    debug!(%option_type, price, delta, gamma, vega, theta, rho, carry, "greeks computed");

    Ok(GreeksResult {
        price,
        delta,
        gamma,
        vega,
        theta,
        rho,
        carry,
    })
}

fn validate(config: &GreeksConfig) -> Result<(), PricingError> {
    config
        .validate()
        .map_err(|e| PricingError::configuration(e.to_string()))
}

fn reprice<P: OptionPricer>(
    pricer: &P,
    option_type: OptionType,
    params: ContractParameters<f64>,
) -> Result<f64, PricingError> {
    pricer.with_params(params)?.price(option_type)
}

/// Central difference, or forward difference when `value - h` leaves the
/// admissible domain.
fn first_order<P: OptionPricer>(
    pricer: &P,
    option_type: OptionType,
    field: ParamField,
    h: f64,
    base: f64,
) -> Result<f64, PricingError> {
    let params = pricer.params();
    let up = reprice(pricer, option_type, params.bumped(field, h)?)?;
    match params.bumped(field, -h) {
        Ok(down) => Ok((up - reprice(pricer, option_type, down)?) / (2.0 * h)),
        Err(_) => Ok((up - base) / h),
    }
}

/// Delta and gamma from one pair of spot bumps.
fn spot_sensitivities<P: OptionPricer>(
    pricer: &P,
    option_type: OptionType,
    config: &GreeksConfig,
    base: f64,
) -> Result<(f64, f64), PricingError> {
    let params = pricer.params();
    let h = config.compute_spot_bump(params.spot());
    let up = reprice(pricer, option_type, params.bumped(ParamField::Spot, h)?)?;
    let down = reprice(pricer, option_type, params.bumped(ParamField::Spot, -h)?)?;

    let delta = (up - down) / (2.0 * h);
    let gamma = (up - 2.0 * base + down) / (h * h);
    Ok((delta, gamma))
}

/// Value change per year as time passes: `(V(t - h) - V(t)) / h`, or
/// `(V(t) - V(t + h)) / h` when `t <= h`.
fn theta<P: OptionPricer>(
    pricer: &P,
    option_type: OptionType,
    h: f64,
    base: f64,
) -> Result<f64, PricingError> {
    let params = pricer.params();
    match params.bumped(ParamField::Maturity, -h) {
        Ok(shorter) => Ok((reprice(pricer, option_type, shorter)? - base) / h),
        Err(_) => {
            let longer = params.bumped(ParamField::Maturity, h)?;
            Ok((base - reprice(pricer, option_type, longer)?) / h)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pricer_models::analytical::GeneralizedBlackScholes;

    fn gbs(sigma: f64, maturity: f64) -> GeneralizedBlackScholes<f64> {
        let params =
            ContractParameters::new(100.0, 100.0, maturity, 0.05, 0.02, Some(sigma)).unwrap();
        GeneralizedBlackScholes::new(params).unwrap()
    }

    #[test]
    fn test_delta_gamma_vega_match_analytic() {
        let pricer = gbs(0.25, 1.0);
        let config = GreeksConfig::default();
        for option_type in [OptionType::Call, OptionType::Put] {
            let greeks = compute_greeks(&pricer, option_type, &config).unwrap();
            assert_relative_eq!(greeks.delta, pricer.delta(option_type), epsilon = 1e-3);
            assert_relative_eq!(greeks.gamma, pricer.gamma(), epsilon = 1e-4);
            assert_relative_eq!(greeks.vega, pricer.vega(), epsilon = 1e-2);
        }
    }

    #[test]
    fn test_single_greek_matches_full_set() {
        let pricer = gbs(0.25, 1.0);
        let config = GreeksConfig::default();
        let all = compute_greeks(&pricer, OptionType::Put, &config).unwrap();
        for greek in Greek::ALL {
            let one = finite_difference(&pricer, OptionType::Put, greek, &config).unwrap();
            assert_relative_eq!(one, all.get(greek), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_rho_and_carry_signs() {
        let pricer = gbs(0.25, 1.0);
        let config = GreeksConfig::default();
        let call = compute_greeks(&pricer, OptionType::Call, &config).unwrap();
        let put = compute_greeks(&pricer, OptionType::Put, &config).unwrap();

        // With b held, r only discounts: dV/dr = -t·V.
        assert_relative_eq!(call.rho, -call.price, epsilon = 1e-4);
        assert!(call.carry > 0.0);
        assert!(put.carry < 0.0);
        assert!(call.theta < 0.0);
    }

    #[test]
    fn test_vega_falls_back_to_forward_difference() {
        let pricer = gbs(0.005, 1.0);
        let vega = finite_difference(&pricer, OptionType::Call, Greek::Vega, &GreeksConfig::default())
            .unwrap();
        assert!(vega.is_finite() && vega > 0.0);
    }

    #[test]
    fn test_theta_near_expiry_uses_longer_maturity() {
        let pricer = gbs(0.25, 1.0 / 365.0);
        let theta = finite_difference(&pricer, OptionType::Call, Greek::Theta, &GreeksConfig::default())
            .unwrap();
        assert!(theta.is_finite() && theta < 0.0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let pricer = gbs(0.25, 1.0);
        let config = GreeksConfig {
            spot_bump_relative: -0.01,
            ..GreeksConfig::default()
        };
        assert!(matches!(
            compute_greeks(&pricer, OptionType::Call, &config),
            Err(PricingError::Configuration(_))
        ));
    }

    #[test]
    fn test_pricer_left_untouched() {
        let pricer = gbs(0.25, 1.0);
        let before = *pricer.params();
        compute_greeks(&pricer, OptionType::Call, &GreeksConfig::default()).unwrap();
        assert_eq!(*pricer.params(), before);
    }
}
