//! Finite-difference greeks across the three pricers.

use approx::assert_relative_eq;
use pricer_core::types::{ExerciseStyle, OptionType};
use pricer_models::analytical::GeneralizedBlackScholes;
use pricer_models::instruments::ContractParameters;
use pricer_pricing::greeks::{compute_greeks, finite_difference, Greek, GreeksConfig};
use pricer_pricing::lattice::BinomialTree;
use pricer_pricing::mc::{
    MonteCarloEngine, NormalInnovations, SimulationConfig, VanillaPayoff, WienerPath,
};

fn haug() -> ContractParameters<f64> {
    ContractParameters::new(50.0, 50.0, 5.0 / 12.0, 0.1, 0.1, Some(0.4)).unwrap()
}

#[test]
fn test_lattice_greeks_track_closed_form() {
    let params = haug();
    let gbs = GeneralizedBlackScholes::new(params).unwrap();
    let lattice = BinomialTree::new(params, 500, ExerciseStyle::European).unwrap();

    let greeks = compute_greeks(&lattice, OptionType::Call, &GreeksConfig::default()).unwrap();
    assert_relative_eq!(greeks.price, lattice.call());
    assert_relative_eq!(greeks.delta, gbs.delta(OptionType::Call), epsilon = 1e-3);
    assert_relative_eq!(greeks.vega, gbs.vega(), epsilon = 5e-2);
    assert!(greeks.theta < 0.0);
    assert!(greeks.rho < 0.0);
    assert!(greeks.carry > 0.0);
}

#[test]
fn test_lattice_gamma_needs_wider_spot_bump() {
    // Node placement moves with S, so a narrow bump picks up lattice noise.
    let params = haug();
    let gbs = GeneralizedBlackScholes::new(params).unwrap();
    let lattice = BinomialTree::new(params, 500, ExerciseStyle::European).unwrap();
    let wide = GreeksConfig::builder().spot_bump_relative(0.05).build().unwrap();

    let gamma = finite_difference(&lattice, OptionType::Call, Greek::Gamma, &wide).unwrap();
    assert_relative_eq!(gamma, gbs.gamma(), epsilon = 2e-3);
}

#[test]
fn test_american_put_greeks() {
    let lattice = BinomialTree::new(haug(), 300, ExerciseStyle::American).unwrap();
    let greeks = compute_greeks(&lattice, OptionType::Put, &GreeksConfig::default()).unwrap();

    assert!(greeks.delta < 0.0 && greeks.delta > -1.0);
    assert!(greeks.vega > 0.0);
    assert_relative_eq!(greeks.delta, -0.4141, epsilon = 5e-3);
}

#[test]
fn test_monte_carlo_delta_with_common_random_numbers() {
    let params = ContractParameters::new(100.0, 100.0, 0.25, 0.05, 0.05, Some(0.3)).unwrap();
    let gbs = GeneralizedBlackScholes::new(params).unwrap();
    let config = SimulationConfig::builder()
        .mc_loops(20)
        .mc_paths(5_000)
        .path_length(4)
        .antithetic(true)
        .build()
        .unwrap();
    let engine = MonteCarloEngine::builder()
        .config(config)
        .params(params)
        .innovations(NormalInnovations::new(77))
        .path_generator(WienerPath)
        .payoff(VanillaPayoff)
        .build()
        .unwrap();

    let delta = finite_difference(&engine, OptionType::Call, Greek::Delta, &GreeksConfig::default())
        .unwrap();
    assert_relative_eq!(delta, gbs.delta(OptionType::Call), epsilon = 2e-2);
}

#[test]
fn test_vega_requires_volatility() {
    // The closed form cannot be built without sigma, so the error surfaces
    // from construction; a lattice likewise refuses.
    let no_vol = ContractParameters::new(50.0, 50.0, 1.0, 0.1, 0.1, None).unwrap();
    assert!(GeneralizedBlackScholes::new(no_vol).is_err());
    assert!(BinomialTree::new(no_vol, 10, ExerciseStyle::European).is_err());
}
