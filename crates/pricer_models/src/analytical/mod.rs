//! Analytical (closed-form) reference pricing.
//!
//! The generalised Black-Scholes formula is the oracle the lattice and
//! Monte Carlo engines are measured against.

pub mod gbs;

pub use gbs::GeneralizedBlackScholes;
