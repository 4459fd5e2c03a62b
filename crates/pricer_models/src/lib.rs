//! # Pricer Models (L2: Business Logic)
//!
//! Contract data and the pricer contract shared by every engine.
//!
//! This crate provides:
//! - [`instruments::ContractParameters`]: immutable `{S, K, t, r, b, sigma}` bundle
//!   with a validating builder and copy-and-perturb helpers
//! - [`instruments::OptionPricer`]: the `params` / `with_params` / `call` / `put`
//!   contract consumed by the greeks helper and the CLI
//! - [`analytical::GeneralizedBlackScholes`]: the cost-of-carry closed form used
//!   as a reference price for the numerical engines
//!
//! ## Cost of carry
//!
//! | b | Model |
//! |---|-------|
//! | `r` | Black-Scholes stock option |
//! | `r - q` | Merton, continuous dividend yield q |
//! | `0` | Black-76 futures option |
//! | `r - rf` | Garman-Kohlhagen currency option |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]

pub mod analytical;
pub mod instruments;
