//! Recombining binomial lattice.
//!
//! # Algorithm
//!
//! ```text
//! dt = t / n,  u = exp(σ√dt),  d = 1/u,  p = (exp(b·dt) - d) / (u - d)
//!
//! terminal:   V[i] = max(z·(S·u^i·d^(n-i) - K), 0)            i = 0..n
//! step j:     C[i] = e^(-r·dt)·(p·V[i+1] + (1-p)·V[i])         i = 0..j
//! European:   V[i] = C[i]
//! American:   V[i] = max(z·(S·u^i·d^(j-i) - K), C[i])
//! ```
//!
//! The outer loop over `j` is strictly sequential; the node loop inside one
//! step can run on rayon (see [`ExecutionMode`](crate::ExecutionMode)).

mod binomial;
mod error;

pub use binomial::{BinomialTree, LatticeState, DEFAULT_STEPS, PARALLEL_NODE_THRESHOLD};
pub use error::LatticeError;
