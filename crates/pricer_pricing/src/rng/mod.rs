//! # Random Number Generation
//!
//! Seeded pseudo-random streams for the Monte Carlo engine.
//!
//! - **Reproducibility**: every generator is built from a 64-bit seed
//! - **Per-loop streams**: [`PricerRng::for_stream`] derives an independent
//!   generator for each simulation loop, so a loop draws the same numbers
//!   whether loops run sequentially or on the rayon pool
//! - **Batch fills**: `fill_*` write into caller-owned `&mut [f64]` slices
//!
//! ## Usage Example
//!
//! ```rust
//! use pricer_pricing::rng::PricerRng;
//!
//! let mut rng = PricerRng::from_seed(12345);
//! let uniform_value = rng.gen_uniform();
//! assert!((0.0..1.0).contains(&uniform_value));
//!
//! // Loop 3 of a run seeded with 12345
//! let mut loop_rng = PricerRng::for_stream(12345, 3);
//! let mut buffer = vec![0.0; 1000];
//! loop_rng.fill_normal(&mut buffer);
//! ```

mod prng;

pub use prng::PricerRng;
