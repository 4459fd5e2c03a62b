//! Mathematical helpers shared by the pricing layers.
//!
//! - [`distributions`]: standard normal CDF/PDF, generic over `Float`
//! - [`statistics`]: mean, variance and standard error of sample slices

pub mod distributions;
pub mod statistics;
