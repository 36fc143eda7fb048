//! Audio transcoding over decoded WAVE forms
//!
//! - `mulaw` holds the per-sample G.711 encoder
//! - `convert` rebuilds a PCM form as a mu-law form

pub mod convert;
pub mod mulaw;

pub use convert::{convert_to_mu_law, to_mu_law};
pub use mulaw::{encode_samples, linear_to_mulaw};
