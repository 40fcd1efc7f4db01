//! Deep Note Generation Backend
//!
//! This crate turns a run configuration into a deep note graph description:
//! many sawtooth voices starting at random pitches and converging on a fixed
//! six-octave chord.
//!
//! # Overview
//!
//! Generation is a pure function of the configuration and a seed:
//!
//! - **Frequencies** - Random sorted fundamentals and the fixed target chord
//! - **Drift** - Seeded quadratic noise wobbling start and target pitches
//! - **Envelopes** - Pitch sweep, master filter and amplitude envelopes
//! - **Voices** - Oscillator, optional tracking lowpass and pan per voice
//! - **Mix** - Summation, optional master filter and limiter, output bus
//!
//! The six variants are entries in a strategy table ([`variant`]) composed
//! from these parts.
//!
//! # Determinism
//!
//! A single PCG32 generator is seeded once per run and consumed in a fixed
//! order. Given the same configuration and seed the graph, and therefore its
//! canonical hash, is identical across runs.
//!
//! # Example
//!
//! ```
//! use deepnote_backend_audio::generate;
//! use deepnote_spec::{Configuration, Variant};
//!
//! let config = Configuration::for_variant(Variant::Thx3).num_voices(12);
//! let result = generate(&config, 42).unwrap();
//!
//! assert_eq!(result.graph.name, "THX3");
//! assert_eq!(result.graph.count("saw"), 12);
//! ```

pub mod drift;
pub mod envelope;
pub mod error;
pub mod frequency;
pub mod generate;
pub mod mix;
pub mod rng;
pub mod variant;
pub mod voice;

pub use error::{GraphError, GraphResult};
pub use generate::{generate, generate_from_profile, GenerateResult};
pub use variant::{profile, VariantProfile};
pub use voice::{Voice, VoiceChain};
