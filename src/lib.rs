//! Streaming context-mixing bit predictor in the paq8hp lineage.
//!
//! Before each bit of the input stream, [`Predictor::p`] gives the
//! probability that the bit is 1 as a 12-bit number; after the bit is
//! known, [`Predictor::update`] feeds it back through every model. The
//! predictor is the probability source for an arithmetic coder, which is
//! the caller's side of the contract, as is all I/O:
//!
//! ```
//! use hpaq::{Config, Predictor};
//!
//! let cfg = Config::new(2).unwrap();
//! let mut p = Predictor::new(&cfg);
//! for byte in b"abracadabra" {
//!     for i in (0..8).rev() {
//!         let bit = (byte >> i) & 1;
//!         let _prob = p.p(); // hand to the coder
//!         p.update(bit as i32);
//!     }
//! }
//! ```
//!
//! [`ByteMixer`] is an optional adapter that accumulates byte-level
//! probabilities from several predictors into the input frame of an
//! external sequence model.

mod apm;
mod buffer;
mod byte_mixer;
mod config;
mod context;
mod context_map;
mod context_model;
mod error;
mod hash_table;
mod ilog;
mod logistic;
mod mixer;
mod predictor;
mod random;
mod record_model;
mod run_map;
mod sparse_model;
mod state_table;
mod stationary;
mod statemap;
mod word_model;

pub use crate::{
    byte_mixer::{ByteMixer, SequenceModel},
    config::Config,
    error::ConfigError,
    predictor::Predictor,
};
