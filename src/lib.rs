//! Part-of-speech tagging with a hidden Markov model.
//!
//! An [`HmmModel`] holds sparse start, transition and emission tables over an
//! ordered [`TagSet`]. [`decode`] (or a [`ViterbiTagger`] obtained from the
//! model) finds the most likely tag sequence for a sentence with exact
//! Viterbi search. Missing table entries read as [`SMOOTHING`], so unseen
//! tokens never make decoding fail.
//!
//! ```
//! use hmmpos::{decode, HmmModel};
//!
//! let model = HmmModel::builder()
//!     .tags(["NOUN", "VERB"])
//!     .start("NOUN", 0.6)
//!     .start("VERB", 0.4)
//!     .transition("NOUN", "VERB", 0.8)
//!     .emission("NOUN", "dog", 0.5)
//!     .emission("VERB", "runs", 0.6)
//!     .build()
//!     .unwrap();
//! assert_eq!(decode(&model, &["dog", "runs"]).unwrap(), ["NOUN", "VERB"]);
//! ```

pub mod dataset;
mod error;
pub mod evaluation;
pub mod hmm;
pub mod tagset;
pub mod text;

pub use dataset::{Dataset, Sentence};
pub use error::{Error, Result};
pub use evaluation::{Estimation, Evaluation};
pub use hmm::{
    decoder::{decode, ViterbiTagger},
    lattice::Numeric,
    model::{HmmModel, HmmModelBuilder, SMOOTHING},
    tagger::Tagger,
};
pub use tagset::{StringTable, TagSet};
