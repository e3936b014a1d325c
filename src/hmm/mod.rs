pub mod decoder;
pub mod lattice;
pub mod model;
pub mod tagger;
