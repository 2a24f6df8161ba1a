//! Text analysis for job titles.
//!
//! This module holds the lexical normalizer: the char filters that strip
//! recruitment noise, the lexicon they read, and the fixed-order pipeline
//! that chains them.

pub mod char_filter;
pub mod lexicon;
pub mod normalizer;
