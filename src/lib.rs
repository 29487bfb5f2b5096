//! Static quality analysis for Python source.
//!
//! Each file is parsed once into a [`source::SourceUnit`], then four
//! independent analyzers (metrics, security, performance, style) run over it
//! and [`analysis::ScoreAggregator`] folds their reports into a 0-100 score.

pub mod analysis;
pub mod config;
pub mod discover;
pub mod report;
pub mod source;
