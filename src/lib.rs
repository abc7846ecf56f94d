//! bdelta: a line-granular binary diff/patch engine.
//!
//! The crate provides:
//! - A line splitter and equivalence-class index (`line`, `equivalence`)
//! - A longest-common-run match finder and block recursor (`matcher`)
//! - A binary delta codec — encode, decode, compose, fold (`delta`)
//! - A whitespace-normalization filter (`ws`)
//! - File-oriented helpers (`io`)
//! - An optional CLI (`cli` feature)
//!
//! # Quick Start
//!
//! ```
//! use bdelta::engine::{bdiff, patches};
//!
//! let source = b"hello\nold\nworld\n";
//! let target = b"hello\nnew\nworld\n";
//!
//! let delta = bdiff(source, target).unwrap();
//! let decoded = patches(source, &[&delta]).unwrap();
//! assert_eq!(decoded, target);
//! ```

pub mod delta;
pub mod engine;
pub mod equivalence;
pub mod io;
pub mod line;
pub mod matcher;
pub mod ws;

#[cfg(feature = "cli")]
pub mod cli;
