//! `mcpost` is a small toolkit for post-processing Monte Carlo transport
//! outputs
//!
#![doc = include_str!("../readme.md")]
#![deny(missing_docs, missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

// Re-exports of toolkit crates.
#[doc(inline)]
pub use mcpost_utils as utils;

#[cfg(feature = "particles")]
#[cfg_attr(docsrs, doc(cfg(feature = "particles")))]
#[doc(inline)]
pub use mcpost_particles as particles;

#[cfg(feature = "tally")]
#[cfg_attr(docsrs, doc(cfg(feature = "tally")))]
#[doc(inline)]
pub use mcpost_tally as tally;
