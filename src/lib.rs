#![cfg_attr(not(feature = "std"), no_std)]

//! A self-describing, recursively composable datatype descriptor: the
//! in-memory model, its three incompatible on-disk wire encodings, a size
//! predictor that can never drift from the encoder, and the ancillary
//! copy/reset/free/sharing/dump operations a surrounding object-header
//! message slot expects.

extern crate alloc;

pub mod class;
mod codec;
mod datatype;
pub mod dump;
pub mod error;
mod header;
pub mod io;
pub mod message;
pub mod ops;
pub mod share;
mod size;
pub mod version;

pub use codec::{decode, encode};
pub use datatype::Datatype;
pub use error::{Error, Result};
pub use size::predicted_size;
pub use version::{select_version, Version};
