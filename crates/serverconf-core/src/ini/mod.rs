//! INI text format: document model and codec.
//!
//! ```text
//! [Server]
//! host = localhost
//! port = 3080
//! images_path = /home/user/images
//! ```

pub mod codec;
pub mod document;
