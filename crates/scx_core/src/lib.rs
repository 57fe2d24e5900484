//! Reader and writer for SCX 1.21 scenario containers.
//!
//! A container is a short plain prologue followed by a raw DEFLATE stream
//! holding eleven sections in a fixed order. [`Scenario::decode`] and
//! [`Scenario::encode`] convert between the bytes and the in-memory model;
//! both directions are exact inverses for well-formed input.

pub mod bitmap;
pub mod cursor;
pub mod deflate;
pub mod error;
pub mod layout;
pub mod records;
pub mod scenario;
pub mod sections;

pub use bitmap::{Bitmap, ImageCodec};
pub use cursor::ByteCursor;
pub use error::{ErrorCode, Result, ScxError};
pub use flate2::Compression;
pub use layout::{BodyLayout, ByteRange, SectionId, SectionLayout};
pub use scenario::{CONTAINER_VERSION, Scenario};
