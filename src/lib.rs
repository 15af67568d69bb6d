//! Declarative binary struct layouts: descriptors, fixed/variable-size fields, and a
//! (de)serialization engine for hand-crafted binary protocols and file formats resembling C
//! packed structures.
//!
//! Three pieces compose a wire type:
//! - a [`serializer::Serializer`] describes how one field's value turns into bytes and back;
//! - a [`descriptor::StructDescriptor`], built through [`descriptor::StructDescriptor::build`],
//!   orders named fields into an aggregate and derives its fixed size / size class;
//! - [`struct_value::StructValue`] is a live, descriptor-bound instance, read/written by field
//!   name and (de)serialized through [`descriptor::DescriptorOps`].
//!
//! There is no magic, framing, or length prefix at an aggregate boundary: a variable-size-tail
//! (VST) field's length is recovered at parse time from the remaining buffer, never encoded.
#![allow(clippy::too_many_arguments)]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod descriptor;
pub mod endian;
pub mod engine;
pub mod error;
pub mod serializer;
pub mod settings;
pub mod struct_value;
pub mod validator;
pub mod value;

pub use descriptor::{DescriptorOps, Field, StructDescriptor, StructDescriptorBuilder};
pub use endian::{Endian, ResolvedEndian};
pub use error::Error;
pub use settings::{ResolvedSettings, Settings};
pub use struct_value::StructValue;
pub use validator::Validator;
pub use value::Value;
