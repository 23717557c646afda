mod input;
mod metadata;
mod model;
mod scalar;

pub use input::Input;
pub use metadata::Metadata;
pub use model::Model;

pub(crate) use scalar::{deserialize_optional_scalar, deserialize_scalar};
