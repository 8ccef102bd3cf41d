pub mod error;
pub mod types;
pub mod value;

pub use error::SchemaUiError;
pub use types::*;
pub use value::*;
