//! Host side of the schema interpreter: the built-in apps, the prompt shell,
//! and [`Session`], which ties a schema to an interpreter and dispatcher.

pub mod apps;
pub mod session;
pub mod shell;

pub use apps::AppKind;
pub use session::Session;
pub use shell::{select_app, EXAMPLE_PROMPTS};
