//! Declarative command line framework.
//!
//! Commands declare their fields as [`ArgSpec`]s in a [`CommandSchema`]. The
//! clap parser is derived from the schemas, raw values are bound into
//! [`BoundArgs`], and resolution prepares the output before the command body
//! runs.

mod bind;
mod parser;
mod resolve;
mod schema;
mod spec;
mod streams;
pub mod validators;

pub use bind::{BoundArgs, Value, bind, bind_input, bind_output};
pub use parser::{GlobalArgs, RawArgs, RawValue, build_cli, command_for};
pub use resolve::resolve;
pub use schema::{CommandSchema, ResolveFn, RunFn, SubCommand};
pub use spec::{ArgSpec, Arity, BindFn, ValidateFn, ValueKind};
pub use streams::{InputStream, OutputTarget};
