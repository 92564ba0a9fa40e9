//! Declarative application definitions for `cmdroute-core`.
//!
//! An [`ApplicationDefinition`] describes options, arguments and a command
//! tree in YAML or JSON. [`ApplicationDefinition::build`] validates it into
//! an [`Application`](cmdroute_core::Application) and
//! [`ApplicationDefinition::resolver`] returns the matching resolver.
//!
//! # Quick start
//!
//! ```no_run
//! use cmdroute_config::ApplicationDefinition;
//! use cmdroute_core::RawArgs;
//!
//! let definition = ApplicationDefinition::load("app.yml").unwrap();
//! let app = definition.build().unwrap();
//! let raw = RawArgs::parse("package add widget");
//! let resolved = definition.resolver().resolve(&raw, &app, false).unwrap();
//! println!("{}", resolved.command().name());
//! ```

mod definition;
mod error;
mod loader;

pub use definition::{
    ApplicationDefinition, ArgumentDefinition, CommandDefinition, OptionDefinition,
};
pub use error::{ConfigError, Result};
pub use loader::DefinitionFormat;
