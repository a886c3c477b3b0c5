//! Configuration profiles.
//!
//! A profile is a JSON document combining host-owned core settings with
//! defaults contributed by plugins. [`ProfileStore`] keeps them as
//! `{app}.{profile}.json` files and bootstraps `dev`, `test` and `prod` on
//! first use; [`apply_plugin_defaults`] fills in plugin sections without
//! touching values that are already there.

mod document;
mod error;
mod schema;
pub mod shape;
mod store;

pub use document::{CaseInsensitiveMap, PluginSection, PluginSettings, ProfileDocument};
pub use error::{ProfileError, ProfileResult};
pub use schema::apply_plugin_defaults;
pub use store::{sanitize, ProfileStore, DEFAULT_PROFILES};
pub(crate) use store::write_json;
