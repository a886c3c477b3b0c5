//! Host application framework.
//!
//! A host is described by [`HostAppInfo`] and assembled with [`HostApp`]:
//! settings are resolved from `--config`/`--env-prefix` (or their
//! environment variables), framework services and commands are registered,
//! compatible plugins contribute their own, and the optional `config`
//! wizard writes profiles enriched with plugin defaults.
//!
//! ```no_run
//! use hostkit::host::{HostApp, HostAppInfo};
//! use hostkit::version::SemanticVersion;
//!
//! let info = HostAppInfo::new("acme", SemanticVersion::new(1, 0, 0));
//! let code = HostApp::new(info).run(std::env::args())?;
//! std::process::exit(code);
//! # Ok::<(), anyhow::Error>(())
//! ```

mod app;
mod commands;
mod greeting;
mod info;
mod prompt;
mod settings;
mod wizard;

pub use app::HostApp;
pub use commands::{HelloCommand, InfoCommand};
pub use greeting::{Clock, GreetingService, SystemClock};
pub use info::HostAppInfo;
pub use prompt::{ConsolePrompter, Prompter};
pub use settings::{EarlyArgs, HostOptions, HostSettings};
pub use wizard::{
    ConfigWizard, ConfigWizardCommand, ProfileRequest, WrittenProfile, CREATE_NEW,
    DEFAULT_NEW_PROFILE,
};
