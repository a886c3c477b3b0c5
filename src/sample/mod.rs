//! The sample host shipped as the `hostkit` binary.

mod plugin;
mod profile;

pub use plugin::{PluginHelloCommand, SampleMessageProvider, SamplePlugin, SAMPLE_PLUGIN_ID};
pub use profile::{HostProfile, API_BASE_URLS, ENVIRONMENTS, LOG_LEVELS};

use crate::host::{ConfigWizard, HostApp, HostAppInfo};
use crate::plugin::StaticModule;
use crate::version::SemanticVersion;

/// Version the sample host reports to plugins.
pub const HOST_VERSION: SemanticVersion = SemanticVersion::new(0, 1, 0);

pub fn host_info() -> HostAppInfo {
    HostAppInfo::new(crate::APP_NAME, HOST_VERSION)
}

/// The sample host: framework commands, the sample plugin and the `config`
/// wizard writing [`HostProfile`] profiles.
pub fn host_app() -> HostApp {
    let wizard = ConfigWizard::new(HostProfile::for_profile, HostProfile::prompt)
        .with_profile_shape(HostProfile::is_profile);

    HostApp::new(host_info())
        .module(StaticModule::new(crate::APP_NAME).with_marker(SamplePlugin::marker()))
        .config_wizard(wizard)
}
