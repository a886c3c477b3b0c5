//! Hostkit - sample host built on the hostkit framework.
//!
//! Runs the framework commands, the bundled sample plugin and the `config`
//! profile wizard.

use anyhow::Result;
use hostkit::host::EarlyArgs;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();

    // Setup logging before the command tree exists so discovery is traced too
    let verbose = EarlyArgs::scan(args.get(1..).unwrap_or_default()).verbose;
    let filter = if verbose { EnvFilter::new("debug") } else { EnvFilter::new("warn") };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();

    let code = hostkit::sample::host_app().run(args)?;
    std::process::exit(code);
}
