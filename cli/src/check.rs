#![deny(missing_docs)]

//! # Check Command
//!
//! Re-imports a JSON export and runs the consistency checks over it.

use crate::error::{CliError, CliResult};
use botapi_core::ApiSpec;
use botapi_spec::JsonSource;
use std::path::PathBuf;

/// Arguments for the check command.
#[derive(clap::Args, Debug, Clone)]
pub struct CheckArgs {
    /// Path to a `spec.json` produced by `generate`.
    #[clap(long, env = "BOTAPI_INPUT", default_value = "out/spec.json")]
    pub input: PathBuf,
}

/// Executes the check.
pub fn execute(args: &CheckArgs) -> CliResult<()> {
    println!("Checking {:?}...", args.input);

    let source = JsonSource::from_path(&args.input)?;
    let spec = ApiSpec::from_source(&source)?;

    if let Err(err) = spec.self_check() {
        println!("{}", err);
        return Err(CliError::General(format!(
            "{:?} is not a consistent spec",
            args.input
        )));
    }

    println!(
        "Bot API v{}: {} types, {} methods, no problems found.",
        spec.version(),
        spec.types().count(),
        spec.methods().count()
    );
    Ok(())
}
