//! Build command - construct the tax export package and emit it as JSON

use crate::cmd::PackageArgs;
use clap::Args;

#[derive(Args, Debug)]
pub struct BuildCommand {
    #[command(flatten)]
    package: PackageArgs,

    /// Print only the package's SHA-256 fingerprint
    #[arg(long)]
    fingerprint: bool,

    /// Emit compact (canonical) JSON instead of pretty-printed
    #[arg(long)]
    compact: bool,
}

impl BuildCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let package = self.package.build()?;
        if self.fingerprint {
            println!("{}", package.fingerprint()?);
        } else if self.compact {
            println!("{}", package.to_canonical_json()?);
        } else {
            println!("{}", serde_json::to_string_pretty(&package)?);
        }
        Ok(())
    }
}
