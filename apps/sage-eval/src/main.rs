// crates.io
use clap::Parser;
// self
use sage_eval::Args;

fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = Args::parse();
	sage_eval::run(args)
}
