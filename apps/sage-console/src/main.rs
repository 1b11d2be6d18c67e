// crates.io
use clap::Parser;
// self
use sage_console::Args;

fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = Args::parse();
	sage_console::run(args)
}
