use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = uasrc_api::Args::parse();
	uasrc_api::run(args).await
}
