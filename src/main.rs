use anyhow::Result;
use clap::Parser;
use cv_profile_image::app_log;
use cv_profile_image::cli::{handle_command, ProfileImageCli};
use cv_profile_image::logging::init_logging;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = ProfileImageCli::parse();

    // Initialize logging first
    init_logging(&cli.log_file)?;
    app_log!(info, "Starting cv-profile-image");

    handle_command(cli).await
}
