use std::fs;

use color_eyre::eyre::{Context, Result, bail};
use log::{LevelFilter, info};
use plc::{
  cli::{Cli, Commands},
  pipeline,
};
use plc_config::Config;

fn main() -> Result<()> {
  color_eyre::install()?;

  let cli = Cli::parse_args();

  // Initialize logging first so we can log during command handling
  env_logger::Builder::new()
    .filter_level(if cli.verbose {
      LevelFilter::Debug
    } else {
      LevelFilter::Info
    })
    .write_style(env_logger::WriteStyle::Always)
    .init();

  match &cli.command {
    Commands::Init {
      output,
      format,
      force,
    } => {
      if output.exists() && !force {
        bail!(
          "Configuration file already exists: {}. Use --force to overwrite.",
          output.display()
        );
      }

      if let Some(parent) = output.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
      {
        fs::create_dir_all(parent).wrap_err_with(|| {
          format!("Failed to create directory: {}", parent.display())
        })?;
        info!("Created directory: {}", parent.display());
      }

      Config::generate_default_config(format, output).wrap_err_with(|| {
        format!("Failed to generate configuration file: {}", output.display())
      })?;

      info!(
        "Configuration file created successfully. List your pages in it and \
         run `plc convert`."
      );
      Ok(())
    },

    Commands::ExportTemplates { output_dir, force } => {
      Config::export_templates(output_dir, *force).wrap_err_with(|| {
        format!("Failed to export templates to {}", output_dir.display())
      })
    },

    command @ Commands::Convert { .. } => {
      let mut config = Config::load(&cli.config_files, &cli.config_overrides)
        .wrap_err("Failed to load configuration")?;
      command.merge_into(&mut config)?;
      config.validate()?;
      config.validate_paths()?;

      info!("Output directory: {}", config.output_dir.display());
      pipeline::run(&config)
    },
  }
}
