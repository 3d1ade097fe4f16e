//! momobs_gazebo_bringup CLI

use clap::{Parser, Subcommand};
use momobs_gazebo_bringup::{
    ament::AmentIndex,
    condition::is_truthy,
    description::{PlainTemplate, TemplateProcessor, XacroCommand},
    generate_record,
    sequencer::{LaunchFlags, LaunchSequencer, FORCE_ARG, RESIDUALS_ARG},
};
use std::{
    path::{Path, PathBuf},
    process,
};

#[derive(Parser)]
#[command(name = "momobs_gazebo_bringup")]
#[command(about = "Gazebo bringup launch sequence for the ANYmal C quadruped", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, global = true)]
    verbose: bool,

    #[arg(short, long, global = true)]
    quiet: bool,

    /// Description template processor
    #[arg(long, global = true, default_value = "xacro")]
    xacro: PathBuf,

    /// Read the description file as-is instead of running xacro
    #[arg(long, global = true)]
    plain_description: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the ordered action sequence, conditions included
    Describe {
        /// Launch arguments (force:=true, residuals:=true)
        #[arg(value_parser = parse_launch_arg)]
        args: Vec<(String, String)>,

        /// Output file path
        #[arg(short, long, default_value = "launch.json")]
        output: PathBuf,
    },

    /// Evaluate the sequence and write the records an executor runs
    Record {
        /// Launch arguments (force:=true, residuals:=true)
        #[arg(value_parser = parse_launch_arg)]
        args: Vec<(String, String)>,

        /// Output file path
        #[arg(short, long, default_value = "record.json")]
        output: PathBuf,
    },
}

fn parse_launch_arg(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once(":=")
        .ok_or_else(|| format!("Invalid launch argument format: {}", s))?;
    if name != FORCE_ARG && name != RESIDUALS_ARG {
        return Err(format!(
            "Unknown launch argument '{}' (expected {} or {})",
            name, FORCE_ARG, RESIDUALS_ARG
        ));
    }
    if !matches!(value.to_lowercase().as_str(), "true" | "false" | "1" | "0") {
        return Err(format!(
            "Invalid value '{}' for '{}' (expected true, false, 1 or 0)",
            value, name
        ));
    }
    Ok((name.to_string(), value.to_string()))
}

fn flags_from_args(args: &[(String, String)]) -> LaunchFlags {
    let mut flags = LaunchFlags::default();
    for (name, value) in args {
        match name.as_str() {
            FORCE_ARG => flags.force = is_truthy(value),
            RESIDUALS_ARG => flags.residuals = is_truthy(value),
            _ => {}
        }
    }
    flags
}

fn main() {
    let cli = Cli::parse();

    // Set up logging
    let log_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let processor: Box<dyn TemplateProcessor> = if cli.plain_description {
        Box::new(PlainTemplate)
    } else {
        Box::new(XacroCommand::new(cli.xacro.clone()))
    };

    let result = match &cli.command {
        Commands::Describe { args, output } => {
            describe_and_write(&flags_from_args(args), processor.as_ref(), output)
        }
        Commands::Record { args, output } => {
            record_and_write(&flags_from_args(args), processor.as_ref(), output)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn describe_and_write(
    flags: &LaunchFlags,
    processor: &dyn TemplateProcessor,
    output: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let index = AmentIndex::from_env();
    let launch = LaunchSequencer::new(&index, processor).build(flags)?;

    let json = serde_json::to_string_pretty(&launch)?;
    std::fs::write(output, json)?;

    log::info!(
        "Wrote {} launch actions to {}",
        launch.len(),
        output.display()
    );
    Ok(())
}

fn record_and_write(
    flags: &LaunchFlags,
    processor: &dyn TemplateProcessor,
    output: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let index = AmentIndex::from_env();
    let launch = LaunchSequencer::new(&index, processor).build(flags)?;
    let record = generate_record(&launch, &index)?;

    let json = record.to_json()?;
    std::fs::write(output, json)?;

    log::info!("Generated record.json: {}", output.display());
    log::info!(
        "  {} nodes, {} includes, {} timers",
        record.node.len(),
        record.include.len(),
        record.timer.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_launch_arg() {
        assert_eq!(
            parse_launch_arg("force:=true"),
            Ok(("force".to_string(), "true".to_string()))
        );
        assert!(parse_launch_arg("residuals:=FALSE").is_ok());
        assert!(parse_launch_arg("residuals:=1").is_ok());
        assert!(parse_launch_arg("force=true").is_err());
        assert!(parse_launch_arg("gui:=true").is_err());
    }

    #[test]
    fn test_misspelled_value_is_rejected() {
        let err = parse_launch_arg("force:=ture").unwrap_err();
        assert!(err.contains("ture"));
        assert!(parse_launch_arg("force:=yes").is_err());
        assert!(parse_launch_arg("force:=").is_err());
    }

    #[test]
    fn test_flags_from_args() {
        let args = vec![
            parse_launch_arg("force:=True").unwrap(),
            parse_launch_arg("residuals:=0").unwrap(),
        ];
        let flags = flags_from_args(&args);
        assert!(flags.force);
        assert!(!flags.residuals);
    }
}
