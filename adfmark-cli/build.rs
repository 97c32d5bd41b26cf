use clap::{Arg, ArgAction, Command, ValueHint};
use clap_complete::{generate_to, shells::*};
use std::env;
use std::io::Error;

// Mirror of the transforms from src/transforms.rs
// We need to duplicate this here since build scripts can't access src/ modules
const AVAILABLE_TRANSFORMS: &[&str] = &["events-json", "events-debug", "adf-json", "warnings"];

const PRESETS: &[&str] = &["default", "comment", "task", "story"];

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let mut cmd = Command::new("adfmark")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert Markdown to Atlassian Document Format (ADF) JSON")
        .arg_required_else_help(true)
        .arg(
            Arg::new("list-transforms")
                .long("list-transforms")
                .help("List available transforms")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .help("Path to an adfmark.toml configuration file")
                .value_hint(ValueHint::FilePath)
                .global(true),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert a Markdown file to ADF JSON")
                .arg(
                    Arg::new("input")
                        .help("Input Markdown file path, or '-' for stdin")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("preset")
                        .long("preset")
                        .help("Destination surface")
                        .value_parser(clap::builder::PossibleValuesParser::new(PRESETS)),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output file path (defaults to stdout)")
                        .value_hint(ValueHint::FilePath),
                ),
        )
        .subcommand(
            Command::new("inspect")
                .about("Inspect pipeline stages of a Markdown conversion")
                .arg(
                    Arg::new("path")
                        .help("Path to the Markdown file")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("transform")
                        .help("Transform to apply")
                        .value_parser(clap::builder::PossibleValuesParser::new(
                            AVAILABLE_TRANSFORMS,
                        ))
                        .index(2)
                        .value_hint(ValueHint::Other),
                ),
        );

    // Generate completions for bash
    generate_to(Bash, &mut cmd, "adfmark", &outdir)?;

    // Generate completions for zsh
    generate_to(Zsh, &mut cmd, "adfmark", &outdir)?;

    // Generate completions for fish
    generate_to(Fish, &mut cmd, "adfmark", &outdir)?;

    println!("cargo:warning=Shell completions generated in {outdir:?}");

    Ok(())
}
