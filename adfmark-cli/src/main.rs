// Command-line interface for adfmark
//
// This binary converts Markdown files into Atlassian Document Format (ADF)
// JSON and exposes debugging views over the conversion pipeline.
//
// The inspect command is an internal tool for aid in the development of the
// conversion engine; the views it renders come from src/transforms.rs.
//
// The main role of the adfmark program is converting. The engine lives in the
// adfmark crate; this binary layers configuration files, flags, and output
// handling on top of it.
//
// Converting:
//
// The conversion target is picked with --preset; all other knobs default from
// the preset and can be overridden per invocation.
// Usage:
//  adfmark <input> [--preset <p>] [--output <file>]           - Convert (default)
//  adfmark convert <input> [--preset <p>] [--output <file>]   - Same as above (explicit)
//  adfmark inspect <path> [<transform>]  - Render a pipeline view (defaults to "events-debug")
//  adfmark --list-transforms             - List available transforms
//
// Extra Parameters:
//
// Inspect-specific parameters can be passed using --extra-<parameter-name> <value>.
// The CLI layer strips the "extra-" prefix and passes the parameters to the transform.
// Example:
//  adfmark inspect notes.md events-debug --extra-show-spans

mod transforms;

use adfmark::{convert_with_warnings, ConvertOptions, Preset};
use adfmark_config::{AdfmarkConfig, Loader};
use clap::{Arg, ArgAction, ArgMatches, Command, ValueHint};
use std::collections::HashMap;
use std::fs;
use std::io::Read;

/// Parse extra-* arguments from command line args
/// Returns (cleaned_args_without_extras, extra_params_map)
///
/// Supports both:
/// - `--extra-<key> <value>` (explicit value)
/// - `--extra-<key>` (boolean flag, defaults to "true")
fn parse_extra_args(args: &[String]) -> (Vec<String>, HashMap<String, String>) {
    let mut cleaned_args = Vec::new();
    let mut extra_params = HashMap::new();
    let mut i = 0;

    while i < args.len() {
        let arg = &args[i];

        if let Some(key) = arg.strip_prefix("--extra-") {
            // Check if the next arg is a value or another flag/end
            let has_value = if i + 1 < args.len() {
                !args[i + 1].starts_with('-')
            } else {
                false
            };

            if has_value {
                extra_params.insert(key.to_string(), args[i + 1].clone());
                i += 2;
            } else {
                // No value, treat as boolean flag
                extra_params.insert(key.to_string(), "true".to_string());
                i += 1;
            }
            continue;
        }

        cleaned_args.push(arg.clone());
        i += 1;
    }

    (cleaned_args, extra_params)
}

fn build_cli() -> Command {
    Command::new("adfmark")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert Markdown to Atlassian Document Format (ADF) JSON")
        .long_about(
            "adfmark converts Markdown into the ADF JSON accepted by Jira and\n\
            Confluence APIs.\n\n\
            Commands:\n  \
            - convert: Convert a Markdown file to ADF JSON (default command)\n  \
            - inspect: View pipeline stages (event stream, document, warnings)\n\n\
            Presets:\n  \
            The --preset flag names the destination surface. Constructs the\n  \
            surface cannot render are downgraded with a warning: headings\n  \
            become bold paragraphs, comment-preset block quotes are unwrapped.\n\n\
            Examples:\n  \
            adfmark notes.md                         # Convert to ADF JSON (stdout)\n  \
            adfmark notes.md --preset comment        # Convert for a Jira comment\n  \
            adfmark notes.md --strict                # Abort instead of downgrading\n  \
            adfmark inspect notes.md                 # View the Markdown event stream\n  \
            adfmark inspect notes.md warnings        # View the conversion warning log"
        )
        .arg_required_else_help(true)
        .subcommand_required(false)
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
                .about("Convert a Markdown file to ADF JSON (default command)")
                .long_about(
                    "Convert a Markdown file to ADF JSON.\n\n\
                    The output document targets the surface named by --preset:\n  \
                    - default:  no surface-specific restrictions\n  \
                    - comment:  issue comments (no headings, no block quotes)\n  \
                    - task:     task descriptions (no headings)\n  \
                    - story:    story/issue descriptions (headings on opt-in)\n\n\
                    Lossy conversions are reported on stderr. With --strict the\n\
                    conversion aborts on unsupported headings and horizontal\n\
                    rules instead of downgrading them.\n\n\
                    Examples:\n  \
                    adfmark convert notes.md                     # Convert to stdout\n  \
                    adfmark convert notes.md -o notes.json       # Write to a file\n  \
                    adfmark convert - --preset comment           # Read from stdin\n  \
                    adfmark convert spec.md --preset story --use-headings"
                )
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
                        .help("Destination surface (default, comment, task, story)")
                        .value_parser(clap::builder::PossibleValuesParser::new([
                            "default", "comment", "task", "story",
                        ]))
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("use-headings")
                        .long("use-headings")
                        .help("Emit real heading nodes where the preset supports them")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("max-heading-level")
                        .long("max-heading-level")
                        .value_name("N")
                        .help("Downgrade headings deeper than this level (1-6)")
                        .value_parser(clap::value_parser!(u8).range(1..=6)),
                )
                .arg(
                    Arg::new("preserve-line-breaks")
                        .long("preserve-line-breaks")
                        .help("Turn soft line breaks into hard breaks instead of spaces")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("strict")
                        .long("strict")
                        .help("Abort on constructs that would otherwise downgrade")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("code-language")
                        .long("code-language")
                        .value_name("LANG")
                        .help("Language tag for fenced code blocks without an info string")
                        .value_hint(ValueHint::Other),
                )
                .arg(
                    Arg::new("warn-risky")
                        .long("warn-risky")
                        .help("Warn about nodes that render unreliably in the target context")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("compact")
                        .long("compact")
                        .help("Emit single-line JSON instead of pretty-printed output")
                        .action(ArgAction::SetTrue),
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
                .long_about(
                    "Render one stage of the conversion pipeline as text.\n\n\
                    Transforms:\n  \
                    - events-debug:  Markdown event stream, one line per event (default)\n  \
                    - events-json:   event stream with byte spans as JSON\n  \
                    - adf-json:      the converted ADF document as JSON\n  \
                    - warnings:      the conversion warning log\n\n\
                    Extra Parameters:\n  \
                    --extra-show-spans    Include byte ranges in events-debug output\n  \
                    --extra-preset <p>    Convert under a specific preset\n  \
                    --extra-pretty false  Single-line adf-json output\n\n\
                    Examples:\n  \
                    adfmark inspect notes.md                         # Event stream\n  \
                    adfmark inspect notes.md adf-json                # Converted document\n  \
                    adfmark inspect notes.md warnings --extra-preset comment"
                )
                .arg(
                    Arg::new("path")
                        .help("Path to the Markdown file, or '-' for stdin")
                        .required(true)
                        .index(1)
                        .value_hint(ValueHint::FilePath),
                )
                .arg(
                    Arg::new("transform")
                        .help("Transform to apply. Defaults to 'events-debug'")
                        .required(false)
                        .value_parser(clap::builder::PossibleValuesParser::new(
                            transforms::AVAILABLE_TRANSFORMS,
                        ))
                        .index(2)
                        .value_hint(ValueHint::Other),
                ),
        )
}

fn main() {
    env_logger::init();

    // Try to parse args. If no subcommand is provided, inject "convert"
    let args: Vec<String> = std::env::args().collect();

    // Parse extra-* arguments before clap processing
    let (cleaned_args, mut extra_params) = parse_extra_args(&args);

    let cli = build_cli();
    let matches = match cli.clone().try_get_matches_from(&cleaned_args) {
        Ok(m) => m,
        Err(e) => {
            // Check if this is a "missing subcommand" error by seeing if the
            // first arg looks like a file
            if cleaned_args.len() > 1
                && !cleaned_args[1].starts_with('-')
                && cleaned_args[1] != "convert"
                && cleaned_args[1] != "inspect"
                && cleaned_args[1] != "help"
            {
                // Inject "convert" as the subcommand
                let mut new_args = vec![cleaned_args[0].clone(), "convert".to_string()];
                new_args.extend_from_slice(&cleaned_args[1..]);

                match cli.try_get_matches_from(&new_args) {
                    Ok(m) => m,
                    Err(e2) => e2.exit(),
                }
            } else {
                e.exit();
            }
        }
    };

    if matches.get_flag("list-transforms") {
        handle_list_transforms_command();
        return;
    }

    let mut config = load_cli_config(matches.get_one::<String>("config").map(|s| s.as_str()));
    apply_config_overrides(&mut config, &mut extra_params);

    match matches.subcommand() {
        Some(("convert", sub_matches)) => {
            handle_convert_command(sub_matches, &config);
        }
        Some(("inspect", sub_matches)) => {
            let path = sub_matches
                .get_one::<String>("path")
                .expect("path is required");
            let transform = sub_matches
                .get_one::<String>("transform")
                .map(|s| s.as_str())
                .unwrap_or("events-debug");
            handle_inspect_command(path, transform, &extra_params, &config);
        }
        _ => {
            eprintln!("Unknown subcommand. Use --help for usage information.");
            std::process::exit(1);
        }
    }
}

/// Handle the convert command
fn handle_convert_command(sub_matches: &ArgMatches, config: &AdfmarkConfig) {
    let input = sub_matches
        .get_one::<String>("input")
        .expect("input is required");
    let source = read_source(input);

    let options = convert_options_from(sub_matches, config);
    log::debug!("converting '{input}' under the '{}' preset", options.preset);

    let conversion = convert_with_warnings(&source, options).unwrap_or_else(|e| {
        eprintln!("Conversion error: {e}");
        std::process::exit(1);
    });

    if config.output.show_warnings {
        for warning in &conversion.warnings {
            eprintln!("{warning}");
        }
    }

    let pretty = config.output.pretty && !sub_matches.get_flag("compact");
    let json = if pretty {
        conversion.document.to_json_pretty()
    } else {
        conversion.document.to_json()
    }
    .unwrap_or_else(|e| {
        eprintln!("Serialization error: {e}");
        std::process::exit(1);
    });

    match sub_matches.get_one::<String>("output") {
        Some(path) => {
            fs::write(path, json + "\n").unwrap_or_else(|e| {
                eprintln!("Error writing file '{path}': {e}");
                std::process::exit(1);
            });
        }
        None => println!("{json}"),
    }
}

/// Handle the inspect command
fn handle_inspect_command(
    path: &str,
    transform: &str,
    extra_params: &HashMap<String, String>,
    config: &AdfmarkConfig,
) {
    let source = read_source(path);

    let params = build_inspect_params(config, extra_params);
    let options: ConvertOptions = (&config.convert).into();

    let output =
        transforms::execute_transform(&source, transform, &options, &params).unwrap_or_else(|e| {
            eprintln!("Execution error: {e}");
            std::process::exit(1);
        });

    print!("{output}");
}

/// Handle the list-transforms command
fn handle_list_transforms_command() {
    println!("Available transforms:\n");
    println!("Stages:");
    println!("  events  - The Markdown event stream feeding the converter");
    println!("  adf     - The converted ADF document");
    println!("  warnings - The conversion warning log\n");

    println!("Available transform combinations:");
    for transform_name in transforms::AVAILABLE_TRANSFORMS {
        println!("  {transform_name}");
    }

    println!("\nExtra parameters (--extra-<name> [value]):");
    println!("  show-spans  - Include byte ranges in events-debug output");
    println!("  preset      - Convert under a specific preset");
    println!("  pretty      - Set to 'false' for single-line adf-json output");
}

fn load_cli_config(explicit_path: Option<&str>) -> AdfmarkConfig {
    let loader = Loader::new().with_optional_file("adfmark.toml");
    let loader = if let Some(path) = explicit_path {
        log::debug!("using config from: {path}");
        loader.with_file(path)
    } else {
        loader
    };

    loader.build().unwrap_or_else(|err| {
        eprintln!("Failed to load configuration: {err}");
        std::process::exit(1);
    })
}

/// Layer convert flags over the configured options.
fn convert_options_from(sub_matches: &ArgMatches, config: &AdfmarkConfig) -> ConvertOptions {
    let mut options: ConvertOptions = (&config.convert).into();

    if let Some(raw) = sub_matches.get_one::<String>("preset") {
        options.preset = raw.parse::<Preset>().unwrap_or_else(|err| {
            eprintln!("{err}");
            std::process::exit(1);
        });
    }
    if sub_matches.get_flag("use-headings") {
        options.use_headings = Some(true);
    }
    if let Some(level) = sub_matches.get_one::<u8>("max-heading-level") {
        options.max_heading_level = Some(*level);
    }
    if sub_matches.get_flag("preserve-line-breaks") {
        options.preserve_line_breaks = Some(true);
    }
    if sub_matches.get_flag("strict") {
        options.strict_mode = Some(true);
    }
    if let Some(lang) = sub_matches.get_one::<String>("code-language") {
        options.default_code_language = Some(lang.clone());
    }
    if sub_matches.get_flag("warn-risky") {
        options.warn_on_risky_nodes = Some(true);
    }

    options
}

fn apply_config_overrides(config: &mut AdfmarkConfig, extra_params: &mut HashMap<String, String>) {
    if let Some(raw) = extra_params.remove("show-spans") {
        config.inspect.show_spans = parse_bool_arg("show-spans", &raw);
    }
    if let Some(raw) = extra_params.remove("pretty") {
        config.output.pretty = parse_bool_arg("pretty", &raw);
    }
    if let Some(raw) = extra_params.remove("show-warnings") {
        config.output.show_warnings = parse_bool_arg("show-warnings", &raw);
    }
}

fn build_inspect_params(
    config: &AdfmarkConfig,
    overrides: &HashMap<String, String>,
) -> HashMap<String, String> {
    let mut params = HashMap::new();

    params.insert("show-spans".to_string(), config.inspect.show_spans.to_string());
    params.insert("pretty".to_string(), config.output.pretty.to_string());

    for (key, value) in overrides {
        params.insert(key.clone(), value.clone());
    }

    params
}

fn read_source(path: &str) -> String {
    if path == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .unwrap_or_else(|e| {
                eprintln!("Error reading stdin: {e}");
                std::process::exit(1);
            });
        buffer
    } else {
        fs::read_to_string(path).unwrap_or_else(|e| {
            eprintln!("Error reading file '{path}': {e}");
            std::process::exit(1);
        })
    }
}

fn parse_bool_arg(flag: &str, raw: &str) -> bool {
    match raw.to_lowercase().as_str() {
        "true" | "1" | "yes" | "y" => true,
        "false" | "0" | "no" | "n" => false,
        other => {
            eprintln!("Invalid boolean value '{other}' for --extra-{flag}");
            std::process::exit(1);
        }
    }
}
