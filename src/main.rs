//! Command that decodes UUIDv1 values, or prints or saves ranges and combinations of them

use std::{
    io::{self, Write},
    path::PathBuf,
    process::ExitCode,
};

use anyhow::Context;
use clap::{Arg, ArgMatches, Command};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuidv1::{sandwich, sink, v1, Error, Report, Variant};

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let mut cmd = command();
    let matches = match cmd.try_get_matches_from_mut(std::env::args_os()) {
        Ok(matches) => matches,
        Err(e) => e.exit(),
    };
    if matches.subcommand().is_none() {
        return match cmd.print_help() {
            Ok(()) => ExitCode::SUCCESS,
            Err(_) => ExitCode::FAILURE,
        };
    }

    match process_subcommand(&matches, io::stdout().lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Builds the command tree.
fn command() -> Command {
    Command::new(clap::crate_name!())
        .version(clap::crate_version!())
        .about(clap::crate_description!())
        .subcommand(decode_args())
        .subcommand(sandwich_args())
        .subcommand(generate_args())
}

fn decode_args() -> Command {
    Command::new("decode")
        .about("Decode a UUID v1 and extract details.")
        .arg(
            Arg::new("uuid")
                .help("The UUID v1 to decode; hyphens are optional.")
                .required(true),
        )
}

fn sandwich_args() -> Command {
    Command::new("sandwich")
        .about("Generate all UUIDs between two UUID v1 values.")
        .arg(
            Arg::new("uuid1")
                .help("Starting UUID v1; its clock sequence and node are kept.")
                .required(true),
        )
        .arg(
            Arg::new("uuid2")
                .help("Ending UUID v1, inclusive.")
                .required(true),
        )
        .arg(
            Arg::new("machines")
                .short('m')
                .long("machines")
                .help("Comma-separated 12-digit hexadecimal nodes to substitute, one run each."),
        )
        .arg(output_arg())
}

fn generate_args() -> Command {
    Command::new("generate")
        .about("Generate UUID v1 values based on parameters.")
        .after_help("Each value may be single (5), a range (1-5), or comma-separated (1,3,5-7).")
        .arg(
            Arg::new("timestamp")
                .short('t')
                .long("timestamp")
                .help("Timestamp value(s) in 100-nanosecond units since 1582-10-15.")
                .required(true),
        )
        .arg(
            Arg::new("clock")
                .short('c')
                .long("clock")
                .help("Raw 14-bit clock sequence value(s).")
                .required(true),
        )
        .arg(
            Arg::new("node")
                .short('n')
                .long("node")
                .help("Node value(s) in hexadecimal.")
                .required(true),
        )
        .arg(
            Arg::new("variant")
                .short('v')
                .long("variant")
                .help("Variant: NCS, RFC4122, Microsoft, or Future.")
                .default_value("RFC4122"),
        )
        .arg(output_arg())
}

fn output_arg() -> Arg {
    Arg::new("output")
        .short('o')
        .long("output")
        .help("Output file; if provided, UUIDs are saved and not printed.")
        .value_parser(clap::value_parser!(PathBuf))
}

fn process_subcommand(matches: &ArgMatches, mut out: impl Write) -> anyhow::Result<()> {
    match matches.subcommand() {
        Some(("decode", sub)) => match v1::decode(arg(sub, "uuid")) {
            Ok(fields) => {
                tracing::debug!(?fields, "decoded");
                write!(out, "{}", Report::new(&fields))?;
            }
            // A malformed UUID is reported in place of the table, not as a failure.
            Err(e @ (Error::InvalidLength { .. } | Error::InvalidFormat)) => {
                writeln!(out, "Error: {}", e)?;
            }
            Err(e) => return Err(e.into()),
        },
        Some(("sandwich", sub)) => {
            let base = sandwich::sandwich(arg(sub, "uuid1"), arg(sub, "uuid2"))?;
            tracing::debug!(count = base.count_u64(), "sandwich");
            let machines = sub
                .get_one::<String>("machines")
                .map(|e| sandwich::parse_machines(e))
                .transpose()?;
            let output = sub.get_one::<PathBuf>("output");

            match (machines, output) {
                (None, None) => {
                    sink::write_lines(base, &mut out)?;
                }
                (None, Some(path)) => {
                    sink::write_file(path, base)
                        .with_context(|| format!("could not write '{}'", path.display()))?;
                }
                (Some(machines), None) => {
                    for (_, it) in sandwich::per_machine(&base, &machines) {
                        sink::write_lines(it, &mut out)?;
                    }
                }
                (Some(machines), Some(path)) => {
                    for (node, it) in sandwich::per_machine(&base, &machines) {
                        let path = sink::machine_path(path, &node);
                        sink::write_file(&path, it)
                            .with_context(|| format!("could not write '{}'", path.display()))?;
                    }
                }
            }
        }
        Some(("generate", sub)) => {
            let uuids = uuidv1::generate(
                arg(sub, "timestamp"),
                arg(sub, "clock"),
                arg(sub, "node"),
                Variant::from_name_lossy(arg(sub, "variant")),
            )?;
            match sub.get_one::<PathBuf>("output") {
                Some(path) => {
                    sink::write_file(path, uuids)
                        .with_context(|| format!("could not write '{}'", path.display()))?;
                }
                None => {
                    sink::write_lines(uuids, &mut out)?;
                }
            }
        }
        _ => unreachable!(),
    }
    Ok(())
}

/// Returns a required argument value.
fn arg<'a>(matches: &'a ArgMatches, id: &str) -> &'a str {
    matches
        .get_one::<String>(id)
        .map(String::as_str)
        .unwrap_or_default()
}
