extern crate clap;

use clap::{App, Arg, ArgMatches, SubCommand};
use migrate::ConfigBuilder;
use std::env;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

type ArgResult = std::result::Result<(), String>;

fn valid_directory(s: String) -> ArgResult {
    let path = Path::new(OsStr::new(&s));
    if path.is_dir() {
        Ok(())
    } else {
        Err(format!("The directory '{}' does not exist", path.display()))
    }
}

fn valid_threads(s: String) -> ArgResult {
    match s.parse::<usize>() {
        Ok(threads) if threads > 0 => Ok(()),
        Ok(_) => Err("threads must be greater than zero".to_string()),
        Err(_) => Err(format!("'{}' is not a valid thread count", s)),
    }
}

/// Builds the `ConfigBuilder` for the `upgrade` subcommand from its matches
/// (§6.1). Validation of the assembled values happens in `ConfigBuilder::build`.
pub fn get_upgrade_subcommand_config(args: &ArgMatches) -> ConfigBuilder {
    ConfigBuilder {
        source_version: args.value_of("source-version").map(str::to_string),
        target_version: args.value_of("target-version").map(str::to_string),
        input_dir: args.value_of("input").map(PathBuf::from),
        output_dir: args.value_of("output").map(PathBuf::from),
        base_uri: args.value_of("base-uri").map(str::to_string),
        src_rdf_lang: args.value_of("rdf-lang").map(str::to_string),
        threads: args
            .value_of("threads")
            .and_then(|value| value.parse::<usize>().ok()),
        digest_algorithm: args.value_of("digest-algorithm").map(str::to_string),
        fedora_user: args.value_of("fedora-user").map(str::to_string),
        fedora_user_address: args.value_of("fedora-user-address").map(str::to_string),
        force_windows_mode: args.is_present("force-windows-mode"),
    }
}

pub fn args<'a, 'b>() -> App<'a, 'b> {
    let args: Vec<String> = env::args().collect();
    let program_name = Path::new(OsStr::new(&args[0]))
        .file_name()
        .expect("Failed to get program name.");
    let program_name = program_name.to_string_lossy();
    App::new(program_name)
        .version("0.1")
        .author("Nigel Banks <nigel.g.banks@gmail.com>")
        .about("\nUpgrades a Fedora 5.x filesystem export into an OCFL storage root (Fedora 6.x). \nExits non-zero if not successful.")
        .subcommand(SubCommand::with_name("upgrade")
            .about("Migrate a Fedora 5.x export to an OCFL storage root")
            .arg(Arg::with_name("input")
                .long("input")
                .value_name("DIR")
                .help("The root of the Fedora 5.x filesystem export to migrate")
                .required(true)
                .takes_value(true)
                .validator(valid_directory)
            )
            .arg(Arg::with_name("output")
                .long("output")
                .value_name("DIR")
                .help("The directory an OCFL storage root is written under")
                .required(true)
                .takes_value(true)
            )
            .arg(Arg::with_name("base-uri")
                .long("base-uri")
                .value_name("URI")
                .help("The external base URI to rewrite to the internal `info:fedora` prefix")
                .required(true)
                .takes_value(true)
            )
            .arg(Arg::with_name("source-version")
                .long("source-version")
                .value_name("VERSION")
                .help("The Fedora version of the export (must be 5.x)")
                .default_value("5.1")
                .takes_value(true)
            )
            .arg(Arg::with_name("target-version")
                .long("target-version")
                .value_name("VERSION")
                .help("The Fedora version of the storage root being produced (must be 6.x)")
                .default_value("6.0")
                .takes_value(true)
            )
            .arg(Arg::with_name("rdf-lang")
                .long("rdf-lang")
                .value_name("SYNTAX")
                .help("The RDF syntax the export's sidecar files are encoded in")
                .takes_value(true)
            )
            .arg(Arg::with_name("threads")
                .long("threads")
                .value_name("COUNT")
                .help("Worker-pool size; defaults to the available hardware parallelism")
                .takes_value(true)
                .validator(valid_threads)
            )
            .arg(Arg::with_name("digest-algorithm")
                .long("digest-algorithm")
                .value_name("ALGORITHM")
                .help("OCFL content digest: sha512 (default) or sha256")
                .takes_value(true)
            )
            .arg(Arg::with_name("fedora-user")
                .long("fedora-user")
                .value_name("NAME")
                .help("Attribution recorded on every OCFL version")
                .takes_value(true)
            )
            .arg(Arg::with_name("fedora-user-address")
                .long("fedora-user-address")
                .value_name("URI")
                .help("Attribution URI recorded on every OCFL version")
                .takes_value(true)
            )
            .arg(Arg::with_name("force-windows-mode")
                .long("force-windows-mode")
                .help("Test-only: forces OCFL Windows path semantics")
                .required(false)
            )
        )
}
