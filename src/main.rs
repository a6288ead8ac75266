mod args;

use args::*;
use log::*;
use logger::Logger;

static LOGGER: Logger = Logger;

fn main() {
    // Force exit if panics on thread.
    let original_panic_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        // Use custom logger.
        if let Some(error) = panic_info.payload().downcast_ref::<String>() {
            if let Some(location) = panic_info.location() {
                Logger::error(&format!(
                    "Panic (File: {}, Line: {}, Column: {}): {}",
                    location.file(),
                    location.line(),
                    location.column(),
                    error
                ));
            } else {
                Logger::error(&format!("Panic: {}", error));
            }
        } else {
            // Invoke the default handler as a fallback.
            original_panic_hook(panic_info);
        }
        std::process::exit(1);
    }));

    // Configure logger.
    if let Ok(()) = log::set_logger(&LOGGER) {
        log::set_max_level(LevelFilter::Info)
    }

    // Process arguments and execute the given command.
    let mut args = args();
    match args.clone().get_matches().subcommand() {
        ("upgrade", Some(matches)) => {
            let config = match get_upgrade_subcommand_config(matches).build() {
                Ok(config) => config,
                Err(message) => {
                    Logger::error(&message);
                    std::process::exit(1);
                }
            };

            let spinner = logger::spinner();
            spinner.set_prefix("Migrating");
            spinner.enable_steady_tick(100);
            spinner.set_message("discovering resources...");

            match migrate::upgrade(config) {
                Ok(results) => {
                    spinner.finish_and_clear();
                    info!(
                        "Migration complete: {} migrated, {} skipped, {} failed",
                        results.migrated, results.skipped, results.failed
                    );
                    if results.failed > 0 {
                        std::process::exit(1);
                    }
                }
                Err(error) => {
                    spinner.finish_and_clear();
                    Logger::error(&format!("Migration failed: {}", error));
                    std::process::exit(1);
                }
            }
        }
        _ => {
            args.print_long_help().unwrap();
        }
    }
}
