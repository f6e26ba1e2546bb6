//! Entry point for the `visitroute` command-line interface.
#![forbid(unsafe_code)]

use visitroute_cli::CliError;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    if let Err(err) = visitroute_cli::run() {
        if let CliError::ArgumentParsing(parse_error) = &err {
            parse_error.exit();
        }
        eprintln!("visitroute: {err}");
        std::process::exit(1);
    }
}
