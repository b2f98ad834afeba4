use std::{path::PathBuf, process::ExitCode};

use clap::Parser;
use nepa::{
    Interpreter,
    config::Config,
    interpreter::value::literal::parse_valor,
    logging::init_tracing,
    messages::message,
};
use tracing::info;

/// nepa runs `.script` programs written in a small Spanish-keyword
/// scripting language.
#[derive(Parser, Debug)]
#[command(disable_help_flag = true, disable_version_flag = true)]
struct Args {
    /// Prints the version and exits.
    #[arg(long)]
    version: bool,

    /// Prints the credits and exits.
    #[arg(long)]
    creditos: bool,

    /// Prints the usage and exits.
    #[arg(short = 'a', long)]
    ayuda: bool,

    /// Verbosity: program start and end.
    #[arg(long = "v")]
    v1: bool,

    /// Verbosity: every executed statement.
    #[arg(long = "vv")]
    v2: bool,

    /// Verbosity: every expression and loop pass.
    #[arg(long = "vvv")]
    v3: bool,

    /// Verbosity: full traces with targets and source lines.
    #[arg(long = "vvvv")]
    v4: bool,

    /// JSON configuration file.
    #[arg(long = "configuracion", visible_alias = "c", value_name = "ARCHIVO")]
    configuracion: Option<PathBuf>,

    /// The program to run.
    programa: Option<PathBuf>,

    /// Arguments bound to `argumentos`, each read as a literal.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    argumentos: Vec<String>,
}

impl Args {
    /// The highest verbosity flag given, if any.
    fn verbosity(&self) -> Option<u8> {
        [self.v4, self.v3, self.v2, self.v1].iter()
                                            .position(|flag| *flag)
                                            .map(|index| 4 - u8::try_from(index).unwrap_or(3))
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    if args.version {
        println!("{}", message(1, &[env!("CARGO_PKG_VERSION")]));
        return ExitCode::SUCCESS;
    }
    if args.creditos {
        println!("{}", message(2, &[env!("CARGO_PKG_AUTHORS"), env!("CARGO_PKG_LICENSE")]));
        return ExitCode::SUCCESS;
    }
    if args.ayuda {
        println!("{}", message(3, &[]));
        return ExitCode::SUCCESS;
    }

    let config = match &args.configuracion {
        Some(path) => match Config::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{}", message(5, &[&e.to_string()]));
                return ExitCode::FAILURE;
            },
        },
        None => Config::default(),
    };
    init_tracing(args.verbosity().unwrap_or(config.verbosidad));
    if let Some(path) = &args.configuracion {
        info!("{}", message(13, &[&path.display().to_string()]));
    }

    let Some(program) = &args.programa else {
        eprintln!("{}", message(4, &[]));
        eprintln!("{}", message(3, &[]));
        return ExitCode::FAILURE;
    };

    let arguments = args.argumentos.iter().map(|text| parse_valor(text)).collect();
    let interpreter = Interpreter::new(config);
    match interpreter.run_file(program, arguments) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", message(5, &[&e.to_string()]));
            ExitCode::FAILURE
        },
    }
}
