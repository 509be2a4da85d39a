use crate::app::cli::Args;
use crate::app::{exit_code, runner, AppError};
use crate::core::error_handling::log_error_with_context;
use crate::core::logging::init_logging;
use crate::core::version;
use clap::Parser;
use std::io::IsTerminal;

/// Initialize application startup and run to completion; never returns
pub fn startup() -> ! {
    let mut args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if e.use_stderr() => {
            // clap would exit with 2, which is RUN_NOT_FOUND here
            let _ = e.print();
            std::process::exit(exit_code::FAILURE);
        }
        Err(e) => e.exit(),
    };

    let config_file = args.config_file.clone();
    let config_loaded = match Args::parse_config_file(&mut args, config_file.as_deref()) {
        Ok(path) => path,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(exit_code::FAILURE);
        }
    };

    let stderr_color = match args.color_choice() {
        Some(choice) => choice,
        None => std::io::stderr().is_terminal(),
    };
    let log_file = args.log_file_path().map(|p| p.to_string_lossy().into_owned());
    if let Err(e) = init_logging(
        args.log_level.as_deref(),
        args.log_format.as_deref(),
        log_file.as_deref(),
        stderr_color,
    ) {
        eprintln!("Error: Failed to initialize logging: {}", e);
        std::process::exit(exit_code::FAILURE);
    }

    log::info!("{}", version::banner());
    if let Some(path) = config_loaded {
        log::info!("Configuration loaded from {}", path.display());
    }
    log::debug!("Arguments: {:?}", args);

    let stdout = std::io::stdout();
    let stdout_is_terminal = stdout.is_terminal();
    let mut handle = stdout.lock();
    let code = match runner::run(&args, &mut handle, stdout_is_terminal) {
        Ok(()) => exit_code::SUCCESS,
        Err(e) => report_failure(&e),
    };
    std::process::exit(code);
}

fn report_failure(error: &AppError) -> i32 {
    log_error_with_context(error, error.context());
    eprintln!("Error: {}", error);
    error.exit_code()
}
