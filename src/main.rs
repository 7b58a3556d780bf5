use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser as ClapParser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use evtglue::core::tree::format::format_module;
use evtglue::core::types::TypeTable;
use evtglue::driver::options::{DEFAULT_HOST_VERSION, DEFAULT_VERSION_SYMBOL};
use evtglue::driver::{CompileOptions, GlueCompiler, MemoryDriver};

const LOG_ENV: &str = "EVTGLUE_LOG";

/// Compiles .evt glue files into host registration and hook modules
#[derive(ClapParser)]
#[command(name = "evtglue", author, version, about, long_about = None)]
struct Args {
    /// Host version visible to @if conditions as HOST_VERSION
    #[arg(long, default_value_t = DEFAULT_HOST_VERSION)]
    host_version: u32,

    /// Grammar compiler version the output targets
    #[arg(long, default_value_t = evtglue::core::codegen::BUILTIN_SCOPE_VERSION)]
    grammar_version: u32,

    /// Make generated hooks log every event they raise
    #[arg(long)]
    debug: bool,

    /// External name of the plugin version function
    #[arg(long, default_value = DEFAULT_VERSION_SYMBOL)]
    version_symbol: String,

    /// JSON index of grammar modules and types
    #[arg(long, value_name = "FILE")]
    types: Option<PathBuf>,

    /// Write one file per generated module instead of printing them
    #[arg(long, value_name = "DIR")]
    out_dir: Option<PathBuf>,

    /// Log progress (same as EVTGLUE_LOG=debug)
    #[arg(short, long)]
    verbose: bool,

    /// .evt files to compile
    #[arg(required = true)]
    files: Vec<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            if !message.is_empty() {
                eprintln!("[ERROR] {message}");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), String> {
    let table = match &args.types {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .map_err(|e| format!("cannot open {}: {e}", path.display()))?;
            TypeTable::from_json(&json)
                .map_err(|e| format!("invalid type index {}: {e}", path.display()))?
        }
        None => TypeTable::new(),
    };
    let mut driver = MemoryDriver::new(table).with_debug(args.debug);

    let options = CompileOptions {
        host_version: args.host_version,
        grammar_version: args.grammar_version,
        debug: args.debug,
        version_symbol: args.version_symbol.clone(),
    };
    let mut compiler = GlueCompiler::new(options);

    let mut failed = false;
    for file in &args.files {
        if let Err(err) = compiler.load_evt_file(file) {
            eprintln!("{}", compiler.render_error(&err));
            failed = true;
        }
    }
    if failed {
        return Err(String::new());
    }

    let output = compiler.compile(&mut driver).map_err(|errors| {
        for err in &errors {
            eprintln!("{}", compiler.render_error(err));
        }
        format!("{} error(s), no output generated", errors.len())
    })?;

    for unit in output.units() {
        let text = format_module(&unit.module);
        match &args.out_dir {
            Some(dir) => {
                let path = dir.join(unit.file_name());
                std::fs::write(&path, text)
                    .map_err(|e| format!("failed to write {}: {e}", path.display()))?;
                info!("wrote {}", path.display());
            }
            None => println!("{text}"),
        }
    }

    debug!("{} unit(s) submitted", driver.units.len());
    Ok(())
}
