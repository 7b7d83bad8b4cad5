use std::fs;

use clap::Parser;
use csspp_expr::{Options, evaluate_with, interpreter::session::Session};
use tracing::Level;

/// csspp-expr evaluates the expressions a CSS preprocessor finds in
/// declaration values, such as `3px * 2 + 1px` or `darken(#f00, 10%)`.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Tells csspp-expr to read the expression from a file instead of the
    /// command line.
    #[arg(short, long)]
    file: bool,

    /// Number of digits written after the decimal point.
    #[arg(short, long, default_value_t = 3)]
    precision: usize,

    /// Evaluates a whole declaration value: comma separated arguments made
    /// of space separated expressions, with an optional `!important`.
    #[arg(short, long)]
    declaration: bool,

    /// In declaration mode, reads `a / b` as a `font-size/line-height` pair.
    #[arg(long)]
    font_metrics: bool,

    /// Does not load the `_csspp_*` constants and the system functions.
    #[arg(long)]
    no_system: bool,

    /// Prints the evaluation steps; repeat for more detail.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    contents: String,
}

fn main() {
    let args = Args::parse();

    let level = match args.verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt().with_max_level(level)
                             .with_target(false)
                             .with_writer(std::io::stderr)
                             .init();

    let source = if args.file {
        fs::read_to_string(&args.contents).unwrap_or_else(|_| {
            eprintln!("Failed to read the input file '{}'. Perhaps this file does not exist?",
                      &args.contents);
            std::process::exit(1);
        })
    } else {
        args.contents
    };

    let mut session = Session::new();
    session.set_precision(args.precision);
    session.set_show_debug(args.verbose > 0);

    let options = Options { system_definitions:  !args.no_system,
                            declaration:         args.declaration,
                            divide_font_metrics: args.font_metrics, };

    match evaluate_with(source.trim(), &mut session, options) {
        Ok(Some(value)) => println!("{value}"),
        // the diagnostics were already logged by the session
        Ok(None) => std::process::exit(1),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        },
    }
}
