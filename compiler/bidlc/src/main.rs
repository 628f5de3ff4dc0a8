//! bidl compiler CLI
//!
//! Resolves type references and prints their parcel marshalling code.

use bidl_diagnostic::emitter::TerminalEmitter;
use bidlc::{compile, init_tracing, parse_options};

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() || args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return;
    }

    let options = match parse_options(&args) {
        Ok(options) => options,
        Err(err) => {
            eprintln!("error: {err}");
            eprintln!();
            print_usage();
            std::process::exit(2);
        }
    };

    let mut emitter = TerminalEmitter::stderr();
    let output = compile(&options, &mut emitter);
    print!("{}", output.text);

    if output.result.is_err() {
        std::process::exit(1);
    }
}

fn print_usage() {
    eprintln!("Usage: bidlc [options] <type>...");
    eprintln!();
    eprintln!("Prints the parcel write and read code for each type reference,");
    eprintln!("e.g. `int`, `pkg.Foo`, `List<String>`.");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --parcelable=<pkg.Name>        Declare a parcelable");
    eprintln!("  --interface=<pkg.Name>         Declare an interface");
    eprintln!("  --oneway-interface=<pkg.Name>  Declare a oneway interface");
    eprintln!("  --error-limit=<n>              Stop reporting after n errors (0 = no limit)");
    eprintln!("  --no-dedup                     Report repeated errors at one site");
    eprintln!("  --dump-types                   Print every registered type");
    eprintln!();
    eprintln!("Set RUST_LOG (e.g. RUST_LOG=bidl_types=debug) to trace resolution.");
}
