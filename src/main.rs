// packcfg - build configuration resolver
// Entry point: parses the command line and prints resolved configurations

mod cli;

use cli::CliHandler;

fn main() {
    let handler = CliHandler::new();

    if let Err(e) = handler.run() {
        eprintln!("❌ Error: {:#}", e);
        std::process::exit(1);
    }
}
