//! Cribra CLI entry point.

use clap::Parser;

use cribra_cli::{CliArgs, CribraApp};

fn main() {
    let args = CliArgs::parse();

    let app = match CribraApp::from_args(&args) {
        Ok(app) => app,
        Err(err) => {
            eprintln!("cribra: {err}");
            std::process::exit(2);
        }
    };

    if let Err(err) = app.run(args) {
        eprintln!("cribra: {err}");
        std::process::exit(1);
    }
}
