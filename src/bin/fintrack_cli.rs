use clap::Parser;
use fintrack::{
    cli::{run_cli, Cli},
    init,
};

fn main() {
    init();

    let cli = Cli::parse();
    let stdout = std::io::stdout();
    if let Err(err) = run_cli(cli, &mut stdout.lock()) {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
