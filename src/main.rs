use clap::Command;
use std::error::Error;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let matches = Command::new("ledgercoin")
        .about("LedgerCoin transaction handling tools.")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(ledgercoin_lib::commands::simulate_command())
        .get_matches();

    if let Some(matches) = matches.subcommand_matches("simulate") {
        ledgercoin_lib::commands::run_simulate_command(matches)
    } else {
        panic!("Should report help.");
    }
}
