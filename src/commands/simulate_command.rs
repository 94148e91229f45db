use crate::{Ledgercoin, Simulation, SimulationParams};
use clap::{Arg, ArgMatches, Command};
use std::error::Error;

struct SimulateCliOptions {
    seed: String,
    accounts: usize,
    initial_amount: Ledgercoin,
    epochs: usize,
}

impl SimulateCliOptions {
    pub fn parse(matches: &ArgMatches) -> Result<Self, Box<dyn Error>> {
        let accounts = matches.value_of_t::<usize>("accounts")?;
        if accounts < 2 {
            return Err(format!("At least 2 accounts are required, got: {}", accounts).into());
        }
        let initial_amount = matches.value_of_t::<i64>("initial-amount")?;
        if initial_amount < 0 {
            return Err(format!("Initial amount must not be negative: {}", initial_amount).into());
        }
        Ok(Self {
            seed: matches
                .value_of("seed")
                .ok_or("Missing seed")?
                .to_string(),
            accounts,
            initial_amount: Ledgercoin::new(initial_amount),
            epochs: matches.value_of_t::<usize>("epochs")?,
        })
    }
}

pub fn simulate_command() -> Command<'static> {
    Command::new("simulate")
        .version("0.1")
        .about("Runs epochs of generated transactions through the transaction handler.")
        .arg(
            Arg::new("seed")
                .long("seed")
                .value_name("SEED")
                .help("Seed from which the account keys are derived.")
                .takes_value(true)
                .required(false)
                .default_value("ledgercoin"),
        )
        .arg(
            Arg::new("accounts")
                .short('a')
                .long("accounts")
                .value_name("ACCOUNTS")
                .help("Number of accounts in the genesis pool.")
                .takes_value(true)
                .required(false)
                .default_value("4"),
        )
        .arg(
            Arg::new("initial-amount")
                .long("initial-amount")
                .value_name("AMOUNT")
                .help("Value of the genesis output of each account.")
                .takes_value(true)
                .required(false)
                .default_value("50"),
        )
        .arg(
            Arg::new("epochs")
                .short('e')
                .long("epochs")
                .value_name("EPOCHS")
                .help("Number of epochs to run.")
                .takes_value(true)
                .required(false)
                .default_value("2"),
        )
}

pub fn run_simulate_command(matches: &ArgMatches) -> Result<(), Box<dyn Error>> {
    let options = SimulateCliOptions::parse(matches)?;
    let mut simulation = Simulation::new(&SimulationParams {
        seed: options.seed,
        accounts: options.accounts,
        initial_amount: options.initial_amount,
    })?;

    for epoch in 0..options.epochs {
        let report = simulation.run_epoch()?;
        println!("Epoch {}:", epoch);
        for transaction in report.accepted() {
            println!("  accepted {}", transaction);
        }
        for (transaction_id, reason) in report.rejected() {
            println!("  rejected {}: {}", transaction_id, reason);
        }
    }

    let balances = simulation
        .handler()
        .utxo_pool()
        .balances()
        .ok_or("Balances overflow")?;
    println!("Balances:");
    for account in simulation.accounts() {
        let public_key = account.public_key();
        let balance = balances
            .get(&public_key)
            .copied()
            .unwrap_or_else(Ledgercoin::zero);
        println!("  {}: {}", public_key, balance);
    }
    Ok(())
}
