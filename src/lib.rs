pub mod commands;
pub mod error;
pub mod hash;
pub mod ledgercoin;
pub mod public_key;
pub mod simulation;
pub mod transaction;
pub mod tx_handler;
pub mod utxo_pool;
pub mod validation;

pub use self::{
    error::*, hash::*, ledgercoin::*, public_key::*, simulation::*, transaction::*,
    tx_handler::*, utxo_pool::*, validation::*,
};
