use crate::{KeyError, Ledgercoin, Utxo};
use thiserror::Error;

/// The reason a transaction could not be built, signed, or accepted against a UTXO pool.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransactionError {
    #[error("Input: {index} claims: {utxo} which is not in the UTXO pool")]
    MissingUtxo { index: usize, utxo: Utxo },
    #[error("Input: {index} has an invalid signature for: {utxo}")]
    InvalidSignature { index: usize, utxo: Utxo },
    #[error("Input: {index} claims: {utxo} which is already claimed by the same transaction")]
    DuplicateUtxo { index: usize, utxo: Utxo },
    #[error("Output: {index} has a negative amount: {amount}")]
    NegativeOutput { index: usize, amount: Ledgercoin },
    #[error("Outputs: {total_output} exceed inputs: {total_input}")]
    InsufficientInputs {
        total_input: i128,
        total_output: i128,
    },
    #[error("Input index: {index} is out of range, transaction has: {num_inputs} inputs")]
    InputIndexOutOfRange { index: usize, num_inputs: usize },
    #[error("Failed to serialize transaction: {0}")]
    Serialization(String),
    #[error(transparent)]
    Key(#[from] KeyError),
}
