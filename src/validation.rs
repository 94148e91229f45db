use crate::{verify_signature, Transaction, TransactionError, UtxoPool};
use std::collections::HashSet;

/// The value totals of a transaction that passed validation.
/// Totals are summed in `i128`, which no realistic number of `i64` amounts can overflow.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ValidatedTransaction {
    total_input: i128,
    total_output: i128,
}

impl ValidatedTransaction {
    /// Sum of the values of the outputs claimed by the inputs.
    pub fn total_input(&self) -> i128 {
        self.total_input
    }

    pub fn total_output(&self) -> i128 {
        self.total_output
    }

    /// Value that is claimed but not re-assigned to any output. It leaves the ledger.
    pub fn forfeited(&self) -> i128 {
        self.total_input - self.total_output
    }
}

// Responsible for checking a single transaction against a UTXO pool.
// Checks run in a fixed order and stop at the first failure:
//   1. every claimed output is in the pool,
//   2. every input is signed by the recipient of the output it claims,
//   3. no output is claimed twice by the same transaction,
//   4. no output has a negative amount,
//   5. outputs do not exceed inputs.
// The pool is never modified.
pub struct TransactionValidator {}

impl TransactionValidator {
    pub fn validate(
        transaction: &Transaction,
        utxo_pool: &UtxoPool,
    ) -> Result<ValidatedTransaction, TransactionError> {
        let total_input = Self::validate_inputs(transaction, utxo_pool)?;
        let total_output = Self::validate_outputs(transaction)?;
        if total_input < total_output {
            return Err(TransactionError::InsufficientInputs {
                total_input,
                total_output,
            });
        }
        Ok(ValidatedTransaction {
            total_input,
            total_output,
        })
    }

    pub fn is_valid(transaction: &Transaction, utxo_pool: &UtxoPool) -> bool {
        Self::validate(transaction, utxo_pool).is_ok()
    }

    // Returns the total value claimed by the inputs.
    fn validate_inputs(
        transaction: &Transaction,
        utxo_pool: &UtxoPool,
    ) -> Result<i128, TransactionError> {
        let mut total_input: i128 = 0;
        let mut claimed = HashSet::with_capacity(transaction.inputs().len());

        for (index, input) in transaction.inputs().iter().enumerate() {
            let utxo = input.utxo();
            let output = utxo_pool
                .get(&utxo)
                .ok_or(TransactionError::MissingUtxo { index, utxo })?;

            // Bytes that cannot be produced count as a failed verification.
            let verified = transaction
                .signable_bytes(index)
                .map(|data| verify_signature(output.recipient(), &data, input.signature()))
                .unwrap_or(false);
            if !verified {
                return Err(TransactionError::InvalidSignature { index, utxo });
            }

            total_input += i128::from(output.amount().value());

            if !claimed.insert(utxo) {
                return Err(TransactionError::DuplicateUtxo { index, utxo });
            }
        }
        Ok(total_input)
    }

    // Returns the total value of the outputs.
    fn validate_outputs(transaction: &Transaction) -> Result<i128, TransactionError> {
        let mut total_output: i128 = 0;
        for (index, output) in transaction.outputs().iter().enumerate() {
            let amount = output.amount();
            if amount.is_negative() {
                return Err(TransactionError::NegativeOutput { index, amount });
            }
            total_output += i128::from(amount.value());
        }
        Ok(total_output)
    }
}
