use crate::{Transaction, TransactionError, TransactionId, TransactionValidator, UtxoPool};
use log::{debug, info, trace};

/// The outcome of handling one epoch's worth of candidate transactions.
#[derive(Debug, Default)]
pub struct EpochReport {
    // Accepted transactions, in the order they were accepted.
    accepted: Vec<Transaction>,
    // Rejected candidates with the first rule each of them broke.
    rejected: Vec<(TransactionId, TransactionError)>,
}

impl EpochReport {
    pub fn accepted(&self) -> &[Transaction] {
        &self.accepted
    }

    pub fn rejected(&self) -> &[(TransactionId, TransactionError)] {
        &self.rejected
    }

    pub fn into_accepted(self) -> Vec<Transaction> {
        self.accepted
    }
}

/// Maintains the ledger: the pool of unspent outputs after every accepted transaction.
/// The handler owns its pool exclusively; it is copied from the caller's pool on creation.
#[derive(Debug, Clone)]
pub struct TxHandler {
    utxo_pool: UtxoPool,
}

impl TxHandler {
    pub fn new(utxo_pool: &UtxoPool) -> Self {
        Self {
            utxo_pool: utxo_pool.clone(),
        }
    }

    /// Returns true iff the transaction can be applied to the current pool.
    pub fn is_valid_tx(&self, transaction: &Transaction) -> bool {
        TransactionValidator::is_valid(transaction, &self.utxo_pool)
    }

    /// Handles an epoch: accepts every candidate that is valid against the pool as left by the
    /// candidates accepted before it, and applies it to the pool.
    /// Among conflicting candidates, the first one wins.
    pub fn handle_txs(&mut self, possible_txs: &[Transaction]) -> Vec<Transaction> {
        self.handle_txs_with_report(possible_txs).into_accepted()
    }

    /// Same as `handle_txs`, but also reports why each rejected candidate was rejected.
    pub fn handle_txs_with_report(&mut self, possible_txs: &[Transaction]) -> EpochReport {
        let mut report = EpochReport::default();
        for transaction in possible_txs {
            match TransactionValidator::validate(transaction, &self.utxo_pool) {
                Ok(validated) => {
                    debug!(
                        "Accepted transaction: {}, forfeited: {}",
                        transaction.id(),
                        validated.forfeited()
                    );
                    self.apply(transaction);
                    report.accepted.push(transaction.clone());
                }
                Err(e) => {
                    debug!("Rejected transaction: {}: {}", transaction.id(), e);
                    report.rejected.push((*transaction.id(), e));
                }
            }
        }
        info!(
            "Handled {} transactions: {} accepted, {} rejected, {} UTXOs in the pool",
            possible_txs.len(),
            report.accepted.len(),
            report.rejected.len(),
            self.utxo_pool.len()
        );
        report
    }

    pub fn utxo_pool(&self) -> &UtxoPool {
        &self.utxo_pool
    }

    pub fn into_utxo_pool(self) -> UtxoPool {
        self.utxo_pool
    }

    // Spends the claimed outputs and makes the new outputs spendable.
    // The transaction must have been validated against the current pool.
    fn apply(&mut self, transaction: &Transaction) {
        for input in transaction.inputs() {
            let utxo = input.utxo();
            trace!("Spent UTXO: {}", utxo);
            self.utxo_pool.remove(&utxo);
        }
        for (utxo, output) in transaction.created_utxos() {
            trace!("Created UTXO: {} with: {}", utxo, output);
            self.utxo_pool.insert(utxo, output.clone());
        }
    }
}
