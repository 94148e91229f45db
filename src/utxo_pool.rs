use crate::{Ledgercoin, OutputIndex, PublicKey, TransactionId, TransactionOutput};
use std::collections::HashMap;
use std::fmt::{Display, Formatter};

/// Identifies one output of one transaction: the transaction's id and the output's position.
#[derive(Debug, Hash, Ord, PartialOrd, Eq, PartialEq, Copy, Clone)]
pub struct Utxo {
    transaction_id: TransactionId,
    output_index: OutputIndex,
}

impl Utxo {
    pub fn new(transaction_id: TransactionId, output_index: OutputIndex) -> Self {
        Self {
            transaction_id,
            output_index,
        }
    }

    pub fn transaction_id(&self) -> &TransactionId {
        &self.transaction_id
    }

    pub fn output_index(&self) -> &OutputIndex {
        &self.output_index
    }
}

impl Display for Utxo {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.transaction_id, self.output_index)
    }
}

/// A pool of unspent transaction outputs, indexed by their transaction ID and their index in
/// the transaction.
/// Cloning the pool produces an independent copy.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct UtxoPool {
    utxos: HashMap<Utxo, TransactionOutput>,
}

impl UtxoPool {
    pub fn new() -> Self {
        Self {
            utxos: HashMap::new(),
        }
    }

    pub fn contains(&self, utxo: &Utxo) -> bool {
        self.utxos.contains_key(utxo)
    }

    pub fn get(&self, utxo: &Utxo) -> Option<&TransactionOutput> {
        self.utxos.get(utxo)
    }

    /// Adds the output, replacing any output previously stored under the same UTXO.
    pub fn insert(&mut self, utxo: Utxo, output: TransactionOutput) {
        self.utxos.insert(utxo, output);
    }

    pub fn remove(&mut self, utxo: &Utxo) -> Option<TransactionOutput> {
        self.utxos.remove(utxo)
    }

    pub fn len(&self) -> usize {
        self.utxos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.utxos.is_empty()
    }

    /// All live UTXOs in a stable order.
    pub fn utxos(&self) -> Vec<Utxo> {
        let mut utxos = self.utxos.keys().copied().collect::<Vec<Utxo>>();
        utxos.sort();
        utxos
    }

    /// Spendable value per recipient.
    /// Returns `None` if any balance overflows.
    pub fn balances(&self) -> Option<HashMap<PublicKey, Ledgercoin>> {
        let mut balances = HashMap::new();
        for output in self.utxos.values() {
            // Ensure that the key exists if it's the first time we're seeing the recipient.
            let balance = balances
                .entry(*output.recipient())
                .or_insert_with(Ledgercoin::zero);
            *balance = balance.checked_add(output.amount())?;
        }
        Some(balances)
    }

    /// Sum of all live outputs, `None` on overflow.
    pub fn total_value(&self) -> Option<Ledgercoin> {
        self.utxos
            .values()
            .try_fold(Ledgercoin::zero(), |total, output| {
                total.checked_add(output.amount())
            })
    }
}
