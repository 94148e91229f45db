use crate::{
    EpochReport, Ledgercoin, PrivateKey, Transaction, TransactionBuilder, TransactionError,
    TxHandler, Utxo, UtxoPool,
};
use log::debug;

pub struct SimulationParams {
    // Seed from which account keys are derived.
    pub seed: String,
    pub accounts: usize,
    // Value of each account's output in the genesis pool.
    pub initial_amount: Ledgercoin,
}

/// Drives a `TxHandler` through epochs of generated transactions.
/// Every batch mixes valid transfers with a chained transfer, a double spend, an overspend and
/// a forged signature, so that each rule of the handler is exercised.
pub struct Simulation {
    accounts: Vec<PrivateKey>,
    handler: TxHandler,
}

impl Simulation {
    pub fn new(params: &SimulationParams) -> Result<Self, TransactionError> {
        let accounts = (0..params.accounts)
            .map(|i| PrivateKey::from_seed(format!("{}/{}", params.seed, i).as_bytes()))
            .collect::<Result<Vec<PrivateKey>, _>>()?;
        let pool = Self::genesis_pool(&accounts, params.initial_amount)?;
        Ok(Self {
            accounts,
            handler: TxHandler::new(&pool),
        })
    }

    /// A pool holding one output of `amount` for every account.
    pub fn genesis_pool(
        accounts: &[PrivateKey],
        amount: Ledgercoin,
    ) -> Result<UtxoPool, TransactionError> {
        let genesis = accounts
            .iter()
            .fold(TransactionBuilder::new(), |builder, account| {
                builder.add_output(account.public_key(), amount)
            })
            .build()?;
        let mut pool = UtxoPool::new();
        for (utxo, output) in genesis.created_utxos() {
            pool.insert(utxo, output.clone());
        }
        Ok(pool)
    }

    pub fn accounts(&self) -> &[PrivateKey] {
        &self.accounts
    }

    pub fn handler(&self) -> &TxHandler {
        &self.handler
    }

    /// Builds the next batch and hands it to the handler.
    pub fn run_epoch(&mut self) -> Result<EpochReport, TransactionError> {
        let batch = self.next_batch()?;
        Ok(self.handler.handle_txs_with_report(&batch))
    }

    /// Candidates for the next epoch, in submission order.
    pub fn next_batch(&self) -> Result<Vec<Transaction>, TransactionError> {
        let n = self.accounts.len();
        if n == 0 {
            return Ok(vec![]);
        }
        let owned = (0..n)
            .map(|i| self.first_utxo_of(i))
            .collect::<Vec<Option<(Utxo, Ledgercoin)>>>();

        let mut batch = vec![];

        // Invalid candidates go first so they fail on their own rule rather than on a
        // missing UTXO.
        if let Some((utxo, amount)) = owned[0].filter(|_| n > 1) {
            debug!("Forging a signature for: {}", utxo);
            batch.push(self.transfer(utxo, 1, 1, amount, Ledgercoin::zero())?);
        }
        if let Some((utxo, amount)) = owned[n - 1] {
            if let Some(overspend) = amount.checked_add(Ledgercoin::new(1)) {
                debug!("Overspending: {}", utxo);
                batch.push(self.transfer(utxo, n - 1, n - 1, overspend, Ledgercoin::zero())?);
            }
        }

        // Every account sends half of its output to the next account and keeps the change.
        let mut first_transfer = None;
        for (i, claim) in owned.iter().enumerate() {
            if let Some((utxo, amount)) = claim {
                let half = Ledgercoin::new(amount.value() / 2);
                let change = Ledgercoin::new(amount.value() - half.value());
                let transfer = self.transfer(*utxo, i, (i + 1) % n, half, change)?;
                if first_transfer.is_none() {
                    first_transfer = Some((transfer.clone(), (i + 1) % n, half));
                }
                batch.push(transfer);
            }
        }

        if let Some((transfer, recipient, amount)) = first_transfer {
            // The recipient forwards what it received before the epoch is over.
            let received = transfer.created_utxos().map(|(utxo, _)| utxo).next();
            if let Some(received) = received {
                batch.push(self.transfer(
                    received,
                    recipient,
                    (recipient + 1) % n,
                    amount,
                    Ledgercoin::zero(),
                )?);
            }
            // The sender of the first transfer spends the same output again.
            if let Some(input) = transfer.input(0) {
                let owner = (recipient + n - 1) % n;
                debug!("Double spending: {}", input.utxo());
                batch.push(self.transfer(input.utxo(), owner, owner, amount, Ledgercoin::zero())?);
            }
        }
        Ok(batch)
    }

    // Spends `utxo` with the key of `signer`, paying `amount` to `recipient` and `change` back
    // to the signer. Zero change produces no change output.
    fn transfer(
        &self,
        utxo: Utxo,
        signer: usize,
        recipient: usize,
        amount: Ledgercoin,
        change: Ledgercoin,
    ) -> Result<Transaction, TransactionError> {
        let signer = &self.accounts[signer];
        let mut builder = TransactionBuilder::new()
            .add_input(*utxo.transaction_id(), *utxo.output_index())
            .add_output(self.accounts[recipient].public_key(), amount);
        if change > Ledgercoin::zero() {
            builder = builder.add_output(signer.public_key(), change);
        }
        builder.sign_input(0, signer)?.build()
    }

    fn first_utxo_of(&self, account: usize) -> Option<(Utxo, Ledgercoin)> {
        let public_key = self.accounts[account].public_key();
        let pool = self.handler.utxo_pool();
        pool.utxos().into_iter().find_map(|utxo| {
            pool.get(&utxo)
                .filter(|output| *output.recipient() == public_key)
                .map(|output| (utxo, output.amount()))
        })
    }
}
