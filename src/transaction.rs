use crate::{Ledgercoin, PrivateKey, PublicKey, Sha256, TransactionError, Utxo};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// A double SHA-256 hash of the transaction data.
#[derive(Debug, Hash, Ord, PartialOrd, Eq, PartialEq, Copy, Clone, Serialize, Deserialize)]
pub struct TransactionId(Sha256);

impl Display for TransactionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TransactionId {
    pub fn new(data: Sha256) -> Self {
        Self(data)
    }
}

/// The index of the transaction output.
#[derive(Debug, Hash, Ord, PartialOrd, Eq, PartialEq, Copy, Clone, Serialize, Deserialize)]
pub struct OutputIndex(u32);

impl Display for OutputIndex {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl OutputIndex {
    pub const fn new(index: u32) -> Self {
        Self(index)
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct TransactionInput {
    // A pointer to the transaction containing the UTXO to be spent.
    utxo_id: TransactionId,
    // The number of UTXO to be spent, the first one is 0.
    output_index: OutputIndex,
    // DER-encoded signature by the recipient of the claimed output.
    // Empty until the input is signed.
    signature: Vec<u8>,
}

impl Display for TransactionInput {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.utxo_id, self.output_index)
    }
}

impl TransactionInput {
    pub fn new(utxo_id: TransactionId, output_index: OutputIndex, signature: Vec<u8>) -> Self {
        Self {
            utxo_id,
            output_index,
            signature,
        }
    }

    pub fn unsigned(utxo_id: TransactionId, output_index: OutputIndex) -> Self {
        Self::new(utxo_id, output_index, vec![])
    }

    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    /// The unspent output this input claims.
    pub fn utxo(&self) -> Utxo {
        Utxo::new(self.utxo_id, self.output_index)
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct TransactionOutput {
    // Only the holder of the matching private key can spend this output.
    recipient: PublicKey,
    amount: Ledgercoin,
}

impl Display for TransactionOutput {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.amount, self.recipient)
    }
}

impl TransactionOutput {
    pub fn new(recipient: PublicKey, amount: Ledgercoin) -> Self {
        Self { recipient, amount }
    }

    pub fn recipient(&self) -> &PublicKey {
        &self.recipient
    }

    pub fn amount(&self) -> Ledgercoin {
        self.amount
    }
}

// The part of an input that is covered by signatures.
#[derive(Serialize)]
struct SignableInput<'a> {
    utxo_id: &'a TransactionId,
    output_index: &'a OutputIndex,
}

// Everything a signature for one input commits to.
// Signatures of all inputs are left out, otherwise sibling inputs could never all be signed.
#[derive(Serialize)]
struct SignableData<'a> {
    input_index: u32,
    inputs: Vec<SignableInput<'a>>,
    outputs: &'a [TransactionOutput],
}

fn signable_bytes(
    inputs: &[TransactionInput],
    outputs: &[TransactionOutput],
    input_index: usize,
) -> Result<Vec<u8>, TransactionError> {
    if input_index >= inputs.len() {
        return Err(TransactionError::InputIndexOutOfRange {
            index: input_index,
            num_inputs: inputs.len(),
        });
    }
    let data = SignableData {
        input_index: input_index as u32,
        inputs: inputs
            .iter()
            .map(|input| SignableInput {
                utxo_id: &input.utxo_id,
                output_index: &input.output_index,
            })
            .collect(),
        outputs,
    };
    bincode::serialize(&data).map_err(|e| TransactionError::Serialization(e.to_string()))
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Transaction {
    id: TransactionId,
    inputs: Vec<TransactionInput>,
    outputs: Vec<TransactionOutput>,
}

impl Display for Transaction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({} inputs, {} outputs)",
            self.id,
            self.inputs.len(),
            self.outputs.len()
        )
    }
}

impl Transaction {
    /// Creates a transaction and computes its id.
    /// The id covers every field, signatures included, and never changes afterwards.
    pub fn new(
        inputs: Vec<TransactionInput>,
        outputs: Vec<TransactionOutput>,
    ) -> Result<Self, TransactionError> {
        let id = Self::hash_transaction_data(&inputs, &outputs)?;
        Ok(Self {
            id,
            inputs,
            outputs,
        })
    }

    pub fn id(&self) -> &TransactionId {
        &self.id
    }

    pub fn inputs(&self) -> &[TransactionInput] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[TransactionOutput] {
        &self.outputs
    }

    pub fn input(&self, index: usize) -> Option<&TransactionInput> {
        self.inputs.get(index)
    }

    /// The bytes that the signature of the input at `input_index` must authorize.
    pub fn signable_bytes(&self, input_index: usize) -> Result<Vec<u8>, TransactionError> {
        signable_bytes(&self.inputs, &self.outputs, input_index)
    }

    /// The UTXOs created by this transaction, in output order.
    pub fn created_utxos(&self) -> impl Iterator<Item = (Utxo, &TransactionOutput)> + '_ {
        let id = self.id;
        self.outputs
            .iter()
            .enumerate()
            .map(move |(i, output)| (Utxo::new(id, OutputIndex::new(i as u32)), output))
    }

    fn hash_transaction_data(
        inputs: &[TransactionInput],
        outputs: &[TransactionOutput],
    ) -> Result<TransactionId, TransactionError> {
        let data = bincode::serialize(&(inputs, outputs))
            .map_err(|e| TransactionError::Serialization(e.to_string()))?;
        Ok(TransactionId(Sha256::double_digest(&data)))
    }
}

/// Assembles a transaction and signs its inputs before the id is fixed.
#[derive(Debug, Clone, Default)]
pub struct TransactionBuilder {
    inputs: Vec<TransactionInput>,
    outputs: Vec<TransactionOutput>,
}

impl TransactionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_input(mut self, utxo_id: TransactionId, output_index: OutputIndex) -> Self {
        self.inputs
            .push(TransactionInput::unsigned(utxo_id, output_index));
        self
    }

    pub fn add_output(mut self, recipient: PublicKey, amount: Ledgercoin) -> Self {
        self.outputs.push(TransactionOutput::new(recipient, amount));
        self
    }

    pub fn signable_bytes(&self, input_index: usize) -> Result<Vec<u8>, TransactionError> {
        signable_bytes(&self.inputs, &self.outputs, input_index)
    }

    /// Signs the input at `input_index` with `key`.
    /// Inputs must be signed after all inputs and outputs have been added.
    pub fn sign_input(
        mut self,
        input_index: usize,
        key: &PrivateKey,
    ) -> Result<Self, TransactionError> {
        let data = self.signable_bytes(input_index)?;
        let signature = key.sign(&data)?;
        self.inputs[input_index].signature = signature;
        Ok(self)
    }

    pub fn build(self) -> Result<Transaction, TransactionError> {
        Transaction::new(self.inputs, self.outputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verify_signature;

    fn key(seed: &str) -> PrivateKey {
        PrivateKey::from_seed(seed.as_bytes()).unwrap()
    }

    fn genesis_id() -> TransactionId {
        TransactionId::new(Sha256::digest(b"genesis"))
    }

    #[test]
    fn signed_input_verifies_against_signable_bytes() {
        let alice = key("alice");
        let bob = key("bob");
        let transaction = TransactionBuilder::new()
            .add_input(genesis_id(), OutputIndex::new(0))
            .add_output(bob.public_key(), Ledgercoin::new(10))
            .sign_input(0, &alice)
            .unwrap()
            .build()
            .unwrap();

        let data = transaction.signable_bytes(0).unwrap();
        assert!(verify_signature(
            &alice.public_key(),
            &data,
            transaction.input(0).unwrap().signature()
        ));
    }

    #[test]
    fn signable_bytes_exclude_signatures() {
        let alice = key("alice");
        let builder = TransactionBuilder::new()
            .add_input(genesis_id(), OutputIndex::new(0))
            .add_input(genesis_id(), OutputIndex::new(1))
            .add_output(alice.public_key(), Ledgercoin::new(10));
        let before = builder.signable_bytes(1).unwrap();
        let signed = builder.sign_input(0, &alice).unwrap();
        assert_eq!(signed.signable_bytes(1).unwrap(), before);
    }

    #[test]
    fn signable_bytes_differ_per_input() {
        let alice = key("alice");
        let transaction = TransactionBuilder::new()
            .add_input(genesis_id(), OutputIndex::new(0))
            .add_input(genesis_id(), OutputIndex::new(1))
            .add_output(alice.public_key(), Ledgercoin::new(10))
            .build()
            .unwrap();
        assert_ne!(
            transaction.signable_bytes(0).unwrap(),
            transaction.signable_bytes(1).unwrap()
        );
    }

    #[test]
    fn signable_bytes_out_of_range() {
        let transaction = TransactionBuilder::new().build().unwrap();
        assert_eq!(
            transaction.signable_bytes(0),
            Err(TransactionError::InputIndexOutOfRange {
                index: 0,
                num_inputs: 0
            })
        );
    }

    #[test]
    fn signing_missing_input_fails() {
        let result = TransactionBuilder::new().sign_input(2, &key("alice"));
        assert!(matches!(
            result,
            Err(TransactionError::InputIndexOutOfRange { index: 2, .. })
        ));
    }

    #[test]
    fn id_covers_signatures_and_outputs() {
        let alice = key("alice");
        let unsigned = TransactionBuilder::new()
            .add_input(genesis_id(), OutputIndex::new(0))
            .add_output(alice.public_key(), Ledgercoin::new(10));
        let signed = unsigned.clone().sign_input(0, &alice).unwrap().build().unwrap();
        let unsigned = unsigned.build().unwrap();
        assert_ne!(signed.id(), unsigned.id());

        let other_amount = TransactionBuilder::new()
            .add_input(genesis_id(), OutputIndex::new(0))
            .add_output(alice.public_key(), Ledgercoin::new(11))
            .build()
            .unwrap();
        assert_ne!(unsigned.id(), other_amount.id());
    }

    #[test]
    fn id_is_deterministic() {
        let alice = key("alice");
        let create = || {
            TransactionBuilder::new()
                .add_input(genesis_id(), OutputIndex::new(3))
                .add_output(alice.public_key(), Ledgercoin::new(7))
                .build()
                .unwrap()
        };
        assert_eq!(create().id(), create().id());
    }

    #[test]
    fn created_utxos_are_keyed_by_id_and_position() {
        let alice = key("alice");
        let bob = key("bob");
        let transaction = TransactionBuilder::new()
            .add_output(alice.public_key(), Ledgercoin::new(1))
            .add_output(bob.public_key(), Ledgercoin::new(2))
            .build()
            .unwrap();
        let created = transaction
            .created_utxos()
            .map(|(utxo, output)| (utxo, output.amount()))
            .collect::<Vec<_>>();
        assert_eq!(
            created,
            vec![
                (
                    Utxo::new(*transaction.id(), OutputIndex::new(0)),
                    Ledgercoin::new(1)
                ),
                (
                    Utxo::new(*transaction.id(), OutputIndex::new(1)),
                    Ledgercoin::new(2)
                ),
            ]
        );
    }
}
