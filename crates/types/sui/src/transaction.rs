//! Transaction layout.
//!
//! Mirrors the BCS layout of Sui's `TransactionData`. Enum variant order is part of the wire
//! format and must not be changed.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{blake2b256, ObjectId, ObjectRef, SuiAddress, TransactionDigest};

/// The intent prefix for signing transaction data: scope `TransactionData`, version `V0`, app
/// `Sui`.
pub const TRANSACTION_DATA_INTENT: [u8; 3] = [0, 0, 0];

/// The maximum number of inputs a programmable transaction may reference.
pub const MAX_INPUTS: usize = 2048;

/// Errors that can occur when assembling a transaction.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum TransactionError {
    #[error("too many call arguments: {count} > {MAX_INPUTS}")]
    TooManyArguments { count: usize },

    #[error("failed to encode transaction: {0}")]
    Encode(#[from] bcs::Error),
}

/// An input to a programmable transaction.
///
/// Only pure inputs are produced by this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CallArg {
    /// A BCS-encoded pure value.
    Pure(Vec<u8>),
}

impl CallArg {
    /// Creates a pure `vector<u8>` argument from raw bytes.
    pub fn pure_bytes(bytes: &[u8]) -> Result<Self, bcs::Error> {
        Ok(Self::Pure(bcs::to_bytes(bytes)?))
    }

    /// Decodes the argument as a `vector<u8>`, if it is one.
    #[must_use]
    pub fn as_byte_vector(&self) -> Option<Vec<u8>> {
        match self {
            Self::Pure(encoded) => bcs::from_bytes::<Vec<u8>>(encoded).ok(),
        }
    }
}

/// A primitive Move type tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum TypeTag {
    Bool,
    U8,
    U64,
    U128,
    Address,
    Signer,
    Vector(Box<TypeTag>),
}

/// A reference to a value within a programmable transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Argument {
    /// The gas coin.
    GasCoin,
    /// One of the transaction inputs.
    Input(u16),
    /// The result of a previous command.
    Result(u16),
    /// One value out of a previous command's tuple result.
    NestedResult(u16, u16),
}

/// A call to a Move function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgrammableMoveCall {
    /// The package containing the module.
    pub package: ObjectId,
    /// The module name.
    pub module: String,
    /// The function name.
    pub function: String,
    /// The type arguments of the function.
    pub type_arguments: Vec<TypeTag>,
    /// The arguments of the function.
    pub arguments: Vec<Argument>,
}

/// A single command within a programmable transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Calls a Move function.
    MoveCall(Box<ProgrammableMoveCall>),
}

/// A sequence of commands over a shared list of inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgrammableTransaction {
    /// The inputs of the transaction.
    pub inputs: Vec<CallArg>,
    /// The commands of the transaction.
    pub commands: Vec<Command>,
}

/// The kind of a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionKind {
    /// A user programmable transaction.
    ProgrammableTransaction(ProgrammableTransaction),
}

/// How gas is paid for a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GasData {
    /// The coins used to pay for gas.
    pub payment: Vec<ObjectRef>,
    /// The owner of the gas coins.
    pub owner: SuiAddress,
    /// The gas price in MIST per unit.
    pub price: u64,
    /// The maximum amount of MIST the transaction may spend.
    pub budget: u64,
}

/// When a transaction stops being valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionExpiration {
    /// The transaction never expires.
    None,
    /// The transaction expires at the end of the given epoch.
    Epoch(u64),
}

/// The first version of transaction data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionDataV1 {
    /// The kind of the transaction.
    pub kind: TransactionKind,
    /// The sender of the transaction.
    pub sender: SuiAddress,
    /// The gas data of the transaction.
    pub gas_data: GasData,
    /// The expiration of the transaction.
    pub expiration: TransactionExpiration,
}

/// The unsigned payload of a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionData {
    #[allow(missing_docs)]
    V1(TransactionDataV1),
}

impl TransactionData {
    /// Creates programmable transaction data without an expiration.
    #[must_use]
    pub fn new_programmable(
        sender: SuiAddress,
        programmable: ProgrammableTransaction,
        gas_data: GasData,
    ) -> Self {
        Self::V1(TransactionDataV1 {
            kind: TransactionKind::ProgrammableTransaction(programmable),
            sender,
            gas_data,
            expiration: TransactionExpiration::None,
        })
    }

    /// The sender of the transaction.
    #[must_use]
    pub fn sender(&self) -> SuiAddress {
        match self {
            Self::V1(data) => data.sender,
        }
    }

    /// The gas data of the transaction.
    #[must_use]
    pub fn gas_data(&self) -> &GasData {
        match self {
            Self::V1(data) => &data.gas_data,
        }
    }

    /// Serializes the transaction data to BCS.
    pub fn to_bytes(&self) -> Result<Vec<u8>, bcs::Error> {
        bcs::to_bytes(self)
    }

    /// Returns the digest that is signed: Blake2b-256 over the intent message.
    pub fn signing_digest(&self) -> Result<[u8; 32], bcs::Error> {
        let bytes = self.to_bytes()?;
        Ok(blake2b256(&[&TRANSACTION_DATA_INTENT[..], &bytes[..]]))
    }

    /// Returns the digest the ledger assigns to this transaction.
    pub fn digest(&self) -> Result<TransactionDigest, bcs::Error> {
        let bytes = self.to_bytes()?;
        Ok(TransactionDigest::new(blake2b256(&[&b"TransactionData::"[..], &bytes[..]])))
    }
}

/// The Move function targeted by a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveCallTarget {
    /// The package containing the module.
    pub package: ObjectId,
    /// The module name.
    pub module: String,
    /// The function name.
    pub function: String,
}

impl MoveCallTarget {
    /// Creates a new target.
    pub fn new(package: ObjectId, module: impl Into<String>, function: impl Into<String>) -> Self {
        Self { package, module: module.into(), function: function.into() }
    }
}

impl fmt::Display for MoveCallTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}::{}", self.package, self.module, self.function)
    }
}

/// An unsigned description of exactly one Move call with its ordered arguments.
///
/// Immutable once constructed. Gas and sender are attached later, when the descriptor is turned
/// into [`TransactionData`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionDescriptor {
    target: MoveCallTarget,
    arguments: Vec<CallArg>,
}

impl TransactionDescriptor {
    /// Creates a new descriptor.
    pub fn new(target: MoveCallTarget, arguments: Vec<CallArg>) -> Result<Self, TransactionError> {
        if arguments.len() > MAX_INPUTS {
            return Err(TransactionError::TooManyArguments { count: arguments.len() });
        }
        Ok(Self { target, arguments })
    }

    /// The targeted Move function.
    #[must_use]
    pub fn target(&self) -> &MoveCallTarget {
        &self.target
    }

    /// The call arguments, in order.
    #[must_use]
    pub fn arguments(&self) -> &[CallArg] {
        &self.arguments
    }

    /// Lowers the descriptor to a programmable transaction with a single `MoveCall` command.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn to_programmable(&self) -> ProgrammableTransaction {
        let arguments = (0..self.arguments.len()).map(|i| Argument::Input(i as u16)).collect();
        let call = ProgrammableMoveCall {
            package: self.target.package,
            module: self.target.module.clone(),
            function: self.target.function.clone(),
            type_arguments: Vec::new(),
            arguments,
        };
        ProgrammableTransaction {
            inputs: self.arguments.clone(),
            commands: vec![Command::MoveCall(Box::new(call))],
        }
    }

    /// Attaches a sender and gas data to produce transaction data.
    #[must_use]
    pub fn to_transaction_data(&self, sender: SuiAddress, gas_data: GasData) -> TransactionData {
        TransactionData::new_programmable(sender, self.to_programmable(), gas_data)
    }
}
