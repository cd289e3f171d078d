use zkv_artifacts::ProofArtifact;
use zkv_sui_types::{CallArg, MoveCallTarget, ObjectId, TransactionDescriptor, TransactionError};

use crate::{BuildError, CallVariant, VERIFIER_MODULE};

/// Builds the Move call for `variant` against `package`.
///
/// Each required artifact field becomes one pure `vector<u8>` argument, in the order given by
/// [`CallVariant::required_fields`]. The bytes are passed through unchanged.
pub fn build(
    variant: CallVariant,
    package: ObjectId,
    artifact: &ProofArtifact,
) -> Result<TransactionDescriptor, BuildError> {
    let arguments = variant
        .required_fields()
        .iter()
        .map(|field| {
            let bytes =
                artifact.field(*field).ok_or(BuildError::MissingField { variant, field: *field })?;
            CallArg::pure_bytes(bytes).map_err(|e| BuildError::from(TransactionError::from(e)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let target = MoveCallTarget::new(package, VERIFIER_MODULE, variant.entry_point());
    Ok(TransactionDescriptor::new(target, arguments)?)
}
