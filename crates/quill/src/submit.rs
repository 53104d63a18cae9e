//! Signing a transaction request and broadcasting it.

use quill_primitives::Hash;
use quill_rpc_client::{RpcClient, Transport};
use quill_signer::Signer;
use quill_transaction::{SignedTransaction, TransactionRequest};

use crate::{ChainProfile, Error, ValidationError};

/// Binds `request` to the profile's chain and signs it.
pub fn sign(
    signer: &impl Signer,
    request: impl Into<TransactionRequest>,
    profile: &ChainProfile,
) -> Result<SignedTransaction, Error> {
    let unsigned = request.into().bind(profile.chain_id);
    Ok(unsigned.sign(signer)?)
}

/// Signs `request` and submits it with `eth_sendRawTransaction`, returning
/// the transaction hash.
///
/// The node's chain id must match the profile. Blob transactions that carry
/// their sidecar are sent in network form. The send is not retried.
pub async fn sign_and_send<TransportT: Transport>(
    client: &RpcClient<TransportT>,
    signer: &impl Signer,
    request: impl Into<TransactionRequest>,
    profile: &ChainProfile,
) -> Result<Hash, Error> {
    let chain_id = client.chain_id().await?;
    if chain_id != profile.chain_id {
        return Err(ValidationError::ChainMismatch {
            expected: profile.chain_id,
            actual: chain_id,
        }
        .into());
    }

    let signed = sign(signer, request, profile)?;
    let hash = client.send_raw_transaction(&signed.to_raw_hex()).await?;

    if hash != signed.transaction_hash() {
        log::warn!(
            "Node returned transaction hash {hash}, computed {}",
            signed.transaction_hash()
        );
    }

    Ok(hash)
}
