use std::str::FromStr;

use mockito::Matcher;
use quill::{Address, ChainProfile, Error, ErrorKind, ValidationError, Wei, submit};
use quill_rpc_client::{HttpTransport, RpcClient, RpcClientConfig};
use quill_signer::LocalSigner;
use quill_test_utils::{
    jsonrpc,
    secret_key::{HARDHAT_SECRET_KEY, secret_key_from_str},
};
use serde_json::json;

fn transfer(profile: &ChainProfile) -> anyhow::Result<quill::transaction::request::Eip1559> {
    Ok(profile
        .eip1559_builder()
        .nonce(0)
        .max_fee_per_gas(2_000_000_000)
        .to(Address::from_str("0x000000000000000000000000000000000000dead")?)
        .value(Wei::from_ether(1))
        .build()?)
}

#[tokio::test]
async fn signs_and_sends() -> anyhow::Result<()> {
    let profile = ChainProfile::hardhat();
    let signer = LocalSigner::new(secret_key_from_str(HARDHAT_SECRET_KEY)?);
    let expected = submit::sign(&signer, transfer(&profile)?, &profile)?;

    let mut server = mockito::Server::new_async().await;
    let chain_id = server
        .mock("POST", "/")
        .match_body(Matcher::PartialJson(json!({ "method": "eth_chainId" })))
        .with_body(jsonrpc::success(1, json!("0x7a69")))
        .expect(1)
        .create_async()
        .await;
    let send = server
        .mock("POST", "/")
        .match_body(Matcher::PartialJson(json!({
            "method": "eth_sendRawTransaction",
            "params": [expected.to_raw_hex()],
        })))
        .with_body(jsonrpc::success(
            2,
            json!(expected.transaction_hash().to_string()),
        ))
        .expect(1)
        .create_async()
        .await;

    let client = RpcClient::new(HttpTransport::new(
        &server.url(),
        &RpcClientConfig::default(),
    )?);
    let hash = submit::sign_and_send(&client, &signer, transfer(&profile)?, &profile).await?;

    assert_eq!(hash, expected.transaction_hash());
    chain_id.assert_async().await;
    send.assert_async().await;

    Ok(())
}

#[tokio::test]
async fn refuses_foreign_chain() -> anyhow::Result<()> {
    let profile = ChainProfile::hardhat();
    let signer = LocalSigner::new(secret_key_from_str(HARDHAT_SECRET_KEY)?);

    let mut server = mockito::Server::new_async().await;
    let _chain_id = server
        .mock("POST", "/")
        .match_body(Matcher::PartialJson(json!({ "method": "eth_chainId" })))
        .with_body(jsonrpc::success(1, json!("0x1")))
        .create_async()
        .await;
    let send = server
        .mock("POST", "/")
        .match_body(Matcher::PartialJson(json!({ "method": "eth_sendRawTransaction" })))
        .expect(0)
        .create_async()
        .await;

    let client = RpcClient::new(HttpTransport::new(
        &server.url(),
        &RpcClientConfig::default(),
    )?);
    let error = submit::sign_and_send(&client, &signer, transfer(&profile)?, &profile)
        .await
        .expect_err("chain ids differ");

    assert_eq!(error.kind(), ErrorKind::Validation);
    assert!(matches!(
        error,
        Error::Validation(ValidationError::ChainMismatch {
            expected: 31_337,
            actual: 1,
        })
    ));
    send.assert_async().await;

    Ok(())
}

#[tokio::test]
async fn rejected_send_is_an_rpc_error() -> anyhow::Result<()> {
    let profile = ChainProfile::hardhat();
    let signer = LocalSigner::new(secret_key_from_str(HARDHAT_SECRET_KEY)?);

    let mut server = mockito::Server::new_async().await;
    let _chain_id = server
        .mock("POST", "/")
        .match_body(Matcher::PartialJson(json!({ "method": "eth_chainId" })))
        .with_body(jsonrpc::success(1, json!("0x7a69")))
        .create_async()
        .await;
    let _send = server
        .mock("POST", "/")
        .match_body(Matcher::PartialJson(json!({ "method": "eth_sendRawTransaction" })))
        .with_body(jsonrpc::error(2, -32000, "nonce too low", None))
        .create_async()
        .await;

    let client = RpcClient::new(HttpTransport::new(
        &server.url(),
        &RpcClientConfig::default(),
    )?);
    let error = submit::sign_and_send(&client, &signer, transfer(&profile)?, &profile)
        .await
        .expect_err("node rejects the nonce");

    assert_eq!(error.kind(), ErrorKind::Rpc);
    assert!(!error.is_retryable());
    assert_eq!(
        error.rpc_error().map(|error| error.message.as_str()),
        Some("nonce too low")
    );

    Ok(())
}
