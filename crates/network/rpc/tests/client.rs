mod common;

use std::time::Duration;

use base64::{engine::general_purpose::STANDARD, Engine};
use common::*;
use serde_json::json;
use zkv_rpc::{
    NetworkError, SuiClient, METHOD_DRY_RUN, METHOD_EXECUTE, METHOD_GET_COINS,
    METHOD_GET_REFERENCE_GAS_PRICE,
};
use zkv_sui_types::{CallArg, MoveCallTarget, ObjectId, TransactionData, TransactionDescriptor};

const VERIFICATION_PACKAGE: &str =
    "0xd0cb8699235e0785e6aba7b19e1065efbd359eea0ed702dc68228ecbda3de3e0";

const BUDGET: u64 = 100_000_000;

fn descriptor() -> TransactionDescriptor {
    let target = MoveCallTarget::new(
        VERIFICATION_PACKAGE.parse::<ObjectId>().unwrap(),
        "verifier",
        "verify_proof",
    );
    TransactionDescriptor::new(
        target,
        vec![
            CallArg::pure_bytes(&[1, 2, 3]).unwrap(),
            CallArg::pure_bytes(&[4, 5]).unwrap(),
            CallArg::pure_bytes(&[6]).unwrap(),
        ],
    )
    .unwrap()
}

fn client(transport: MockTransport) -> SuiClient<MockTransport> {
    SuiClient::new(transport).retry_timeout(Duration::from_millis(100))
}

#[tokio::test]
async fn test_address_is_local() {
    let transport = MockTransport::new();
    let client = client(transport.clone());
    let keypair = keypair();

    assert_eq!(client.address(&keypair), keypair.address());
    assert!(transport.calls().is_empty());
}

#[tokio::test]
async fn test_prepare_attaches_gas() {
    let transport = funded_transport();
    let client = client(transport.clone());
    let keypair = keypair();

    let prepared = client.prepare(&descriptor(), keypair.address(), BUDGET).await.unwrap();
    let gas = prepared.data().gas_data();
    assert_eq!(gas.price, 1000);
    assert_eq!(gas.budget, BUDGET);
    assert_eq!(gas.owner, keypair.address());
    assert_eq!(gas.payment.len(), 1);
    assert_eq!(prepared.data().sender(), keypair.address());

    // The encoded bytes are the BCS form of the data.
    let bytes = STANDARD.decode(prepared.tx_bytes()).unwrap();
    assert_eq!(bytes, prepared.data().to_bytes().unwrap());
    let decoded: TransactionData = bcs::from_bytes(&bytes).unwrap();
    assert_eq!(&decoded, prepared.data());

    let calls = transport.calls();
    assert_eq!(calls[0].0, METHOD_GET_REFERENCE_GAS_PRICE);
    assert_eq!(calls[1].0, METHOD_GET_COINS);
    assert_eq!(calls[1].1[0], json!(keypair.address().to_string()));
    assert_eq!(calls[1].1[1], json!("0x2::sui::SUI"));
}

#[tokio::test]
async fn test_prepare_follows_coin_pagination() {
    let transport = MockTransport::new()
        .reply("suix_getReferenceGasPrice", Reply::Ok(json!(750)))
        .reply("suix_getCoins", Reply::Ok(coin_page(&[60_000_000], Some("0x1"))))
        .reply("suix_getCoins", Reply::Ok(coin_page(&[50_000_000], None)));
    let client = client(transport.clone());

    let prepared = client.prepare(&descriptor(), keypair().address(), BUDGET).await.unwrap();
    assert_eq!(prepared.data().gas_data().payment.len(), 2);
    assert_eq!(transport.count(METHOD_GET_COINS), 2);
    assert_eq!(transport.calls()[2].1[2], json!("0x1"));
}

#[tokio::test]
async fn test_prepare_insufficient_gas() {
    let transport = MockTransport::new()
        .reply("suix_getReferenceGasPrice", Reply::Ok(json!("1000")))
        .reply("suix_getCoins", Reply::Ok(coin_page(&[10, 20], None)));
    let client = client(transport);

    let err = client.prepare(&descriptor(), keypair().address(), BUDGET).await.unwrap_err();
    assert!(matches!(err, NetworkError::InsufficientGas { available: 30, budget: BUDGET }));
}

#[tokio::test]
async fn test_prepare_retries_transient_errors() {
    let transport = MockTransport::new()
        .reply("suix_getReferenceGasPrice", Reply::Http(503))
        .reply("suix_getReferenceGasPrice", Reply::Ok(json!("1000")))
        .reply("suix_getCoins", Reply::Ok(coin_page(&[BUDGET], None)));
    let client = SuiClient::new(transport.clone()).retry_timeout(Duration::from_secs(10));

    client.prepare(&descriptor(), keypair().address(), BUDGET).await.unwrap();
    assert_eq!(transport.count(METHOD_GET_REFERENCE_GAS_PRICE), 2);
}

#[tokio::test]
async fn test_dry_run_success_then_execute() {
    let digest = "9vAXkqRZ7iyVoTmZ4Nw4gRudh1qZUFg7s1f4BXn2nb4p";
    let transport = funded_transport()
        .reply(METHOD_DRY_RUN, Reply::Ok(dry_run_success()))
        .reply(METHOD_EXECUTE, Reply::Ok(execution_success(digest)));
    let client = client(transport.clone());
    let keypair = keypair();

    let prepared = client.prepare(&descriptor(), keypair.address(), BUDGET).await.unwrap();
    let tx_bytes = prepared.tx_bytes().to_string();

    let simulated = client.dry_run(prepared).await.unwrap();
    assert!(simulated.dry_run_result().effects.failure().is_none());
    assert_eq!(transport.count(METHOD_EXECUTE), 0);

    let result = client.sign_and_execute(simulated, &keypair).await.unwrap();
    assert_eq!(result.digest, digest);
    assert_eq!(result.raw, execution_success(digest));

    // The executed bytes are exactly the simulated bytes, signed by the sender.
    let calls = transport.calls();
    let dry_run = calls.iter().find(|(m, _)| m == METHOD_DRY_RUN).unwrap();
    let execute = calls.iter().find(|(m, _)| m == METHOD_EXECUTE).unwrap();
    assert_eq!(dry_run.1[0], json!(tx_bytes));
    assert_eq!(execute.1[0], json!(tx_bytes));
    assert_eq!(execute.1[3], json!("WaitForLocalExecution"));
    assert_eq!(transport.count(METHOD_EXECUTE), 1);

    let signature = STANDARD.decode(execute.1[1][0].as_str().unwrap()).unwrap();
    assert_eq!(signature.len(), 97);
    assert_eq!(signature[0], 0x00);
    assert_eq!(&signature[65..], &keypair.public_key());
}

#[tokio::test]
async fn test_dry_run_failure_status() {
    let transport =
        funded_transport().reply(METHOD_DRY_RUN, Reply::Ok(dry_run_failure("MoveAbort(1)")));
    let client = client(transport.clone());

    let prepared = client.prepare(&descriptor(), keypair().address(), BUDGET).await.unwrap();
    let err = client.dry_run(prepared).await.unwrap_err();
    assert!(matches!(err, NetworkError::Simulation(ref reason) if reason == "MoveAbort(1)"));
}

#[tokio::test]
async fn test_dry_run_rpc_error_is_simulation_error() {
    let transport = funded_transport()
        .reply(METHOD_DRY_RUN, Reply::Rpc(-32002, "Transaction validator signing failed".into()));
    let client = client(transport.clone());

    let prepared = client.prepare(&descriptor(), keypair().address(), BUDGET).await.unwrap();
    let err = client.dry_run(prepared).await.unwrap_err();
    assert!(matches!(err, NetworkError::Simulation(_)));
    assert_eq!(transport.count(METHOD_DRY_RUN), 1);
}

#[tokio::test]
async fn test_execute_is_not_retried() {
    let transport = funded_transport()
        .reply(METHOD_DRY_RUN, Reply::Ok(dry_run_success()))
        .reply(METHOD_EXECUTE, Reply::Http(503));
    let client = SuiClient::new(transport.clone()).retry_timeout(Duration::from_secs(10));
    let keypair = keypair();

    let prepared = client.prepare(&descriptor(), keypair.address(), BUDGET).await.unwrap();
    let expected_digest = prepared.digest().to_string();
    let simulated = client.dry_run(prepared).await.unwrap();

    let err = client.sign_and_execute(simulated, &keypair).await.unwrap_err();
    assert!(matches!(err, NetworkError::Broadcast { ref digest, .. } if *digest == expected_digest));
    assert_eq!(transport.count(METHOD_EXECUTE), 1);
}

#[tokio::test]
async fn test_execute_failure_effects() {
    let mut response = execution_success("abc");
    response["effects"] = effects("failure", Some("InsufficientGas"));
    let transport = funded_transport()
        .reply(METHOD_DRY_RUN, Reply::Ok(dry_run_success()))
        .reply(METHOD_EXECUTE, Reply::Ok(response.clone()));
    let client = client(transport);
    let keypair = keypair();

    let prepared = client.prepare(&descriptor(), keypair.address(), BUDGET).await.unwrap();
    let simulated = client.dry_run(prepared).await.unwrap();
    let expected_digest = simulated.prepared().digest().to_string();
    let err = client.sign_and_execute(simulated, &keypair).await.unwrap_err();
    let (digest, reason, result) = match err {
        NetworkError::Broadcast { digest, reason, result } => (digest, reason, result),
        other => panic!("expected a broadcast error, got {other:?}"),
    };
    assert_eq!(digest, expected_digest);
    assert_eq!(reason, "InsufficientGas");

    // The node's response survives, unmodified.
    let result = result.expect("executed transaction keeps its response");
    assert_eq!(result.raw, response);
    assert_eq!(result.digest, "abc");
}

#[tokio::test]
async fn test_execute_malformed_response_keeps_digest() {
    let transport = funded_transport()
        .reply(METHOD_DRY_RUN, Reply::Ok(dry_run_success()))
        .reply(METHOD_EXECUTE, Reply::Ok(json!({ "effects": null })));
    let client = client(transport.clone());
    let keypair = keypair();

    let prepared = client.prepare(&descriptor(), keypair.address(), BUDGET).await.unwrap();
    let expected_digest = prepared.digest().to_string();
    let simulated = client.dry_run(prepared).await.unwrap();

    let err = client.sign_and_execute(simulated, &keypair).await.unwrap_err();
    assert!(matches!(
        err,
        NetworkError::Broadcast { ref digest, result: None, .. } if *digest == expected_digest
    ));
    assert_eq!(transport.count(METHOD_EXECUTE), 1);
}

#[tokio::test]
async fn test_execute_rejects_foreign_signer() {
    let transport = funded_transport().reply(METHOD_DRY_RUN, Reply::Ok(dry_run_success()));
    let client = client(transport.clone());
    let sender = keypair();
    let other = zkv_sui_types::derive_keypair(&"11".repeat(32)).unwrap();

    let prepared = client.prepare(&descriptor(), sender.address(), BUDGET).await.unwrap();
    let simulated = client.dry_run(prepared).await.unwrap();
    assert!(client.sign_and_execute(simulated, &other).await.is_err());
    assert_eq!(transport.count(METHOD_EXECUTE), 0);
}
