use bigdecimal::BigDecimal;
use serde_json::{Value, json};
use std::{
    collections::HashMap,
    str::FromStr,
    sync::{Arc, Mutex},
};

use balanced_swap::{
    AddressBook, ClientError, Network, PayloadError, Settings, SwapError, TransportError,
    icon_rpc::{
        CallPayload, ClientService, Contract, Payload, PayloadKind, PoolId, SwapRequest,
        TransactionPayload, TransactionService, Transport,
    },
    types::CurrencyId,
};

const ACCOUNT: &str = "hx0000000000000000000000000000000000000001";

/// Records every payload it receives and answers calls from a method table.
#[derive(Default)]
struct RecordingTransport {
    responses: HashMap<String, Value>,
    sent: Mutex<Vec<Payload>>,
    reject_transactions: bool,
}

impl RecordingTransport {
    fn with_response(mut self, method: &str, result: Value) -> Self {
        self.responses.insert(method.to_string(), result);
        self
    }

    fn rejecting() -> Self {
        Self {
            reject_transactions: true,
            ..Self::default()
        }
    }

    fn sent(&self) -> Vec<Payload> {
        self.sent.lock().unwrap().clone()
    }
}

impl Transport for RecordingTransport {
    async fn call(&self, payload: &CallPayload) -> Result<Value, TransportError> {
        self.sent.lock().unwrap().push(payload.clone().into());
        self.responses
            .get(payload.method())
            .cloned()
            .ok_or_else(|| TransportError::Rpc {
                code: -32601,
                message: format!("no response for {}", payload.method()),
            })
    }

    async fn send_transaction(&self, payload: &TransactionPayload) -> Result<String, TransportError> {
        self.sent.lock().unwrap().push(payload.clone().into());
        if self.reject_transactions {
            return Err(TransportError::Signature("user rejected".to_string()));
        }
        Ok(format!("0x{:064x}", self.sent.lock().unwrap().len()))
    }
}

fn addresses() -> AddressBook {
    AddressBook::default()
        .with(Contract::Dex, "cxdex")
        .with(Contract::Staking, "cxstaking")
        .with(Contract::Governance, "cxgov")
        .with(Contract::Sicx, "cxsicx")
        .with(Contract::Bnusd, "cxbnusd")
        .with(Contract::Baln, "cxbaln")
        .with(Contract::Iusdc, "cxiusdc")
}

fn settings(account: Option<&str>) -> Settings {
    let mut settings = Settings::new(Network::Mainnet).unwrap();
    settings.account = account.map(str::to_string);
    settings.addresses = addresses();
    settings
}

fn dec(s: &str) -> BigDecimal {
    BigDecimal::from_str(s).unwrap()
}

fn id(key: &str) -> CurrencyId {
    CurrencyId::new(key)
}

fn only_transaction(transport: &RecordingTransport) -> TransactionPayload {
    let sent = transport.sent();
    assert_eq!(sent.len(), 1, "expected exactly one payload, got {sent:?}");
    match sent.into_iter().next() {
        Some(Payload::Transaction(tx)) => tx,
        other => panic!("expected a transaction, got {other:?}"),
    }
}

fn decoded_data(tx: &TransactionPayload) -> Value {
    let raw = tx.params().unwrap()["_data"].as_str().unwrap();
    let bytes = hex::decode(raw.trim_start_matches("0x")).unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn price_query_is_a_hex_encoded_call() {
    let transport =
        Arc::new(RecordingTransport::default().with_response("getPrice", json!("0x1bc16d674ec80000")));
    let client = ClientService::new(transport.clone(), &settings(None));

    let price = client.get_price(PoolId::BALN_SICX).await.unwrap();
    assert_eq!(price, dec("2"));

    let sent = transport.sent();
    let Payload::Call(call) = &sent[0] else {
        panic!("expected a call payload");
    };
    assert_eq!(call.to(), "cxdex");
    assert_eq!(call.method(), "getPrice");
    assert_eq!(call.params()["_id"], "0x4");
    assert_eq!(call.sender(), None);
    assert_eq!(sent[0].kind(), PayloadKind::Call);
}

#[tokio::test]
async fn stablecoin_balance_uses_six_decimals() {
    let transport =
        Arc::new(RecordingTransport::default().with_response("balanceOf", json!("0x1e8480")));
    let client = ClientService::new(transport.clone(), &settings(Some(ACCOUNT)));

    let balance = client.balance_of(&id("IUSDC"), ACCOUNT).await.unwrap();
    assert_eq!(balance, dec("2"));
    assert_eq!(transport.sent()[0].to(), "cxiusdc");
}

#[tokio::test]
async fn rpc_errors_are_surfaced_unchanged() {
    let transport = Arc::new(RecordingTransport::default());
    let client = ClientService::new(transport, &settings(None));

    let err = client.proposal_count().await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::Transport(TransportError::Rpc { code: -32601, .. })
    ));
}

#[tokio::test]
async fn queries_reject_state_changing_methods() {
    let transport = Arc::new(RecordingTransport::default());
    let client = ClientService::new(transport.clone(), &settings(None));

    let err = client
        .call(Contract::Dex, "cancelSicxicxOrder", Default::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Payload(PayloadError::NotReadOnly(_))));
    assert!(transport.sent().is_empty());
}

#[test]
fn transaction_service_needs_an_account() {
    let transport = Arc::new(RecordingTransport::default());
    assert!(matches!(
        TransactionService::new(transport, &settings(None)),
        Err(PayloadError::MissingAccount)
    ));
}

#[tokio::test]
async fn icx_to_sicx_stakes_with_attached_value() {
    let transport = Arc::new(RecordingTransport::default());
    let service = TransactionService::new(transport.clone(), &settings(Some(ACCOUNT))).unwrap();

    let request = SwapRequest::new(id("ICX"), id("sICX"), "1.5", "0");
    service.swap(&request).await.unwrap();

    let tx = only_transaction(&transport);
    assert_eq!(tx.to(), "cxstaking");
    assert_eq!(tx.method(), Some("stakeICX"));
    assert_eq!(tx.value(), Some("0x14d1120d7b160000"));
    assert_eq!(tx.sender(), ACCOUNT);
}

#[tokio::test]
async fn sicx_to_icx_goes_through_the_dex() {
    let transport = Arc::new(RecordingTransport::default());
    let service = TransactionService::new(transport.clone(), &settings(Some(ACCOUNT))).unwrap();

    let request = SwapRequest::new(id("sICX"), id("ICX"), "1", "0");
    service.swap(&request).await.unwrap();

    let tx = only_transaction(&transport);
    assert_eq!(tx.to(), "cxsicx");
    assert_eq!(tx.method(), Some("transfer"));
    assert_eq!(tx.value(), None);
    let params = tx.params().unwrap();
    assert_eq!(params["_to"], "cxdex");
    assert_eq!(params["_value"], "0xde0b6b3a7640000");
    assert_eq!(decoded_data(&tx), json!({ "method": "_swap_icx" }));
}

#[tokio::test]
async fn token_swap_carries_minimum_receive_in_base_units() {
    let transport = Arc::new(RecordingTransport::default());
    let service = TransactionService::new(transport.clone(), &settings(Some(ACCOUNT))).unwrap();

    let request = SwapRequest::new(id("bnUSD"), id("IUSDC"), "10", "9.9999999");
    service.swap(&request).await.unwrap();

    let tx = only_transaction(&transport);
    assert_eq!(tx.to(), "cxbnusd");
    assert_eq!(
        decoded_data(&tx),
        json!({
            "method": "_swap",
            "params": { "toToken": "cxiusdc", "minimumReceive": "9999999" }
        })
    );
}

#[tokio::test]
async fn invalid_swaps_never_reach_the_transport() {
    let transport = Arc::new(RecordingTransport::default());
    let service = TransactionService::new(transport.clone(), &settings(Some(ACCOUNT))).unwrap();

    for request in [
        SwapRequest::new(id("ICX"), id("bnUSD"), "1", "0"),
        SwapRequest::new(id("BALN"), id("ICX"), "1", "0"),
        SwapRequest::new(id("sICX"), id("sICX"), "1", "0"),
    ] {
        let err = service.swap(&request).await.unwrap_err();
        assert!(
            matches!(err, ClientError::Swap(SwapError::InvalidSwap(_))),
            "{request:?} gave {err:?}"
        );
    }

    let err = service
        .swap(&SwapRequest::new(id("sICX"), id("bnUSD"), "-1", "0"))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Swap(SwapError::InvalidAmount(_))));

    assert!(transport.sent().is_empty());
}

#[tokio::test]
async fn transport_rejection_is_not_retried() {
    let transport = Arc::new(RecordingTransport::rejecting());
    let service = TransactionService::new(transport.clone(), &settings(Some(ACCOUNT))).unwrap();

    let err = service.cast_vote(3, true).await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::Transport(TransportError::Signature(_))
    ));

    let tx = only_transaction(&transport);
    assert_eq!(tx.to(), "cxgov");
    assert_eq!(tx.params().unwrap()["vote_index"], "0x3");
    assert_eq!(tx.params().unwrap()["vote"], "0x1");
}

#[tokio::test]
async fn icx_order_is_a_native_transfer_to_the_dex() {
    let transport = Arc::new(RecordingTransport::default());
    let service = TransactionService::new(transport.clone(), &settings(Some(ACCOUNT))).unwrap();

    service.place_icx_order(&dec("2")).await.unwrap();

    let tx = only_transaction(&transport);
    assert!(tx.is_native_transfer());
    assert_eq!(tx.to(), "cxdex");
    assert_eq!(tx.value(), Some("0x1bc16d674ec80000"));
}

#[tokio::test]
async fn remove_liquidity_encodes_the_withdraw_flag() {
    let transport = Arc::new(RecordingTransport::default());
    let service = TransactionService::new(transport.clone(), &settings(Some(ACCOUNT))).unwrap();

    service
        .remove_liquidity(PoolId::SICX_BNUSD, &dec("0.5"), true)
        .await
        .unwrap();

    let tx = only_transaction(&transport);
    let params = tx.params().unwrap();
    assert_eq!(params["_id"], "0x2");
    assert_eq!(params["_value"], "0x6f05b59d3b20000");
    assert_eq!(params["_withdraw"], "0x1");
}

#[test]
fn value_on_a_non_payable_method_is_rejected() {
    let transport = Arc::new(RecordingTransport::default());
    let service = TransactionService::new(transport, &settings(Some(ACCOUNT))).unwrap();

    let err = service
        .build(Contract::Dex, "cancelSicxicxOrder", Default::default(), Some(&dec("1")))
        .unwrap_err();
    assert_eq!(err, PayloadError::NotPayable("cancelSicxicxOrder".to_string()));

    let err = service
        .build(Contract::Dex, "getFees", Default::default(), None)
        .unwrap_err();
    assert_eq!(err, PayloadError::ReadOnly("getFees".to_string()));
}

#[tokio::test]
async fn miscased_stablecoin_key_is_rejected_not_rescaled() {
    let transport = Arc::new(RecordingTransport::default());
    let service = TransactionService::new(transport.clone(), &settings(Some(ACCOUNT))).unwrap();

    let err = service
        .swap(&SwapRequest::new(id("iusdc"), id("bnUSD"), "1", "0"))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Swap(SwapError::InvalidToken(_))));

    let err = service
        .deposit(&id("iusdc"), &dec("1"))
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Swap(SwapError::InvalidToken(_))));
    assert!(transport.sent().is_empty());

    service
        .swap(&SwapRequest::new(id("IUSDC"), id("bnUSD"), "1", "0"))
        .await
        .unwrap();
    let tx = only_transaction(&transport);
    assert_eq!(tx.to(), "cxiusdc");
    assert_eq!(tx.params().unwrap()["_value"], "0xf4240");
}
