//! Parser, transaction and wallet behaviour through the public API

use alloy::consensus::{SignableTransaction, TxEip1559, TxEnvelope};
use alloy::eips::eip2718::Encodable2718;
use alloy::primitives::{address, Address, TxKind, B256, U256};
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::SignerSync;

use dapptools::infrastructure::abi::parse_interface;
use dapptools::infrastructure::ethereum::{decode_tx, DecodedTransaction, Wallet};
use dapptools::infrastructure::runtime::CancellationToken;
use dapptools::modules::toolkit::{tx, vanity};

#[test]
fn test_parser_ignores_whitespace_noise() {
    let noisy = parse_interface("'  constructor (string symbol,  string name)   '").unwrap();
    let clean = parse_interface("'constructor(string symbol, string name)'").unwrap();
    assert_eq!(noisy, clean);
}

#[test]
fn test_parser_quote_conventions() {
    assert!(parse_interface("\"constructor(string symbol, string name)\"").is_err());
    assert!(parse_interface("'constructor(string symbol, string name)'").is_ok());

    let iface = parse_interface("'function a()', 'function b(uint256)',").unwrap();
    assert_eq!(iface.len(), 2);
}

#[test]
fn test_eip155_legacy_transaction() {
    let raw = "0xf86c098504a817c800825208943535353535353535353535353535353535353535880de0b6b3a76400008025a028ef61340bd939bc2195fe537567866003e1a15d3c71ff63e1590620aa636276a067cbe9d8997f761aecb703304b3800ccf555c9f3dc64214b297fb1966a3b6d83";
    let signer = PrivateKeySigner::from_bytes(&B256::repeat_byte(0x46)).unwrap();

    let decoded = decode_tx(raw).unwrap();
    assert!(matches!(decoded.tx, DecodedTransaction::Legacy(_)));
    assert_eq!(decoded.sender, signer.address());
    assert_eq!(decoded.tx.nonce(), 9);

    let result = tx::tx(raw).unwrap();
    assert_eq!(result.get("from"), Some(signer.address().to_checksum(None).as_str()));
}

#[test]
fn test_fee_market_transaction() {
    let signer = PrivateKeySigner::random();
    let unsigned = TxEip1559 {
        chain_id: 1,
        nonce: 3,
        gas_limit: 21_000,
        max_fee_per_gas: 30_000_000_000,
        max_priority_fee_per_gas: 1_000_000_000,
        to: TxKind::Call(address!("0x000000000000000000000000000000000000dead")),
        value: U256::from(7u64),
        ..Default::default()
    };
    let signature = signer.sign_hash_sync(&unsigned.signature_hash()).unwrap();
    let envelope = TxEnvelope::from(unsigned.into_signed(signature));
    let raw = format!("0x{}", hex::encode(envelope.encoded_2718()));

    let decoded = decode_tx(&raw).unwrap();
    assert!(matches!(decoded.tx, DecodedTransaction::Eip1559(_)));
    assert_eq!(decoded.sender, signer.address());
    assert_eq!(decoded.tx.value(), U256::from(7u64));
}

#[test]
fn test_vanity_wallet_rederives_its_address() {
    let request = vanity::VanityRequest {
        prefix: "a".to_string(),
        suffix: String::new(),
        case_sensitive: false,
        workers: 2,
        max_tries: Some(10_000),
    };
    let wallet = vanity::generate(&request, &CancellationToken::new())
        .unwrap()
        .expect("a one-character prefix is found quickly");

    let checksummed = wallet.address.to_checksum(None);
    assert!(checksummed.starts_with("0xa") || checksummed.starts_with("0xA"));

    let again = Wallet::from_private_key(&wallet.private_key).unwrap();
    assert_eq!(again.address, wallet.address);
    assert_eq!(again.public_key, wallet.public_key);
    assert_eq!(wallet.address_from_public_key().unwrap(), wallet.address);
    assert_ne!(wallet.address, Address::ZERO);
}
