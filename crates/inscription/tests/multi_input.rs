//! End-to-end parsing of a batch reveal spread over many inputs.

#![expect(unused_crate_dependencies, reason = "suppress warnings")]

use bitcoin::{
    OutPoint, ScriptBuf, Sequence, Transaction, TxIn, Witness, absolute, hex::DisplayHex,
    transaction::Version,
};
use ordpool_envelope_fmt::{
    DecodeError, EnvelopeEnd, INSCRIPTION_MARKER,
    builder::{InscriptionBuilder, build_reveal_script},
};
use ordpool_inscription::{
    Base64Encoder, ParseConfig, Protocol, RawTransaction, SkipReason, inscriptions,
    parse_inscriptions,
};
use serde_json::json;

const INPUTS: usize = 116;
const PUBKEY: [u8; 32] = [0x79; 32];
const SIGNATURE: [u8; 64] = [0x5a; 64];
const CONTROL_BLOCK: [u8; 33] = [0xc0; 33];

const TEXT_BODY: &[u8] = b"gm from the first input of a batch reveal";
const SRC20_BODY: &[u8] = br#"{"p":"src-20","op":"transfer","tick":"STAMP","amt":"1000"}"#;

fn binary_body() -> Vec<u8> {
    (0..1200u32).map(|i| ((i * 31 + 7) % 251) as u8).collect()
}

fn reveal_witness(inscription: InscriptionBuilder) -> Vec<Vec<u8>> {
    let script = build_reveal_script(&PUBKEY, &[inscription]).unwrap();
    vec![SIGNATURE.to_vec(), script.into_bytes(), CONTROL_BLOCK.to_vec()]
}

fn plain_witness() -> Vec<Vec<u8>> {
    vec![vec![0x30; 71], vec![0x02; 33]]
}

fn transaction(witnesses: Vec<Vec<Vec<u8>>>) -> Transaction {
    Transaction {
        version: Version::TWO,
        lock_time: absolute::LockTime::ZERO,
        input: witnesses
            .into_iter()
            .map(|items| TxIn {
                previous_output: OutPoint::null(),
                script_sig: ScriptBuf::new(),
                sequence: Sequence::ENABLE_RBF_NO_LOCKTIME,
                witness: Witness::from_slice(&items),
            })
            .collect(),
        output: Vec::new(),
    }
}

fn batch_reveal() -> Transaction {
    let mut witnesses = vec![
        reveal_witness(
            InscriptionBuilder::new()
                .content_type("text/plain;charset=utf-8")
                .body(TEXT_BODY.to_vec()),
        ),
        reveal_witness(
            InscriptionBuilder::new()
                .content_type("application/json")
                .body(SRC20_BODY.to_vec()),
        ),
        reveal_witness(
            InscriptionBuilder::new()
                .content_type("image/webp")
                .body(binary_body()),
        ),
    ];
    witnesses.resize_with(INPUTS, plain_witness);
    transaction(witnesses)
}

fn as_raw_transaction(tx: &Transaction) -> RawTransaction {
    let vin: Vec<_> = tx
        .input
        .iter()
        .map(|txin| {
            let items: Vec<_> = txin.witness.iter().map(|i| i.to_lower_hex_string()).collect();
            json!({ "txid": txin.previous_output.txid.to_string(), "witness": items })
        })
        .collect();

    serde_json::from_value(json!({ "version": 2, "locktime": 0, "vin": vin, "vout": [] }))
        .unwrap()
}

#[test]
fn test_batch_reveal_yields_three_inscriptions_in_input_order() {
    let tx = batch_reveal();
    assert_eq!(tx.input.len(), INPUTS);

    let outcome = parse_inscriptions(&tx, &ParseConfig::default());
    assert!(!outcome.has_errors());

    let found = outcome.inscriptions();
    assert_eq!(found.len(), 3);

    let inputs: Vec<_> = found.iter().map(|i| i.input_index()).collect();
    assert_eq!(inputs, vec![0, 1, 2]);
    assert!(found.iter().all(|i| i.envelope_index() == 0));

    assert_eq!(found[0].body(), TEXT_BODY);
    assert_eq!(found[1].body(), SRC20_BODY);
    assert_eq!(found[2].body(), binary_body().as_slice());

    assert_eq!(found[0].content_type(), Some("text/plain;charset=utf-8"));
    assert_eq!(found[0].protocol(), Protocol::Plain);
    assert_eq!(found[1].protocol(), Protocol::Src20);
    assert_eq!(found[2].content_type(), Some("image/webp"));
    assert!(found.iter().all(|i| i.end_state() == EnvelopeEnd::Terminated));
}

#[test]
fn test_json_shaped_transaction_matches() {
    let tx = batch_reveal();
    let raw = as_raw_transaction(&tx);

    let from_json = parse_inscriptions(&raw, &ParseConfig::default());
    let from_tx = parse_inscriptions(&tx, &ParseConfig::default());
    assert_eq!(from_json, from_tx);

    // Deterministic across calls.
    assert_eq!(from_json, parse_inscriptions(&raw, &ParseConfig::default()));

    let records = from_json.records(&Base64Encoder);
    assert_eq!(records.len(), 3);
    assert_eq!(records[2].content_length, 1200);
    assert_eq!(records[2].body_encoding, "base64");
}

#[test]
fn test_invalid_opcode_does_not_stop_other_inputs() {
    let mut broken = INSCRIPTION_MARKER.to_vec();
    broken.extend([0x01, 0x01, 0xff]);

    let tx = transaction(vec![
        vec![SIGNATURE.to_vec(), broken, CONTROL_BLOCK.to_vec()],
        reveal_witness(
            InscriptionBuilder::new()
                .content_type("text/plain")
                .body(TEXT_BODY.to_vec()),
        ),
    ]);

    let outcome = parse_inscriptions(&tx, &ParseConfig::default());

    assert_eq!(outcome.inscriptions().len(), 1);
    assert_eq!(outcome.inscriptions()[0].input_index(), 1);
    assert_eq!(outcome.inscriptions()[0].body(), TEXT_BODY);

    let diagnostics = outcome.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].input_index(), 0);
    assert_eq!(diagnostics[0].marker_offset(), Some(SIGNATURE.len()));
    assert_eq!(
        diagnostics[0].reason(),
        &SkipReason::Decode(DecodeError::InvalidPushOpcode {
            opcode: 0xff,
            position: SIGNATURE.len() + INSCRIPTION_MARKER.len() + 2,
        })
    );
}

#[test]
fn test_unterminated_envelope_yields_partial_inscription() {
    let mut script = InscriptionBuilder::new()
        .content_type("text/plain")
        .body(TEXT_BODY.to_vec())
        .into_script()
        .unwrap()
        .into_bytes();
    script.pop();

    let found = inscriptions(&transaction(vec![vec![script]]));

    assert_eq!(found.len(), 1);
    assert!(found[0].is_truncated());
    assert_eq!(found[0].content_type(), Some("text/plain"));
    assert_eq!(found[0].body(), TEXT_BODY);
}

#[test]
fn test_no_marker_no_inscriptions() {
    let mut witnesses = Vec::new();
    witnesses.resize_with(INPUTS, plain_witness);
    let tx = transaction(witnesses);

    let outcome = parse_inscriptions(&tx, &ParseConfig::default());
    assert!(outcome.inscriptions().is_empty());
    assert!(!outcome.has_errors());
}
