//! Transaction shapes the aggregator can read inscriptions from.

use bitcoin::{Transaction, hex::FromHex};
use ordpool_envelope_fmt::{has_marker, has_marker_bytes};
use serde::{Deserialize, Serialize};

use crate::error::InputError;

/// Read access to the parts of a transaction that carry inscriptions and
/// runes.
pub trait TransactionSource {
    /// Number of inputs.
    fn input_count(&self) -> usize;

    /// Cheap check whether the input's witness may hold an envelope. Must not
    /// return `false` for a witness that holds one.
    fn has_marker(&self, input: usize) -> bool;

    /// All witness items of the input, concatenated.
    fn witness_bytes(&self, input: usize) -> Result<Vec<u8>, InputError>;

    /// Number of outputs.
    fn output_count(&self) -> usize;

    /// Script of an output.
    fn output_script(&self, output: usize) -> Result<Vec<u8>, InputError>;

    /// Transaction lock time, as encoded on the wire.
    fn lock_time(&self) -> u32;
}

/// Transaction as served by common indexer JSON APIs.
///
/// Witness items and scripts are hex strings. Fields not listed here are
/// ignored when deserializing.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct RawTransaction {
    /// Inputs in index order.
    #[serde(default)]
    pub vin: Vec<RawInput>,

    /// Outputs in index order.
    #[serde(default)]
    pub vout: Vec<RawOutput>,

    /// Lock time.
    #[serde(default)]
    pub locktime: u32,
}

/// Input of a [`RawTransaction`].
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct RawInput {
    /// Hex-encoded witness items.
    #[serde(default, alias = "txinwitness")]
    pub witness: Vec<String>,
}

/// Output of a [`RawTransaction`].
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct RawOutput {
    /// Hex-encoded output script.
    #[serde(default, alias = "scriptPubKey")]
    pub scriptpubkey: String,
}

impl RawTransaction {
    fn vin(&self, input: usize) -> Result<&RawInput, InputError> {
        self.vin.get(input).ok_or(InputError::OutOfBounds(input))
    }
}

impl TransactionSource for RawTransaction {
    fn input_count(&self) -> usize {
        self.vin.len()
    }

    fn has_marker(&self, input: usize) -> bool {
        self.vin
            .get(input)
            .is_some_and(|vin| has_marker(&vin.witness))
    }

    fn witness_bytes(&self, input: usize) -> Result<Vec<u8>, InputError> {
        let mut bytes = Vec::new();
        for (item, hex) in self.vin(input)?.witness.iter().enumerate() {
            let decoded = Vec::<u8>::from_hex(hex)
                .map_err(|source| InputError::WitnessHex {
                    input,
                    item,
                    source,
                })?;
            bytes.extend_from_slice(&decoded);
        }
        Ok(bytes)
    }

    fn output_count(&self) -> usize {
        self.vout.len()
    }

    fn output_script(&self, output: usize) -> Result<Vec<u8>, InputError> {
        let vout = self
            .vout
            .get(output)
            .ok_or(InputError::OutOfBounds(output))?;
        Vec::<u8>::from_hex(&vout.scriptpubkey)
            .map_err(|source| InputError::ScriptHex { output, source })
    }

    fn lock_time(&self) -> u32 {
        self.locktime
    }
}

impl TransactionSource for Transaction {
    fn input_count(&self) -> usize {
        self.input.len()
    }

    fn has_marker(&self, input: usize) -> bool {
        self.input
            .get(input)
            .is_some_and(|txin| has_marker_bytes(txin.witness.iter()))
    }

    fn witness_bytes(&self, input: usize) -> Result<Vec<u8>, InputError> {
        let txin = self
            .input
            .get(input)
            .ok_or(InputError::OutOfBounds(input))?;
        Ok(txin.witness.iter().flatten().copied().collect())
    }

    fn output_count(&self) -> usize {
        self.output.len()
    }

    fn output_script(&self, output: usize) -> Result<Vec<u8>, InputError> {
        self.output
            .get(output)
            .map(|txout| txout.script_pubkey.to_bytes())
            .ok_or(InputError::OutOfBounds(output))
    }

    fn lock_time(&self) -> u32 {
        self.lock_time.to_consensus_u32()
    }
}

#[cfg(test)]
mod tests {
    use bitcoin::{
        Amount, OutPoint, ScriptBuf, Sequence, TxIn, TxOut, Witness, absolute,
        transaction::Version,
    };

    use super::*;

    #[test]
    fn test_raw_transaction_from_indexer_json() {
        let json = r#"{
            "txid": "ignored",
            "locktime": 21,
            "vin": [
                {"txid": "00", "vout": 0, "witness": ["aabb", "0063036f7264"]},
                {"txid": "01", "vout": 1}
            ],
            "vout": [{"scriptpubkey": "6a5d0100", "value": 0}]
        }"#;

        let tx: RawTransaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.input_count(), 2);
        assert_eq!(tx.lock_time(), 21);
        assert!(tx.has_marker(0));
        assert!(!tx.has_marker(1));
        assert!(!tx.has_marker(2));
        assert_eq!(
            tx.witness_bytes(0).unwrap(),
            vec![0xaa, 0xbb, 0x00, 0x63, 0x03, b'o', b'r', b'd']
        );
        assert_eq!(tx.witness_bytes(1).unwrap(), Vec::<u8>::new());
        assert_eq!(tx.output_script(0).unwrap(), vec![0x6a, 0x5d, 0x01, 0x00]);
    }

    #[test]
    fn test_core_rpc_aliases() {
        let json = r#"{"vin": [{"txinwitness": ["01"]}], "vout": [{"scriptPubKey": "51"}]}"#;
        let tx: RawTransaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.vin[0].witness, vec!["01".to_string()]);
        assert_eq!(tx.vout[0].scriptpubkey, "51");
        assert_eq!(tx.lock_time(), 0);
    }

    #[test]
    fn test_invalid_hex_reports_location() {
        let tx = RawTransaction {
            vin: vec![RawInput {
                witness: vec!["00".into(), "zz".into()],
            }],
            vout: vec![RawOutput {
                scriptpubkey: "6".into(),
            }],
            locktime: 0,
        };

        assert!(matches!(
            tx.witness_bytes(0),
            Err(InputError::WitnessHex {
                input: 0,
                item: 1,
                ..
            })
        ));
        assert!(matches!(
            tx.output_script(0),
            Err(InputError::ScriptHex { output: 0, .. })
        ));
        assert_eq!(tx.witness_bytes(3), Err(InputError::OutOfBounds(3)));
    }

    #[test]
    fn test_bitcoin_transaction_source() {
        let tx = Transaction {
            version: Version::TWO,
            lock_time: absolute::LockTime::from_consensus(21),
            input: vec![TxIn {
                previous_output: OutPoint::null(),
                script_sig: ScriptBuf::new(),
                sequence: Sequence::MAX,
                witness: Witness::from_slice(&[vec![0x01, 0x02], vec![0x00, 0x63, 0x03]]),
            }],
            output: vec![TxOut {
                value: Amount::ZERO,
                script_pubkey: ScriptBuf::from_bytes(vec![0x6a]),
            }],
        };

        assert_eq!(tx.input_count(), 1);
        assert_eq!(tx.lock_time(), 21);
        assert!(!tx.has_marker(0));
        assert_eq!(tx.witness_bytes(0).unwrap(), vec![0x01, 0x02, 0x00, 0x63, 0x03]);
        assert_eq!(tx.output_script(0).unwrap(), vec![0x6a]);
        assert_eq!(tx.output_script(1), Err(InputError::OutOfBounds(1)));
    }
}
