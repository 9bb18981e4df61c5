//! Collects inscriptions from every input of a transaction.

use ordpool_envelope_fmt::{ParseConfig, envelopes};
use ordpool_protocols::{Protocol, RuneResult, classify_transaction, find_runestone};
use tracing::*;

use crate::encoding::ByteEncoder;
use crate::error::Diagnostic;
use crate::inscription::{Inscription, Location};
use crate::record::InscriptionRecord;
use crate::tx::TransactionSource;

/// Result of parsing a transaction.
///
/// Inscriptions are ordered by input index, then envelope index. Skipped
/// envelopes and inputs are listed in [`diagnostics`](Self::diagnostics), in
/// the order they were encountered.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ParseOutcome {
    inscriptions: Vec<Inscription>,
    diagnostics: Vec<Diagnostic>,
    lock_time: Option<u32>,
}

impl ParseOutcome {
    /// Decoded inscriptions.
    pub fn inscriptions(&self) -> &[Inscription] {
        &self.inscriptions
    }

    /// Consumes the outcome, returning the inscriptions.
    pub fn into_inscriptions(self) -> Vec<Inscription> {
        self.inscriptions
    }

    /// Envelopes and inputs that had to be skipped.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Whether anything was skipped.
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    /// Lock time of the parsed transaction, if a whole transaction was parsed.
    pub fn lock_time(&self) -> Option<u32> {
        self.lock_time
    }

    /// Protocol decided at transaction level, currently only CAT-21.
    pub fn transaction_protocol(&self) -> Option<Protocol> {
        self.lock_time.and_then(classify_transaction)
    }

    /// Boundary records for every inscription, bodies encoded with `encoder`.
    ///
    /// A transaction-level protocol, if any, takes the place of each
    /// inscription's own tag.
    pub fn records(&self, encoder: &dyn ByteEncoder) -> Vec<InscriptionRecord> {
        let tx_protocol = self.transaction_protocol();

        self.inscriptions
            .iter()
            .map(|inscription| {
                let mut record = InscriptionRecord::new(inscription, encoder);
                if let Some(protocol) = tx_protocol {
                    record.protocol = protocol;
                }
                record
            })
            .collect()
    }

    fn extend_from_witness(&mut self, witness: &[u8], input_index: usize, config: &ParseConfig) {
        let mut envelope_index = 0;

        for (marker_offset, result) in envelopes(witness, config) {
            match result {
                Ok(envelope) => {
                    debug!(
                        %input_index,
                        %envelope_index,
                        %marker_offset,
                        end_state = ?envelope.end_state(),
                        "decoded envelope"
                    );
                    let location = Location {
                        input_index,
                        envelope_index,
                    };
                    self.inscriptions
                        .push(Inscription::from_envelope(envelope, location));
                    envelope_index += 1;
                }
                Err(e) => {
                    warn!(%input_index, %marker_offset, %e, "skipping envelope");
                    self.diagnostics
                        .push(Diagnostic::envelope(input_index, marker_offset, e));
                }
            }
        }
    }
}

/// Parses every input of a transaction.
///
/// Never fails as a whole: an envelope that cannot be decoded, or an input
/// whose witness cannot be read, is recorded as a diagnostic and parsing goes
/// on with the rest.
pub fn parse_inscriptions<S>(source: &S, config: &ParseConfig) -> ParseOutcome
where
    S: TransactionSource + ?Sized,
{
    let mut outcome = ParseOutcome {
        lock_time: Some(source.lock_time()),
        ..Default::default()
    };

    for input_index in 0..source.input_count() {
        if !config.skip_precheck() && !source.has_marker(input_index) {
            debug!(%input_index, "no marker in witness");
            continue;
        }

        match source.witness_bytes(input_index) {
            Ok(witness) => outcome.extend_from_witness(&witness, input_index, config),
            Err(e) => {
                warn!(%input_index, %e, "skipping input");
                outcome.diagnostics.push(Diagnostic::input(input_index, e));
            }
        }
    }

    outcome
}

/// Parses the concatenated witness bytes of a single input.
pub fn parse_witness(witness: &[u8], input_index: usize, config: &ParseConfig) -> ParseOutcome {
    let mut outcome = ParseOutcome::default();
    outcome.extend_from_witness(witness, input_index, config);
    outcome
}

/// Decodes every inscription of a transaction with the default config,
/// dropping diagnostics.
pub fn inscriptions<S>(source: &S) -> Vec<Inscription>
where
    S: TransactionSource + ?Sized,
{
    parse_inscriptions(source, &ParseConfig::default()).into_inscriptions()
}

/// Decodes the runestone of a transaction, if any output carries one.
///
/// Outputs whose script cannot be read are skipped.
pub fn find_runestone_in<S>(source: &S) -> Option<RuneResult<Vec<u128>>>
where
    S: TransactionSource + ?Sized,
{
    let scripts = (0..source.output_count()).filter_map(|output| {
        source
            .output_script(output)
            .inspect_err(|e| warn!(%output, %e, "skipping output"))
            .ok()
    });

    find_runestone(scripts)
}
