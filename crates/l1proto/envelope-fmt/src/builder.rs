use bitcoin::{
    ScriptBuf,
    blockdata::script,
    constants::MAX_SCRIPT_ELEMENT_SIZE,
    opcodes::{
        OP_FALSE,
        all::{OP_CHECKSIG, OP_ENDIF, OP_IF},
    },
    script::PushBytesBuf,
};

use crate::errors::EnvelopeBuildError;
use crate::field::{BODY_SEPARATOR_TAG, FieldKind, encode_le_u64};

/// Protocol identifier pushed right after `OP_FALSE OP_IF`.
pub const PROTOCOL_ID: &[u8; 3] = b"ord";

/// Builds an inscription envelope with a content type and a body.
///
/// Creates a script with the structure:
/// `OP_FALSE OP_IF "ord" 1 <content_type> OP_0 <body_chunks> OP_ENDIF`.
///
/// # Errors
///
/// Returns [`EnvelopeBuildError::OversizedValue`] if the content type does not
/// fit in a single push.
pub fn build_inscription_script(
    content_type: &str,
    body: &[u8],
) -> Result<ScriptBuf, EnvelopeBuildError> {
    InscriptionBuilder::new()
        .content_type(content_type)
        .body(body.to_vec())
        .into_script()
}

/// Builds a reveal script: a pubkey and `OP_CHECKSIG` followed by envelopes.
///
/// ```text
/// <pubkey>
/// CHECKSIG
/// <envelope_0>
/// ...
/// <envelope_n>
/// ```
///
/// The envelopes are never executed, the key makes the script spendable.
///
/// # Errors
///
/// Returns [`EnvelopeBuildError`] if the pubkey or any push cannot be
/// converted to a `PushBytesBuf`.
pub fn build_reveal_script(
    pubkey: &[u8],
    inscriptions: &[InscriptionBuilder],
) -> Result<ScriptBuf, EnvelopeBuildError> {
    let pubkey_bytes = PushBytesBuf::try_from(pubkey.to_vec())
        .map_err(|_| EnvelopeBuildError::PubkeyConversion)?;

    let mut builder = script::Builder::new()
        .push_slice(pubkey_bytes)
        .push_opcode(OP_CHECKSIG);

    for inscription in inscriptions {
        builder = inscription.push_envelope(builder)?;
    }

    Ok(builder.into_script())
}

/// Assembles the fields and body of a single envelope.
#[derive(Clone, Debug, Default)]
pub struct InscriptionBuilder {
    fields: Vec<(Vec<u8>, Vec<u8>)>,
    body: Option<Vec<u8>>,
}

impl InscriptionBuilder {
    /// Empty envelope: no fields and no body.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field by tag push and value.
    ///
    /// An empty tag or the single byte `0` reads back as the body separator,
    /// so building such a field fails with
    /// [`EnvelopeBuildError::SeparatorTag`].
    pub fn field(mut self, tag: Vec<u8>, value: Vec<u8>) -> Self {
        self.fields.push((tag, value));
        self
    }

    /// Adds a field of a known kind.
    pub fn known(self, kind: FieldKind, value: Vec<u8>) -> Self {
        self.field(vec![kind.tag()], value)
    }

    /// Sets the content type.
    pub fn content_type(self, content_type: &str) -> Self {
        self.known(FieldKind::ContentType, content_type.as_bytes().to_vec())
    }

    /// Sets the content encoding.
    pub fn content_encoding(self, encoding: &str) -> Self {
        self.known(FieldKind::ContentEncoding, encoding.as_bytes().to_vec())
    }

    /// Sets the pointer, encoded little-endian without trailing zeros.
    pub fn pointer(self, pointer: u64) -> Self {
        self.known(FieldKind::Pointer, encode_le_u64(pointer))
    }

    /// Adds a parent.
    pub fn parent(self, parent: Vec<u8>) -> Self {
        self.known(FieldKind::Parent, parent)
    }

    /// Sets the metadata.
    pub fn metadata(self, metadata: Vec<u8>) -> Self {
        self.known(FieldKind::Metadata, metadata)
    }

    /// Sets the metaprotocol.
    pub fn metaprotocol(self, metaprotocol: &str) -> Self {
        self.known(FieldKind::Metaprotocol, metaprotocol.as_bytes().to_vec())
    }

    /// Sets the body. Without a body the separator is omitted too.
    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// Builds a script holding just this envelope.
    pub fn into_script(self) -> Result<ScriptBuf, EnvelopeBuildError> {
        let builder = self.push_envelope(script::Builder::new())?;
        Ok(builder.into_script())
    }

    /// Extends `builder` with
    /// `OP_FALSE OP_IF "ord" (<tag> <value>)* [OP_0 <body_chunks>] OP_ENDIF`.
    pub fn push_envelope(
        &self,
        mut builder: script::Builder,
    ) -> Result<script::Builder, EnvelopeBuildError> {
        builder = builder
            .push_opcode(OP_FALSE)
            .push_opcode(OP_IF)
            .push_slice(value_push(PROTOCOL_ID)?);

        for (tag, value) in &self.fields {
            if tag.is_empty() || tag.as_slice() == [BODY_SEPARATOR_TAG] {
                return Err(EnvelopeBuildError::SeparatorTag { tag: tag.clone() });
            }
            builder = builder.push_slice(value_push(tag)?);
            builder = builder.push_slice(value_push(value)?);
        }

        if let Some(body) = &self.body {
            builder = builder.push_opcode(OP_FALSE);

            for chunk in body.chunks(MAX_SCRIPT_ELEMENT_SIZE) {
                builder = builder.push_slice(value_push(chunk)?);
            }
        }

        builder = builder.push_opcode(OP_ENDIF);
        Ok(builder)
    }
}

fn value_push(value: &[u8]) -> Result<PushBytesBuf, EnvelopeBuildError> {
    if value.len() > MAX_SCRIPT_ELEMENT_SIZE {
        return Err(EnvelopeBuildError::OversizedValue { len: value.len() });
    }

    PushBytesBuf::try_from(value.to_vec())
        .map_err(|_| EnvelopeBuildError::OversizedValue { len: value.len() })
}
