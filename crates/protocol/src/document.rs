//! Annotation document schema.
//!
//! The remote service defines a large protobuf schema; only the subset this
//! client reads is declared here, with the service's wire tags. Fields the
//! service sends that are not declared are skipped by the decoder, so a newer
//! server never breaks an older client.
//!
//! Every field is `optional` on the Rust side, including the two sentence
//! offsets the service's schema marks `required`. That keeps structural decode
//! lenient; [`RequiredFields`] recovers the required-ness as a separate check.

use prost::Message;

/// Root message exchanged with the service.
///
/// Outbound documents carry only [`Document::text`]; inbound documents come
/// back with sentences and tokens filled in by whichever annotators ran.
#[derive(Clone, PartialEq, Message)]
pub struct Document {
    /// The raw input text.
    #[prost(string, optional, tag = "1")]
    pub text: Option<String>,
    /// Sentences produced by sentence splitting.
    #[prost(message, repeated, tag = "2")]
    pub sentence: Vec<Sentence>,
    /// Caller-assigned document identifier, echoed back by the service.
    #[prost(string, optional, tag = "4")]
    pub doc_id: Option<String>,
    /// Document date used by temporal annotators.
    #[prost(string, optional, tag = "7")]
    pub doc_date: Option<String>,
}

impl Document {
    /// Creates an outbound document with only the text field set.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }
}

/// One sentence of an annotated document.
#[derive(Clone, PartialEq, Message)]
pub struct Sentence {
    #[prost(message, repeated, tag = "1")]
    pub token: Vec<Token>,
    /// Index of the first token of this sentence within the document.
    /// Required by the service schema.
    #[prost(uint32, optional, tag = "2")]
    pub token_offset_begin: Option<u32>,
    /// Index one past the last token of this sentence within the document.
    /// Required by the service schema.
    #[prost(uint32, optional, tag = "3")]
    pub token_offset_end: Option<u32>,
    #[prost(uint32, optional, tag = "4")]
    pub sentence_index: Option<u32>,
    #[prost(uint32, optional, tag = "5")]
    pub character_offset_begin: Option<u32>,
    #[prost(uint32, optional, tag = "6")]
    pub character_offset_end: Option<u32>,
}

/// One token of a sentence.
#[derive(Clone, PartialEq, Message)]
pub struct Token {
    #[prost(string, optional, tag = "1")]
    pub word: Option<String>,
    /// Part-of-speech tag.
    #[prost(string, optional, tag = "2")]
    pub pos: Option<String>,
    #[prost(string, optional, tag = "3")]
    pub value: Option<String>,
    /// Whitespace preceding the token in the original text.
    #[prost(string, optional, tag = "5")]
    pub before: Option<String>,
    /// Whitespace following the token in the original text.
    #[prost(string, optional, tag = "6")]
    pub after: Option<String>,
    #[prost(string, optional, tag = "7")]
    pub original_text: Option<String>,
    /// Named-entity tag.
    #[prost(string, optional, tag = "8")]
    pub ner: Option<String>,
    #[prost(uint32, optional, tag = "10")]
    pub begin_char: Option<u32>,
    #[prost(uint32, optional, tag = "11")]
    pub end_char: Option<u32>,
    #[prost(string, optional, tag = "12")]
    pub lemma: Option<String>,
    #[prost(uint32, optional, tag = "15")]
    pub begin_index: Option<u32>,
    #[prost(uint32, optional, tag = "16")]
    pub end_index: Option<u32>,
}

// ---------------------------------------------------------------------------
// Required-field checks
// ---------------------------------------------------------------------------

/// Required-field validation for decoded messages.
///
/// Decoding runs [`RequiredFields::is_initialized`] first. Only when that
/// reports `false` does it fall back to
/// [`RequiredFields::missing_required_fields`], and only a non-empty result
/// from the fallback fails the decode. Messages with no required fields use
/// the default implementations and always pass.
pub trait RequiredFields {
    /// Fast check: `true` when every required field, recursively, is present.
    fn is_initialized(&self) -> bool {
        true
    }

    /// Dotted paths of every missing required field, recursively.
    fn missing_required_fields(&self) -> Vec<String> {
        Vec::new()
    }
}

impl RequiredFields for Document {
    fn is_initialized(&self) -> bool {
        self.sentence.iter().all(RequiredFields::is_initialized)
    }

    fn missing_required_fields(&self) -> Vec<String> {
        self.sentence
            .iter()
            .enumerate()
            .flat_map(|(i, s)| {
                s.missing_required_fields()
                    .into_iter()
                    .map(move |field| format!("sentence[{i}].{field}"))
            })
            .collect()
    }
}

impl RequiredFields for Sentence {
    fn is_initialized(&self) -> bool {
        self.token_offset_begin.is_some() && self.token_offset_end.is_some()
    }

    fn missing_required_fields(&self) -> Vec<String> {
        let mut missing = Vec::new();
        if self.token_offset_begin.is_none() {
            missing.push("tokenOffsetBegin".to_string());
        }
        if self.token_offset_end.is_none() {
            missing.push("tokenOffsetEnd".to_string());
        }
        missing
    }
}

impl RequiredFields for Token {}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentence(begin: Option<u32>, end: Option<u32>) -> Sentence {
        Sentence {
            token_offset_begin: begin,
            token_offset_end: end,
            ..Sentence::default()
        }
    }

    #[test]
    fn with_text_sets_only_text() {
        let doc = Document::with_text("hello");
        assert_eq!(doc.text.as_deref(), Some("hello"));
        assert!(doc.sentence.is_empty());
        assert!(doc.doc_id.is_none());
        assert!(doc.doc_date.is_none());
    }

    #[test]
    fn text_only_document_is_initialized() {
        assert!(Document::with_text("").is_initialized());
        assert!(Document::default().missing_required_fields().is_empty());
    }

    #[test]
    fn missing_offsets_are_reported_with_sentence_index() {
        let doc = Document {
            sentence: vec![sentence(Some(0), Some(3)), sentence(Some(3), None)],
            ..Document::with_text("a b c. d")
        };

        assert!(!doc.is_initialized());
        assert_eq!(
            doc.missing_required_fields(),
            vec!["sentence[1].tokenOffsetEnd".to_string()]
        );
    }

    #[test]
    fn unknown_fields_are_skipped() {
        // Field 99 (varint) is not part of the declared schema.
        let mut buf = Document::with_text("x").encode_to_vec();
        buf.extend_from_slice(&[0x98, 0x06, 0x01]);

        let doc = Document::decode(buf.as_slice()).expect("decodes despite unknown field");
        assert_eq!(doc.text.as_deref(), Some("x"));
    }
}
