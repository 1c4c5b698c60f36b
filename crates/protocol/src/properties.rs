//! Request properties carried in the `properties` query parameter.
//!
//! The service reads its per-request configuration from a JSON object passed
//! as a query parameter. Input and output formats are always the serialized
//! protobuf form; only the annotator list varies per call.

use serde::{Deserialize, Serialize};

/// Data format value for both input and output.
pub const DATA_FORMAT_SERIALIZED: &str = "serialized";

/// Serializer class the service uses for the protobuf wire format.
pub const PROTOBUF_SERIALIZER: &str = "edu.stanford.nlp.pipeline.ProtobufAnnotationSerializer";

/// Query parameter name holding the JSON-encoded [`RequestProperties`].
pub const PROPERTIES_PARAM: &str = "properties";

/// `content-type` of request bodies.
pub const PROTOBUF_CONTENT_TYPE: &str = "application/x-protobuf";

/// Per-request configuration sent to the service.
///
/// Field order is the order keys appear in the serialized JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestProperties {
    pub output_format: String,
    pub serializer: String,
    /// Comma-joined annotator names, in caller order, duplicates kept.
    pub annotators: String,
    pub input_format: String,
    pub input_serializer: String,
}

impl RequestProperties {
    /// Builds properties requesting the given annotators.
    ///
    /// Names are joined verbatim; an empty list yields an empty string and the
    /// service applies its own default pipeline.
    pub fn for_annotators<I, S>(annotators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = annotators
            .into_iter()
            .map(|name| name.as_ref().to_owned())
            .collect::<Vec<_>>()
            .join(",");

        Self {
            output_format: DATA_FORMAT_SERIALIZED.to_string(),
            serializer: PROTOBUF_SERIALIZER.to_string(),
            annotators: joined,
            input_format: DATA_FORMAT_SERIALIZED.to_string(),
            input_serializer: PROTOBUF_SERIALIZER.to_string(),
        }
    }

    /// Serializes to the compact JSON carried in the query parameter.
    pub fn to_query_value(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Annotator names in request order, empty names included.
    ///
    /// An empty `annotators` string is the empty list; otherwise every
    /// comma-separated entry is returned as sent.
    pub fn annotator_names(&self) -> impl Iterator<Item = &str> {
        let joined = if self.annotators.is_empty() {
            None
        } else {
            Some(self.annotators.as_str())
        };
        joined.into_iter().flat_map(|joined| joined.split(','))
    }
}

/// Well-known annotator names.
///
/// Any string is accepted by the client; these cover the common pipeline
/// steps so call sites need not spell them out.
pub mod annotators {
    pub const TOKENIZE: &str = "tokenize";
    pub const SSPLIT: &str = "ssplit";
    pub const POS: &str = "pos";
    pub const LEMMA: &str = "lemma";
    pub const NER: &str = "ner";
    pub const PARSE: &str = "parse";
    pub const DEPPARSE: &str = "depparse";
    pub const COREF: &str = "coref";
    pub const SENTIMENT: &str = "sentiment";
}
