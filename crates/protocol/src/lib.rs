//! Wire protocol for the CoreNLP annotation client.
//!
//! This crate contains the annotation document schema, the length-delimited
//! codec used on both request and response bodies, the request properties
//! carried in the `properties` query parameter, and the [`RequestExecutor`]
//! port through which a client performs its single HTTP exchange.
//!
//! ## Architectural Layer
//!
//! **Domain + port definitions.** This crate performs no network I/O.
//! It defines *what* goes on the wire and *what* an executor must do;
//! the `transport` crate defines *how* a real HTTP stack does it.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`document`] | Protobuf messages (`Document`, `Sentence`, `Token`) and required-field checks |
//! | [`codec`] | Varint length-prefixed envelopes: encode, lenient/strict decode, envelope iteration |
//! | [`properties`] | `RequestProperties` and wire constants |
//! | [`exchange`] | `CallContext`, `ExchangeRequest`/`ExchangeResponse`, `RequestExecutor` |
//! | [`identifiers`] | `RequestId` |
//! | [`errors`] | Codec, framing and transport errors plus retry advice |

pub mod codec;
pub mod document;
pub mod errors;
pub mod exchange;
pub mod identifiers;
pub mod properties;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use codec::{
    decode, decode_with_policy, encode, read_length_prefix, Envelopes, FramingPolicy,
    LengthPrefix,
};
pub use document::{Document, RequiredFields, Sentence, Token};
pub use errors::{BoxError, CodecError, FramingError, RetryPolicy, TransportError};
pub use exchange::{
    CallContext, ExchangeRequest, ExchangeResponse, RequestExecutor, ResponseBody,
};
pub use identifiers::RequestId;
pub use properties::{
    annotators, RequestProperties, DATA_FORMAT_SERIALIZED, PROPERTIES_PARAM,
    PROTOBUF_CONTENT_TYPE, PROTOBUF_SERIALIZER,
};
