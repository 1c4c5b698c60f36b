//! Outbound request construction.
//!
//! No business rules are applied to the text or annotator list: empty text and
//! an empty list are both sent as-is and the service decides what they mean.

use protocol::{
    codec, Document, ExchangeRequest, RequestProperties, PROPERTIES_PARAM, PROTOBUF_CONTENT_TYPE,
};
use url::Url;

use crate::errors::RequestError;

/// Builds the POST request for one annotate call.
///
/// - `properties` query parameter: JSON [`RequestProperties`], replacing any
///   `properties` already on `address` while keeping its other parameters.
/// - body: a [`Document`] with only `text` set, length-delimited.
/// - `content-type: application/x-protobuf`.
pub fn build_request<S: AsRef<str>>(
    address: &Url,
    text: &str,
    annotators: &[S],
) -> Result<ExchangeRequest, RequestError> {
    let properties = RequestProperties::for_annotators(annotators).to_query_value()?;

    let mut url = address.clone();
    let retained: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != PROPERTIES_PARAM)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();
    url.query_pairs_mut()
        .clear()
        .extend_pairs(retained)
        .append_pair(PROPERTIES_PARAM, &properties);

    Ok(ExchangeRequest {
        method: "POST".to_string(),
        url,
        headers: vec![(
            "content-type".to_string(),
            PROTOBUF_CONTENT_TYPE.to_string(),
        )],
        body: codec::encode(&Document::with_text(text)),
    })
}
