//! Service address validation.

use url::Url;

use crate::errors::AddressError;

/// Parses and normalizes a service address.
///
/// The address must be an absolute URL with a host, e.g.
/// `http://127.0.0.1:9000`. Any query string it carries is kept; the
/// `properties` parameter is replaced per request.
pub fn parse_service_address(address: &str) -> Result<Url, AddressError> {
    let url = Url::parse(address).map_err(|source| AddressError::Invalid {
        address: address.to_string(),
        source,
    })?;

    if url.cannot_be_a_base() || !url.has_host() {
        return Err(AddressError::NotAbsolute {
            address: address.to_string(),
        });
    }

    Ok(url)
}
