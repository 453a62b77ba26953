use reqwest::Url;

use crate::error::CoreError;

/// Validate an explorer base URL and derive the display name reported as
/// the source of risk indicators.
pub(super) fn parse_base_url(base_url: &str) -> Result<(String, String), CoreError> {
    let parsed = Url::parse(base_url).map_err(|e| {
        CoreError::InvalidInput(format!(
            "invalid explorer url `{base_url}`: expected HTTP(S) URL ({e})"
        ))
    })?;
    match parsed.scheme() {
        "http" | "https" => {}
        other => {
            return Err(CoreError::InvalidInput(format!(
                "unsupported explorer url scheme `{other}`; expected http or https"
            )));
        }
    }

    let host = parsed.host_str().unwrap_or_default();
    let name = if host.contains("etherscan") {
        "Etherscan".to_owned()
    } else if host.is_empty() {
        "Block Explorer".to_owned()
    } else {
        host.to_owned()
    };
    Ok((base_url.to_owned(), name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_base_url_names_etherscan() {
        let (url, name) = parse_base_url("https://api.etherscan.io/api").expect("should parse");
        assert_eq!(url, "https://api.etherscan.io/api");
        assert_eq!(name, "Etherscan");
    }

    #[test]
    fn parse_base_url_uses_host_for_other_explorers() {
        let (_, name) = parse_base_url("http://127.0.0.1:8545/api").expect("should parse");
        assert_eq!(name, "127.0.0.1");
    }

    #[test]
    fn parse_base_url_invalid_scheme() {
        let err = parse_base_url("ftp://example.com").expect_err("must reject ftp");
        assert!(err.to_string().contains("unsupported explorer url scheme"));
    }

    #[test]
    fn parse_base_url_rejects_garbage() {
        let err = parse_base_url("not a url").expect_err("must reject");
        assert!(err.to_string().contains("invalid explorer url"));
    }
}
