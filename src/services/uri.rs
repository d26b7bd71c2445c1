/// Shared extraction of identifiers from templated resource URIs.
///
/// Resource URIs have the shape `{scheme}://{id}` or
/// `{scheme}://{id}/{subresource}/{subid}`. Splitting on the literal `://`
/// must produce exactly two parts; anything else is a parse error.

use thiserror::Error;

use super::ToolError;

#[derive(Error, Debug, PartialEq, Eq)]
#[error("invalid uri format")]
pub struct InvalidUri;

impl From<InvalidUri> for ToolError {
    fn from(err: InvalidUri) -> Self {
        ToolError::InvalidArgs(err.to_string())
    }
}

/// Extract a numeric identifier: `droplets://12345` -> `12345`.
pub fn extract_numeric_id(uri: &str) -> Result<i64, InvalidUri> {
    extract_string_id(uri)?.parse().map_err(|_| InvalidUri)
}

/// Extract a string identifier verbatim: `firewalls://abc-123` -> `"abc-123"`.
pub fn extract_string_id(uri: &str) -> Result<String, InvalidUri> {
    let parts: Vec<&str> = uri.split("://").collect();
    if parts.len() != 2 {
        return Err(InvalidUri);
    }
    Ok(parts[1].to_string())
}

/// Parse `droplets://{id}/actions/{action_id}` into both numeric IDs.
pub fn parse_droplet_action_uri(uri: &str) -> Result<(i64, i64), InvalidUri> {
    let rest = extract_string_id(uri)?;
    let parts: Vec<&str> = rest.split('/').collect();
    if parts.len() != 3 || parts[1] != "actions" {
        return Err(InvalidUri);
    }
    let droplet_id = parts[0].parse().map_err(|_| InvalidUri)?;
    let action_id = parts[2].parse().map_err(|_| InvalidUri)?;
    Ok((droplet_id, action_id))
}

/// Parse `domains://{name}/records/{record_id}` into the name and record ID.
pub fn parse_domain_record_uri(uri: &str) -> Result<(String, i64), InvalidUri> {
    let rest = extract_string_id(uri)?;
    let parts: Vec<&str> = rest.split('/').collect();
    if parts.len() != 3 || parts[1] != "records" || parts[0].is_empty() {
        return Err(InvalidUri);
    }
    let record_id = parts[2].parse().map_err(|_| InvalidUri)?;
    Ok((parts[0].to_string(), record_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_extraction() {
        let cases: &[(&str, Option<i64>)] = &[
            ("droplet://12345", Some(12345)),
            ("droplet://00123", Some(123)),
            ("droplet://", None),
            ("droplet://abc123", None),
            ("droplet://1://2", None),
            ("droplet12345", None),
            ("", None),
        ];
        for (uri, expected) in cases {
            assert_eq!(extract_numeric_id(uri).ok(), *expected, "uri: {uri:?}");
        }
    }

    #[test]
    fn string_extraction() {
        let cases: &[(&str, Option<&str>)] = &[
            (
                "droplet://550e8400-e29b-41d4-a716-446655440000",
                Some("550e8400-e29b-41d4-a716-446655440000"),
            ),
            ("droplet://test-id", Some("test-id")),
            ("droplet://", Some("")),
            ("droplet://id://123", None),
            ("droplettest-id", None),
            ("", None),
        ];
        for (uri, expected) in cases {
            assert_eq!(
                extract_string_id(uri).ok().as_deref(),
                *expected,
                "uri: {uri:?}"
            );
        }
    }

    #[test]
    fn droplet_action_uris() {
        assert_eq!(
            parse_droplet_action_uri("droplets://123/actions/456"),
            Ok((123, 456))
        );
        assert!(parse_droplet_action_uri("droplets://123/456").is_err());
        assert!(parse_droplet_action_uri("droplets://123/snapshots/456").is_err());
        assert!(parse_droplet_action_uri("droplets://abc/actions/456").is_err());
        assert!(parse_droplet_action_uri("droplets://123/actions/xyz").is_err());
    }

    #[test]
    fn domain_record_uris() {
        assert_eq!(
            parse_domain_record_uri("domains://example.com/records/42"),
            Ok(("example.com".to_string(), 42))
        );
        assert!(parse_domain_record_uri("domains:///records/42").is_err());
        assert!(parse_domain_record_uri("domains://example.com/records/xyz").is_err());
        assert!(parse_domain_record_uri("domains://example.com/42").is_err());
    }
}
