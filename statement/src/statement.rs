//! The signable statement and its canonical text form.

use serde::{Deserialize, Serialize};

use vouch_types::{Identity, Provider, Timestamp};

use crate::resources::{scan_lines, ResourceScan, RESOURCE_LINE_MARKER};
use crate::StatementError;

const HEADER_SUFFIX: &str = " wants you to sign in with your Ethereum account:";
const URI_TAG: &str = "URI: ";
const VERSION_TAG: &str = "Version: ";
const CHAIN_ID_TAG: &str = "Chain ID: ";
const NONCE_TAG: &str = "Nonce: ";
const ISSUED_AT_TAG: &str = "Issued At: ";
const EXPIRATION_TAG: &str = "Expiration Time: ";
pub(crate) const RESOURCES_TAG: &str = "Resources:";

/// A signable statement.
///
/// Constructed fresh per verification attempt and never mutated afterwards.
/// `resources` holds the resource lines verbatim (without the `- ` marker) so
/// that a statement parsed from untrusted text keeps whatever it carried.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    pub domain: String,
    pub identity: Identity,
    pub statement: Option<String>,
    pub uri: String,
    pub version: String,
    pub chain_id: u64,
    pub nonce: String,
    pub issued_at: Timestamp,
    pub expiration: Timestamp,
    pub resources: Vec<String>,
}

impl Statement {
    /// Canonical text form; this is exactly what the wallet signs.
    pub fn render(&self) -> Result<String, StatementError> {
        let mut out = String::new();
        out.push_str(&self.domain);
        out.push_str(HEADER_SUFFIX);
        out.push('\n');
        out.push_str(self.identity.as_str());
        out.push('\n');
        if let Some(statement) = &self.statement {
            out.push('\n');
            out.push_str(statement);
            out.push('\n');
        }
        out.push('\n');
        push_field(&mut out, URI_TAG, &self.uri);
        push_field(&mut out, VERSION_TAG, &self.version);
        push_field(&mut out, CHAIN_ID_TAG, &self.chain_id.to_string());
        push_field(&mut out, NONCE_TAG, &self.nonce);
        push_field(&mut out, ISSUED_AT_TAG, &self.issued_at.to_rfc3339()?);
        out.push_str(EXPIRATION_TAG);
        out.push_str(&self.expiration.to_rfc3339()?);
        if !self.resources.is_empty() {
            out.push('\n');
            out.push_str(RESOURCES_TAG);
            for resource in &self.resources {
                out.push('\n');
                out.push_str(RESOURCE_LINE_MARKER);
                out.push_str(resource);
            }
        }
        Ok(out)
    }

    /// Parse the full statement text.
    ///
    /// This is strict about layout, unlike [`crate::scan_resources`], which
    /// only looks at resource lines and tolerates everything else.
    pub fn parse(text: &str) -> Result<Self, StatementError> {
        if text.trim().is_empty() {
            return Err(StatementError::Empty);
        }
        let mut lines = text.lines().peekable();

        let header = lines.next().ok_or(StatementError::MissingField("header"))?;
        let domain = header
            .strip_suffix(HEADER_SUFFIX)
            .filter(|d| !d.is_empty())
            .ok_or_else(|| malformed("header", header))?
            .to_string();

        let identity = lines.next().ok_or(StatementError::MissingField("identity"))?;
        let identity = Identity::new(identity).map_err(|_| malformed("identity", identity))?;

        expect_blank(lines.next())?;
        let statement = match lines.peek() {
            Some(line) if !line.starts_with(URI_TAG) => {
                let statement = line.to_string();
                lines.next();
                expect_blank(lines.next())?;
                Some(statement)
            }
            _ => None,
        };

        let uri = take_field(&mut lines, URI_TAG, "URI")?;
        let version = take_field(&mut lines, VERSION_TAG, "version")?;
        let chain_id = take_field(&mut lines, CHAIN_ID_TAG, "chain id")?;
        let chain_id = chain_id
            .parse::<u64>()
            .map_err(|_| malformed("chain id", &chain_id))?;
        let nonce = take_field(&mut lines, NONCE_TAG, "nonce")?;
        if nonce.len() < 8 || !nonce.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(malformed("nonce", &nonce));
        }
        let issued_at = Timestamp::parse_rfc3339(&take_field(&mut lines, ISSUED_AT_TAG, "issued-at")?)?;
        let expiration =
            Timestamp::parse_rfc3339(&take_field(&mut lines, EXPIRATION_TAG, "expiration")?)?;

        let mut resources = Vec::new();
        if let Some(line) = lines.next() {
            if line != RESOURCES_TAG {
                return Err(malformed("resources", line));
            }
            for line in lines {
                let resource = line
                    .strip_prefix(RESOURCE_LINE_MARKER)
                    .ok_or_else(|| malformed("resource line", line))?;
                resources.push(resource.to_string());
            }
        }

        Ok(Self {
            domain,
            identity,
            statement,
            uri,
            version,
            chain_id,
            nonce,
            issued_at,
            expiration,
            resources,
        })
    }

    /// Whether the statement's expiration has passed. Advisory only: freshness
    /// is enforced by the verification authority, not here.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        now >= self.expiration
    }

    /// Scan this statement's resource lines for `provider`.
    pub fn scan(&self, provider: Provider) -> ResourceScan {
        scan_lines(self.resources.iter().map(String::as_str), provider)
    }
}

fn push_field(out: &mut String, tag: &str, value: &str) {
    out.push_str(tag);
    out.push_str(value);
    out.push('\n');
}

fn malformed(field: &'static str, value: &str) -> StatementError {
    StatementError::MalformedField {
        field,
        value: value.to_string(),
    }
}

fn expect_blank(line: Option<&str>) -> Result<(), StatementError> {
    match line {
        Some("") => Ok(()),
        Some(other) => Err(malformed("separator", other)),
        None => Err(StatementError::MissingField("separator")),
    }
}

fn take_field<'a>(
    lines: &mut impl Iterator<Item = &'a str>,
    tag: &str,
    field: &'static str,
) -> Result<String, StatementError> {
    let line = lines.next().ok_or(StatementError::MissingField(field))?;
    let value = line.strip_prefix(tag).ok_or_else(|| malformed(field, line))?;
    if value.is_empty() {
        return Err(malformed(field, line));
    }
    Ok(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Statement {
        Statement {
            domain: "app.example.com".into(),
            identity: Identity::new("0x8ba1f109551bD432803012645Ac136ddd64DBA72").unwrap(),
            statement: Some("Verify account ownership and eligibility requirements.".into()),
            uri: "https://app.example.com".into(),
            version: "1".into(),
            chain_id: 1,
            nonce: "q8Xn2LpV0aZr7TtYc".into(),
            issued_at: Timestamp::new(1_714_564_800),
            expiration: Timestamp::new(1_714_586_400),
            resources: vec![
                "urn:verify:provider:twitter".into(),
                "urn:verify:provider:twitter:followers:gte:1000".into(),
                "urn:verify:action:airdrop".into(),
            ],
        }
    }

    const SAMPLE_TEXT: &str = "app.example.com wants you to sign in with your Ethereum account:
0x8ba1f109551bD432803012645Ac136ddd64DBA72

Verify account ownership and eligibility requirements.

URI: https://app.example.com
Version: 1
Chain ID: 1
Nonce: q8Xn2LpV0aZr7TtYc
Issued At: 2024-05-01T12:00:00Z
Expiration Time: 2024-05-01T18:00:00Z
Resources:
- urn:verify:provider:twitter
- urn:verify:provider:twitter:followers:gte:1000
- urn:verify:action:airdrop";

    #[test]
    fn renders_canonical_text() {
        assert_eq!(sample().render().unwrap(), SAMPLE_TEXT);
    }

    #[test]
    fn parse_inverts_render() {
        assert_eq!(Statement::parse(SAMPLE_TEXT).unwrap(), sample());
    }

    #[test]
    fn statement_line_and_resources_are_optional() {
        let mut bare = sample();
        bare.statement = None;
        bare.resources.clear();
        let text = bare.render().unwrap();
        assert!(!text.contains("Resources:"));
        assert_eq!(Statement::parse(&text).unwrap(), bare);
    }

    #[test]
    fn crlf_line_endings_are_accepted() {
        let crlf = SAMPLE_TEXT.replace('\n', "\r\n");
        assert_eq!(Statement::parse(&crlf).unwrap(), sample());
    }

    #[test]
    fn empty_text_is_a_hard_failure() {
        assert!(matches!(Statement::parse(""), Err(StatementError::Empty)));
        assert!(matches!(Statement::parse(" \n\t"), Err(StatementError::Empty)));
    }

    #[test]
    fn rejects_broken_layout() {
        let no_nonce = SAMPLE_TEXT.replace("Nonce: q8Xn2LpV0aZr7TtYc\n", "");
        assert!(Statement::parse(&no_nonce).is_err());

        let short_nonce = SAMPLE_TEXT.replace("q8Xn2LpV0aZr7TtYc", "abc");
        assert!(matches!(
            Statement::parse(&short_nonce),
            Err(StatementError::MalformedField { field: "nonce", .. })
        ));

        let bad_resource = format!("{SAMPLE_TEXT}\nurn:verify:action:unmarked");
        assert!(Statement::parse(&bad_resource).is_err());
    }

    #[test]
    fn expiry_is_advisory() {
        let s = sample();
        assert!(!s.is_expired(Timestamp::new(1_714_586_399)));
        assert!(s.is_expired(Timestamp::new(1_714_586_400)));
    }

    #[test]
    fn scan_reads_resource_lines() {
        let scan = sample().scan(Provider::Twitter);
        assert_eq!(scan.traits.get("followers").map(String::as_str), Some("gte:1000"));
        assert_eq!(scan.action.as_deref(), Some("airdrop"));
    }
}
