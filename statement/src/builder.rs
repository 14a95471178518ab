//! Statement builder.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use vouch_grammar::{EncodedTrait, ResourceId, TraitRequirement};
use vouch_types::{Clock, Identity, Provider, StatementParams, SystemClock};

use crate::{generate_nonce, Statement, StatementError, TraitMap};

/// What a relying party wants signed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementRequest {
    pub provider: Option<Provider>,
    /// Trait name → raw, optionally operator-prefixed value. Order is kept.
    #[serde(default)]
    pub traits: TraitMap,
    pub action: Option<String>,
    pub verification_id: Option<String>,
    /// Overrides for the builder's default domain.
    pub domain: Option<String>,
    /// Overrides for the builder's default origin URI.
    pub origin: Option<String>,
    pub chain_id: Option<u64>,
}

impl StatementRequest {
    pub fn for_provider(provider: Provider) -> Self {
        Self {
            provider: Some(provider),
            ..Self::default()
        }
    }

    pub fn with_trait(mut self, name: impl Into<String>, raw: impl Into<String>) -> Self {
        self.traits.insert(name.into(), raw.into());
        self
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn with_verification_id(mut self, id: impl Into<String>) -> Self {
        self.verification_id = Some(id.into());
        self
    }
}

/// A freshly built statement together with its text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuiltStatement {
    pub statement: Statement,
    pub text: String,
}

impl BuiltStatement {
    pub fn nonce(&self) -> &str {
        &self.statement.nonce
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Builds canonical statements.
///
/// Resource identifiers are emitted in a fixed order: provider marker, traits
/// in request order, action, verification id. Two builds of the same request
/// therefore differ only in nonce and timestamps.
pub struct StatementBuilder {
    params: StatementParams,
    clock: Arc<dyn Clock>,
    strict: bool,
}

impl StatementBuilder {
    pub fn new(params: StatementParams) -> Self {
        Self {
            params,
            clock: Arc::new(SystemClock),
            strict: false,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Type-check every trait requirement before encoding it. Off by default:
    /// the encoding itself is permissive and the comparator checks types anyway.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn params(&self) -> &StatementParams {
        &self.params
    }

    /// The resource identifiers `request` encodes, in emission order.
    pub fn resources(&self, request: &StatementRequest) -> Result<Vec<ResourceId>, StatementError> {
        let mut resources = Vec::with_capacity(request.traits.len() + 3);

        match request.provider {
            Some(provider) => {
                resources.push(ResourceId::ProviderScope(provider));
                for (name, raw) in &request.traits {
                    let invalid = |source| StatementError::InvalidTrait {
                        name: name.clone(),
                        source,
                    };
                    if self.strict {
                        TraitRequirement::parse(name, raw).map_err(invalid)?;
                    }
                    let requirement = EncodedTrait::from_raw(name, raw).map_err(invalid)?;
                    resources.push(ResourceId::Trait {
                        provider,
                        requirement,
                    });
                }
            }
            None if !request.traits.is_empty() => return Err(StatementError::TraitsWithoutProvider),
            None => {}
        }

        if let Some(action) = &request.action {
            resources.push(ResourceId::action(action)?);
        }
        if let Some(id) = &request.verification_id {
            resources.push(ResourceId::verification_id(id)?);
        }
        Ok(resources)
    }

    /// Build a statement for `identity` with a fresh nonce.
    pub fn build(
        &self,
        identity: &Identity,
        request: &StatementRequest,
    ) -> Result<BuiltStatement, StatementError> {
        let domain = request.domain.as_deref().unwrap_or(&self.params.domain);
        let origin = request.origin.as_deref().unwrap_or(&self.params.origin);
        check_param("domain", domain)?;
        check_param("origin", origin)?;
        check_param("version", &self.params.version)?;
        if !self.params.statement.is_empty() {
            check_param("statement", &self.params.statement)?;
        }

        let resources = self
            .resources(request)?
            .iter()
            .map(ToString::to_string)
            .collect();

        let issued_at = self.clock.now();
        let statement = Statement {
            domain: domain.to_string(),
            identity: identity.clone(),
            statement: Some(self.params.statement.clone()).filter(|s| !s.is_empty()),
            uri: origin.to_string(),
            version: self.params.version.clone(),
            chain_id: request.chain_id.unwrap_or(self.params.chain_id),
            nonce: generate_nonce(),
            issued_at,
            expiration: issued_at.plus_secs(self.params.ttl_secs),
            resources,
        };
        let text = statement.render()?;
        debug!(
            identity = %identity,
            nonce = %statement.nonce,
            resources = statement.resources.len(),
            "built statement"
        );
        Ok(BuiltStatement { statement, text })
    }
}

fn check_param(field: &'static str, value: &str) -> Result<(), StatementError> {
    if value.trim().is_empty() || value.contains(['\n', '\r']) {
        return Err(StatementError::InvalidParam {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parse_traits, Statement};
    use vouch_grammar::GrammarError;
    use vouch_types::Timestamp;

    struct FixedClock(Timestamp);

    impl Clock for FixedClock {
        fn now(&self) -> Timestamp {
            self.0
        }
    }

    fn builder() -> StatementBuilder {
        let params = StatementParams {
            domain: "app.example.com".into(),
            origin: "https://app.example.com".into(),
            ..StatementParams::default()
        };
        StatementBuilder::new(params).with_clock(Arc::new(FixedClock(Timestamp::new(1_714_564_800))))
    }

    fn alice() -> Identity {
        Identity::new("0x8ba1f109551bD432803012645Ac136ddd64DBA72").unwrap()
    }

    #[test]
    fn builds_resources_in_fixed_order() {
        let request = StatementRequest::for_provider(Provider::Twitter)
            .with_trait("followers", "gte:1000")
            .with_trait("verified", "true")
            .with_action("airdrop")
            .with_verification_id("req-42");
        let built = builder().build(&alice(), &request).unwrap();
        assert_eq!(
            built.statement.resources,
            vec![
                "urn:verify:provider:twitter",
                "urn:verify:provider:twitter:followers:gte:1000",
                "urn:verify:provider:twitter:verified:eq:true",
                "urn:verify:action:airdrop",
                "urn:verify:verificationid:req-42",
            ]
        );
    }

    #[test]
    fn sets_issued_at_and_expiration() {
        let built = builder()
            .build(&alice(), &StatementRequest::default())
            .unwrap();
        assert_eq!(built.statement.issued_at, Timestamp::new(1_714_564_800));
        assert_eq!(built.statement.expiration, Timestamp::new(1_714_586_400));
        assert!(built.text.contains("Issued At: 2024-05-01T12:00:00Z"));
        assert!(built.text.contains("Expiration Time: 2024-05-01T18:00:00Z"));
        assert!(!built.text.contains("Resources:"));
    }

    #[test]
    fn text_parses_back_to_the_statement() {
        let request = StatementRequest::for_provider(Provider::Github)
            .with_trait("repos", "gt:3")
            .with_action("grant");
        let built = builder().build(&alice(), &request).unwrap();
        assert_eq!(Statement::parse(built.text()).unwrap(), built.statement);
    }

    #[test]
    fn nonce_is_fresh_per_build() {
        let request = StatementRequest::for_provider(Provider::Twitter);
        let a = builder().build(&alice(), &request).unwrap();
        let b = builder().build(&alice(), &request).unwrap();
        assert_ne!(a.nonce(), b.nonce());
        assert_eq!(a.statement.resources, b.statement.resources);
    }

    #[test]
    fn traits_round_trip_through_the_parser() {
        let request = StatementRequest::for_provider(Provider::Twitter)
            .with_trait("followers", "gte:1000")
            .with_trait("country", "in:US,CA")
            .with_trait("handle", "eq:alice");
        let built = builder().build(&alice(), &request).unwrap();
        let traits = parse_traits(built.text(), Provider::Twitter).unwrap();
        assert_eq!(traits["followers"], "gte:1000");
        assert_eq!(traits["country"], "in:US,CA");
        assert_eq!(traits["handle"], "alice");
    }

    #[test]
    fn request_overrides_domain_and_chain() {
        let request = StatementRequest {
            domain: Some("other.example.org".into()),
            chain_id: Some(10),
            ..StatementRequest::default()
        };
        let built = builder().build(&alice(), &request).unwrap();
        assert!(built
            .text
            .starts_with("other.example.org wants you to sign in"));
        assert_eq!(built.statement.chain_id, 10);
    }

    #[test]
    fn traits_need_a_provider() {
        let request = StatementRequest::default().with_trait("followers", "gte:1");
        assert!(matches!(
            builder().build(&alice(), &request),
            Err(StatementError::TraitsWithoutProvider)
        ));
    }

    #[test]
    fn permissive_by_default_strict_on_request() {
        let request = StatementRequest::for_provider(Provider::Twitter).with_trait("followers", "gt:abc");
        assert!(builder().build(&alice(), &request).is_ok());

        let err = builder().strict(true).build(&alice(), &request).unwrap_err();
        assert!(matches!(
            err,
            StatementError::InvalidTrait {
                source: GrammarError::UnsupportedOperatorForType { .. },
                ..
            }
        ));
    }

    #[test]
    fn rejects_multi_line_action() {
        let request = StatementRequest::default().with_action("air\ndrop");
        assert!(matches!(
            builder().build(&alice(), &request),
            Err(StatementError::Grammar(GrammarError::InvalidResourceValue(_)))
        ));
    }

    #[test]
    fn rejects_multi_line_domain() {
        let request = StatementRequest {
            domain: Some("evil.com\nURI: x".into()),
            ..StatementRequest::default()
        };
        assert!(matches!(
            builder().build(&alice(), &request),
            Err(StatementError::InvalidParam { field: "domain", .. })
        ));
    }
}
