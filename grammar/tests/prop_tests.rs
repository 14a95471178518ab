use proptest::prelude::*;

use vouch_grammar::{Comparison, EncodedTrait, Operator, ResourceId};
use vouch_types::Provider;

fn raw_comparison() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("true".to_string()),
        Just("false".to_string()),
        any::<i64>().prop_map(|n| n.to_string()),
        (prop::sample::select(vec!["gt", "gte", "lt", "lte"]), any::<i64>())
            .prop_map(|(op, n)| format!("{op}:{n}")),
        prop::collection::vec("[A-Z]{2}", 1..5).prop_map(|c| format!("in:{}", c.join(","))),
        "[a-z][a-z0-9_:.-]{0,20}",
    ]
}

proptest! {
    /// Whatever the encoder writes, the identifier decoder reads back as the same trait.
    #[test]
    fn encoded_trait_survives_resource_roundtrip(
        name in "[a-z][a-z0-9_]{0,15}",
        raw in raw_comparison(),
        idx in 0usize..Provider::ALL.len(),
    ) {
        let provider = Provider::ALL[idx];
        let requirement = EncodedTrait::from_raw(&name, &raw).unwrap();
        let line = ResourceId::Trait { provider, requirement: requirement.clone() }.to_string();
        prop_assert_eq!(
            ResourceId::parse(&line).unwrap(),
            ResourceId::Trait { provider, requirement }
        );
    }

    /// Typing a raw comparison does not depend on whether `eq:` was spelled out.
    #[test]
    fn explicit_eq_prefix_is_redundant(value in "[a-z0-9]{1,12}") {
        prop_assert_eq!(
            Comparison::parse(&value).unwrap(),
            Comparison::parse(&format!("eq:{value}")).unwrap()
        );
    }

    /// Ordering operators accept exactly the integers.
    #[test]
    fn ordering_operators_type_check(n in any::<i64>(), word in "[a-z]{1,8}") {
        for op in [Operator::Gt, Operator::Gte, Operator::Lt, Operator::Lte] {
            prop_assert!(Comparison::new(op, &n.to_string()).is_ok());
            prop_assert!(Comparison::new(op, &word).is_err());
        }
    }

    /// Decoding arbitrary text never panics.
    #[test]
    fn resource_parse_never_panics(s in "\\PC{0,80}") {
        let _ = ResourceId::parse(&s);
        let _ = ResourceId::parse(&format!("urn:verify:provider:twitter:{s}"));
    }
}
