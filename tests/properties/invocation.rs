//! Property tests for CLI invocation composition.

use proptest::prelude::*;

use stagehand::{AwsConfig, Invocation};

fn modifier_value() -> impl Strategy<Value = Option<String>> {
    proptest::option::of(proptest::string::string_regex("[a-z0-9-]{0,16}").unwrap())
}

fn subcommand_args() -> impl Strategy<Value = Vec<String>> {
    let arg = proptest::string::string_regex("[A-Za-z0-9/*.:_-]{1,16}").unwrap();
    proptest::collection::vec(arg, 0..=6)
}

fn expected_argv(
    region: &Option<String>,
    profile: &Option<String>,
    args: &[String],
) -> Vec<String> {
    let mut expected = Vec::new();
    if let Some(r) = region.as_deref().filter(|r| !r.is_empty()) {
        expected.push("--region".to_string());
        expected.push(r.to_string());
    }
    if let Some(p) = profile.as_deref().filter(|p| !p.is_empty()) {
        expected.push("--profile".to_string());
        expected.push(p.to_string());
    }
    expected.extend(args.iter().cloned());
    expected
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: the composed argv is exactly region flags (iff set and
    /// non-empty), then profile flags (iff set and non-empty), then the
    /// subcommand arguments, unchanged and in order.
    #[test]
    fn property_argv_is_the_deterministic_composition(
        region in modifier_value(),
        profile in modifier_value(),
        args in subcommand_args(),
    ) {
        let aws = AwsConfig {
            region: region.clone(),
            profile: profile.clone(),
        };
        let argv = Invocation::new(args.clone()).for_aws(&aws).argv();

        prop_assert_eq!(argv, expected_argv(&region, &profile, &args));
    }

    /// PROPERTY: composition never panics on arbitrary input, including
    /// whitespace and control characters in the modifier values.
    #[test]
    fn property_composition_never_panics(
        region in "(?s).{0,32}",
        profile in "(?s).{0,32}",
        arg in "(?s).{0,32}",
    ) {
        let aws = AwsConfig {
            region: Some(region),
            profile: Some(profile),
        };
        let invocation = Invocation::new([arg]).for_aws(&aws);
        let _ = invocation.argv();
        let _ = invocation.rendered();
    }

    /// PROPERTY: the subcommand arguments always survive as the argv suffix.
    #[test]
    fn property_args_are_preserved_as_suffix(
        region in modifier_value(),
        profile in modifier_value(),
        args in subcommand_args(),
    ) {
        let aws = AwsConfig { region, profile };
        let argv = Invocation::new(args.clone()).for_aws(&aws).argv();

        prop_assert!(argv.len() >= args.len());
        prop_assert_eq!(&argv[argv.len() - args.len()..], &args[..]);
    }
}
