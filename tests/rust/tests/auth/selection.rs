//! Strategy tag parsing

use std::sync::Arc;

use azdo_core::{AuthType, Error};
use azdo_server::{create_authenticator_with_env, AuthOptions, MapEnv};

fn create(tag: &str) -> azdo_core::Result<azdo_server::SharedTokenProvider> {
    create_authenticator_with_env(tag, AuthOptions::default(), Arc::new(MapEnv::new()))
}

#[test]
fn test_each_supported_tag_selects_its_strategy() {
    for auth_type in AuthType::ALL {
        let provider = create(auth_type.as_str()).unwrap();
        assert_eq!(provider.auth_type(), auth_type);
    }
}

#[test]
fn test_tags_are_case_insensitive() {
    assert_eq!(create("PAT").unwrap().auth_type(), AuthType::Pat);
    assert_eq!(create(" EnvVar ").unwrap().auth_type(), AuthType::EnvVar);
}

#[test]
fn test_unknown_tag_is_rejected_with_supported_list() {
    let err = create("ntlm").err().expect("ntlm must be rejected");
    match &err {
        Error::UnsupportedAuthType { tag, supported } => {
            assert_eq!(tag, "ntlm");
            assert_eq!(supported, &vec!["pat", "envvar", "azcli"]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.to_string().contains("pat, envvar, azcli"));
}

#[test]
fn test_construction_succeeds_without_any_credential() {
    // Credential sources are read on first use only
    assert!(create("pat").is_ok());
    assert!(create("envvar").is_ok());
}
