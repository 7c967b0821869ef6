//! Only enabled domains contribute tools, each exactly once

use std::collections::HashSet;
use std::sync::Arc;

use azdo_core::{resolve_domains, Domain, DomainSet};
use azdo_server::{register_all, ToolRegistry, CATALOG};
use pretty_assertions::assert_eq;
use tests::fixtures::{self, OFFLINE_ORG};
use tests::CountingTokens;

fn deps() -> azdo_server::ToolDeps {
    fixtures::deps(OFFLINE_ORG, Arc::new(CountingTokens::new("pat")))
}

fn single(domain: Domain) -> DomainSet {
    [domain].into_iter().collect()
}

#[test]
fn test_all_domains_register_without_duplicates() {
    let registry = fixtures::registry(&deps(), &DomainSet::all());

    let names = registry.names();
    let unique: HashSet<&String> = names.iter().collect();
    assert_eq!(unique.len(), names.len());

    for domain in Domain::ALL {
        assert!(registry.count_for(domain) > 0, "{domain} has no tools");
    }
}

#[test]
fn test_disabled_domain_contributes_nothing() {
    let all = fixtures::registry(&deps(), &DomainSet::all());

    for domain in Domain::ALL {
        let only = fixtures::registry(&deps(), &single(domain));
        assert_eq!(only.len(), all.count_for(domain));

        for tool in only.tools() {
            assert_eq!(only.get(&tool.name).map(|t| t.domain), Some(domain));
        }
        for other in Domain::ALL.into_iter().filter(|d| *d != domain) {
            assert_eq!(only.count_for(other), 0);
        }
    }
}

#[test]
fn test_domain_tools_are_prefixed() {
    let registry = fixtures::registry(&deps(), &DomainSet::all());
    let prefixes = [
        (Domain::Core, "core_"),
        (Domain::Work, "work_"),
        (Domain::WorkItems, "wit_"),
        (Domain::Repositories, "repo_"),
        (Domain::Pipelines, "pipelines_"),
        (Domain::Wiki, "wiki_"),
        (Domain::TestPlans, "testplan_"),
        (Domain::Search, "search_"),
        (Domain::AdvancedSecurity, "advsec_"),
    ];

    for name in registry.names() {
        let domain = registry.get(&name).map(|t| t.domain);
        let expected = prefixes
            .iter()
            .find(|(_, prefix)| name.starts_with(prefix))
            .map(|(d, _)| *d);
        assert_eq!(domain, expected, "{name}");
    }
}

#[test]
fn test_selection_from_cli_tokens() {
    let domains = resolve_domains(&["Core", "work-items,wiki"]).unwrap();
    let registry = fixtures::registry(&deps(), &domains);

    assert!(registry.contains("core_list_projects"));
    assert!(registry.contains("wit_get_work_item"));
    assert!(registry.contains("wiki_get_page_content"));
    assert!(!registry.contains("repo_list_repos_by_project"));
    assert!(!registry.contains("search_code"));
}

#[test]
fn test_all_token_overrides_other_tokens() {
    let domains = resolve_domains(&["core", "ALL"]).unwrap();
    assert_eq!(domains, DomainSet::all());
}

#[test]
fn test_unknown_domain_is_rejected() {
    let err = resolve_domains(&["core", "boards"]).unwrap_err();
    assert!(err.to_string().contains("'boards'"));
}

#[test]
fn test_registration_order_follows_catalog() {
    let registry = fixtures::registry(&deps(), &DomainSet::all());
    let order: Vec<Domain> = registry
        .names()
        .iter()
        .filter_map(|n| registry.get(n).map(|t| t.domain))
        .fold(Vec::new(), |mut acc, d| {
            if acc.last() != Some(&d) {
                acc.push(d);
            }
            acc
        });
    let catalog: Vec<Domain> = CATALOG.iter().map(|(d, _)| *d).collect();
    assert_eq!(order, catalog);
}

#[test]
fn test_registering_a_domain_twice_reports_duplicate() {
    let deps = deps();
    let mut registry = ToolRegistry::new();
    register_all(&mut registry, &deps, &single(Domain::Core)).unwrap();

    let err = register_all(&mut registry, &deps, &single(Domain::Core)).unwrap_err();
    assert!(matches!(err, azdo_core::Error::DuplicateTool { .. }));
}

#[test]
fn test_every_tool_declares_an_object_schema() {
    let registry = fixtures::registry(&deps(), &DomainSet::all());
    for tool in registry.tools() {
        assert_eq!(
            tool.input_schema.get("type").and_then(|t| t.as_str()),
            Some("object"),
            "{}",
            tool.name
        );
        assert!(tool.description.is_some(), "{}", tool.name);
    }
}
