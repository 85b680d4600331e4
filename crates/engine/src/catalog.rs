//! Static capability catalog.
//!
//! The catalog is the fixed tree of providers, services, categories, and
//! operations the wizard offers. It is built once and referenced by
//! `&'static` pointer from the selection path, so comparing two selections
//! never has to clone or re-resolve a capability.

use indexmap::IndexMap;
use once_cell::sync::Lazy;

static CATALOG: Lazy<Catalog> = Lazy::new(Catalog::builtin);

/// What an operation does once a target has been picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// Approve or reject a pending manual-approval action.
    ManualApproval,
    /// Start a pipeline execution.
    StartPipeline,
}

#[derive(Debug, PartialEq, Eq)]
pub struct OperationSpec {
    pub id: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub kind: OperationKind,
}

#[derive(Debug, PartialEq, Eq)]
pub struct CategorySpec {
    pub id: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub operations: Vec<OperationSpec>,
}

impl CategorySpec {
    pub fn operation(&self, id: &str) -> Option<&OperationSpec> {
        self.operations.iter().find(|operation| operation.id == id)
    }

    pub fn offers(&self, operation: &OperationSpec) -> bool {
        self.operations.iter().any(|candidate| std::ptr::eq(candidate, operation))
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct ServiceSpec {
    pub id: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub categories: Vec<CategorySpec>,
}

impl ServiceSpec {
    pub fn category(&self, id: &str) -> Option<&CategorySpec> {
        self.categories.iter().find(|category| category.id == id)
    }

    pub fn offers(&self, category: &CategorySpec) -> bool {
        self.categories.iter().any(|candidate| std::ptr::eq(candidate, category))
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct ProviderSpec {
    pub id: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub services: Vec<ServiceSpec>,
}

impl ProviderSpec {
    pub fn service(&self, id: &str) -> Option<&ServiceSpec> {
        self.services.iter().find(|service| service.id == id)
    }

    pub fn offers(&self, service: &ServiceSpec) -> bool {
        self.services.iter().any(|candidate| std::ptr::eq(candidate, service))
    }
}

/// Capability tree keyed by provider id, in display order.
#[derive(Debug)]
pub struct Catalog {
    providers: IndexMap<&'static str, ProviderSpec>,
}

impl Catalog {
    /// The process-wide catalog.
    pub fn global() -> &'static Catalog {
        &CATALOG
    }

    pub fn providers(&self) -> impl Iterator<Item = &ProviderSpec> {
        self.providers.values()
    }

    pub fn provider(&self, id: &str) -> Option<&ProviderSpec> {
        self.providers.get(id)
    }

    pub fn offers(&self, provider: &ProviderSpec) -> bool {
        self.providers.values().any(|candidate| std::ptr::eq(candidate, provider))
    }

    fn builtin() -> Self {
        let codepipeline = ServiceSpec {
            id: "codepipeline",
            label: "CodePipeline",
            description: "Continuous delivery pipelines",
            categories: vec![CategorySpec {
                id: "operations",
                label: "Operations",
                description: "Act on pipelines and their approvals",
                operations: vec![
                    OperationSpec {
                        id: "manual-approval",
                        label: "Manual Approval",
                        description: "Approve or reject a pending approval action",
                        kind: OperationKind::ManualApproval,
                    },
                    OperationSpec {
                        id: "start-pipeline",
                        label: "Start Pipeline",
                        description: "Start a new pipeline execution",
                        kind: OperationKind::StartPipeline,
                    },
                ],
            }],
        };

        let mut providers = IndexMap::new();
        providers.insert(
            "aws",
            ProviderSpec {
                id: "aws",
                label: "AWS",
                description: "Amazon Web Services",
                services: vec![codepipeline],
            },
        );
        Self { providers }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_tree_resolves_by_id() {
        let operation = Catalog::global()
            .provider("aws")
            .and_then(|provider| provider.service("codepipeline"))
            .and_then(|service| service.category("operations"))
            .and_then(|category| category.operation("start-pipeline"))
            .expect("start-pipeline operation");
        assert_eq!(operation.kind, OperationKind::StartPipeline);
    }

    #[test]
    fn offers_compares_identity() {
        let provider = Catalog::global().provider("aws").expect("aws");
        let lookalike = ProviderSpec {
            id: "aws",
            label: "AWS",
            description: "Amazon Web Services",
            services: Vec::new(),
        };
        assert!(Catalog::global().offers(provider));
        assert!(!Catalog::global().offers(&lookalike));
    }
}
