//! OpenAPI document generator
//!
//! Templates paths, runs an inference session over the decoded traffic and
//! lays the resulting schemas out as OpenAPI operations.

use super::types::{
    Document, Operation, Parameter, ParameterLocation, RequestBodyObject, ResponseObject,
    SchemaObject, SecuritySchemeObject,
};
use crate::auth::AuthDetector;
use crate::config::{DocumentConfig, InferenceConfig};
use crate::engine::{EndpointReport, InferenceSession, SessionReport};
use crate::paths::{path_parameters, PathPatternDetector};
use crate::schema::{Format, SchemaType};
use crate::traffic::{is_auth_header, is_common_header, ApiTransaction};
use crate::types::{Method, MultiMap};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tracing::{debug, info, warn};

static VERSION_SEGMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^v\d+$").unwrap());

/// Request details that never reach the schema engine
#[derive(Debug, Default)]
struct OperationFacts {
    /// First concrete path seen for the template
    sample_path: String,
    /// Name -> first observed value
    query: BTreeMap<String, String>,
    /// Name -> first observed value
    headers: BTreeMap<String, String>,
}

impl OperationFacts {
    fn record(&mut self, transaction: &ApiTransaction) {
        if self.sample_path.is_empty() {
            self.sample_path.clone_from(&transaction.request.path);
        }
        record_first(&mut self.query, &transaction.request.query_params, |_| true);
        record_first(&mut self.headers, &transaction.request.headers, |name| {
            !is_common_header(name) && !is_auth_header(name)
        });
    }
}

/// Everything one pass over the traffic produces
struct Inferred {
    report: SessionReport,
    facts: BTreeMap<(String, Method), OperationFacts>,
    auth: AuthDetector,
}

fn record_first(
    into: &mut BTreeMap<String, String>,
    from: &MultiMap,
    keep: impl Fn(&str) -> bool,
) {
    for (name, values) in from {
        if keep(name) && !into.contains_key(name) {
            if let Some(first) = values.first() {
                into.insert(name.clone(), first.clone());
            }
        }
    }
}

/// Builds OpenAPI documents from captured transactions
#[derive(Debug, Clone, Default)]
pub struct OpenApiGenerator {
    config: InferenceConfig,
}

impl OpenApiGenerator {
    pub fn new(config: InferenceConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &InferenceConfig {
        &self.config
    }

    /// Run inference over `transactions` and return the per-endpoint report
    pub fn infer(&self, transactions: &[ApiTransaction]) -> SessionReport {
        self.run(transactions).report
    }

    /// Generate a document from `transactions`
    ///
    /// Transactions with an unknown method are skipped with a warning. Auth
    /// schemes seen anywhere in the traffic land in `components.securitySchemes`.
    pub fn generate(&self, transactions: &[ApiTransaction]) -> Document {
        let Inferred { report, facts, auth } = self.run(transactions);
        let document_config = &self.config.document;
        let mut document = Document::new(document_config);
        document.components.security_schemes = auth
            .schemes()
            .map(|scheme| (scheme.component_name(), SecuritySchemeObject::from(scheme)))
            .collect();
        let unseen = OperationFacts::default();

        for endpoint in &report.endpoints {
            let facts = facts
                .get(&(endpoint.path.clone(), endpoint.method))
                .unwrap_or(&unseen);

            document
                .paths
                .entry(endpoint.path.clone())
                .or_default()
                .insert(
                    endpoint.method.as_lower().to_string(),
                    build_operation(endpoint, facts, document_config),
                );
        }

        info!(
            "Generated document with {} paths and {} operations",
            document.paths.len(),
            document.operation_count()
        );
        document
    }

    fn run(&self, transactions: &[ApiTransaction]) -> Inferred {
        let detector = self.detect_patterns(transactions);
        let mut session = InferenceSession::new(&self.config);
        let mut facts: BTreeMap<(String, Method), OperationFacts> = BTreeMap::new();
        let mut auth = AuthDetector::new();

        for transaction in transactions {
            auth.analyze_transaction(transaction);

            let method = match transaction.method() {
                Ok(method) => method,
                Err(e) => {
                    warn!("Skipping transaction for {}: {}", transaction.request.path, e);
                    continue;
                }
            };

            let path = match &detector {
                Some(detector) => detector.templatize_path(&transaction.request.path),
                None => transaction.request.path.clone(),
            };

            match transaction.to_observation(&path) {
                Ok(observation) => session.observe(&observation),
                Err(e) => {
                    warn!("Skipping {} {}: {}", method, transaction.request.path, e);
                    continue;
                }
            }

            facts.entry((path, method)).or_default().record(transaction);
        }

        if !auth.is_empty() {
            debug!("Detected {} auth schemes", auth.len());
        }

        Inferred {
            report: session.finish(),
            facts,
            auth,
        }
    }

    fn detect_patterns(&self, transactions: &[ApiTransaction]) -> Option<PathPatternDetector> {
        if !self.config.detect_path_patterns {
            return None;
        }

        let mut detector = PathPatternDetector::new();
        for transaction in transactions {
            detector.add_path(&transaction.request.path);
        }
        detector.analyze_patterns();
        debug!("Using {} path patterns", detector.patterns().len());
        Some(detector)
    }
}

fn build_operation(
    endpoint: &EndpointReport,
    facts: &OperationFacts,
    config: &DocumentConfig,
) -> Operation {
    let mut parameters: Vec<Parameter> = path_parameters(&facts.sample_path, &endpoint.path)
        .into_iter()
        .map(|(name, value)| Parameter::path(name, path_parameter_schema(&value)))
        .collect();
    parameters.extend(
        facts
            .query
            .iter()
            .map(|(name, value)| Parameter::observed(ParameterLocation::Query, name, Some(value))),
    );
    parameters.extend(
        facts
            .headers
            .iter()
            .map(|(name, value)| Parameter::observed(ParameterLocation::Header, name, Some(value))),
    );

    Operation {
        operation_id: operation_id(endpoint.method, &endpoint.path),
        summary: format!("{} {}", endpoint.method, endpoint.path),
        tags: vec![operation_tag(&endpoint.path, config)],
        parameters,
        request_body: endpoint.request_body.as_ref().map(RequestBodyObject::from),
        responses: endpoint
            .responses
            .iter()
            .map(|(status, response)| (status.to_string(), ResponseObject::from(response)))
            .collect(),
    }
}

/// Schema for a path parameter from one observed value
pub fn path_parameter_schema(value: &str) -> SchemaObject {
    if value.parse::<i64>().is_ok() {
        SchemaObject::typed(SchemaType::Integer).with_format(Format::Int64)
    } else if value.len() == 36 && value.matches('-').count() == 4 {
        SchemaObject::typed(SchemaType::String).with_format(Format::Uuid)
    } else {
        SchemaObject::typed(SchemaType::String)
    }
}

/// Method plus camel-cased path words (`getUsersId`)
pub fn operation_id(method: Method, path: &str) -> String {
    let mut id = method.as_lower().to_string();
    for word in path
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
    {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            id.push(first.to_ascii_uppercase());
            id.push_str(chars.as_str());
        }
    }
    id
}

/// Tag for an operation
///
/// The longest matching `tag_mappings` prefix wins; otherwise the first path
/// segment that is neither a version prefix nor a parameter, or `default`.
pub fn operation_tag(path: &str, config: &DocumentConfig) -> String {
    let trimmed = path.trim_matches('/');

    let mapped = config
        .tag_mappings
        .iter()
        .filter(|(prefix, _)| {
            let prefix = prefix.trim_matches('/');
            !prefix.is_empty()
                && (trimmed == prefix || trimmed.starts_with(&format!("{prefix}/")))
        })
        .max_by_key(|(prefix, _)| prefix.trim_matches('/').len());
    if let Some((_, tag)) = mapped {
        return tag.clone();
    }

    trimmed
        .split('/')
        .find(|segment| {
            !segment.is_empty()
                && !segment.starts_with('{')
                && !VERSION_SEGMENT.is_match(segment)
                && !config.version_prefixes.iter().any(|p| p == segment)
        })
        .unwrap_or("default")
        .to_string()
}
