//! Inference session
//!
//! Runs the per-transaction pipeline (infer, bucket, sample) and the final
//! merge/refine pass over a batch of observations.

use super::types::{status_description, EndpointReport, Observation, SessionReport};
use crate::config::InferenceConfig;
use crate::schema::{
    merge_request_bodies, merge_responses, merge_with_improvement, MediaType, RequestBody,
    Response, Schema, SchemaMerger, SchemaRefiner, SchemaType, ValueInferrer,
};
use crate::types::{JsonValue, Method};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Per-endpoint accumulation
#[derive(Debug, Default)]
struct EndpointState {
    observations: usize,
    request_bodies: Vec<RequestBody>,
    responses: BTreeMap<u16, Vec<Response>>,
}

/// Single-threaded inference over a batch of observations
///
/// Feed observations with [`observe`](Self::observe) in order, then call
/// [`finish`](Self::finish). Not internally synchronized.
#[derive(Debug)]
pub struct InferenceSession {
    inferrer: ValueInferrer,
    merger: SchemaMerger,
    refiner: SchemaRefiner,
    refine: bool,
    endpoints: BTreeMap<(String, Method), EndpointState>,
    observations: usize,
}

impl Default for InferenceSession {
    fn default() -> Self {
        Self::new(&InferenceConfig::default())
    }
}

impl InferenceSession {
    /// Create a session from configuration
    pub fn new(config: &InferenceConfig) -> Self {
        Self {
            inferrer: ValueInferrer::for_transactions(config.empty_array_items),
            merger: SchemaMerger::new().with_required_policy(config.required_policy),
            refiner: SchemaRefiner::new(config.effective_max_samples()),
            refine: config.refine,
            endpoints: BTreeMap::new(),
            observations: 0,
        }
    }

    /// Number of observations processed so far
    pub fn observation_count(&self) -> usize {
        self.observations
    }

    /// Process one observation
    pub fn observe(&mut self, observation: &Observation) {
        let path = observation.path.as_str();
        let method = observation.method.as_str();
        let status = observation.status;

        debug!("Observing {} {} -> {}", method, path, status);
        self.observations += 1;

        let state = self
            .endpoints
            .entry((observation.path.clone(), observation.method))
            .or_default();
        state.observations += 1;

        if let Some(body) = &observation.request {
            let schema = self.inferrer.infer(&body.value);
            self.merger.add_schema(path, method, schema.clone());
            state
                .request_bodies
                .push(RequestBody::single(&body.content_type, schema));
            self.refiner
                .add_sample(&request_key(method, path), body.value.clone());
        }

        let mut response = Response::new(status_description(status));
        if let Some(body) = &observation.response {
            let schema = self.inferrer.infer(&body.value);
            self.merger.add_response_schema(path, method, schema.clone());
            response = response.with_content(&body.content_type, schema);
            self.refiner
                .add_sample(&response_key(method, path, status), body.value.clone());
        }

        for (name, values) in &observation.response_headers {
            let mut schema = Schema::new(SchemaType::String);
            if let Some(first) = values.first() {
                schema = schema.with_example(JsonValue::String(first.clone()));
            }
            response = response.with_header(name, schema);
        }

        state.responses.entry(status).or_default().push(response);
    }

    /// Process observations in order
    pub fn observe_all<'a>(&mut self, observations: impl IntoIterator<Item = &'a Observation>) {
        for observation in observations {
            self.observe(observation);
        }
    }

    /// Merge everything observed into one report
    pub fn finish(mut self) -> SessionReport {
        let endpoints = std::mem::take(&mut self.endpoints);
        let mut reports = Vec::with_capacity(endpoints.len());

        for ((path, method), state) in endpoints {
            let method_name = method.as_str();

            let policy = self.merger.required_policy();
            let mut request_body = merge_request_bodies(&state.request_bodies, policy);
            let mut responses: BTreeMap<u16, Response> = state
                .responses
                .iter()
                .map(|(status, observed)| (*status, merge_responses(observed, policy)))
                .collect();

            if self.refine {
                if let Some(body) = request_body.as_mut() {
                    self.improve_content(&mut body.content, &request_key(method_name, &path));
                }
                for (status, response) in &mut responses {
                    let key = response_key(method_name, &path, *status);
                    self.improve_content(&mut response.content, &key);
                }
            }

            reports.push(EndpointReport {
                request_schema: self.merger.merge_schemas(&path, method_name),
                response_schema: self.merger.merge_response_schemas(&path, method_name),
                path,
                method,
                observations: state.observations,
                request_body,
                responses,
            });
        }

        info!(
            "Inferred {} endpoints from {} observations",
            reports.len(),
            self.observations
        );

        SessionReport {
            observations: self.observations,
            endpoints: reports,
        }
    }

    /// Improve JSON content schemas with what the samples under `key` show
    fn improve_content(&mut self, content: &mut BTreeMap<String, MediaType>, key: &str) {
        let Some(improved) = self.refiner.infer_schema(key) else {
            return;
        };

        for (content_type, media) in content.iter_mut() {
            if is_json(content_type) {
                let merged = std::mem::take(&mut media.schema);
                media.schema = merge_with_improvement(merged, &improved);
            }
        }
    }
}

fn request_key(method: &str, path: &str) -> String {
    format!("request:{method}:{path}")
}

fn response_key(method: &str, path: &str, status: u16) -> String {
    format!("response:{method}:{path}:{status}")
}

fn is_json(content_type: &str) -> bool {
    content_type.to_ascii_lowercase().contains("json")
}
