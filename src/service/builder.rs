// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Construction of service resources from command line edit flags

use crate::commands::flags::EditFlags;
use crate::constants::annotations;
use crate::error::{KnError, Result};
use crate::types::service::{RevisionSpec, RevisionTemplateSpec};
use crate::types::{Service, ServiceSpec};
use k8s_openapi::api::core::v1::{Container, ContainerPort, EnvVar, ResourceRequirements};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use kube::api::ObjectMeta;
use std::collections::BTreeMap;
use tracing::debug;

/// Build a fresh service from the edit flags.
///
/// The template starts with a single empty container and a placeholder
/// user-image annotation that the image edit either fills in or removes.
pub fn construct_service(flags: &EditFlags, name: &str, namespace: &str) -> Result<Service> {
    let mut service = Service::new(
        name,
        ServiceSpec {
            template: RevisionTemplateSpec {
                metadata: ObjectMeta {
                    annotations: Some(BTreeMap::from([(
                        annotations::USER_IMAGE.to_string(),
                        String::new(),
                    )])),
                    ..Default::default()
                },
                spec: RevisionSpec {
                    containers: vec![Container::default()],
                    ..Default::default()
                },
            },
        },
    );
    service.metadata.namespace = Some(namespace.to_string());

    apply_edits(&mut service, flags)?;

    match serde_yaml::to_string(&service) {
        Ok(yaml) => debug!("Constructed service:\n{}", yaml),
        Err(e) => debug!("Constructed service (not serializable as YAML: {})", e),
    }
    Ok(service)
}

/// Apply all edit flags to the service, in a fixed order
pub fn apply_edits(service: &mut Service, flags: &EditFlags) -> Result<()> {
    let env = KeyValueEdits::parse(&flags.env, "--env")?;
    let service_annotations = KeyValueEdits::parse(&flags.annotation, "--annotation")?;
    let labels = KeyValueEdits::parse(&flags.label, "--label")?;

    if let (Some(min), Some(max)) = (flags.min_scale, flags.max_scale) {
        if min > max {
            return Err(KnError::InvalidArgument(format!(
                "--min-scale ({}) must not be greater than --max-scale ({})",
                min, max
            )));
        }
    }

    let template = &mut service.spec.template;
    let container = template
        .spec
        .containers
        .first_mut()
        .ok_or_else(|| KnError::InvalidArgument("service template has no container".to_string()))?;

    if let Some(image) = flags.image.as_deref() {
        container.image = Some(image.to_string());
    }
    let template_annotations = template.metadata.annotations.get_or_insert_with(BTreeMap::new);
    match flags.image.as_deref() {
        Some(image) if flags.lock_to_digest => {
            template_annotations.insert(annotations::USER_IMAGE.to_string(), image.to_string());
        }
        _ => {
            template_annotations.remove(annotations::USER_IMAGE);
        }
    }

    update_env_vars(container, &env);

    if let Some(port) = flags.port {
        container.ports = Some(vec![ContainerPort {
            container_port: i32::from(port),
            ..Default::default()
        }]);
    }

    update_resources(container, flags)?;

    if let Some(min) = flags.min_scale {
        template_annotations.insert(annotations::MIN_SCALE.to_string(), min.to_string());
    }
    if let Some(max) = flags.max_scale {
        template_annotations.insert(annotations::MAX_SCALE.to_string(), max.to_string());
    }
    if let Some(limit) = flags.concurrency_limit {
        template.spec.container_concurrency = Some(i64::from(limit));
    }
    if let Some(account) = flags.service_account.as_deref() {
        template.spec.service_account_name = Some(account.to_string());
    }

    if !service_annotations.is_empty() {
        service_annotations.apply_to(template.metadata.annotations.get_or_insert_with(BTreeMap::new));
        service_annotations.apply_to(service.metadata.annotations.get_or_insert_with(BTreeMap::new));
    }
    if !labels.is_empty() {
        labels.apply_to(template.metadata.labels.get_or_insert_with(BTreeMap::new));
        labels.apply_to(service.metadata.labels.get_or_insert_with(BTreeMap::new));
    }

    Ok(())
}

/// `KEY=VALUE` additions and `KEY-` removals parsed from repeated flags
#[derive(Debug, Default, PartialEq, Eq)]
pub struct KeyValueEdits {
    /// Additions in first-seen key order; a repeated key keeps its last value
    pub set: Vec<(String, String)>,
    pub remove: Vec<String>,
}

impl KeyValueEdits {
    pub fn parse(args: &[String], flag: &str) -> Result<Self> {
        let mut edits = KeyValueEdits::default();

        for arg in args {
            if let Some((key, value)) = arg.split_once('=') {
                if key.is_empty() {
                    return Err(KnError::InvalidArgument(format!(
                        "{} requires a non-empty key; got {:?}",
                        flag, arg
                    )));
                }
                match edits.set.iter_mut().find(|(k, _)| k == key) {
                    Some(entry) => entry.1 = value.to_string(),
                    None => edits.set.push((key.to_string(), value.to_string())),
                }
            } else if let Some(key) = arg.strip_suffix('-').filter(|k| !k.is_empty()) {
                edits.remove.push(key.to_string());
            } else {
                return Err(KnError::InvalidArgument(format!(
                    "{} requires a value that contains the = character; got {:?}",
                    flag, arg
                )));
            }
        }

        Ok(edits)
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty() && self.remove.is_empty()
    }

    /// Removals run after additions
    fn apply_to(&self, map: &mut BTreeMap<String, String>) {
        for (key, value) in &self.set {
            map.insert(key.clone(), value.clone());
        }
        for key in &self.remove {
            map.remove(key);
        }
    }
}

fn update_env_vars(container: &mut Container, edits: &KeyValueEdits) {
    if edits.is_empty() {
        return;
    }
    let env = container.env.get_or_insert_with(Vec::new);

    for (name, value) in &edits.set {
        match env.iter_mut().find(|e| &e.name == name) {
            Some(existing) => {
                existing.value = Some(value.clone());
                existing.value_from = None;
            }
            None => env.push(EnvVar {
                name: name.clone(),
                value: Some(value.clone()),
                value_from: None,
            }),
        }
    }
    env.retain(|e| !edits.remove.contains(&e.name));
}

fn update_resources(container: &mut Container, flags: &EditFlags) -> Result<()> {
    let requests = quantities(&[
        ("cpu", flags.requests_cpu.as_deref(), "--requests-cpu"),
        ("memory", flags.requests_memory.as_deref(), "--requests-memory"),
    ])?;
    let limits = quantities(&[
        ("cpu", flags.limits_cpu.as_deref(), "--limits-cpu"),
        ("memory", flags.limits_memory.as_deref(), "--limits-memory"),
    ])?;
    if requests.is_empty() && limits.is_empty() {
        return Ok(());
    }

    let resources = container.resources.get_or_insert_with(ResourceRequirements::default);
    if !requests.is_empty() {
        resources.requests.get_or_insert_with(BTreeMap::new).extend(requests);
    }
    if !limits.is_empty() {
        resources.limits.get_or_insert_with(BTreeMap::new).extend(limits);
    }
    Ok(())
}

fn quantities(entries: &[(&str, Option<&str>, &str)]) -> Result<BTreeMap<String, Quantity>> {
    let mut map = BTreeMap::new();
    for (resource, value, flag) in entries {
        if let Some(value) = value {
            if !is_valid_quantity(value) {
                return Err(KnError::InvalidArgument(format!(
                    "{} requires a resource quantity such as 250m or 64Mi; got {:?}",
                    flag, value
                )));
            }
            map.insert(resource.to_string(), Quantity(value.to_string()));
        }
    }
    Ok(map)
}

/// Check the Kubernetes quantity grammar: signed decimal number followed by an
/// optional binary suffix, decimal suffix, or exponent.
fn is_valid_quantity(value: &str) -> bool {
    let unsigned = value.strip_prefix(['+', '-']).unwrap_or(value);
    let number_len = unsigned
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(unsigned.len());
    let (number, suffix) = unsigned.split_at(number_len);

    let digits = number.replacen('.', "", 1);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }

    match suffix {
        "" | "Ki" | "Mi" | "Gi" | "Ti" | "Pi" | "Ei" | "n" | "u" | "m" | "k" | "M" | "G" | "T" | "P" | "E" => true,
        exp => exp
            .strip_prefix(['e', 'E'])
            .map(|e| e.strip_prefix(['+', '-']).unwrap_or(e))
            .is_some_and(|e| !e.is_empty() && e.chars().all(|c| c.is_ascii_digit())),
    }
}
