//! Head service synthesizer
//!
//! Builds the Service fronting a RayCluster's head pod, merging in the
//! user-authored `headService` from the head group when one is present.

use std::collections::BTreeMap;

use raysynth_common::crd::RayCluster;
use raysynth_common::k8s::{ObjectMeta, Service, ServiceSpec};
use raysynth_common::labels::{
    head_identifier, head_service_name, APPLICATION_NAME, APPLICATION_NAME_LABEL, COMPONENT_NAME,
    MANAGED_BY_LABEL, RAY_CLUSTER_LABEL, RAY_ID_LABEL, RAY_NODE_TYPE_LABEL,
};
use raysynth_common::Result;
use tracing::debug;

use crate::ports::{default_service_ports, resolve_service_ports};
use crate::precedence::{merge_maps, merge_ports, MergePrecedence};

/// The five labels that select a cluster's head pod
pub fn head_service_labels(cluster_name: &str) -> BTreeMap<String, String> {
    BTreeMap::from([
        (RAY_CLUSTER_LABEL.to_string(), cluster_name.to_string()),
        (RAY_NODE_TYPE_LABEL.to_string(), "head".to_string()),
        (RAY_ID_LABEL.to_string(), head_identifier(cluster_name)),
        (
            APPLICATION_NAME_LABEL.to_string(),
            APPLICATION_NAME.to_string(),
        ),
        (MANAGED_BY_LABEL.to_string(), COMPONENT_NAME.to_string()),
    ])
}

/// Synthesizes the head Service for a RayCluster
pub struct HeadServiceSynthesizer<'a> {
    cluster: &'a RayCluster,
    template_labels: Option<&'a BTreeMap<String, String>>,
    annotations: Option<&'a BTreeMap<String, String>>,
    precedence: MergePrecedence,
}

impl<'a> HeadServiceSynthesizer<'a> {
    /// Create a synthesizer. Template labels default to the head pod
    /// template's labels and annotations to the cluster's head service
    /// annotations.
    pub fn new(cluster: &'a RayCluster) -> Self {
        Self {
            cluster,
            template_labels: None,
            annotations: None,
            precedence: MergePrecedence::HEAD_SERVICE,
        }
    }

    /// Labels whose values refine the selector
    pub fn with_template_labels(mut self, labels: &'a BTreeMap<String, String>) -> Self {
        self.template_labels = Some(labels);
        self
    }

    /// Annotations that win over the user's annotations
    pub fn with_annotations(mut self, annotations: &'a BTreeMap<String, String>) -> Self {
        self.annotations = Some(annotations);
        self
    }

    /// Synthesize the Service
    pub fn synthesize(self) -> Result<Service> {
        let cluster = self.cluster;
        let head = &cluster.spec.head_group_spec;
        let user = head.head_service.as_ref();
        let template_labels = self
            .template_labels
            .unwrap_or(&head.template.metadata.labels);
        let annotations = self
            .annotations
            .unwrap_or(&cluster.spec.head_service_annotations);
        let empty = BTreeMap::new();

        let selector = merge_maps(
            &head_service_labels(cluster.name()),
            template_labels,
            self.precedence.selector,
        );
        let labels = merge_maps(
            &selector,
            user.map_or(&empty, |s| &s.metadata.labels),
            self.precedence.labels,
        );
        let annotations = merge_maps(
            annotations,
            user.map_or(&empty, |s| &s.metadata.annotations),
            self.precedence.annotations,
        );

        let resolved = resolve_service_ports(&head.template)?;
        let ports = merge_ports(
            default_service_ports(&resolved),
            user.map(|s| s.spec.ports.as_slice()).unwrap_or_default(),
            self.precedence.ports,
        )?;

        let name = user
            .map(|s| s.metadata.name.as_str())
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| head_service_name(cluster.name()));

        let service_type = user
            .and_then(|s| s.spec.type_)
            .or(head.service_type)
            .unwrap_or_default();

        debug!(
            cluster = %cluster.name(),
            service = %name,
            ports = ports.len(),
            user_override = user.is_some(),
            "synthesized head service"
        );

        let mut metadata = ObjectMeta::new(name, cluster.namespace()).with_labels(labels);
        metadata.annotations = annotations;

        Ok(Service::new(
            metadata,
            ServiceSpec {
                selector,
                ports,
                type_: Some(service_type),
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use raysynth_common::crd::{
        ComputeTemplate, ComputeTemplateIndex, RayClusterSpec, RayHeadGroupSpec,
    };
    use raysynth_common::k8s::{ServicePort, ServiceType};
    use raysynth_common::SynthesisConfig;
    use raysynth_workload::{resolve_compute, NodeRole, PodTemplateBuilder};

    fn ray_cluster(head_service: Option<Service>) -> RayCluster {
        let index: ComputeTemplateIndex = [ComputeTemplate {
            name: "head".to_string(),
            cpu: 2,
            memory: 8,
            ..Default::default()
        }]
        .into_iter()
        .collect();
        let config = SynthesisConfig::default();
        let compute = resolve_compute("head", "head", &index, &config).unwrap();
        let template =
            PodTemplateBuilder::new(NodeRole::Head, "raycluster-sample", "2.9.0", &compute, &config)
                .build();

        RayCluster::new(
            ObjectMeta::new("raycluster-sample", "default"),
            RayClusterSpec {
                ray_version: "2.9.0".to_string(),
                head_group_spec: RayHeadGroupSpec {
                    service_type: None,
                    head_service,
                    replicas: 1,
                    ray_start_params: BTreeMap::new(),
                    template,
                },
                worker_group_specs: vec![],
                head_service_annotations: BTreeMap::from([
                    (
                        "HeadServiceAnnotationKey1".to_string(),
                        "HeadServiceAnnotationValue1".to_string(),
                    ),
                    (
                        "HeadServiceAnnotationKey2".to_string(),
                        "HeadServiceAnnotationValue2".to_string(),
                    ),
                ]),
            },
        )
    }

    fn user_service() -> Service {
        let metadata = ObjectMeta::new("user-custom-name", "user-custom-namespace")
            .with_label("userLabelKey", "userLabelValue")
            .with_label("another", "label")
            .with_label(RAY_CLUSTER_LABEL, "userClusterName")
            .with_annotation("userAnnotationKey", "userAnnotationValue")
            .with_annotation("HeadServiceAnnotationKey1", "user_override");
        Service::new(
            metadata,
            ServiceSpec {
                selector: BTreeMap::from([
                    ("userSelectorKey".to_string(), "userSelectorValue".to_string()),
                    (RAY_CLUSTER_LABEL.to_string(), "userSelectorClusterName".to_string()),
                ]),
                ports: vec![
                    ServicePort::named("userPort", 12345),
                    ServicePort::named("client", 9876),
                ],
                type_: Some(ServiceType::LoadBalancer),
            },
        )
    }

    // =========================================================================
    // Story: Default Head Service
    // =========================================================================

    #[test]
    fn default_service_selects_head_pod() {
        let cluster = ray_cluster(None);
        let svc = HeadServiceSynthesizer::new(&cluster).synthesize().unwrap();

        assert_eq!(svc.metadata.name, "raycluster-sample-head-svc");
        assert_eq!(svc.metadata.namespace, "default");
        assert_eq!(svc.spec.selector, head_service_labels("raycluster-sample"));
        assert_eq!(svc.metadata.labels, svc.spec.selector);
        assert_eq!(svc.spec.type_, Some(ServiceType::ClusterIP));
        assert!(svc
            .spec
            .ports
            .iter()
            .all(|p| p.app_protocol.as_deref() == Some("tcp")));
    }

    #[test]
    fn ports_are_in_name_order() {
        let cluster = ray_cluster(None);
        let svc = HeadServiceSynthesizer::new(&cluster).synthesize().unwrap();
        let names: Vec<_> = svc
            .spec
            .ports
            .iter()
            .map(|p| p.name.as_deref().unwrap())
            .collect();
        assert_eq!(names, vec!["client", "dashboard", "gcs-server", "metrics"]);
    }

    #[test]
    fn head_group_service_type_is_used() {
        let mut cluster = ray_cluster(None);
        cluster.spec.head_group_spec.service_type = Some(ServiceType::NodePort);
        let svc = HeadServiceSynthesizer::new(&cluster).synthesize().unwrap();
        assert_eq!(svc.spec.type_, Some(ServiceType::NodePort));
    }

    #[test]
    fn template_label_refines_selector_value() {
        let cluster = ray_cluster(None);
        let labels = BTreeMap::from([(APPLICATION_NAME_LABEL.to_string(), "testname".to_string())]);
        let svc = HeadServiceSynthesizer::new(&cluster)
            .with_template_labels(&labels)
            .synthesize()
            .unwrap();
        assert_eq!(svc.spec.selector[APPLICATION_NAME_LABEL], "testname");
        assert_eq!(svc.spec.selector.len(), 5);
    }

    #[test]
    fn explicit_annotations_replace_cluster_defaults() {
        let cluster = ray_cluster(None);
        let annotations = BTreeMap::from([
            ("key1".to_string(), "testvalue1".to_string()),
            ("key2".to_string(), "testvalue2".to_string()),
        ]);
        let svc = HeadServiceSynthesizer::new(&cluster)
            .with_annotations(&annotations)
            .synthesize()
            .unwrap();
        assert_eq!(svc.metadata.annotations, annotations);
    }

    // =========================================================================
    // Story: User-Authored Head Service
    // =========================================================================

    #[test]
    fn user_service_merge() {
        let cluster = ray_cluster(Some(user_service()));
        let template_labels =
            BTreeMap::from([(RAY_CLUSTER_LABEL.to_string(), "userTemplateClusterName".to_string())]);
        let svc = HeadServiceSynthesizer::new(&cluster)
            .with_template_labels(&template_labels)
            .synthesize()
            .unwrap();

        // name honoured, namespace pinned to the cluster
        assert_eq!(svc.metadata.name, "user-custom-name");
        assert_eq!(svc.metadata.namespace, "default");

        // selector: default keys only, template values where present
        let defaults = head_service_labels("raycluster-sample");
        assert_eq!(
            svc.spec.selector.keys().collect::<Vec<_>>(),
            defaults.keys().collect::<Vec<_>>()
        );
        assert_eq!(svc.spec.selector[RAY_CLUSTER_LABEL], "userTemplateClusterName");
        assert_eq!(svc.spec.selector[RAY_NODE_TYPE_LABEL], "head");
        assert!(!svc.spec.selector.contains_key("userSelectorKey"));

        // labels: selector wins, user-only keys added
        assert_eq!(svc.metadata.labels[RAY_CLUSTER_LABEL], "userTemplateClusterName");
        assert_eq!(svc.metadata.labels["userLabelKey"], "userLabelValue");
        assert_eq!(svc.metadata.labels["another"], "label");
        assert_eq!(svc.metadata.labels.len(), 7);

        // annotations: cluster defaults win
        assert_eq!(
            svc.metadata.annotations["HeadServiceAnnotationKey1"],
            "HeadServiceAnnotationValue1"
        );
        assert_eq!(
            svc.metadata.annotations["HeadServiceAnnotationKey2"],
            "HeadServiceAnnotationValue2"
        );
        assert_eq!(svc.metadata.annotations["userAnnotationKey"], "userAnnotationValue");

        // ports: user wins by name, new ones appended
        for (name, port) in [("userPort", 12345), ("client", 9876)] {
            assert!(svc
                .spec
                .ports
                .iter()
                .any(|p| p.name.as_deref() == Some(name) && p.port == port));
        }
        assert_eq!(svc.spec.ports.len(), 5);
        assert_eq!(svc.spec.ports[0].name.as_deref(), Some("client"));
        // the replacing port is taken as written, without a default appProtocol
        assert_eq!(svc.spec.ports[0].app_protocol, None);
        assert!(svc.spec.ports[1..4]
            .iter()
            .all(|p| p.app_protocol.as_deref() == Some("tcp")));

        assert_eq!(svc.spec.type_, Some(ServiceType::LoadBalancer));
    }

    #[test]
    fn unnamed_override_keeps_generated_name() {
        let mut user = user_service();
        user.metadata.name = String::new();
        user.spec.type_ = None;
        let mut cluster = ray_cluster(Some(user));
        cluster.spec.head_group_spec.service_type = Some(ServiceType::NodePort);
        let svc = HeadServiceSynthesizer::new(&cluster).synthesize().unwrap();
        assert_eq!(svc.metadata.name, "raycluster-sample-head-svc");
        assert_eq!(svc.spec.type_, Some(ServiceType::NodePort));
    }

    #[test]
    fn user_app_protocol_is_preserved() {
        let mut user = user_service();
        user.spec.ports = vec![ServicePort {
            app_protocol: Some("http".to_string()),
            ..ServicePort::named("dashboard", 8265)
        }];
        let cluster = ray_cluster(Some(user));
        let svc = HeadServiceSynthesizer::new(&cluster).synthesize().unwrap();
        let dashboard = svc
            .spec
            .ports
            .iter()
            .find(|p| p.name.as_deref() == Some("dashboard"))
            .unwrap();
        assert_eq!(dashboard.app_protocol.as_deref(), Some("http"));
    }

    #[test]
    fn user_port_without_app_protocol_is_unchanged() {
        let mut user = user_service();
        user.spec.ports = vec![ServicePort::named("serve", 8000)];
        let cluster = ray_cluster(Some(user));
        let svc = HeadServiceSynthesizer::new(&cluster).synthesize().unwrap();
        let serve = svc
            .spec
            .ports
            .iter()
            .find(|p| p.name.as_deref() == Some("serve"))
            .unwrap();
        assert_eq!(serve, &ServicePort::named("serve", 8000));
        assert_eq!(svc.spec.ports.last(), Some(&ServicePort::named("serve", 8000)));
    }

    #[test]
    fn synthesis_is_deterministic() {
        let cluster = ray_cluster(Some(user_service()));
        let a = HeadServiceSynthesizer::new(&cluster).synthesize().unwrap();
        let b = HeadServiceSynthesizer::new(&cluster).synthesize().unwrap();
        assert_eq!(a, b);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn head_template_without_head_container_fails() {
        let mut cluster = ray_cluster(None);
        cluster.spec.head_group_spec.template.spec.containers[0].name = "renamed".to_string();
        assert!(HeadServiceSynthesizer::new(&cluster).synthesize().is_err());
    }
}
