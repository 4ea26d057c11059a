//! Unit tests for the generic operand engine

#[cfg(test)]
mod tests {
    use crate::binding::{self, BINDING_CNI_NAME, BindingImages, BindingPolicy, ClusterFlavor};
    use crate::generic::GenericOperand;
    use crate::handlers::{ServiceAccountHooks, new_daemon_set_operand};
    use crate::hooks::Operand;
    use crate::labels;
    use crate::mock::MockStore;
    use crate::request::ReconcileRequest;
    use crate::store::ObjectIdentity;
    use crds::{NetworkBindingConfig, NetworkBindingConfigSpec};
    use k8s_openapi::api::core::v1::ServiceAccount;

    const TEST_NAMESPACE: &str = "netbind-system";

    fn test_config() -> NetworkBindingConfig {
        let mut config = NetworkBindingConfig::new("cluster", NetworkBindingConfigSpec::default());
        config.metadata.namespace = Some(TEST_NAMESPACE.to_string());
        config
    }

    fn test_policy() -> BindingPolicy {
        BindingPolicy {
            images: BindingImages {
                cni_image: "registry.example/netbind-cni:v1".to_string(),
                sidecar_image: "registry.example/netbind-sidecar:v1".to_string(),
            },
            flavor: ClusterFlavor::Kubernetes,
            infrastructure_highly_available: true,
        }
    }

    fn service_account_operand(
        store: &MockStore<ServiceAccount>,
    ) -> GenericOperand<ServiceAccountHooks> {
        GenericOperand::new("ServiceAccount", ServiceAccountHooks, Box::new(store.clone()))
    }

    fn sa_identity() -> ObjectIdentity {
        ObjectIdentity::namespaced(TEST_NAMESPACE, BINDING_CNI_NAME)
    }

    #[tokio::test]
    async fn test_creates_missing_object_with_canonical_labels() {
        let store = MockStore::new();
        let operand = service_account_operand(&store);
        let config = test_config();

        let result = operand
            .ensure(&ReconcileRequest::config_change(&config))
            .await
            .unwrap();

        assert!(result.created, "absent object should be created");
        assert!(!result.updated && !result.deleted && !result.requeue);
        assert_eq!(result.name, BINDING_CNI_NAME);

        let stored = store.get_stored(&sa_identity()).unwrap();
        let stored_labels = stored.metadata.labels.unwrap();
        assert_eq!(
            stored_labels
                .get(labels::APP_MANAGED_BY_LABEL)
                .map(String::as_str),
            Some(labels::OPERATOR_NAME)
        );
        assert_eq!(
            stored_labels
                .get(labels::APP_COMPONENT_LABEL)
                .map(String::as_str),
            Some("network")
        );
    }

    #[tokio::test]
    async fn test_second_pass_is_a_noop() {
        let store = MockStore::new();
        let operand = service_account_operand(&store);
        let config = test_config();
        let req = ReconcileRequest::config_change(&config);

        let first = operand.ensure(&req).await.unwrap();
        assert!(first.created);

        let second = operand.ensure(&req).await.unwrap();
        assert!(!second.created && !second.updated && !second.deleted);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_repairs_label_drift_preserving_unmanaged_labels() {
        let store = MockStore::new();
        let config = test_config();

        // Seed a drifted object: one managed label missing, one foreign label
        let mut drifted = binding::new_binding_cni_service_account(&config);
        let mut drifted_labels = drifted.metadata.labels.take().unwrap();
        drifted_labels.remove(labels::APP_COMPONENT_LABEL);
        drifted_labels.insert("team".to_string(), "payments".to_string());
        drifted.metadata.labels = Some(drifted_labels);
        store.add(drifted);

        let operand = service_account_operand(&store);
        let result = operand
            .ensure(&ReconcileRequest::drift(&config))
            .await
            .unwrap();

        assert!(result.updated);
        assert!(!result.created && !result.deleted);
        assert!(
            result.requeue,
            "a drift-triggered update should advise re-validation"
        );

        let stored = store.get_stored(&sa_identity()).unwrap();
        let stored_labels = stored.metadata.labels.unwrap();
        assert_eq!(
            stored_labels.get("team").map(String::as_str),
            Some("payments"),
            "unmanaged labels must survive the merge"
        );
        assert_eq!(
            stored_labels
                .get(labels::APP_COMPONENT_LABEL)
                .map(String::as_str),
            Some("network")
        );
    }

    #[tokio::test]
    async fn test_config_triggered_update_does_not_advise_requeue() {
        let store = MockStore::new();
        let config = test_config();

        let mut drifted = binding::new_binding_cni_service_account(&config);
        drifted
            .metadata
            .labels
            .as_mut()
            .unwrap()
            .remove(labels::APP_VERSION_LABEL);
        store.add(drifted);

        let operand = service_account_operand(&store);
        let result = operand
            .ensure(&ReconcileRequest::config_change(&config))
            .await
            .unwrap();

        assert!(result.updated);
        assert!(!result.requeue);
    }

    #[tokio::test]
    async fn test_read_failure_short_circuits() {
        let store = MockStore::new();
        store.fail_reads("connection refused");

        let operand = service_account_operand(&store);
        let config = test_config();
        let err = operand
            .ensure(&ReconcileRequest::config_change(&config))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("connection refused"));
        assert!(store.is_empty(), "a failed read must not cause a write");
    }

    #[tokio::test]
    async fn test_daemon_set_spec_drift_is_converged() {
        let store = MockStore::new();
        let config = test_config();
        let policy = test_policy();

        // Seed a daemon set whose pod priority was changed externally and
        // which carries a foreign label
        let mut drifted = binding::new_binding_cni_daemon_set(&config, &policy);
        drifted
            .spec
            .as_mut()
            .unwrap()
            .template
            .spec
            .as_mut()
            .unwrap()
            .priority_class_name = Some("default".to_string());
        drifted
            .metadata
            .labels
            .as_mut()
            .unwrap()
            .insert("team".to_string(), "payments".to_string());
        store.add(drifted);

        let operand = new_daemon_set_operand(Box::new(store.clone()), policy);
        let result = operand
            .ensure(&ReconcileRequest::drift(&config))
            .await
            .unwrap();

        assert!(result.updated);

        let stored = store
            .get_stored(&ObjectIdentity::namespaced(TEST_NAMESPACE, BINDING_CNI_NAME))
            .unwrap();
        assert_eq!(
            stored
                .spec
                .unwrap()
                .template
                .spec
                .unwrap()
                .priority_class_name
                .as_deref(),
            Some("system-cluster-critical"),
            "managed spec fields must be restored"
        );
        assert_eq!(
            stored.metadata.labels.unwrap().get("team").map(String::as_str),
            Some("payments")
        );
    }

    #[tokio::test]
    async fn test_daemon_set_in_desired_state_is_a_noop() {
        let store = MockStore::new();
        let config = test_config();
        let policy = test_policy();
        store.add(binding::new_binding_cni_daemon_set(&config, &policy));

        let operand = new_daemon_set_operand(Box::new(store.clone()), policy);
        let result = operand
            .ensure(&ReconcileRequest::drift(&config))
            .await
            .unwrap();

        assert!(!result.created && !result.updated && !result.deleted && !result.requeue);
    }

    #[tokio::test]
    async fn test_at_most_one_mutation_flag_per_result() {
        let store = MockStore::new();
        let operand = service_account_operand(&store);
        let config = test_config();
        let req = ReconcileRequest::config_change(&config);

        // created, then noop, then updated after seeded drift
        let mut results = vec![operand.ensure(&req).await.unwrap()];
        results.push(operand.ensure(&req).await.unwrap());

        let id = sa_identity();
        let mut drifted = store.get_stored(&id).unwrap();
        drifted
            .metadata
            .labels
            .as_mut()
            .unwrap()
            .remove(labels::APP_LABEL);
        store.add(drifted);
        results.push(operand.ensure(&req).await.unwrap());

        for result in results {
            let flags =
                u8::from(result.created) + u8::from(result.updated) + u8::from(result.deleted);
            assert!(flags <= 1, "mutation flags must be mutually exclusive");
        }
    }
}
