//! Unit tests for the conditional operand wrapper

#[cfg(test)]
mod tests {
    use crate::binding::{self, BINDING_CNI_NAME, DEPLOY_NETWORK_BINDING_ANNOTATION};
    use crate::handlers::new_service_account_operand;
    use crate::hooks::Operand;
    use crate::mock::MockStore;
    use crate::request::ReconcileRequest;
    use crate::store::ObjectIdentity;
    use crds::{NetworkBindingConfig, NetworkBindingConfigSpec};
    use k8s_openapi::api::core::v1::ServiceAccount;
    use std::collections::BTreeMap;

    const TEST_NAMESPACE: &str = "netbind-system";

    fn test_config(deploy_annotation: Option<&str>) -> NetworkBindingConfig {
        let mut config = NetworkBindingConfig::new("cluster", NetworkBindingConfigSpec::default());
        config.metadata.namespace = Some(TEST_NAMESPACE.to_string());
        if let Some(value) = deploy_annotation {
            config.metadata.annotations = Some(BTreeMap::from([(
                DEPLOY_NETWORK_BINDING_ANNOTATION.to_string(),
                value.to_string(),
            )]));
        }
        config
    }

    fn sa_identity() -> ObjectIdentity {
        ObjectIdentity::namespaced(TEST_NAMESPACE, BINDING_CNI_NAME)
    }

    #[tokio::test]
    async fn test_deploys_when_annotation_enabled() {
        let store: MockStore<ServiceAccount> = MockStore::new();
        let operand = new_service_account_operand(Box::new(store.clone()));
        let config = test_config(Some("true"));

        let result = operand
            .ensure(&ReconcileRequest::config_change(&config))
            .await
            .unwrap();

        assert!(result.created);
        assert!(store.get_stored(&sa_identity()).is_some());
    }

    #[tokio::test]
    async fn test_removes_object_when_disabled() {
        let store: MockStore<ServiceAccount> = MockStore::new();
        let config = test_config(None);
        store.add(binding::new_binding_cni_service_account(&config));

        let operand = new_service_account_operand(Box::new(store.clone()));
        let result = operand
            .ensure(&ReconcileRequest::config_change(&config))
            .await
            .unwrap();

        assert!(result.deleted);
        assert!(!result.created && !result.updated);
        assert_eq!(result.name, BINDING_CNI_NAME);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_noop_when_disabled_and_absent() {
        let store: MockStore<ServiceAccount> = MockStore::new();
        let operand = new_service_account_operand(Box::new(store.clone()));
        let config = test_config(None);

        let result = operand
            .ensure(&ReconcileRequest::config_change(&config))
            .await
            .unwrap();

        assert!(!result.created && !result.updated && !result.deleted);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_annotation_must_be_exactly_true() {
        for value in ["false", "True", "yes", ""] {
            let store: MockStore<ServiceAccount> = MockStore::new();
            let operand = new_service_account_operand(Box::new(store.clone()));
            let config = test_config(Some(value));

            let result = operand
                .ensure(&ReconcileRequest::config_change(&config))
                .await
                .unwrap();

            assert!(
                !result.created,
                "annotation value {value:?} must not trigger deployment"
            );
            assert!(store.is_empty());
        }
    }

    #[tokio::test]
    async fn test_enabled_and_matching_object_is_a_noop() {
        let store: MockStore<ServiceAccount> = MockStore::new();
        let config = test_config(Some("true"));
        store.add(binding::new_binding_cni_service_account(&config));

        let operand = new_service_account_operand(Box::new(store.clone()));
        let result = operand
            .ensure(&ReconcileRequest::config_change(&config))
            .await
            .unwrap();

        assert!(!result.created && !result.updated && !result.deleted);
    }

    #[tokio::test]
    async fn test_read_failure_short_circuits_regardless_of_gate() {
        for deploy_annotation in [Some("true"), None] {
            let store: MockStore<ServiceAccount> = MockStore::new();
            store.fail_reads("etcdserver: request timed out");

            let operand = new_service_account_operand(Box::new(store.clone()));
            let config = test_config(deploy_annotation);

            let err = operand
                .ensure(&ReconcileRequest::config_change(&config))
                .await
                .unwrap_err();
            assert!(err.to_string().contains("request timed out"));
        }
    }
}
