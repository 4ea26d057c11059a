//! Generates CRD manifests for the NetBind API group.
//!
//! The NetworkAttachmentDefinition CRD is owned by the cluster's network
//! plumbing and is intentionally not emitted here.
//!
//! Usage: `cargo run --bin crdgen > deploy/crds.yaml`

use kube::CustomResourceExt;

fn main() {
    let documents = [
        serde_yaml::to_string(&crds::NetworkBindingConfig::crd()),
        serde_yaml::to_string(&crds::SecurityConstraint::crd()),
    ];
    for document in documents {
        match document {
            Ok(yaml) => print!("---\n{yaml}"),
            Err(err) => {
                eprintln!("failed to render CRD: {err}");
                std::process::exit(1);
            }
        }
    }
}
