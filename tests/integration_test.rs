//! Integration tests for azure-provision
//!
//! These tests drive the workflows against a recording control plane and
//! check the calls it receives.

use async_trait::async_trait;
use azure_provision::azure::CloudControlPlane;
use azure_provision::config::ProvisionConfig;
use azure_provision::error::{CliError, ProvisionError};
use azure_provision::models::{
    NamingTemplate, NetworkContext, NicRequest, NsgRequest, NsgRuleRequest, PublicIpRequest,
    ResourceGroupRequest, ResourceKind, RoleAssignmentRequest, StorageAccountRequest,
    TenantRecord, VmRequest, VnetRequest,
};
use azure_provision::processing::{ClusterProvisioner, MachineSpec, TenantProvisioner};
use azure_provision::{provision_cluster, provision_network, provision_tenants};
use std::sync::Mutex;

/// A call as seen by the control plane: kind, name and the names it references.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Call {
    kind: ResourceKind,
    name: String,
    refs: Vec<String>,
}

impl Call {
    fn new(kind: ResourceKind, name: &str, refs: &[&str]) -> Self {
        Call {
            kind,
            name: name.to_string(),
            refs: refs.iter().map(|r| r.to_string()).collect(),
        }
    }
}

/// Records every call; optionally fails when a given resource name is created.
#[derive(Default)]
struct RecordingPlane {
    calls: Mutex<Vec<Call>>,
    fail_on: Option<String>,
}

impl RecordingPlane {
    fn failing_on(name: &str) -> Self {
        RecordingPlane {
            fail_on: Some(name.to_string()),
            ..Default::default()
        }
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) -> Result<String, CliError> {
        let fail = self.fail_on.as_deref() == Some(call.name.as_str());
        let name = call.name.clone();
        self.calls.lock().unwrap().push(call);
        if fail {
            return Err(CliError::Failed {
                code: Some(1),
                stderr: format!("ERROR: (Conflict) '{name}' already exists"),
            });
        }
        Ok("{}".to_string())
    }
}

#[async_trait]
impl CloudControlPlane for RecordingPlane {
    async fn create_public_ip(&self, req: &PublicIpRequest) -> Result<String, CliError> {
        self.record(Call::new(
            ResourceKind::PublicIp,
            req.name.as_str(),
            &[req.resource_group.as_str()],
        ))
    }

    async fn create_nic(&self, req: &NicRequest) -> Result<String, CliError> {
        let ip = req.private_ip.to_string();
        self.record(Call::new(
            ResourceKind::NetworkInterface,
            req.name.as_str(),
            &[
                req.resource_group.as_str(),
                req.vnet_name.as_str(),
                req.subnet_name.as_str(),
                req.nsg_name.as_str(),
                req.public_ip_name.as_str(),
                req.internal_dns_name.as_str(),
                ip.as_str(),
            ],
        ))
    }

    async fn create_vm(&self, req: &VmRequest) -> Result<String, CliError> {
        let disk = req.disk_size_gb.to_string();
        self.record(Call::new(
            ResourceKind::VirtualMachine,
            req.name.as_str(),
            &[
                req.resource_group.as_str(),
                req.region.as_str(),
                req.nic_name.as_str(),
                req.size.as_str(),
                req.public_key_path.as_str(),
                disk.as_str(),
                req.image.as_str(),
                req.storage_account.as_str(),
            ],
        ))
    }

    async fn create_resource_group(&self, req: &ResourceGroupRequest) -> Result<String, CliError> {
        self.record(Call::new(
            ResourceKind::ResourceGroup,
            req.name.as_str(),
            &[req.region.as_str()],
        ))
    }

    async fn create_role_assignment(
        &self,
        req: &RoleAssignmentRequest,
    ) -> Result<String, CliError> {
        self.record(Call::new(
            ResourceKind::RoleAssignment,
            req.assignee.as_str(),
            &[req.role.as_str(), req.resource_group.as_str()],
        ))
    }

    async fn create_storage_account(
        &self,
        req: &StorageAccountRequest,
    ) -> Result<String, CliError> {
        self.record(Call::new(
            ResourceKind::StorageAccount,
            req.name.as_str(),
            &[req.resource_group.as_str(), req.region.as_str(), req.sku.as_str()],
        ))
    }

    async fn create_vnet(&self, req: &VnetRequest) -> Result<String, CliError> {
        self.record(Call::new(
            ResourceKind::VirtualNetwork,
            req.name.as_str(),
            &[
                req.resource_group.as_str(),
                req.subnet_name.as_str(),
                req.subnet_prefix.as_str(),
            ],
        ))
    }

    async fn create_nsg(&self, req: &NsgRequest) -> Result<String, CliError> {
        self.record(Call::new(
            ResourceKind::SecurityGroup,
            req.name.as_str(),
            &[req.resource_group.as_str()],
        ))
    }

    async fn create_nsg_rule(&self, req: &NsgRuleRequest) -> Result<String, CliError> {
        let port = req.port.to_string();
        let priority = req.priority.to_string();
        self.record(Call::new(
            ResourceKind::SecurityRule,
            req.name.as_str(),
            &[req.nsg_name.as_str(), port.as_str(), priority.as_str()],
        ))
    }
}

fn network() -> NetworkContext {
    NetworkContext {
        region: "eastus".to_string(),
        vnet_name: "vnet".to_string(),
        subnet_name: "subnet".to_string(),
        nsg_name: "nsg".to_string(),
    }
}

fn machine() -> MachineSpec {
    MachineSpec {
        size: "Standard_D12_v2".to_string(),
        public_key_path: "/home/ops/.ssh/id_rsa.pub".to_string(),
        disk_size_gb: 5,
        image: "Canonical:UbuntuServer:14.04.4-LTS:latest".to_string(),
    }
}

fn tenant_provisioner(plane: &RecordingPlane) -> TenantProvisioner<'_, RecordingPlane> {
    TenantProvisioner::new(
        plane,
        NamingTemplate::new("{0}_resources").unwrap(),
        NamingTemplate::new("{0}lsmlhse645221").unwrap(),
    )
}

fn records(users: &[(&str, &str)]) -> Vec<TenantRecord> {
    users
        .iter()
        .map(|(user, id)| TenantRecord::new(*user, *id))
        .collect()
}

#[tokio::test]
async fn test_cluster_calls_in_slot_order() {
    let plane = RecordingPlane::default();
    let created = ClusterProvisioner::new(&plane, machine())
        .provision("admin_resources", &network(), "adminlsmlhse645221", 3)
        .await
        .expect("cluster run failed");

    let calls = plane.calls();
    assert_eq!(calls.len(), 9, "three calls per slot");
    assert_eq!(created.len(), 9);

    for (n, slot_calls) in calls.chunks(3).enumerate() {
        let i = n + 1;
        let ip_name = format!("ip_cluster{i}");
        let nic_name = format!("nic_cluster{i}");
        let dns_name = format!("cluster{i}");
        let private_ip = format!("10.0.1.2{i}");

        assert_eq!(
            slot_calls[0],
            Call::new(
                ResourceKind::PublicIp,
                ip_name.as_str(),
                &["admin_resources"],
            )
        );
        assert_eq!(
            slot_calls[1],
            Call::new(
                ResourceKind::NetworkInterface,
                nic_name.as_str(),
                &[
                    "admin_resources",
                    "vnet",
                    "subnet",
                    "nsg",
                    ip_name.as_str(),
                    dns_name.as_str(),
                    private_ip.as_str(),
                ],
            )
        );
        assert_eq!(
            slot_calls[2],
            Call::new(
                ResourceKind::VirtualMachine,
                dns_name.as_str(),
                &[
                    "admin_resources",
                    "eastus",
                    nic_name.as_str(),
                    "Standard_D12_v2",
                    "/home/ops/.ssh/id_rsa.pub",
                    "5",
                    "Canonical:UbuntuServer:14.04.4-LTS:latest",
                    "adminlsmlhse645221",
                ],
            )
        );
    }
}

#[tokio::test]
async fn test_cluster_slot_two_names() {
    let plane = RecordingPlane::default();
    ClusterProvisioner::new(&plane, machine())
        .provision("admin_resources", &network(), "adminlsmlhse645221", 3)
        .await
        .unwrap();

    let calls = plane.calls();
    assert_eq!(calls[3].name, "ip_cluster2");
    assert_eq!(calls[4].name, "nic_cluster2");
    assert!(calls[4].refs.contains(&"10.0.1.22".to_string()));
    assert!(calls[4].refs.contains(&"cluster2".to_string()));
    assert_eq!(calls[5].name, "cluster2");
}

#[tokio::test]
async fn test_cluster_failure_aborts_run() {
    let plane = RecordingPlane::failing_on("nic_cluster2");
    let err = ClusterProvisioner::new(&plane, machine())
        .provision("admin_resources", &network(), "adminlsmlhse645221", 3)
        .await
        .unwrap_err();

    match err {
        ProvisionError::Step { kind, name, source } => {
            assert_eq!(kind, ResourceKind::NetworkInterface);
            assert_eq!(name, "nic_cluster2");
            assert_eq!(
                source.to_string(),
                "ERROR: (Conflict) 'nic_cluster2' already exists"
            );
        }
        other => panic!("unexpected error {other:?}"),
    }
    let names: Vec<String> = plane.calls().into_iter().map(|c| c.name).collect();
    assert_eq!(
        names,
        vec![
            "ip_cluster1",
            "nic_cluster1",
            "cluster1",
            "ip_cluster2",
            "nic_cluster2",
        ]
    );
}

#[tokio::test]
async fn test_tenant_alice() {
    let plane = RecordingPlane::default();
    tenant_provisioner(&plane)
        .provision(&records(&[("alice", "abc-123")]), "eastus")
        .await
        .unwrap();

    assert_eq!(
        plane.calls(),
        vec![
            Call::new(ResourceKind::ResourceGroup, "alice_resources", &["eastus"]),
            Call::new(
                ResourceKind::RoleAssignment,
                "abc-123",
                &["Contributor", "alice_resources"],
            ),
            Call::new(
                ResourceKind::StorageAccount,
                "alicelsmlhse645221",
                &["alice_resources", "eastus", "Standard_LRS"],
            ),
        ]
    );
}

#[tokio::test]
async fn test_tenants_in_input_order() {
    let plane = RecordingPlane::default();
    let input = records(&[("carol", "c-1"), ("alice", "a-1"), ("bob", "b-1")]);
    tenant_provisioner(&plane)
        .provision(&input, "eastus")
        .await
        .unwrap();

    let calls = plane.calls();
    assert_eq!(calls.len(), 9);
    let groups: Vec<&str> = calls
        .iter()
        .filter(|c| c.kind == ResourceKind::ResourceGroup)
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(
        groups,
        vec!["carol_resources", "alice_resources", "bob_resources"]
    );
    for chunk in calls.chunks(3) {
        let kinds: Vec<ResourceKind> = chunk.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ResourceKind::ResourceGroup,
                ResourceKind::RoleAssignment,
                ResourceKind::StorageAccount,
            ]
        );
    }
}

#[tokio::test]
async fn test_failure_on_second_record_halts_before_third() {
    let plane = RecordingPlane::failing_on("bob_resources");
    let input = records(&[("alice", "a-1"), ("bob", "b-1"), ("carol", "c-1")]);
    let err = tenant_provisioner(&plane)
        .provision(&input, "eastus")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ProvisionError::Step {
            kind: ResourceKind::ResourceGroup,
            ..
        }
    ));
    let calls = plane.calls();
    assert_eq!(calls.len(), 4, "alice's three calls plus bob's failed one");
    let mentions_carol = |c: &Call| {
        c.name.starts_with("carol") || c.refs.iter().any(|r| r.starts_with("carol"))
    };
    assert!(
        !calls.iter().any(mentions_carol),
        "no call may be issued for the third record"
    );
}

#[tokio::test]
async fn test_empty_tenants_is_noop() {
    let plane = RecordingPlane::default();
    let created = tenant_provisioner(&plane)
        .provision(&[], "eastus")
        .await
        .unwrap();
    assert!(created.is_empty());
    assert!(plane.calls().is_empty());
}

#[tokio::test]
async fn test_concurrent_tenants_keep_per_record_order() {
    let plane = RecordingPlane::default();
    let input = records(&[
        ("alice", "a-1"),
        ("bob", "b-1"),
        ("carol", "c-1"),
        ("dave", "d-1"),
    ]);
    let created = tenant_provisioner(&plane)
        .with_concurrency(3)
        .provision(&input, "eastus")
        .await
        .unwrap();
    assert_eq!(created.len(), 12);

    let calls = plane.calls();
    for record in &input {
        let rg = format!("{}_resources", record.user);
        let kinds: Vec<ResourceKind> = calls
            .iter()
            .filter(|c| c.name == rg || c.refs.contains(&rg))
            .map(|c| c.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                ResourceKind::ResourceGroup,
                ResourceKind::RoleAssignment,
                ResourceKind::StorageAccount,
            ],
            "order for {}",
            record.user
        );
    }
}

/// Re-running is not idempotent: nothing checks for existing resources, so a
/// second run submits the same create calls again. Whether Azure accepts
/// them is up to Azure.
#[tokio::test]
async fn test_rerun_resubmits_every_call() {
    let plane = RecordingPlane::default();
    let config = ProvisionConfig::default();
    let input = records(&[("alice", "abc-123")]);

    provision_tenants(&input, &config, &plane).await.unwrap();
    provision_tenants(&input, &config, &plane).await.unwrap();

    let calls = plane.calls();
    assert_eq!(calls.len(), 6);
    assert_eq!(calls[..3], calls[3..]);
}

#[tokio::test]
async fn test_cluster_from_default_config() {
    let plane = RecordingPlane::default();
    let config = ProvisionConfig::default();
    provision_cluster(&config, &plane).await.unwrap();

    let calls = plane.calls();
    assert_eq!(calls.len(), 9);
    assert_eq!(calls[0].refs, vec!["admin_resources".to_string()]);

    let vm = &calls[2];
    assert_eq!(vm.kind, ResourceKind::VirtualMachine);
    assert_eq!(vm.refs[..3], ["admin_resources", "eastus", "nic_cluster1"]);
    assert_eq!(vm.refs[3], "Standard_D12_v2");
    assert_eq!(vm.refs[5], "5");
    assert_eq!(vm.refs[6], "Canonical:UbuntuServer:14.04.4-LTS:latest");
    assert_eq!(vm.refs[7], "adminlsmlhse645221");

    let key_path = &vm.refs[4];
    assert!(key_path.ends_with("/.ssh/id_rsa.pub"), "{key_path}");
    if let Ok(home) = std::env::var("HOME") {
        assert!(!key_path.starts_with("~/"), "{key_path} was not expanded");
        assert!(key_path.starts_with(home.trim_end_matches('/')), "{key_path}");
    }
}

#[tokio::test]
async fn test_network_from_default_config() {
    let plane = RecordingPlane::default();
    let config = ProvisionConfig::default();
    let created = provision_network(&config, &plane).await.unwrap();

    let calls = plane.calls();
    assert_eq!(created.len(), 4);
    assert_eq!(
        calls,
        vec![
            Call::new(
                ResourceKind::VirtualNetwork,
                "vnet_cluster",
                &["admin_resources", "subnet_cluster", "10.0.1.0/24"],
            ),
            Call::new(
                ResourceKind::SecurityGroup,
                "nsg_cluster",
                &["admin_resources"],
            ),
            Call::new(
                ResourceKind::SecurityRule,
                "allow_ssh",
                &["nsg_cluster", "22", "1000"],
            ),
            Call::new(
                ResourceKind::SecurityRule,
                "allow_jupyter",
                &["nsg_cluster", "9999", "1010"],
            ),
        ]
    );
}
