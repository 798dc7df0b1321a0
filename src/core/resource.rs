use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    DatabaseCluster,
    ComputeInstance,
    FileSystem,
}

impl ResourceKind {
    /// Reference audit ordering: database, then compute, then file system.
    pub const ALL: [ResourceKind; 3] = [
        ResourceKind::DatabaseCluster,
        ResourceKind::ComputeInstance,
        ResourceKind::FileSystem,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            ResourceKind::DatabaseCluster => "database_cluster",
            ResourceKind::ComputeInstance => "compute_instance",
            ResourceKind::FileSystem => "file_system",
        }
    }

    pub const fn service(self) -> &'static str {
        match self {
            ResourceKind::DatabaseCluster => "RDS",
            ResourceKind::ComputeInstance => "EC2",
            ResourceKind::FileSystem => "EFS",
        }
    }

    pub const fn section_title(self) -> &'static str {
        match self {
            ResourceKind::DatabaseCluster => "RDS Backup Details",
            ResourceKind::ComputeInstance => "EC2 Backup Details",
            ResourceKind::FileSystem => "EFS Backup Details",
        }
    }

    pub const fn plural(self) -> &'static str {
        match self {
            ResourceKind::DatabaseCluster => "RDS database clusters",
            ResourceKind::ComputeInstance => "EC2 instances",
            ResourceKind::FileSystem => "EFS file systems",
        }
    }

    pub const fn id_header(self) -> &'static str {
        match self {
            ResourceKind::DatabaseCluster => "Cluster ID",
            ResourceKind::ComputeInstance => "Instance ID",
            ResourceKind::FileSystem => "File System ID",
        }
    }

    pub const fn backup_header(self) -> &'static str {
        match self {
            ResourceKind::DatabaseCluster => "Snapshot ID",
            ResourceKind::ComputeInstance => "AMI ID",
            ResourceKind::FileSystem => "Recovery Point ID",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.plural())
    }
}

impl FromStr for ResourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rds" | "database" | "database_cluster" | "database-cluster" => {
                Ok(ResourceKind::DatabaseCluster)
            }
            "ec2" | "compute" | "compute_instance" | "compute-instance" => {
                Ok(ResourceKind::ComputeInstance)
            }
            "efs" | "filesystem" | "file_system" | "file-system" => Ok(ResourceKind::FileSystem),
            _ => Err(format!(
                "unknown resource kind: {s} (expected rds|ec2|efs)"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Inventory snapshot of one live resource, taken at scan time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagedResource {
    pub id: String,
    pub kind: ResourceKind,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl ManagedResource {
    pub fn new(id: impl Into<String>, kind: ResourceKind) -> Self {
        Self {
            id: id.into(),
            kind,
            tags: Vec::new(),
        }
    }
}
