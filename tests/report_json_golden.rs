use bkaudit::core::{Report, ReportSummary, ResourceKind, Section, SectionBody};

#[test]
fn report_json_matches_golden() {
    let report = Report {
        schema_version: "1.0".to_string(),
        tool_version: "0.1.0".to_string(),
        region: "us-east-1".to_string(),
        generated_at: "2026-01-01T00:00:00Z".to_string(),
        summary: ReportSummary {
            resources_audited: 3,
            covered: 1,
            not_covered: 2,
            discovery_errors: 0,
            notes: vec!["audit: region=us-east-1 top_n=5 recency_window_days=42".to_string()],
        },
        sections: vec![
            Section {
                kind: ResourceKind::DatabaseCluster,
                title: "RDS Backup Details".to_string(),
                header: vec![
                    "Cluster ID".to_string(),
                    "Snapshot ID".to_string(),
                    "Created On".to_string(),
                    "Source".to_string(),
                ],
                body: SectionBody::Table {
                    rows: vec![
                        vec![
                            "db-1".to_string(),
                            "snap-2".to_string(),
                            "2026-01-01 00:00:00 UTC".to_string(),
                            "rds".to_string(),
                        ],
                        vec![
                            "db-2".to_string(),
                            "No backups configured".to_string(),
                            "-".to_string(),
                            "-".to_string(),
                        ],
                    ],
                },
            },
            Section {
                kind: ResourceKind::ComputeInstance,
                title: "EC2 Backup Details".to_string(),
                header: vec![
                    "Instance ID".to_string(),
                    "AMI ID".to_string(),
                    "Created On".to_string(),
                    "Source".to_string(),
                ],
                body: SectionBody::Banner {
                    text: "No backups configured for EC2.".to_string(),
                },
            },
        ],
    };

    let actual = serde_json::to_value(&report).expect("serialize report");
    let expected: serde_json::Value =
        serde_json::from_str(include_str!("golden/report.json")).expect("parse golden json");

    assert_eq!(actual, expected);
}

#[test]
fn report_round_trips_through_json() {
    let json = include_str!("golden/report.json");
    let report: Report = serde_json::from_str(json).expect("deserialize report");
    assert_eq!(report.sections.len(), 2);
    assert!(!report.sections[0].is_banner());
    assert!(report.sections[1].is_banner());
}
