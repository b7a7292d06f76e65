//! Commands run against a snapshot file

use pretty_assertions::assert_eq;
use spss_model::Role;
use spss_store::Snapshot;
use spss_test_utils::{sample_record_data, sample_records, TestBed, PASSWORD};
use std::path::Path;

async fn run(data: &Path, args: &[&str]) -> anyhow::Result<String> {
    let mut argv = vec!["spss-connect", "--data", data.to_str().unwrap()];
    argv.extend_from_slice(args);
    let matches = spss_cli::cli().try_get_matches_from(argv)?;
    spss_cli::run(&matches).await
}

async fn seeded(path: &Path) {
    let bed = TestBed::new();
    bed.seed(&sample_records(12)).await;
    bed.sign_in_as("root@spss.in", Role::SuperAdmin, None).await;
    Snapshot::capture(&bed.store, &bed.identity).save(path).await.unwrap();
}

#[tokio::test]
async fn register_then_whoami() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("data.json");

    let out = run(&data, &["--email", "asha@spss.in", "--password", "secret1", "register"])
        .await
        .unwrap();
    assert_eq!(out, "asha@spss.in (user)\n");
    assert!(data.exists());

    let out = run(&data, &["whoami", "--email", "asha@spss.in", "--password", "secret1"])
        .await
        .unwrap();
    assert_eq!(out, "asha@spss.in (user)\n");

    assert_eq!(run(&data, &["whoami"]).await.unwrap(), "guest\n");
    assert!(run(&data, &["whoami", "--email", "asha@spss.in"]).await.is_err());
}

#[tokio::test]
async fn super_admin_session() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("data.json");
    seeded(&data).await;
    let creds = ["--email", "root@spss.in", "--password", PASSWORD];

    let listed = run(&data, &[&creds[..], &["list", "--page", "2"]].concat()).await.unwrap();
    assert!(listed.contains("Showing 12 records"));
    assert!(listed.contains("Page 2 of 2"));
    assert!(listed.contains("Owner 0011"));

    let imported = run(
        &data,
        &[&creds[..], &["import", "--paste", r#"[{"personalDetails":{"name":"Imported"}}, 3]"#]].concat(),
    )
    .await
    .unwrap();
    assert!(imported.starts_with("Imported 1 record(s). 1 record(s) skipped (invalid)."));

    let found = run(&data, &[&creds[..], &["list", "--search", "imported"]].concat()).await.unwrap();
    assert!(found.contains("Showing 1 record\n"));

    let out_dir = dir.path().join("reports");
    let exported = run(
        &data,
        &[&creds[..], &["export", "sabha", "aluva", "--out", out_dir.to_str().unwrap()]].concat(),
    )
    .await
    .unwrap();
    assert!(exported.starts_with("Wrote"));
    assert!(out_dir.join("SPSS_aluva.html").exists());

    let created = run(
        &data,
        &[
            &creds[..],
            &["users", "create", "--new-email", "sec@spss.in", "--new-password", "secret1", "--role", "admin", "--sabha", "Aluva"],
        ]
        .concat(),
    )
    .await
    .unwrap();
    assert_eq!(created, "User created: sec@spss.in (admin — Aluva)\n");

    let users = run(&data, &[&creds[..], &["users", "list"]].concat()).await.unwrap();
    assert!(users.lines().next().unwrap().contains("sec@spss.in"));
}

#[tokio::test]
async fn guest_create_and_validate() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("data.json");
    let body = dir.path().join("record.json");
    std::fs::write(&body, serde_json::to_string(&sample_record_data("Ravi", "Aluva")).unwrap()).unwrap();

    assert_eq!(run(&data, &["validate", body.to_str().unwrap()]).await.unwrap(), "Valid\n");

    let out = run(&data, &["create", body.to_str().unwrap()]).await.unwrap();
    assert!(out.starts_with("Record created successfully!"));
    assert!(out.contains("-> success?id="));

    let err = run(&data, &["list"]).await.unwrap_err();
    assert!(err.downcast_ref::<spss_core::ConnectError>().is_some());

    let err = run(&data, &["delete", "anything"]).await.unwrap_err();
    assert_eq!(
        err.downcast_ref::<spss_core::ConnectError>().map(spss_core::ConnectError::user_message),
        Some("You do not have permission to perform this action.".to_string())
    );
}
