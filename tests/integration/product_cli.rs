//! Integration tests for the configure and render-manifest commands.

use predicates::prelude::*;
use serial_test::serial;
use tempfile::TempDir;

use crate::common::{tile_harness, with_om_env, write_product};

#[test]
#[serial]
fn test_configure_requires_om_environment() {
    let temp = TempDir::new().unwrap();
    let config = write_product(temp.path());

    tile_harness()
        .arg("configure")
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Environment variable OM_USERNAME must be set"))
        .stderr(predicate::str::contains("OM_URL"));
}

#[test]
#[serial]
fn test_configure_reports_missing_product_fields() {
    let mut cmd = tile_harness();
    with_om_env(&mut cmd)
        .args(["configure", "--name", "p-redis"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Product version must be provided in config"));
}

#[cfg(unix)]
mod fake_om {
    use super::*;
    use crate::common::{install_fake_om, path_with};
    use std::fs;

    #[test]
    #[serial]
    fn test_configure_and_render_with_fake_om() {
        let temp = TempDir::new().unwrap();
        let config = write_product(temp.path());
        let log = install_fake_om(temp.path(), false);

        let mut cmd = tile_harness();
        with_om_env(&mut cmd)
            .env("PATH", path_with(temp.path()))
            .arg("configure")
            .arg("--config")
            .arg(&config)
            .args(["--set", ".properties.b=3"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Configured p-redis 1.0.0"));

        let output_file = temp.path().join("manifest.yml");
        let mut cmd = tile_harness();
        with_om_env(&mut cmd)
            .env("PATH", path_with(temp.path()))
            .arg("render-manifest")
            .arg("--config")
            .arg(&config)
            .arg("--output")
            .arg(&output_file)
            .assert()
            .success();

        let manifest: serde_yaml::Value =
            serde_yaml::from_str(&fs::read_to_string(&output_file).unwrap()).unwrap();
        assert_eq!(manifest["name"].as_str(), Some("p-redis"));

        let calls: Vec<String> = fs::read_to_string(&log).unwrap().lines().map(String::from).collect();
        assert_eq!(calls.len(), 5);
        assert_eq!(
            calls[0],
            "--skip-ssl-validation --target https://opsman.example.com revert-staged-changes"
        );
        assert!(calls[1].ends_with("stage-product --product-name p-redis --product-version 1.0.0"));
        assert!(calls[2].contains("configure-product --product-name p-redis --product-properties"));
        assert!(calls[2].contains(r#"".properties.b":{"value":3}"#));
        assert!(calls[3].ends_with("curl --path /api/v0/staged/products"));
        assert!(calls[4].ends_with("curl --path /api/v0/staged/products/redis-1/manifest"));
    }

    #[test]
    #[serial]
    fn test_stage_failure_surfaces_stderr() {
        let temp = TempDir::new().unwrap();
        let config = write_product(temp.path());
        let log = install_fake_om(temp.path(), true);

        let mut cmd = tile_harness();
        with_om_env(&mut cmd)
            .env("PATH", path_with(temp.path()))
            .arg("configure")
            .arg("--config")
            .arg(&config)
            .assert()
            .failure()
            .code(1)
            .stderr(predicate::str::contains(
                r#"Unable to stage product "p-redis", version "1.0.0": exit status: 1: boom"#,
            ));

        let calls = fs::read_to_string(&log).unwrap();
        assert_eq!(calls.lines().count(), 2);
    }

    #[test]
    #[serial]
    fn test_render_unknown_product_lists_staged_types() {
        let temp = TempDir::new().unwrap();
        let config = write_product(temp.path());
        install_fake_om(temp.path(), false);

        let mut cmd = tile_harness();
        with_om_env(&mut cmd)
            .env("PATH", path_with(temp.path()))
            .arg("render-manifest")
            .arg("--config")
            .arg(&config)
            .args(["--name", "p-mysql"])
            .assert()
            .failure()
            .stderr(predicate::str::contains(
                r#"Product "p-mysql" has not been staged. Staged products: "cf, p-redis""#,
            ));
    }
}
