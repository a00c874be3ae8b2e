use assert_cmd::Command;
use assert_cmd::cargo;
use mockito::{Mock, Server, ServerGuard};
use predicates::prelude::*;

const TAG: &str = "20241016";

/// (marker, flavor) for every regular platform, plus the free-threaded ones.
const ASSETS: &[(&str, &str)] = &[
    ("aarch64-unknown-linux-gnu", "install_only_stripped"),
    ("aarch64-unknown-linux-gnu", "freethreaded+lto-full"),
    ("x86_64_v3-unknown-linux-gnu", "install_only_stripped"),
    ("x86_64_v3-unknown-linux-gnu", "freethreaded+pgo+lto-full"),
    ("aarch64-apple-darwin", "install_only_stripped"),
    ("aarch64-apple-darwin", "freethreaded+pgo+lto-full"),
    ("x86_64-apple-darwin", "install_only_stripped"),
    ("x86_64-apple-darwin", "freethreaded+pgo+lto-full"),
    ("x86_64-pc-windows-msvc-shared", "install_only_stripped"),
    ("x86_64-pc-windows-msvc-shared", "freethreaded+pgo-full"),
];

fn asset_name(marker: &str, flavor: &str) -> String {
    format!("cpython-3.13.1-{}-{}.tar.gz", marker, flavor)
}

fn release_json(url: &str, extra: &[&str]) -> String {
    let mut names: Vec<String> = ASSETS
        .iter()
        .map(|(marker, flavor)| asset_name(marker, flavor))
        .collect();
    names.extend(extra.iter().map(|n| n.to_string()));

    let assets: Vec<serde_json::Value> = names
        .iter()
        .map(|name| {
            serde_json::json!({
                "name": name,
                "browser_download_url": format!("{}/download/{}/{}", url, TAG, name),
                "state": "uploaded",
                "size": 1000 + name.len(),
            })
        })
        .collect();

    serde_json::json!({
        "name": TAG,
        "tag_name": TAG,
        "draft": false,
        "prerelease": false,
        "assets": assets,
    })
    .to_string()
}

/// Serves the latest release plus a `.sha256` sidecar for every asset.
fn mock_release(server: &mut ServerGuard, extra: &[&str]) -> Vec<Mock> {
    let url = server.url();
    let mut mocks = vec![
        server
            .mock(
                "GET",
                "/repos/astral-sh/python-build-standalone/releases/latest",
            )
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(release_json(&url, extra))
            .create(),
    ];

    for (marker, flavor) in ASSETS {
        let name = asset_name(marker, flavor);
        mocks.push(
            server
                .mock("GET", format!("/download/{}/{}.sha256", TAG, name).as_str())
                .with_status(200)
                .with_body(format!("{:0>64}\n", name.len()))
                .create(),
        );
    }

    mocks
}

fn generate(url: &str) -> Command {
    let mut cmd = Command::new(cargo::cargo_bin!("pbs-dotslash"));
    cmd.arg("generate")
        .arg("--api-url")
        .arg(url)
        .env_remove("GITHUB_TOKEN")
        .env_remove("PBS_DOTSLASH_REPO");
    cmd
}

#[test]
fn test_generate_end_to_end() {
    let mut server = Server::new();
    let url = server.url();
    let _mocks = mock_release(&mut server, &[]);

    let output = generate(&url).assert().success().get_output().stdout.clone();
    let text = String::from_utf8(output).unwrap();

    let body = text
        .strip_prefix("#!/usr/bin/env dotslash\n\n")
        .expect("descriptor header");
    let descriptor: serde_json::Value = serde_json::from_str(body).unwrap();

    assert_eq!(descriptor["name"], "cpython-3.13");
    let platforms = descriptor["platforms"].as_object().unwrap();
    assert_eq!(
        platforms.keys().collect::<Vec<_>>(),
        vec![
            "linux-aarch64",
            "linux-x86_64",
            "macos-aarch64",
            "macos-x86_64",
            "windows-x86_64"
        ]
    );

    let linux = &platforms["linux-x86_64"];
    let name = asset_name("x86_64_v3-unknown-linux-gnu", "install_only_stripped");
    assert_eq!(linux["format"], "tar.gz");
    assert_eq!(linux["hash"], "sha256");
    assert_eq!(linux["path"], "python/bin/python");
    assert_eq!(linux["arg0"], "underlying-executable");
    assert_eq!(linux["size"], 1000 + name.len());
    assert_eq!(linux["digest"], format!("{:0>64}", name.len()));
    assert_eq!(
        linux["providers"][0]["url"],
        format!("{}/download/{}/{}", url, TAG, name)
    );
}

#[test]
fn test_generate_is_byte_identical_across_runs() {
    let mut server = Server::new();
    let url = server.url();
    let _mocks = mock_release(&mut server, &[]);

    let first = generate(&url).assert().success().get_output().stdout.clone();
    let second = generate(&url).assert().success().get_output().stdout.clone();

    assert_eq!(first, second);
}

#[test]
fn test_generate_free_threaded() {
    let mut server = Server::new();
    let url = server.url();
    let _mocks = mock_release(&mut server, &[]);

    generate(&url)
        .arg("--free-threaded")
        .assert()
        .success()
        .stdout(predicates::str::contains(r#""name": "cpython-3.13t""#))
        .stdout(predicates::str::contains("python/install/python.exe"))
        .stdout(predicates::str::contains("install_only_stripped").not());
}

#[test]
fn test_generate_ambiguous_match_fails() {
    let mut server = Server::new();
    let url = server.url();
    let duplicate = "cpython-3.13.0-x86_64-apple-darwin-install_only_stripped.tar.gz";
    let _mocks = mock_release(&mut server, &[duplicate]);

    generate(&url)
        .assert()
        .failure()
        .stderr(predicates::str::contains("More than one asset matches"))
        .stderr(predicates::str::contains(duplicate))
        .stdout(predicates::str::is_empty());
}

#[test]
fn test_generate_unknown_version_fails() {
    let mut server = Server::new();
    let url = server.url();
    let _mocks = mock_release(&mut server, &[]);

    generate(&url)
        .arg("--cpython-version")
        .arg("3.14")
        .assert()
        .failure()
        .stderr(predicates::str::contains("No assets found for version 3.14"));
}

#[test]
fn test_generate_release_not_found() {
    let mut server = Server::new();
    let url = server.url();
    let _m = server
        .mock(
            "GET",
            "/repos/astral-sh/python-build-standalone/releases/latest",
        )
        .with_status(404)
        .create();

    generate(&url)
        .assert()
        .failure()
        .stderr(predicates::str::contains("Not found"));
}

#[cfg(unix)]
mod check {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;
    use tempfile::tempdir;

    /// Installs a fake `dotslash` that prints `version` regardless of input.
    fn fake_dotslash(dir: &Path, version: &str) {
        let path = dir.join("dotslash");
        std::fs::write(&path, format!("#!/bin/sh\necho '{}'\n", version)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    fn write_descriptor(dir: &Path, name: &str) {
        std::fs::write(
            dir.join(name),
            format!(
                "#!/usr/bin/env dotslash\n\n{{\n  \"name\": \"{}\",\n  \"platforms\": {{}}\n}}\n",
                name
            ),
        )
        .unwrap();
    }

    fn check_cmd(bin_dir: &Path) -> Command {
        let mut cmd = Command::new(cargo::cargo_bin!("pbs-dotslash"));
        cmd.arg("check").env("PATH", bin_dir);
        cmd
    }

    #[test]
    fn test_check_passes() {
        let bin = tempdir().unwrap();
        let descriptors = tempdir().unwrap();
        fake_dotslash(bin.path(), "3.13.1 (main, Oct 16 2024, 08:09:50) [Clang 18.1.8 ]");
        write_descriptor(descriptors.path(), "cpython-3.13");

        check_cmd(bin.path())
            .arg(descriptors.path())
            .assert()
            .success()
            .stdout(predicates::str::contains("👌"))
            .stdout(predicates::str::contains("🫡"));
    }

    #[test]
    fn test_check_reports_every_failure() {
        let bin = tempdir().unwrap();
        let descriptors = tempdir().unwrap();
        fake_dotslash(bin.path(), "3.12.0 (main, Oct 2 2023)");
        write_descriptor(descriptors.path(), "cpython-3.13");
        write_descriptor(descriptors.path(), "cpython-3.13t");

        check_cmd(bin.path())
            .arg(descriptors.path().join("cpython-3.13"))
            .arg(descriptors.path().join("cpython-3.13t"))
            .assert()
            .code(1)
            .stdout(predicates::str::contains("🤔"))
            .stderr(predicates::str::contains("cpython-3.13 failed validation"))
            .stderr(predicates::str::contains("cpython-3.13t failed validation"));
    }

    #[test]
    fn test_check_free_threading_mismatch() {
        let bin = tempdir().unwrap();
        let descriptors = tempdir().unwrap();
        fake_dotslash(bin.path(), "3.13.1 (main, Oct 16 2024)");
        write_descriptor(descriptors.path(), "cpython-3.13t");

        check_cmd(bin.path())
            .arg(descriptors.path())
            .assert()
            .code(1)
            .stderr(predicates::str::contains("free_threaded=true"));
    }

    #[test]
    fn test_check_validates_hidden_entries() {
        let bin = tempdir().unwrap();
        let descriptors = tempdir().unwrap();
        fake_dotslash(bin.path(), "3.12.0 (main, Oct 2 2023)");
        write_descriptor(descriptors.path(), "cpython-3.12");
        std::fs::write(
            descriptors.path().join(".cpython-3.13"),
            "#!/usr/bin/env dotslash\n\n{\"name\": \"cpython-3.13\", \"platforms\": {}}\n",
        )
        .unwrap();

        check_cmd(bin.path())
            .arg(descriptors.path())
            .assert()
            .code(1)
            .stdout(predicates::str::contains("cpython-3.12"))
            .stderr(predicates::str::contains(".cpython-3.13 failed validation"));
    }

    #[test]
    fn test_check_without_launcher() {
        let empty = tempdir().unwrap();
        let descriptors = tempdir().unwrap();
        write_descriptor(descriptors.path(), "cpython-3.13");

        check_cmd(empty.path())
            .arg(descriptors.path())
            .assert()
            .code(255)
            .stderr(predicates::str::contains("cannot be found"));
    }
}
