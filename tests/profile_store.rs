//! Profile Store Tests
//!
//! Exercises the profile store and the config wizard through the public API.

use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex};

use serde_json::json;
use tempfile::TempDir;

use hostkit::host::{ConfigWizard, ProfileRequest, Prompter, CREATE_NEW};
use hostkit::plugin::Plugin;
use hostkit::profile::{shape, ProfileError, ProfileStore};
use hostkit::sample::{HostProfile, SamplePlugin, SAMPLE_PLUGIN_ID};

/// Answers prompts from a fixed script and remembers the choices offered.
struct Scripted {
    answers: Mutex<Vec<&'static str>>,
    offered: Mutex<Vec<Vec<String>>>,
}

impl Scripted {
    fn new(answers: &[&'static str]) -> Self {
        Self {
            answers: Mutex::new(answers.iter().rev().copied().collect()),
            offered: Mutex::default(),
        }
    }

    fn next(&self) -> io::Result<String> {
        self.answers
            .lock()
            .unwrap()
            .pop()
            .map(str::to_string)
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "script exhausted"))
    }

    fn offered(&self) -> Vec<Vec<String>> {
        self.offered.lock().unwrap().clone()
    }
}

impl Prompter for Scripted {
    fn select(&self, _title: &str, choices: &[String]) -> io::Result<String> {
        self.offered.lock().unwrap().push(choices.to_vec());
        self.next()
    }

    fn ask(&self, _question: &str, _default: &str) -> io::Result<String> {
        self.next()
    }
}

fn wizard() -> ConfigWizard<HostProfile> {
    ConfigWizard::new(HostProfile::for_profile, HostProfile::prompt)
        .with_profile_shape(HostProfile::is_profile)
}

fn plugins() -> Vec<Arc<dyn Plugin>> {
    vec![Arc::new(SamplePlugin::new().unwrap())]
}

fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

fn request(root: &TempDir) -> ProfileRequest {
    ProfileRequest { profiles_root: Some(root.path().to_path_buf()), ..ProfileRequest::default() }
}

#[test]
fn test_wizard_bootstraps_defaults_with_plugin_settings() {
    let root = TempDir::new().unwrap();
    let request = ProfileRequest {
        name: Some("edge".to_string()),
        non_interactive: true,
        ..request(&root)
    };

    let written = wizard().run("acme", &request, &plugins(), &Scripted::new(&[])).unwrap();
    assert_eq!(written.name, "edge");
    assert_eq!(written.profiles_root.as_deref(), Some(root.path()));

    let store = ProfileStore::new("acme", Some(root.path())).unwrap();
    assert_eq!(store.list_profiles(HostProfile::is_profile), vec!["dev", "edge", "prod", "test"]);

    let prod = store.load::<HostProfile>("prod").unwrap();
    assert_eq!(prod.core.environment, "prod");
    assert_eq!(
        prod.plugin_value(SAMPLE_PLUGIN_ID, "message"),
        Some(&json!("Hello from plugin config"))
    );
}

#[test]
fn test_wizard_interactive_new_profile() {
    let root = TempDir::new().unwrap();
    let prompter =
        Scripted::new(&[CREATE_NEW, "  ", "test", "https://api.test.example.com", "Warning"]);

    let written = wizard().run("acme", &request(&root), &plugins(), &prompter).unwrap();
    assert_eq!(written.name, "custom");

    let store = ProfileStore::new("acme", Some(root.path())).unwrap();
    let custom = store.load::<HostProfile>("custom").unwrap();
    assert_eq!(custom.core.name, "custom");
    assert_eq!(custom.core.environment, "test");
    assert_eq!(custom.core.log_level, "Warning");
}

#[test]
fn test_wizard_interactive_existing_profile_needs_overwrite() {
    let root = TempDir::new().unwrap();
    let answers = ["dev", "dev", "https://api.example.local", "Debug"];

    let err = wizard().run("acme", &request(&root), &plugins(), &Scripted::new(&answers));
    assert!(err.unwrap_err().to_string().contains("already exists"));

    let overwrite = ProfileRequest { overwrite: true, ..request(&root) };
    wizard().run("acme", &overwrite, &plugins(), &Scripted::new(&answers)).unwrap();

    let store = ProfileStore::new("acme", Some(root.path())).unwrap();
    assert_eq!(store.load::<HostProfile>("dev").unwrap().core.log_level, "Debug");
}

#[test]
fn test_list_profiles_ignores_foreign_and_malformed_files() {
    let root = TempDir::new().unwrap();
    let store = ProfileStore::new("acme", Some(root.path())).unwrap();
    store.save("Beta", &json!({"Core": {"Name": "Beta"}}), false).unwrap();
    store.save("alpha", &json!({"Core": {}}), false).unwrap();
    store.save("flat", &json!({"Name": "flat"}), false).unwrap();
    std::fs::write(root.path().join("acme.broken.json"), "{ not json").unwrap();
    std::fs::write(root.path().join("other.gamma.json"), r#"{"Core": {}}"#).unwrap();
    std::fs::create_dir(root.path().join("acme.dir.json")).unwrap();

    assert_eq!(store.list_profiles(shape::is_profile_document), vec!["alpha", "Beta"]);
    assert_eq!(store.list_profiles(|v| shape::has_keys(v, &["Name"])), vec!["Beta", "flat"]);
}

#[test]
fn test_load_missing_profile() {
    let root = TempDir::new().unwrap();
    let store = ProfileStore::new("acme", Some(root.path())).unwrap();

    assert!(matches!(
        store.load::<HostProfile>("ghost"),
        Err(ProfileError::NotFound { ref name, .. }) if name == "ghost"
    ));
}

#[test]
fn test_bootstrap_empty_root_writes_only_default_profiles() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("nested").join("profiles");
    let store = ProfileStore::new("acme", Some(&root)).unwrap();

    store.ensure_default_profiles(|name| json!({"Core": {"Name": name}})).unwrap();
    assert_eq!(file_names(&root), vec!["acme.dev.json", "acme.prod.json", "acme.test.json"]);

    let fresh = TempDir::new().unwrap();
    let elsewhere = TempDir::new().unwrap();
    let request = ProfileRequest {
        name: Some("ci".to_string()),
        non_interactive: true,
        output: Some(elsewhere.path().join("ci.json")),
        ..request(&fresh)
    };
    wizard().run("acme", &request, &plugins(), &Scripted::new(&[])).unwrap();

    assert_eq!(
        file_names(fresh.path()),
        vec!["acme.dev.json", "acme.prod.json", "acme.test.json"]
    );
    assert_eq!(file_names(elsewhere.path()), vec!["ci.json"]);
}

#[test]
fn test_wizard_selection_skips_mismatched_documents() {
    let root = TempDir::new().unwrap();
    std::fs::write(root.path().join("acme.foo.json"), r#"{"foo":123}"#).unwrap();
    std::fs::write(root.path().join("acme.flat.json"), r#"{"Name":"flat"}"#).unwrap();

    let prompter = Scripted::new(&["prod", "prod", "https://api.example.com", "Error"]);
    let overwrite = ProfileRequest { overwrite: true, ..request(&root) };
    let written = wizard().run("acme", &overwrite, &plugins(), &prompter).unwrap();
    assert_eq!(written.name, "prod");

    let offered = prompter.offered();
    assert_eq!(offered[0], vec!["dev", "prod", "test", CREATE_NEW]);
    assert_eq!(
        std::fs::read_to_string(root.path().join("acme.foo.json")).unwrap(),
        r#"{"foo":123}"#
    );

    let store = ProfileStore::new("acme", Some(root.path())).unwrap();
    assert_eq!(store.load::<HostProfile>("prod").unwrap().core.log_level, "Error");
}
