//! Namespaced profile files.
//!
//! Profiles live flat in one directory as `{app}.{profile}.json`. Several
//! applications can share a directory (usually the home directory) because
//! each only looks at files carrying its own prefix.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::{ProfileDocument, ProfileError, ProfileResult};

/// Profiles created on first use.
pub const DEFAULT_PROFILES: [&str; 3] = ["dev", "test", "prod"];

const EXTENSION: &str = ".json";

/// Reads and writes the profiles of one application.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    root: PathBuf,
    app_name: String,
}

impl ProfileStore {
    /// Open a store for `app_name` under `profiles_root`, or the home
    /// directory when no root is given. A leading `~` in the root is expanded.
    pub fn new(app_name: &str, profiles_root: Option<&Path>) -> ProfileResult<Self> {
        let app_name = app_name.trim();
        if app_name.is_empty() {
            return Err(ProfileError::InvalidAppName);
        }

        let root = match profiles_root.map(Path::to_string_lossy) {
            Some(root) if !root.trim().is_empty() => {
                PathBuf::from(shellexpand::tilde(&*root).into_owned())
            }
            _ => dirs::home_dir().ok_or(ProfileError::NoHomeDirectory)?,
        };

        Ok(Self { root, app_name: app_name.to_string() })
    }

    /// Directory holding the profile files.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Create `dev`, `test` and `prod` from `factory` unless they already
    /// exist. Existing files are never rewritten.
    pub fn ensure_default_profiles<T, F>(&self, mut factory: F) -> ProfileResult<()>
    where
        T: Serialize,
        F: FnMut(&str) -> T,
    {
        fs::create_dir_all(&self.root).map_err(|e| ProfileError::io(&self.root, e))?;

        for name in DEFAULT_PROFILES {
            if self.profile_path(name).exists() {
                continue;
            }
            self.save(name, &factory(name), false)?;
        }
        Ok(())
    }

    /// Names of stored profiles whose JSON satisfies `is_profile`, sorted
    /// case-insensitively. Unreadable or malformed files are skipped.
    pub fn list_profiles<P>(&self, is_profile: P) -> Vec<String>
    where
        P: Fn(&Value) -> bool,
    {
        let Ok(entries) = fs::read_dir(&self.root) else {
            return Vec::new();
        };

        let mut names: Vec<String> = entries
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_ok_and(|t| t.is_file()))
            .filter_map(|entry| {
                let file_name = entry.file_name().into_string().ok()?;
                let name = self.profile_name(&file_name)?;
                let content = fs::read_to_string(entry.path()).ok()?;
                let value: Value = serde_json::from_str(&content).ok()?;
                is_profile(&value).then_some(name)
            })
            .collect();

        names.sort_by_key(|name| name.to_lowercase());
        names
    }

    /// Serialize `profile` to the file for `name`.
    ///
    /// Fails with [`ProfileError::AlreadyExists`] when the file exists and
    /// `overwrite` is false.
    pub fn save<T>(&self, name: &str, profile: &T, overwrite: bool) -> ProfileResult<PathBuf>
    where
        T: Serialize + ?Sized,
    {
        if name.trim().is_empty() {
            return Err(ProfileError::InvalidName);
        }

        let path = self.profile_path(name);
        fs::create_dir_all(&self.root).map_err(|e| ProfileError::io(&self.root, e))?;

        if !overwrite && path.exists() {
            return Err(ProfileError::AlreadyExists { name: name.to_string(), path });
        }

        write_json(&path, profile)?;
        tracing::info!(profile = name, path = %path.display(), "Wrote profile");
        Ok(path)
    }

    /// Read a saved profile document.
    pub fn load<C: DeserializeOwned>(&self, name: &str) -> ProfileResult<ProfileDocument<C>> {
        let path = self.profile_path(name);
        if !path.exists() {
            return Err(ProfileError::NotFound { name: name.to_string(), path });
        }

        let content = fs::read_to_string(&path).map_err(|e| ProfileError::io(&path, e))?;
        serde_json::from_str(&content).map_err(|e| ProfileError::json(&path, e))
    }

    /// File path for profile `name`.
    pub fn profile_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{}.{}{EXTENSION}", self.app_name, sanitize(name)))
    }

    /// Profile name encoded in `file_name`, if it belongs to this store.
    fn profile_name(&self, file_name: &str) -> Option<String> {
        let prefix_len = self.app_name.len() + 1;
        let prefix = file_name.get(..prefix_len)?;
        if !prefix.eq_ignore_ascii_case(&format!("{}.", self.app_name)) {
            return None;
        }

        let suffix_start = file_name.len().checked_sub(EXTENSION.len())?;
        if !file_name.get(suffix_start..)?.eq_ignore_ascii_case(EXTENSION) {
            return None;
        }

        let name = file_name.get(prefix_len..suffix_start)?;
        (!name.trim().is_empty()).then(|| name.to_string())
    }
}

/// Trim `name` and replace characters that are invalid in file names with `-`.
pub fn sanitize(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '-',
            c if c.is_control() => '-',
            c => c,
        })
        .collect()
}

/// Write pretty JSON through a temporary file and rename it into place.
pub(crate) fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> ProfileResult<()> {
    let mut content =
        serde_json::to_string_pretty(value).map_err(|e| ProfileError::json(path, e))?;
    content.push('\n');

    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, content).map_err(|e| ProfileError::io(&temp_path, e))?;
    fs::rename(&temp_path, path).map_err(|e| ProfileError::io(path, e))?;
    Ok(())
}
