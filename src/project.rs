//! Projects and corpus discovery
//!
//! A project is a directory holding a `.drybones/project.yaml` marker plus any
//! number of `.dry` files in any subdirectory. Each file is a text, named by its
//! file stem; names must be unique within a project.
//!
//! ```text
//! Daool/
//!   .drybones/project.yaml     project-name: Daool
//!   .drybones/diacritics.conf  accent equivalences (optional)
//!   texts/Kaikai.dry           text "Kaikai"
//!   raw/Hevi_Raw.dry           text "Hevi_Raw"
//! ```

use crate::config::ProjectConfig;
use crate::diacritics::DiacriticTable;
use crate::error::{DryError, PreconditionError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const DRY_EXTENSION: &str = "dry";
const MAX_SUGGESTIONS: usize = 5;

/// Contents of `project.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ProjectFile {
    pub project_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    root: PathBuf,
    name: String,
    layout: ProjectConfig,
}

impl Project {
    /// Load the project rooted at `root`.
    pub fn load(root: impl AsRef<Path>, layout: &ProjectConfig) -> Result<Self, DryError> {
        let root = root.as_ref().to_path_buf();
        let config_path = config_path(&root, layout);
        if !config_path.parent().is_some_and(Path::is_dir) {
            return Err(DryError::Project(format!(
                "no drybones project found at {}",
                root.display()
            )));
        }
        let text = fs::read_to_string(&config_path).map_err(|e| DryError::io(&config_path, e))?;
        let file: ProjectFile = serde_yaml::from_str(&text).map_err(|e| {
            DryError::Project(format!(
                "project at {} is misconfigured ({}): {e}",
                root.display(),
                config_path.display()
            ))
        })?;
        Ok(Self {
            root,
            name: file.project_name,
            layout: layout.clone(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The project's marker directory, e.g. `Daool/.drybones`.
    pub fn marker_dir(&self) -> PathBuf {
        self.root.join(&self.layout.directory_name)
    }

    pub fn diacritics_path(&self) -> PathBuf {
        self.marker_dir().join(&self.layout.diacritics_file)
    }

    /// The accent table. A project without one has nothing to convert.
    pub fn diacritics(&self) -> Result<DiacriticTable, DryError> {
        let path = self.diacritics_path();
        if !path.is_file() {
            return Err(DryError::Project(format!(
                "project {:?} has no accent table; create {}",
                self.name,
                path.display()
            )));
        }
        DiacriticTable::load(path)
    }

    /// Every text in the project by name. Fails if two files share a stem.
    pub fn texts(&self) -> Result<BTreeMap<String, PathBuf>, DryError> {
        let mut paths_by_name: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
        let walker = WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.file_name() != self.layout.directory_name.as_str());

        for entry in walker {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(&self.root).to_path_buf();
                DryError::io(path, e.into())
            })?;
            let path = entry.path();
            if !entry.file_type().is_file()
                || path.extension().and_then(|ext| ext.to_str()) != Some(DRY_EXTENSION)
            {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                paths_by_name
                    .entry(stem.to_string())
                    .or_default()
                    .push(path.to_path_buf());
            }
        }

        let mut texts = BTreeMap::new();
        for (name, mut paths) in paths_by_name {
            if paths.len() > 1 {
                return Err(PreconditionError::DuplicateTextName { name, paths }.into());
            }
            if let Some(path) = paths.pop() {
                texts.insert(name, path);
            }
        }
        tracing::debug!(project = %self.name, texts = texts.len(), "scanned corpus");
        Ok(texts)
    }

    /// Find a text by name: exact match first, then a unique case-insensitive
    /// one. Otherwise the error carries the closest names.
    pub fn resolve_text(&self, name: &str) -> Result<PathBuf, DryError> {
        let texts = self.texts()?;
        if let Some(path) = texts.get(name) {
            return Ok(path.clone());
        }
        let folded: Vec<&PathBuf> = texts
            .iter()
            .filter(|(text, _)| text.to_lowercase() == name.to_lowercase())
            .map(|(_, path)| path)
            .collect();
        if let [path] = folded.as_slice() {
            return Ok((*path).clone());
        }
        Err(PreconditionError::UnknownText {
            name: name.to_string(),
            suggestions: suggestions(name, texts.keys()),
        }
        .into())
    }
}

fn config_path(root: &Path, layout: &ProjectConfig) -> PathBuf {
    root.join(&layout.directory_name).join(&layout.config_file)
}

/// Create `parent/name/` with its project marker.
pub fn create_project(parent: impl AsRef<Path>, name: &str, layout: &ProjectConfig) -> Result<Project, DryError> {
    let root = parent.as_ref().join(name);
    let marker_dir = root.join(&layout.directory_name);
    if marker_dir.exists() {
        return Err(DryError::Project(format!(
            "a project already exists at {}",
            root.display()
        )));
    }
    fs::create_dir_all(&marker_dir).map_err(|e| DryError::io(&marker_dir, e))?;

    let file = ProjectFile {
        project_name: name.to_string(),
    };
    let yaml = serde_yaml::to_string(&file).map_err(|e| DryError::Project(e.to_string()))?;
    let config_path = config_path(&root, layout);
    fs::write(&config_path, yaml).map_err(|e| DryError::io(&config_path, e))?;

    tracing::info!(project = name, root = %root.display(), "created project");
    Project::load(root, layout)
}

/// Remove the project marker of `parent/name`. The texts stay where they are.
pub fn delete_project(parent: impl AsRef<Path>, name: &str, layout: &ProjectConfig) -> Result<PathBuf, DryError> {
    let root = parent.as_ref().join(name);
    if !root.join(&layout.directory_name).is_dir() {
        return Err(DryError::Project(format!(
            "no project named {name:?} found in {}",
            parent.as_ref().display()
        )));
    }
    let project = Project::load(&root, layout)?;
    let marker_dir = project.marker_dir();
    fs::remove_dir_all(&marker_dir).map_err(|e| DryError::io(&marker_dir, e))?;
    tracing::info!(project = %project.name, root = %root.display(), "deleted project");
    Ok(marker_dir)
}

/// Nearest directory at or above `start` that holds a project marker.
pub fn find_project_root(start: impl AsRef<Path>, layout: &ProjectConfig) -> Option<PathBuf> {
    start
        .as_ref()
        .ancestors()
        .find(|dir| config_path(dir, layout).is_file())
        .map(Path::to_path_buf)
}

/// Up to five known names closest to `name` by edit distance.
fn suggestions<'a>(name: &str, known: impl Iterator<Item = &'a String>) -> Vec<String> {
    let target = name.to_lowercase();
    let mut ranked: Vec<(usize, &String)> = known
        .map(|candidate| (levenshtein(&target, &candidate.to_lowercase()), candidate))
        .collect();
    ranked.sort();
    ranked
        .into_iter()
        .take(MAX_SUGGESTIONS)
        .map(|(_, candidate)| candidate.clone())
        .collect()
}

fn levenshtein(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut previous: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.chars().enumerate() {
        let mut current = vec![i + 1; b.len() + 1];
        for (j, cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != *cb);
            current[j + 1] = substitution.min(previous[j + 1] + 1).min(current[j] + 1);
        }
        previous = current;
    }
    previous[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::load_defaults;

    fn layout() -> ProjectConfig {
        load_defaults().unwrap().project
    }

    #[test]
    fn test_create_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let project = create_project(dir.path(), "Daool", &layout()).unwrap();
        assert_eq!(project.name(), "Daool");
        assert_eq!(project.root(), dir.path().join("Daool"));

        let yaml = fs::read_to_string(dir.path().join("Daool/.drybones/project.yaml")).unwrap();
        assert_eq!(yaml.trim(), "project-name: Daool");

        assert!(create_project(dir.path(), "Daool", &layout()).is_err());
    }

    #[test]
    fn test_find_root_from_subdirectory() {
        let dir = tempfile::tempdir().unwrap();
        create_project(dir.path(), "Daool", &layout()).unwrap();
        let nested = dir.path().join("Daool/texts/2024");
        fs::create_dir_all(&nested).unwrap();
        assert_eq!(
            find_project_root(&nested, &layout()),
            Some(dir.path().join("Daool"))
        );
        assert_eq!(find_project_root(dir.path(), &layout()), None);
    }

    #[test]
    fn test_texts_and_resolution() {
        let dir = tempfile::tempdir().unwrap();
        let project = create_project(dir.path(), "Daool", &layout()).unwrap();
        let texts_dir = project.root().join("texts");
        fs::create_dir_all(&texts_dir).unwrap();
        fs::write(texts_dir.join("Kaikai.dry"), "").unwrap();
        fs::write(texts_dir.join("Hevi_Raw.dry"), "").unwrap();
        fs::write(texts_dir.join("notes.txt"), "").unwrap();

        let texts = project.texts().unwrap();
        assert_eq!(texts.keys().collect::<Vec<_>>(), vec!["Hevi_Raw", "Kaikai"]);

        assert_eq!(project.resolve_text("kaikai").unwrap(), texts_dir.join("Kaikai.dry"));

        match project.resolve_text("Kaika").unwrap_err() {
            DryError::Precondition(PreconditionError::UnknownText { suggestions, .. }) => {
                assert_eq!(suggestions[0], "Kaikai");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_duplicate_text_names() {
        let dir = tempfile::tempdir().unwrap();
        let project = create_project(dir.path(), "Daool", &layout()).unwrap();
        for sub in ["a", "b"] {
            let sub_dir = project.root().join(sub);
            fs::create_dir_all(&sub_dir).unwrap();
            fs::write(sub_dir.join("Kaikai.dry"), "").unwrap();
        }
        assert!(matches!(
            project.texts(),
            Err(DryError::Precondition(PreconditionError::DuplicateTextName { .. }))
        ));
    }

    #[test]
    fn test_delete_keeps_texts() {
        let dir = tempfile::tempdir().unwrap();
        let project = create_project(dir.path(), "Daool", &layout()).unwrap();
        let text = project.root().join("Kaikai.dry");
        fs::write(&text, "").unwrap();

        let removed = delete_project(dir.path(), "Daool", &layout()).unwrap();
        assert_eq!(removed, dir.path().join("Daool/.drybones"));
        assert!(!removed.exists());
        assert!(text.is_file());
        assert_eq!(find_project_root(project.root(), &layout()), None);

        assert!(matches!(
            delete_project(dir.path(), "Daool", &layout()),
            Err(DryError::Project(_))
        ));
    }

    #[test]
    fn test_diacritics_table_lives_in_marker_dir() {
        let dir = tempfile::tempdir().unwrap();
        let project = create_project(dir.path(), "Daool", &layout()).unwrap();
        assert!(matches!(project.diacritics(), Err(DryError::Project(_))));

        fs::write(project.diacritics_path(), "é e e'\n").unwrap();
        assert_eq!(project.diacritics_path(), dir.path().join("Daool/.drybones/diacritics.conf"));
        assert_eq!(project.diacritics().unwrap().translate("cafe'", false), "café");
    }

    #[test]
    fn test_levenshtein() {
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("same", "same"), 0);
    }
}
