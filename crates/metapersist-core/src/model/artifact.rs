//! Shared records: processed [`SourceFile`]s and analyzed [`Artifact`]s.
//!
//! These are not symbols. Both families of metadata carry them.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::RecordResult;
use crate::model::fields::{put, put_opt, MapReader};
use crate::model::{JsonMap, Record, RecordKind};

// ============================================================================
// SourceFile
// ============================================================================

/// A processed source file.
///
/// Equality is by `(path, id)`; the natural order is by `id`.
#[derive(Debug, Clone, Default)]
pub struct SourceFile {
    /// Name of the parent artifact.
    pub artifact_name: Option<String>,
    pub path: String,
    /// Unique id of the file.
    pub id: String,
}

record_identity!(SourceFile { path, id });

impl SourceFile {
    pub fn new(
        artifact_name: impl Into<String>,
        path: impl Into<String>,
        id: impl Into<String>,
    ) -> Self {
        SourceFile {
            artifact_name: Some(artifact_name.into()),
            path: path.into(),
            id: id.into(),
        }
    }
}

impl Record for SourceFile {
    const KIND: RecordKind = RecordKind::SourceFile;

    fn to_map(&self) -> JsonMap {
        let mut map = JsonMap::new();
        put_opt(&mut map, "artifactName", &self.artifact_name);
        put(&mut map, "path", self.path.as_str());
        put(&mut map, "id", self.id.as_str());
        map
    }

    fn from_map(map: &JsonMap) -> RecordResult<Self> {
        let reader = MapReader::new(Self::KIND.name(), map);
        Ok(SourceFile {
            artifact_name: reader.opt_string("artifactName")?,
            path: reader.string("path")?,
            id: reader.string("id")?,
        })
    }
}

impl PartialOrd for SourceFile {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SourceFile {
    // Ties on id fall back to path so the order agrees with equality.
    fn cmp(&self, other: &Self) -> Ordering {
        self.id
            .cmp(&other.id)
            .then_with(|| self.path.cmp(&other.path))
    }
}

impl fmt::Display for SourceFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.id, self.path)
    }
}

// ============================================================================
// Artifact
// ============================================================================

/// Packaging of an artifact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ArtifactKind {
    Jar,
    Aar,
    Apk,
    ClassDir,
    SourcesJar,
    #[default]
    Other,
}

impl ArtifactKind {
    /// The serialized tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::Jar => "JAR",
            ArtifactKind::Aar => "AAR",
            ArtifactKind::Apk => "APK",
            ArtifactKind::ClassDir => "CLASS_DIR",
            ArtifactKind::SourcesJar => "SOURCES_JAR",
            ArtifactKind::Other => "OTHER",
        }
    }
}

/// A packaged unit (archive, module, class directory) an analysis ran over.
///
/// `checksum` and `size_in_bytes` are full 64-bit values and round-trip
/// exactly. Nested artifacts keep their order.
#[derive(Debug, Clone, Default)]
pub struct Artifact {
    pub id: String,
    pub name: String,
    pub kind: ArtifactKind,
    /// True for dependencies, false for the application's own artifacts.
    pub is_dependency: bool,
    pub checksum: u64,
    pub size_in_bytes: u64,
    /// Artifacts contained in this one (e.g. jars inside an apk).
    pub artifacts: Vec<Artifact>,
    pub parent_artifact_id: Option<String>,
}

record_identity!(Artifact {
    id,
    name,
    kind,
    is_dependency,
    checksum,
    size_in_bytes,
    artifacts,
    parent_artifact_id
});

impl Artifact {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: ArtifactKind) -> Self {
        Artifact {
            id: id.into(),
            name: name.into(),
            kind,
            ..Default::default()
        }
    }

    pub fn dependency(mut self) -> Self {
        self.is_dependency = true;
        self
    }

    pub fn with_checksum(mut self, checksum: u64) -> Self {
        self.checksum = checksum;
        self
    }

    pub fn with_size(mut self, size_in_bytes: u64) -> Self {
        self.size_in_bytes = size_in_bytes;
        self
    }

    /// Add a nested artifact, pointing its parent id at this artifact.
    pub fn with_nested(mut self, mut nested: Artifact) -> Self {
        nested.parent_artifact_id = Some(self.id.clone());
        self.artifacts.push(nested);
        self
    }
}

impl Record for Artifact {
    const KIND: RecordKind = RecordKind::Artifact;

    fn to_map(&self) -> JsonMap {
        let mut map = JsonMap::new();
        put(&mut map, "id", self.id.as_str());
        put(&mut map, "name", self.name.as_str());
        put(&mut map, "kind", self.kind.as_str());
        put(&mut map, "isDependency", self.is_dependency);
        put(&mut map, "checksum", self.checksum);
        put(&mut map, "sizeInBytes", self.size_in_bytes);
        let nested: Vec<Value> = self.artifacts.iter().map(|a| a.to_value()).collect();
        put(&mut map, "artifacts", nested);
        put_opt(&mut map, "parentArtifactId", &self.parent_artifact_id);
        map
    }

    fn from_map(map: &JsonMap) -> RecordResult<Self> {
        let reader = MapReader::new(Self::KIND.name(), map);
        let artifacts = reader
            .objects("artifacts")?
            .into_iter()
            .map(Artifact::from_map)
            .collect::<RecordResult<Vec<_>>>()?;
        Ok(Artifact {
            id: reader.string("id")?,
            name: reader.string("name")?,
            kind: reader.tagged("kind")?,
            is_dependency: reader.bool("isDependency")?,
            checksum: reader.u64("checksum")?,
            size_in_bytes: reader.u64("sizeInBytes")?,
            artifacts,
            parent_artifact_id: reader.opt_string("parentArtifactId")?,
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    mod source_file_tests {
        use super::*;

        #[test]
        fn source_file_round_trip() {
            let file = SourceFile::new("app.jar", "src/Main.java", "f1");
            assert_eq!(SourceFile::from_map(&file.to_map()).unwrap(), file);
            assert_eq!(file.to_string(), "f1: src/Main.java");
        }

        #[test]
        fn source_file_equality_ignores_artifact() {
            let a = SourceFile::new("a.jar", "Main.java", "f1");
            let b = SourceFile::new("b.jar", "Main.java", "f1");
            assert_eq!(a, b);
        }

        #[test]
        fn source_files_order_by_id() {
            let mut files = [
                SourceFile::new("a.jar", "Z.java", "f2"),
                SourceFile::new("a.jar", "A.java", "f1"),
            ];
            files.sort();
            assert_eq!(files[0].id, "f1");
        }
    }

    mod artifact_tests {
        use super::*;

        #[test]
        fn large_sizes_round_trip_exactly() {
            let artifact = Artifact::new("a1", "big.apk", ArtifactKind::Apk)
                .with_size(1u64 << 40)
                .with_checksum(0xFFFF_FFFF_FFFF_FFF0);
            let text = serde_json::to_string(&artifact.to_value()).unwrap();
            assert!(text.contains("\"sizeInBytes\":1099511627776"));

            let value: Value = serde_json::from_str(&text).unwrap();
            let back = Artifact::from_value(&value).unwrap();
            assert_eq!(back.size_in_bytes, 1u64 << 40);
            assert_eq!(back.checksum, 0xFFFF_FFFF_FFFF_FFF0);
            assert_eq!(back, artifact);
        }

        #[test]
        fn nested_artifacts_round_trip_in_order() {
            let artifact = Artifact::new("apk", "app.apk", ArtifactKind::Apk)
                .with_nested(Artifact::new("dex2", "classes2.dex", ArtifactKind::Other))
                .with_nested(Artifact::new("dex1", "classes.dex", ArtifactKind::Other).dependency());
            let back = Artifact::from_map(&artifact.to_map()).unwrap();
            assert_eq!(back, artifact);
            assert_eq!(back.artifacts[0].id, "dex2");
            assert_eq!(back.artifacts[1].parent_artifact_id.as_deref(), Some("apk"));
            assert!(back.artifacts[1].is_dependency);
        }

        #[test]
        fn artifact_kind_tag() {
            let artifact = Artifact::new("c", "classes", ArtifactKind::ClassDir);
            assert_eq!(artifact.to_map().get("kind"), Some(&json!("CLASS_DIR")));
            assert_eq!(
                serde_json::to_value(ArtifactKind::SourcesJar).unwrap(),
                json!(ArtifactKind::SourcesJar.as_str())
            );
        }

        #[test]
        fn nested_artifact_must_be_object() {
            let map = json!({"id": "a", "artifacts": ["b"]}).as_object().cloned().unwrap();
            let err = Artifact::from_map(&map).unwrap_err();
            assert_eq!(
                err.to_string(),
                "Artifact.artifacts[0]: expected object, found string"
            );
        }
    }
}
