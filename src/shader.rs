use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    /// Stages in the order a batch processes them.
    pub const ALL: [ShaderStage; 2] = [ShaderStage::Vertex, ShaderStage::Fragment];

    pub fn extension(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vert",
            ShaderStage::Fragment => "frag",
        }
    }

    pub fn from_file_name(file_name: &str) -> Option<Self> {
        ShaderStage::ALL.into_iter().find(|stage| {
            file_name
                .strip_suffix(stage.extension())
                .is_some_and(|rest| rest.ends_with('.'))
        })
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShaderSource {
    path: PathBuf,
    file_name: String,
    stem: String,
    stage: ShaderStage,
}

impl ShaderSource {
    /// Classifies `file_name` inside `dir`. Returns `None` for anything that
    /// is not a vertex or fragment shader.
    pub fn classify(dir: &Path, file_name: &str) -> Option<Self> {
        let stage = ShaderStage::from_file_name(file_name)?;
        // same rule as Path::file_stem: ".vert" keeps its full name as stem
        let stem = Path::new(file_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(file_name)
            .to_string();

        Some(ShaderSource {
            path: dir.join(file_name),
            file_name: file_name.to_string(),
            stem,
            stage,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn stem(&self) -> &str {
        &self.stem
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    /// `<stem>.<stage>.spv`
    pub fn artifact_name(&self) -> String {
        format!("{}.{}.spv", self.stem, self.stage.extension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_from_file_name() {
        assert_eq!(
            ShaderStage::from_file_name("basic.vert"),
            Some(ShaderStage::Vertex)
        );
        assert_eq!(
            ShaderStage::from_file_name("basic.frag"),
            Some(ShaderStage::Fragment)
        );
        assert_eq!(ShaderStage::from_file_name("basic.glsl"), None);
        assert_eq!(ShaderStage::from_file_name("notes.txt"), None);
        assert_eq!(ShaderStage::from_file_name("basic.VERT"), None);
        assert_eq!(ShaderStage::from_file_name("basicvert"), None);
        assert_eq!(ShaderStage::from_file_name("basic.vert.spv"), None);
    }

    #[test]
    fn test_classify() {
        let dir = Path::new("assets/shaders");
        let shader = ShaderSource::classify(dir, "basic.vert").unwrap();
        assert_eq!(shader.path(), Path::new("assets/shaders/basic.vert"));
        assert_eq!(shader.file_name(), "basic.vert");
        assert_eq!(shader.stem(), "basic");
        assert_eq!(shader.stage(), ShaderStage::Vertex);
        assert_eq!(shader.artifact_name(), "basic.vert.spv");

        assert!(ShaderSource::classify(dir, "readme.txt").is_none());
    }

    #[test]
    fn test_classify_strips_last_extension_only() {
        let dir = Path::new(".");
        let shader = ShaderSource::classify(dir, "sky.box.frag").unwrap();
        assert_eq!(shader.stem(), "sky.box");
        assert_eq!(shader.artifact_name(), "sky.box.frag.spv");
    }

    #[test]
    fn test_classify_dot_file() {
        let shader = ShaderSource::classify(Path::new("."), ".vert").unwrap();
        assert_eq!(shader.stem(), ".vert");
        assert_eq!(shader.artifact_name(), ".vert.vert.spv");
    }
}
