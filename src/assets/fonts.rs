use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;

use crate::foundation::error::{ReelError, ReelResult};

/// Which font the element renderer should use.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontSpec {
    /// Probe well-known sans-serif files, then the system font database.
    #[default]
    Auto,
    /// The embedded 5x7 bitmap font.
    Builtin,
    /// A specific TrueType/OpenType file.
    Path(PathBuf),
}

/// Outline font bytes ready for shaping and rasterization.
#[derive(Clone, Debug)]
pub struct OutlineFont {
    /// Raw font file bytes.
    pub bytes: Arc<Vec<u8>>,
    /// Face index inside a collection file.
    pub index: u32,
    /// Where the font came from, for logs.
    pub origin: String,
}

/// Result of font resolution.
#[derive(Clone, Debug)]
pub enum ResolvedFont {
    /// An outline font shaped with parley and drawn with vello_cpu.
    Outline(OutlineFont),
    /// The embedded bitmap font.
    Builtin,
}

/// File names probed, in order, when resolving [`FontSpec::Auto`].
pub const PROBE_FONT_FILES: &[&str] = &[
    "Arial.ttf",
    "DejaVuSans.ttf",
    "FreeSans.ttf",
    "LiberationSans-Regular.ttf",
    "Helvetica.ttf",
    "Verdana.ttf",
    "Tahoma.ttf",
    "Segoe UI.ttf",
];

const MAX_PROBE_DEPTH: usize = 4;

/// Capability probe for a usable font, run once per render job.
#[derive(Clone, Debug)]
pub struct FontResolver {
    search_dirs: Vec<PathBuf>,
    use_system_db: bool,
}

impl FontResolver {
    /// Resolver over the platform font directories plus the system font database.
    pub fn system() -> Self {
        let mut dirs = vec![
            PathBuf::from("/usr/share/fonts"),
            PathBuf::from("/usr/local/share/fonts"),
            PathBuf::from("/Library/Fonts"),
            PathBuf::from("/System/Library/Fonts"),
            PathBuf::from("C:\\Windows\\Fonts"),
        ];
        if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
            dirs.push(home.join(".fonts"));
            dirs.push(home.join(".local/share/fonts"));
            dirs.push(home.join("Library/Fonts"));
        }
        Self {
            search_dirs: dirs,
            use_system_db: true,
        }
    }

    /// Resolver that only probes `dirs`, without the system font database.
    pub fn with_dirs(dirs: Vec<PathBuf>) -> Self {
        Self {
            search_dirs: dirs,
            use_system_db: false,
        }
    }

    /// Resolve `spec` to a font. Failure to find any outline font for `Auto` or `Path` is fatal.
    pub fn resolve(&self, spec: &FontSpec) -> ReelResult<ResolvedFont> {
        match spec {
            FontSpec::Builtin => {
                tracing::info!("using embedded bitmap font");
                Ok(ResolvedFont::Builtin)
            }
            FontSpec::Path(path) => {
                let font = load_font_file(path).map_err(|e| {
                    ReelError::config(format!("font '{}' is unusable: {e}", path.display()))
                })?;
                tracing::info!(origin = %font.origin, "using configured font");
                Ok(ResolvedFont::Outline(font))
            }
            FontSpec::Auto => {
                if let Some(path) = self.probe_files() {
                    match load_font_file(&path) {
                        Ok(font) => {
                            tracing::info!(origin = %font.origin, "using probed font");
                            return Ok(ResolvedFont::Outline(font));
                        }
                        Err(e) => {
                            tracing::warn!(path = %path.display(), error = %e, "probed font unreadable");
                        }
                    }
                }
                if self.use_system_db
                    && let Some(font) = query_system_db()
                {
                    tracing::info!(origin = %font.origin, "using system font database");
                    return Ok(ResolvedFont::Outline(font));
                }
                Err(ReelError::config(format!(
                    "no usable font found (probed {}); pass a font path or use the builtin font",
                    PROBE_FONT_FILES.join(", ")
                )))
            }
        }
    }

    fn probe_files(&self) -> Option<PathBuf> {
        for name in PROBE_FONT_FILES {
            for dir in &self.search_dirs {
                if let Some(found) = find_file(dir, name, MAX_PROBE_DEPTH) {
                    return Some(found);
                }
            }
        }
        None
    }
}

fn find_file(dir: &Path, name: &str, depth: usize) -> Option<PathBuf> {
    let direct = dir.join(name);
    if direct.is_file() {
        return Some(direct);
    }
    if depth == 0 {
        return None;
    }
    let mut subdirs = std::fs::read_dir(dir)
        .ok()?
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| p.is_dir())
        .collect::<Vec<_>>();
    subdirs.sort();
    subdirs
        .iter()
        .find_map(|sub| find_file(sub, name, depth - 1))
}

fn load_font_file(path: &Path) -> ReelResult<OutlineFont> {
    let bytes = std::fs::read(path).with_context(|| format!("read font '{}'", path.display()))?;
    if bytes.len() < 12 {
        return Err(ReelError::config(format!(
            "font file '{}' is too small to be a font",
            path.display()
        )));
    }
    Ok(OutlineFont {
        bytes: Arc::new(bytes),
        index: 0,
        origin: path.display().to_string(),
    })
}

fn query_system_db() -> Option<OutlineFont> {
    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();
    let query = usvg::fontdb::Query {
        families: &[usvg::fontdb::Family::SansSerif],
        weight: usvg::fontdb::Weight::NORMAL,
        stretch: usvg::fontdb::Stretch::Normal,
        style: usvg::fontdb::Style::Normal,
    };
    let id = db.query(&query).or_else(|| db.faces().next().map(|f| f.id))?;
    let family = db
        .face(id)
        .and_then(|f| f.families.first().map(|(name, _)| name.clone()))
        .unwrap_or_else(|| "unknown".to_string());
    db.with_face_data(id, |data, index| OutlineFont {
        bytes: Arc::new(data.to_vec()),
        index,
        origin: format!("system:{family}"),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;
