//! Raster converters and their startup detection.

use sketchpad_core::config::{RasterBackend, RasterConfig};
use sketchpad_core::export::{ConversionError, RasterConverter};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

/// Rasterizes the PostScript subset written by the save pipeline, in process.
#[cfg(feature = "builtin-raster")]
#[derive(Debug, Clone, Default)]
pub struct BuiltinConverter {
    options: crate::renderer::RasterOptions,
}

#[cfg(feature = "builtin-raster")]
impl BuiltinConverter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: crate::renderer::RasterOptions) -> Self {
        Self { options }
    }
}

#[cfg(feature = "builtin-raster")]
impl RasterConverter for BuiltinConverter {
    fn name(&self) -> &str {
        "built-in rasterizer"
    }

    fn convert(&self, vector_path: &Path) -> Result<Vec<u8>, ConversionError> {
        let source = std::fs::read_to_string(vector_path)?;
        let page = sketchpad_core::export::parse_document(&source)?;
        let pixmap = crate::renderer::rasterize(&page, self.options)
            .map_err(|e| ConversionError::Backend(e.to_string()))?;
        crate::encode::encode_png(&pixmap).map_err(|e| ConversionError::Backend(e.to_string()))
    }
}

/// Converts through an installed Ghostscript executable.
#[derive(Debug, Clone)]
pub struct GhostscriptConverter {
    program: PathBuf,
    version: String,
}

impl GhostscriptConverter {
    /// Default executable name looked up on the PATH.
    pub const DEFAULT_PROGRAM: &'static str = "gs";

    /// Probe for Ghostscript by running `<program> --version`.
    pub fn detect(program: Option<&Path>) -> Option<Self> {
        let program = program
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(Self::DEFAULT_PROGRAM));

        let output = match Command::new(&program)
            .arg("--version")
            .stdin(Stdio::null())
            .output()
        {
            Ok(output) => output,
            Err(e) => {
                log::debug!("Ghostscript not found at {}: {}", program.display(), e);
                return None;
            }
        };
        if !output.status.success() {
            log::debug!("{} --version exited with {}", program.display(), output.status);
            return None;
        }

        let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
        log::info!("Found Ghostscript {} at {}", version, program.display());
        Some(Self { program, version })
    }

    pub fn version(&self) -> &str {
        &self.version
    }
}

impl RasterConverter for GhostscriptConverter {
    fn name(&self) -> &str {
        "Ghostscript"
    }

    fn convert(&self, vector_path: &Path) -> Result<Vec<u8>, ConversionError> {
        let output = Command::new(&self.program)
            .args([
                "-q",
                "-dSAFER",
                "-dBATCH",
                "-dNOPAUSE",
                "-dEPSCrop",
                "-sDEVICE=png16m",
                "-r72",
                "-sOutputFile=-",
            ])
            .arg(vector_path)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                ConversionError::Backend(format!("failed to run {}: {}", self.program.display(), e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ConversionError::Backend(format!(
                "Ghostscript exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        if !output.stdout.starts_with(PNG_SIGNATURE) {
            return Err(ConversionError::Backend(
                "Ghostscript produced no PNG output".to_string(),
            ));
        }
        Ok(output.stdout)
    }
}

#[cfg(feature = "builtin-raster")]
fn builtin() -> Option<Box<dyn RasterConverter>> {
    Some(Box::new(BuiltinConverter::new()))
}

#[cfg(not(feature = "builtin-raster"))]
fn builtin() -> Option<Box<dyn RasterConverter>> {
    log::warn!("Built-in rasterizer not compiled in (feature `builtin-raster`)");
    None
}

fn ghostscript(config: &RasterConfig) -> Option<Box<dyn RasterConverter>> {
    GhostscriptConverter::detect(config.ghostscript_path.as_deref())
        .map(|gs| Box::new(gs) as Box<dyn RasterConverter>)
}

/// Pick the raster converter for this run according to the configured backend.
///
/// `None` means PNG requests will be saved as PostScript.
pub fn detect_converter(config: &RasterConfig) -> Option<Box<dyn RasterConverter>> {
    let converter = match config.backend {
        RasterBackend::Disabled => None,
        RasterBackend::Builtin => builtin(),
        RasterBackend::Ghostscript => ghostscript(config),
        RasterBackend::Auto => builtin().or_else(|| ghostscript(config)),
    };
    match &converter {
        Some(c) => log::info!("Raster conversion via {}", c.name()),
        None => log::warn!("No raster converter available; PNG saves fall back to PostScript"),
    }
    converter
}
