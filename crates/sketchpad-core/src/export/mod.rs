//! Save pipeline: PostScript first, raster conversion when available.

mod postscript;
mod temp;

pub use postscript::{PostScriptError, VectorPage, VectorStroke, parse_document, write_document};
pub use temp::{TEMP_SUFFIX, TempVectorFile, write_replacing};

use crate::notice::Notice;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Output formats offered by the save dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Png,
    PostScript,
}

impl ExportFormat {
    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::PostScript => "ps",
        }
    }

    /// Human-readable name, as shown in dialog filters and notices.
    pub fn label(self) -> &'static str {
        match self {
            ExportFormat::Png => "PNG Image",
            ExportFormat::PostScript => "PostScript",
        }
    }

    pub fn is_raster(self) -> bool {
        matches!(self, ExportFormat::Png)
    }

    /// Format implied by a path's extension. Anything not PostScript is a PNG request.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "ps" | "eps" => ExportFormat::PostScript,
            _ => ExportFormat::Png,
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Errors from a raster conversion backend.
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("Failed to read vector file: {0}")]
    Io(#[from] io::Error),
    #[error("Cannot interpret vector file: {0}")]
    InvalidVector(#[from] PostScriptError),
    #[error("{0}")]
    Backend(String),
}

/// Converts a PostScript file into PNG bytes.
pub trait RasterConverter {
    /// Backend name for logs and notices.
    fn name(&self) -> &str;

    fn convert(&self, vector_path: &Path) -> Result<Vec<u8>, ConversionError>;
}

/// Asks the user where to save. `None` means the dialog was cancelled.
pub trait FileChooser {
    fn choose_save_path(&self) -> Option<PathBuf>;
}

/// Why a PNG request was saved as PostScript instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    ConverterUnavailable,
    ConversionFailed(String),
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::ConverterUnavailable => f.write_str("no raster converter available"),
            FallbackReason::ConversionFailed(msg) => write!(f, "conversion failed: {}", msg),
        }
    }
}

/// What a completed save actually wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The requested file was written in the requested format.
    Succeeded { path: PathBuf, format: ExportFormat },
    /// A PostScript file was written instead of the requested raster image.
    FellBack { path: PathBuf, reason: FallbackReason },
}

impl SaveOutcome {
    /// Path of the file on disk.
    pub fn path(&self) -> &Path {
        match self {
            SaveOutcome::Succeeded { path, .. } | SaveOutcome::FellBack { path, .. } => path,
        }
    }

    /// Format of the file on disk.
    pub fn format(&self) -> ExportFormat {
        match self {
            SaveOutcome::Succeeded { format, .. } => *format,
            SaveOutcome::FellBack { .. } => ExportFormat::PostScript,
        }
    }

    /// Notice naming the written file and its format.
    pub fn notice(&self) -> Notice {
        match self {
            SaveOutcome::Succeeded { path, format } => Notice::info(
                "Saved",
                format!("Saved {} as {}", format.label(), path.display()),
            ),
            SaveOutcome::FellBack { path, reason } => Notice::info(
                "Saved (PostScript)",
                format!(
                    "Raster conversion not available or failed ({}).\n\
                     Saved PostScript: {}\n\
                     You can convert .ps to .png with Ghostscript or other external tools.",
                    reason,
                    path.display()
                ),
            ),
        }
    }
}

/// Filesystem failures while saving.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ExportError {
    fn io(path: &Path, source: io::Error) -> Self {
        ExportError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Notice describing the failure.
    pub fn notice(&self) -> Notice {
        Notice::error("Save failed", self.to_string())
    }
}

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Apply the dialog's default extension to a chosen path.
pub fn resolve_target(requested: PathBuf) -> (PathBuf, ExportFormat) {
    if requested.extension().is_none() {
        let target = requested.with_extension(ExportFormat::Png.extension());
        return (target, ExportFormat::Png);
    }
    let format = ExportFormat::from_path(&requested);
    (requested, format)
}

/// Save a drawing through the interactive pipeline.
///
/// Returns `Ok(None)` when the user cancels the dialog. The page is always
/// written to a `.tmp.ps` side file next to the target first; that file is
/// either deleted after a successful conversion or moved into place as the
/// PostScript fallback, and never left behind on error.
pub fn save_drawing(
    page: &VectorPage,
    chooser: &dyn FileChooser,
    converter: Option<&dyn RasterConverter>,
) -> ExportResult<Option<SaveOutcome>> {
    let Some(requested) = chooser.choose_save_path() else {
        log::info!("Save cancelled");
        return Ok(None);
    };
    let (target, format) = resolve_target(requested);

    let document = write_document(page);
    let temp =
        TempVectorFile::create_for(&target, &document).map_err(|e| ExportError::io(&target, e))?;

    if !format.is_raster() {
        temp.persist(&target).map_err(|e| ExportError::io(&target, e))?;
        log::info!("Saved PostScript to {}", target.display());
        return Ok(Some(SaveOutcome::Succeeded {
            path: target,
            format,
        }));
    }

    let reason = match converter {
        None => FallbackReason::ConverterUnavailable,
        Some(converter) => match converter.convert(temp.path()) {
            Ok(bytes) => {
                write_replacing(&target, &bytes).map_err(|e| ExportError::io(&target, e))?;
                let temp_path = temp.path().to_path_buf();
                if let Err(e) = temp.discard() {
                    log::warn!("Failed to remove {}: {}", temp_path.display(), e);
                }
                log::info!(
                    "Saved {} ({} bytes, via {})",
                    target.display(),
                    bytes.len(),
                    converter.name()
                );
                return Ok(Some(SaveOutcome::Succeeded {
                    path: target,
                    format,
                }));
            }
            Err(e) => {
                log::warn!("{} conversion failed: {}", converter.name(), e);
                FallbackReason::ConversionFailed(e.to_string())
            }
        },
    };

    let fallback = target.with_extension(ExportFormat::PostScript.extension());
    temp.persist(&fallback)
        .map_err(|e| ExportError::io(&fallback, e))?;
    log::warn!(
        "Saved PostScript fallback to {} ({})",
        fallback.display(),
        reason
    );
    Ok(Some(SaveOutcome::FellBack {
        path: fallback,
        reason,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Canvas;
    use crate::input::PointerEvent;
    use crate::shapes::SerializableColor;
    use kurbo::Point;
    use std::cell::Cell;
    use std::fs;
    use tempfile::tempdir;

    struct FixedChooser(Option<PathBuf>);

    impl FileChooser for FixedChooser {
        fn choose_save_path(&self) -> Option<PathBuf> {
            self.0.clone()
        }
    }

    /// Returns fixed bytes and records whether the vector file was readable.
    struct StubConverter {
        saw_vector: Cell<bool>,
    }

    impl StubConverter {
        fn new() -> Self {
            Self {
                saw_vector: Cell::new(false),
            }
        }
    }

    impl RasterConverter for StubConverter {
        fn name(&self) -> &str {
            "stub"
        }

        fn convert(&self, vector_path: &Path) -> Result<Vec<u8>, ConversionError> {
            let source = fs::read_to_string(vector_path)?;
            self.saw_vector.set(source.starts_with("%!PS"));
            Ok(b"\x89PNG stub".to_vec())
        }
    }

    struct BrokenConverter;

    impl RasterConverter for BrokenConverter {
        fn name(&self) -> &str {
            "broken"
        }

        fn convert(&self, _vector_path: &Path) -> Result<Vec<u8>, ConversionError> {
            Err(ConversionError::Backend("ghost in the machine".to_string()))
        }
    }

    fn drawn_canvas() -> Canvas {
        let mut canvas = Canvas::new();
        canvas.choose_color(SerializableColor::rgb(0, 128, 255));
        canvas.handle_pointer_event(PointerEvent::Down {
            position: Point::new(5.0, 5.0),
        });
        canvas.handle_pointer_event(PointerEvent::Move {
            position: Point::new(50.0, 40.0),
        });
        canvas.handle_pointer_event(PointerEvent::Up {
            position: Point::new(50.0, 40.0),
        });
        canvas
    }

    fn file_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_save_with_converter() {
        let dir = tempdir().unwrap();
        let requested = dir.path().join("art.png");
        let converter = StubConverter::new();
        let canvas = drawn_canvas();

        let outcome = save_drawing(
            &canvas.vector_page(),
            &FixedChooser(Some(requested.clone())),
            Some(&converter),
        )
        .unwrap()
        .unwrap();

        assert_eq!(
            outcome,
            SaveOutcome::Succeeded {
                path: requested.clone(),
                format: ExportFormat::Png
            }
        );
        assert!(converter.saw_vector.get());
        assert_eq!(fs::read(&requested).unwrap(), b"\x89PNG stub");
        assert_eq!(file_names(dir.path()), vec!["art.png"]);
    }

    #[test]
    fn test_save_without_converter_falls_back() {
        let dir = tempdir().unwrap();
        let requested = dir.path().join("art.png");
        let canvas = drawn_canvas();

        let outcome = save_drawing(
            &canvas.vector_page(),
            &FixedChooser(Some(requested.clone())),
            None,
        )
        .unwrap()
        .unwrap();

        let expected = dir.path().join("art.ps");
        assert_eq!(outcome.path(), expected.as_path());
        assert_eq!(outcome.format(), ExportFormat::PostScript);
        assert!(matches!(
            outcome,
            SaveOutcome::FellBack {
                reason: FallbackReason::ConverterUnavailable,
                ..
            }
        ));
        assert!(outcome.notice().message.contains(&expected.display().to_string()));
        assert!(fs::read_to_string(&expected).unwrap().starts_with("%!PS"));
        assert_eq!(file_names(dir.path()), vec!["art.ps"]);
    }

    #[test]
    fn test_failed_conversion_falls_back() {
        let dir = tempdir().unwrap();
        let requested = dir.path().join("art.png");
        let canvas = drawn_canvas();

        let outcome = save_drawing(
            &canvas.vector_page(),
            &FixedChooser(Some(requested.clone())),
            Some(&BrokenConverter),
        )
        .unwrap()
        .unwrap();

        match &outcome {
            SaveOutcome::FellBack {
                path,
                reason: FallbackReason::ConversionFailed(msg),
            } => {
                assert_eq!(path, &dir.path().join("art.ps"));
                assert!(msg.contains("ghost in the machine"));
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        assert_eq!(file_names(dir.path()), vec!["art.ps"]);
    }

    #[test]
    fn test_cancelled_dialog_writes_nothing() {
        let dir = tempdir().unwrap();
        let canvas = drawn_canvas();
        let converter = StubConverter::new();

        let outcome =
            save_drawing(&canvas.vector_page(), &FixedChooser(None), Some(&converter)).unwrap();

        assert!(outcome.is_none());
        assert!(file_names(dir.path()).is_empty());
        assert_eq!(canvas.surface.len(), 1);
    }

    #[test]
    fn test_postscript_request_skips_converter() {
        let dir = tempdir().unwrap();
        let requested = dir.path().join("art.ps");
        let converter = StubConverter::new();
        let canvas = drawn_canvas();

        let outcome = save_drawing(
            &canvas.vector_page(),
            &FixedChooser(Some(requested.clone())),
            Some(&converter),
        )
        .unwrap()
        .unwrap();

        assert_eq!(
            outcome,
            SaveOutcome::Succeeded {
                path: requested.clone(),
                format: ExportFormat::PostScript
            }
        );
        assert!(!converter.saw_vector.get());
        assert_eq!(file_names(dir.path()), vec!["art.ps"]);
    }

    #[test]
    fn test_missing_extension_defaults_to_png() {
        let dir = tempdir().unwrap();
        let converter = StubConverter::new();
        let canvas = drawn_canvas();

        let outcome = save_drawing(
            &canvas.vector_page(),
            &FixedChooser(Some(dir.path().join("art"))),
            Some(&converter),
        )
        .unwrap()
        .unwrap();

        assert_eq!(outcome.path(), dir.path().join("art.png").as_path());
        assert_eq!(file_names(dir.path()), vec!["art.png"]);
    }

    #[test]
    fn test_unwritable_directory_reports_error() {
        let dir = tempdir().unwrap();
        let requested = dir.path().join("missing").join("art.png");
        let canvas = drawn_canvas();

        let err = save_drawing(
            &canvas.vector_page(),
            &FixedChooser(Some(requested)),
            None,
        )
        .unwrap_err();

        let ExportError::Io { path, .. } = &err;
        assert!(path.ends_with("art.png"));
        assert_eq!(err.notice().title, "Save failed");
        assert_eq!(canvas.surface.len(), 1);
        assert!(file_names(dir.path()).is_empty());
    }

    #[test]
    fn test_failed_raster_write_leaves_no_partial_file() {
        let dir = tempdir().unwrap();
        let requested = dir.path().join("art.png");
        fs::create_dir(&requested).unwrap();
        let canvas = drawn_canvas();

        let err = save_drawing(
            &canvas.vector_page(),
            &FixedChooser(Some(requested.clone())),
            Some(&StubConverter::new()),
        )
        .unwrap_err();

        let ExportError::Io { path, .. } = &err;
        assert_eq!(path, &requested);
        assert!(requested.is_dir());
        assert_eq!(file_names(dir.path()), vec!["art.png"]);
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(ExportFormat::from_path(Path::new("a.PS")), ExportFormat::PostScript);
        assert_eq!(ExportFormat::from_path(Path::new("a.eps")), ExportFormat::PostScript);
        assert_eq!(ExportFormat::from_path(Path::new("a.png")), ExportFormat::Png);
        assert_eq!(ExportFormat::from_path(Path::new("a.bmp")), ExportFormat::Png);
    }
}
