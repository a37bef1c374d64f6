use once_cell::sync::OnceCell;
use plotters::style::{register_font, FontStyle};
use std::path::{Path, PathBuf};

pub const FAMILY: &str = "sans-serif";

const SYSTEM_FONTS: [&str; 6] = [
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

static REGISTERED: OnceCell<Option<PathBuf>> = OnceCell::new();

/// Registers the first usable TrueType font for chart text. Only the first
/// call searches; later calls return the same answer.
pub fn prepare(configured: Option<&Path>) -> Option<&'static Path> {
    REGISTERED
        .get_or_init(|| {
            if let Some(path) = configured {
                if register(path) {
                    log::debug!("chart text uses {}", path.display());
                    return Some(path.to_path_buf());
                }
                log::warn!("font {} could not be loaded, searching system fonts", path.display());
            }
            for candidate in SYSTEM_FONTS.iter().map(PathBuf::from) {
                if register(&candidate) {
                    log::debug!("chart text uses {}", candidate.display());
                    return Some(candidate);
                }
            }
            log::warn!("no usable font found, charts are drawn without text");
            None
        })
        .as_deref()
}

pub(crate) fn register(path: &Path) -> bool {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(_) => return false,
    };
    let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
    match register_font(FAMILY, FontStyle::Normal, bytes) {
        Ok(()) => true,
        Err(_) => {
            log::warn!("{} is not a usable TrueType font", path.display());
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::font::register;
    use std::path::Path;

    #[test]
    fn test_register_missing_file() {
        assert!(!register(Path::new("test_resources/missing.ttf")));
    }

    #[test]
    fn test_register_bundled_font() {
        assert!(register(Path::new("test_resources/fonts/DejaVuSans.ttf")));
    }

    #[test]
    fn test_register_rejects_non_font() {
        assert!(!register(Path::new("test_resources/valid/measurements-log.json")));
    }
}
