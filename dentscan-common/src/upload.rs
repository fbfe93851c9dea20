//! Upload filename rules
//!
//! Pure checks applied to a client-supplied filename before anything is
//! written to disk.

use unicode_normalization::UnicodeNormalization;

/// Extensions accepted for upload (compared lowercase)
pub const ALLOWED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "gif"];

/// True if the text after the last `.` is an allowed image extension
pub fn allowed_file(filename: &str) -> bool {
    match filename.rsplit_once('.') {
        Some((_, ext)) => {
            let ext = ext.to_ascii_lowercase();
            ALLOWED_EXTENSIONS.contains(&ext.as_str())
        }
        None => false,
    }
}

/// Reduce a client-supplied filename to a safe single path component
///
/// Keeps the final component only, folds accented letters to ASCII via NFKD,
/// maps whitespace to `_`, drops anything outside `[A-Za-z0-9._-]` and trims
/// leading/trailing `.` and `_`.
/// The result may be empty.
pub fn secure_filename(filename: &str) -> String {
    let last = filename
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or_default();

    let cleaned: String = last
        .nfkd()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect();

    cleaned.trim_matches(|c| c == '.' || c == '_').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allowed_extensions_are_case_insensitive() {
        assert!(allowed_file("molar.png"));
        assert!(allowed_file("molar.JPG"));
        assert!(allowed_file("archive.tar.jpeg"));
        assert!(allowed_file("anim.Gif"));
    }

    #[test]
    fn rejects_other_or_missing_extensions() {
        assert!(!allowed_file("scan.bmp"));
        assert!(!allowed_file("png"));
        assert!(!allowed_file("photo.png.exe"));
        assert!(!allowed_file("trailing."));
    }

    #[test]
    fn secure_filename_strips_directories() {
        assert_eq!(secure_filename("../../etc/passwd"), "passwd");
        assert_eq!(secure_filename("C:\\Users\\me\\tooth 1.png"), "tooth_1.png");
    }

    #[test]
    fn secure_filename_drops_unsafe_characters() {
        assert_eq!(secure_filename("my résumé (1).jpg"), "my_resume_1.jpg");
        assert_eq!(secure_filename(".hidden.png"), "hidden.png");
        assert_eq!(secure_filename("..."), "");
    }

    #[test]
    fn secure_filename_folds_to_ascii() {
        assert_eq!(secure_filename("Zahn_Ärztin.png"), "Zahn_Arztin.png");
        assert_eq!(secure_filename("ﬁle.png"), "file.png");
        // No ASCII decomposition: dropped
        assert_eq!(secure_filename("牙齿.png"), "png");
    }
}
