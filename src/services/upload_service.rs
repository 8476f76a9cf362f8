use std::fs;
use std::path::PathBuf;

use uuid::Uuid;

// Gestion des images uploadées (icônes d'émotions, illustrations d'infos).
// Les fichiers sont écrits sous <base_dir>/uploads/<subdir>/ et référencés
// en base par leur chemin public "/uploads/<subdir>/<nom>".
pub struct UploadService;

impl UploadService {
    /// Écrit une image uploadée sous un nom unique et retourne son chemin
    /// public. Le nom est construit comme "<prefix>_<uuid>.<ext>", l'extension
    /// étant reprise du nom de fichier d'origine.
    pub fn save_image(
        base_dir: &str,
        subdir: &str,
        prefix: &str,
        original_filename: &str,
        data: &[u8],
    ) -> std::io::Result<String> {
        let upload_dir = PathBuf::from(base_dir).join("uploads").join(subdir);
        fs::create_dir_all(&upload_dir)?;

        let filename = format!(
            "{}_{}.{}",
            prefix,
            Uuid::new_v4().simple(),
            Self::extension_of(original_filename)
        );
        fs::write(upload_dir.join(&filename), data)?;

        Ok(format!("/uploads/{}/{}", subdir, filename))
    }

    /// Supprime le fichier correspondant à un chemin public. Un échec est
    /// seulement journalisé : l'entité reste cohérente même si le fichier
    /// a déjà disparu du disque.
    pub fn delete_image(base_dir: &str, public_path: &str) {
        let relative = match public_path.strip_prefix("/uploads/") {
            Some(r) if !r.contains("..") => r,
            // Chemin hors du répertoire d'uploads : on ne touche à rien
            _ => return,
        };

        let physical = PathBuf::from(base_dir).join("uploads").join(relative);
        if let Err(e) = fs::remove_file(&physical) {
            tracing::warn!("Suppression impossible de {}: {}", physical.display(), e);
        }
    }

    /// Extension en minuscules du nom de fichier d'origine, "bin" à défaut
    fn extension_of(filename: &str) -> String {
        filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .filter(|ext| !ext.is_empty() && ext.len() <= 8 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
            .unwrap_or_else(|| "bin".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_base_dir(name: &str) -> String {
        let dir = std::env::temp_dir().join(format!("cesizen-test-{}-{}", name, std::process::id()));
        dir.to_string_lossy().to_string()
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(UploadService::extension_of("photo.PNG"), "png");
        assert_eq!(UploadService::extension_of("archive.tar.gz"), "gz");
        assert_eq!(UploadService::extension_of("sans-extension"), "bin");
        assert_eq!(UploadService::extension_of("bizarre."), "bin");
        assert_eq!(UploadService::extension_of("traversee.png/../x"), "bin");
    }

    #[test]
    fn test_save_then_delete_image() {
        let base = temp_base_dir("save");

        let public_path =
            UploadService::save_image(&base, "emotions", "emotion", "joie.png", b"fake-png")
                .unwrap();

        assert!(public_path.starts_with("/uploads/emotions/emotion_"));
        assert!(public_path.ends_with(".png"));

        let physical = PathBuf::from(&base).join(public_path.trim_start_matches('/'));
        assert_eq!(fs::read(&physical).unwrap(), b"fake-png");

        UploadService::delete_image(&base, &public_path);
        assert!(!physical.exists());

        fs::remove_dir_all(&base).ok();
    }

    #[test]
    fn test_unique_filenames() {
        let base = temp_base_dir("unique");

        let a = UploadService::save_image(&base, "infos", "info", "img.jpg", b"a").unwrap();
        let b = UploadService::save_image(&base, "infos", "info", "img.jpg", b"b").unwrap();
        assert_ne!(a, b);

        fs::remove_dir_all(&base).ok();
    }

    #[test]
    fn test_delete_ignores_paths_outside_uploads() {
        // Ni panique ni suppression pour un chemin hors /uploads/
        UploadService::delete_image("/tmp", "/etc/passwd");
        UploadService::delete_image("/tmp", "/uploads/../../etc/passwd");
    }
}
