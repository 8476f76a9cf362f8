// Extraction uniforme du corps des requêtes : plusieurs endpoints
// acceptent indifféremment application/json et multipart/form-data
// (les uploads d'images n'arrivent qu'en multipart).
use actix_multipart::Multipart;
use actix_web::{HttpRequest, web};
use futures::StreamExt;
use std::collections::HashMap;

/// Fichier reçu dans un champ multipart
pub struct UploadedFile {
    pub filename: String,
    pub data: Vec<u8>,
}

/// Corps de requête normalisé : champs simples + fichiers uploadés
#[derive(Default)]
pub struct FormData {
    fields: HashMap<String, serde_json::Value>,
    files: HashMap<String, UploadedFile>,
}

impl FormData {
    /// Valeur texte non vide
    pub fn string(&self, name: &str) -> Option<String> {
        self.fields
            .get(name)
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .map(String::from)
    }

    /// Valeur entière, acceptée en nombre JSON ou en chaîne (multipart)
    pub fn int(&self, name: &str) -> Option<i32> {
        let value = self.fields.get(name)?;
        if let Some(n) = value.as_i64() {
            return i32::try_from(n).ok();
        }
        value.as_str()?.parse().ok()
    }

    /// Valeur booléenne, acceptée en bool JSON ou en chaîne "true"/"1"
    pub fn bool(&self, name: &str) -> Option<bool> {
        let value = self.fields.get(name)?;
        if let Some(b) = value.as_bool() {
            return Some(b);
        }
        match value.as_str()? {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        }
    }

    pub fn file(&self, name: &str) -> Option<&UploadedFile> {
        self.files.get(name)
    }

    fn from_json(value: serde_json::Value) -> FormData {
        let fields = match value {
            serde_json::Value::Object(map) => map.into_iter().collect(),
            _ => HashMap::new(),
        };
        FormData {
            fields,
            files: HashMap::new(),
        }
    }
}

/// Lit le corps de la requête et le normalise en FormData.
/// Un corps JSON invalide ou vide donne un FormData vide, les champs
/// manquants sont ensuite signalés par les validations métier.
pub async fn extract_form_data(
    req: &HttpRequest,
    mut payload: web::Payload,
) -> Result<FormData, String> {
    let content_type = req
        .headers()
        .get("Content-Type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if content_type.starts_with("multipart/form-data") {
        let mut multipart = Multipart::new(req.headers(), payload);
        let mut form = FormData::default();

        while let Some(item) = multipart.next().await {
            let mut field = item.map_err(|e| format!("Multipart invalide: {}", e))?;
            let name = field.name().to_string();
            let filename = field
                .content_disposition()
                .get_filename()
                .map(String::from);

            let mut data = Vec::new();
            while let Some(chunk) = field.next().await {
                let chunk = chunk.map_err(|e| format!("Multipart invalide: {}", e))?;
                data.extend_from_slice(&chunk);
            }

            match filename {
                Some(filename) => {
                    form.files.insert(name, UploadedFile { filename, data });
                }
                None => {
                    let value = String::from_utf8_lossy(&data).to_string();
                    form.fields.insert(name, serde_json::Value::String(value));
                }
            }
        }

        Ok(form)
    } else {
        let mut body = Vec::new();
        while let Some(chunk) = payload.next().await {
            let chunk = chunk.map_err(|e| format!("Corps de requête illisible: {}", e))?;
            body.extend_from_slice(&chunk);
        }

        let value = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
        Ok(FormData::from_json(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_fields() {
        let form = FormData::from_json(serde_json::json!({
            "nom": "Joie",
            "categorie": 3,
            "actif": true,
            "commentaire": null,
        }));

        assert_eq!(form.string("nom").as_deref(), Some("Joie"));
        assert_eq!(form.int("categorie"), Some(3));
        assert_eq!(form.bool("actif"), Some(true));
        assert!(form.string("commentaire").is_none()); // null = absent
        assert!(form.string("inconnu").is_none());
        assert!(form.file("icone").is_none());
    }

    #[test]
    fn test_multipart_strings_are_coerced() {
        // En multipart, tout arrive en chaîne
        let form = FormData::from_json(serde_json::json!({
            "categorie": "3",
            "actif": "false",
        }));

        assert_eq!(form.int("categorie"), Some(3));
        assert_eq!(form.bool("actif"), Some(false));
    }

    #[test]
    fn test_invalid_json_gives_empty_form() {
        let form = FormData::from_json(serde_json::Value::Null);
        assert!(form.string("nom").is_none());
        assert!(form.int("categorie").is_none());
    }

    #[test]
    fn test_empty_string_is_missing() {
        let form = FormData::from_json(serde_json::json!({ "nom": "" }));
        assert!(form.string("nom").is_none());
    }
}
