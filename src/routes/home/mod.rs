use actix_files::NamedFile;
use actix_web::{web, HttpResponse};

use crate::startup::SiteSettings;

/// Describes the service and the endpoints it exposes
pub async fn home() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "API Salita'a Cosmetic funcionando!",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "POST /contato": "Enviar mensagem de contato"
        }
    }))
}

/// The site icon is stored as a JPEG, its content type is guessed from the file name
pub async fn favicon(site: web::Data<SiteSettings>) -> actix_web::Result<NamedFile> {
    Ok(NamedFile::open_async(&site.favicon).await?)
}
