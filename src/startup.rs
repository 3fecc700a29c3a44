use std::net::TcpListener;
use std::sync::Arc;
use actix_cors::Cors;
use actix_files::Files;
use actix_web::dev::Server;
use actix_web::{web, App, HttpServer};
use tracing_actix_web::TracingLogger;

use crate::configuration::Settings;
use crate::email_client::{select_email_sender, EmailSender};
use crate::routes::{contact, favicon, home, ContactSettings, CONTACT_BODY_LIMIT};

/// Where the static site lives on disk
#[derive(Debug, Clone)]
pub struct SiteSettings {
    pub static_dir: String,
    pub favicon: String,
}

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    pub async fn build(configuration: Settings) -> Result<Self, anyhow::Error> {
        let email_sender = select_email_sender(&configuration.email_client)?;

        let contact_settings = ContactSettings {
            recipient: configuration.email_client.recipient(),
            demo_mode: configuration.application.demo_mode,
        };
        let site_settings = SiteSettings {
            static_dir: configuration.application.static_dir.clone(),
            favicon: configuration.application.favicon.clone(),
        };

        let address = format!(
            "{}:{}",
            configuration.application.host, configuration.application.port
        );
        let listener = TcpListener::bind(address)?;
        // The OS picks the port when `0` is configured
        let port = listener.local_addr()?.port();

        tracing::info!(
            port,
            transport = %email_sender.transport(),
            recipient = %contact_settings.recipient,
            demo_mode = contact_settings.demo_mode,
            "Contact relay is listening"
        );
        if contact_settings.recipient.is_empty() {
            tracing::warn!("No recipient is configured, contact emails will fail to send");
        }

        let server = run(listener, email_sender, contact_settings, site_settings)?;
        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    // A more expressive name that makes it clear that
    // this function only returns when the application is stopped.
    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn run(
    listener: TcpListener,
    email_sender: Arc<dyn EmailSender>,
    contact_settings: ContactSettings,
    site_settings: SiteSettings,
) -> Result<Server, std::io::Error> {
    // `web::Data` wraps its content in an `Arc`, every worker shares the same sender
    let email_sender: web::Data<dyn EmailSender> = web::Data::from(email_sender);
    let contact_settings = web::Data::new(contact_settings);
    let site_settings = web::Data::new(site_settings);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(Cors::permissive())
            .route("/", web::get().to(home))
            .route("/favicon.ico", web::get().to(favicon))
            .service(
                web::resource("/contato")
                    .app_data(web::PayloadConfig::new(CONTACT_BODY_LIMIT))
                    .route(web::post().to(contact)),
            )
            // Registered last, every path not matched above is looked up on disk
            .service(Files::new("/", &site_settings.static_dir))
            .app_data(email_sender.clone())
            .app_data(contact_settings.clone())
            .app_data(site_settings.clone())
    })
        .listen(listener)?
        .run();
    // No .await here
    Ok(server)
}
