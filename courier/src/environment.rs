use std::sync::Arc;

use courier_api_rest::RestServerConfig;
use courier_config::Config;
use courier_core_contact_impl::{ContactServiceConfig, ContactServiceImpl};
use courier_email_impl::EmailServiceImpl;

// API
pub type RestServer = courier_api_rest::RestServer<ContactFeature>;

// Email
pub type Email = EmailServiceImpl;

// Core
pub type ContactFeature = ContactServiceImpl<Email>;

/// Wire up the services behind the REST server.
pub fn rest_server(config: &Config, email: Email) -> RestServer {
    let contact_service_config = ContactServiceConfig {
        recipient: Arc::new(config.contact.recipient.clone().into()),
    };
    let contact = ContactServiceImpl::new(email, contact_service_config);

    let rest_server_config = RestServerConfig {
        allowed_origins: config.http.allowed_origins.clone().into(),
    };

    RestServer::new(contact, rest_server_config)
}
