//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use actix_web::cookie::{Key, SameSite};

use crate::outbound::whatsapp::TwilioConfig;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) twilio: Option<TwilioConfig>,
}

impl ServerConfig {
    /// Construct a server configuration using application preferences.
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            twilio: None,
        }
    }

    /// Attach Twilio credentials for server-side WhatsApp confirmations.
    ///
    /// Without them the server responds 501 on the WhatsApp endpoint and
    /// clients send the prepared message themselves.
    #[must_use]
    pub fn with_twilio(mut self, twilio: Option<TwilioConfig>) -> Self {
        self.twilio = twilio;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
