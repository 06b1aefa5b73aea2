//! # notice-backend
//!
//! Pluggable delivery media for notices. A [`backend::DeliveryBackend`]
//! takes one rendered notice to one user: the website backend stores it in
//! the inbox, the email backend hands it to a [`transport::MailTransport`].

pub mod backend;
pub mod email;
pub mod registry;
pub mod templates;
pub mod transport;
pub mod website;

pub use backend::{Delivery, DeliveryBackend, DeliveryReceipt};
pub use registry::BackendRegistry;
pub use templates::TemplateRenderer;
