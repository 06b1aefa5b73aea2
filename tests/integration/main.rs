//! Integration tests driving the HTTP router against the memory store.

mod helpers;

mod inbox_test;
mod observation_test;
mod service_api_test;
mod settings_test;
mod unsubscribe_test;
