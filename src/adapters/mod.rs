// Adapters layer: concrete implementations for external systems (http, filesystem, smtp).

pub mod fetcher;
pub mod mailer;
pub mod site_lists;
pub mod snapshot_store;
