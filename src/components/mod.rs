//! Maud HTML components for the web UI.
//!
//! - `layout`: Base page layout and navigation
//! - `badge`: Article badges and tag filter chips
//! - `alert`: Status messages
//! - `form`: Form elements

pub mod alert;
pub mod badge;
pub mod form;
pub mod layout;

pub use alert::{Alert, AlertVariant, PublishStatusLine};
pub use badge::{BadgeLabel, TagChipLink};
pub use form::{Field, Input, Select, TextArea};
pub use layout::BaseLayout;
