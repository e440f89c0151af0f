//! Alert and status line components.

use maud::{html, Markup, Render};

use crate::publish::PublishStatus;

/// Alert variant types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertVariant {
    Success,
    Error,
    Info,
}

impl AlertVariant {
    #[must_use]
    pub const fn css_class(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
        }
    }
}

/// A one-line alert message.
#[derive(Debug, Clone)]
pub struct Alert<'a> {
    pub variant: AlertVariant,
    pub message: &'a str,
}

impl<'a> Alert<'a> {
    #[must_use]
    pub const fn new(variant: AlertVariant, message: &'a str) -> Self {
        Self { variant, message }
    }

    #[must_use]
    pub const fn success(message: &'a str) -> Self {
        Self::new(AlertVariant::Success, message)
    }

    #[must_use]
    pub const fn error(message: &'a str) -> Self {
        Self::new(AlertVariant::Error, message)
    }

    #[must_use]
    pub const fn info(message: &'a str) -> Self {
        Self::new(AlertVariant::Info, message)
    }
}

impl Render for Alert<'_> {
    fn render(&self) -> Markup {
        html! {
            p class={ "status-line " (self.variant.css_class()) } role="status" {
                (self.message)
            }
        }
    }
}

/// Status line for the most recent publish attempt.
#[derive(Debug, Clone, Copy)]
pub struct PublishStatusLine<'a> {
    pub status: &'a PublishStatus,
}

impl<'a> PublishStatusLine<'a> {
    #[must_use]
    pub const fn new(status: &'a PublishStatus) -> Self {
        Self { status }
    }
}

impl Render for PublishStatusLine<'_> {
    fn render(&self) -> Markup {
        let Some(message) = self.status.message() else {
            return html! {};
        };

        let alert = match self.status {
            PublishStatus::Succeeded { .. } => Alert::success(message),
            PublishStatus::Failed { .. } => Alert::error(message),
            PublishStatus::Idle | PublishStatus::InProgress => Alert::info(message),
        };
        alert.render()
    }
}
