//! Form components for maud templates.

use maud::{html, Markup, Render};

/// An input element.
#[derive(Debug, Clone)]
pub struct Input<'a> {
    /// Input name attribute
    pub name: &'a str,
    /// Input type ("text", "password", "date", "color", ...)
    pub r#type: &'a str,
    /// Current value
    pub value: Option<&'a str>,
    /// Placeholder text
    pub placeholder: Option<&'a str>,
    /// Whether the field is required
    pub required: bool,
    /// Autocomplete attribute
    pub autocomplete: Option<&'a str>,
}

impl<'a> Input<'a> {
    #[must_use]
    pub fn new(name: &'a str, r#type: &'a str) -> Self {
        Self {
            name,
            r#type,
            value: None,
            placeholder: None,
            required: false,
            autocomplete: None,
        }
    }

    #[must_use]
    pub fn text(name: &'a str) -> Self {
        Self::new(name, "text")
    }

    #[must_use]
    pub fn password(name: &'a str) -> Self {
        Self::new(name, "password")
    }

    #[must_use]
    pub fn value(mut self, value: &'a str) -> Self {
        self.value = Some(value);
        self
    }

    #[must_use]
    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn autocomplete(mut self, autocomplete: &'a str) -> Self {
        self.autocomplete = Some(autocomplete);
        self
    }
}

impl Render for Input<'_> {
    fn render(&self) -> Markup {
        html! {
            input
                type=(self.r#type)
                name=(self.name)
                id=(self.name)
                value=[self.value]
                placeholder=[self.placeholder]
                required[self.required]
                autocomplete=[self.autocomplete];
        }
    }
}

/// A textarea element.
#[derive(Debug, Clone)]
pub struct TextArea<'a> {
    pub name: &'a str,
    pub value: &'a str,
    pub rows: u32,
}

impl<'a> TextArea<'a> {
    #[must_use]
    pub fn new(name: &'a str, value: &'a str) -> Self {
        Self {
            name,
            value,
            rows: 4,
        }
    }

    #[must_use]
    pub fn rows(mut self, rows: u32) -> Self {
        self.rows = rows;
        self
    }
}

impl Render for TextArea<'_> {
    fn render(&self) -> Markup {
        html! {
            textarea name=(self.name) id=(self.name) rows=(self.rows) { (self.value) }
        }
    }
}

/// A select element.
#[derive(Debug, Clone)]
pub struct Select<'a> {
    pub name: &'a str,
    /// `(value, label)` pairs
    pub options: Vec<(&'a str, &'a str)>,
    pub selected: Option<&'a str>,
    /// Submit the enclosing form when the selection changes.
    pub auto_submit: bool,
}

impl<'a> Select<'a> {
    #[must_use]
    pub fn new(name: &'a str, options: Vec<(&'a str, &'a str)>) -> Self {
        Self {
            name,
            options,
            selected: None,
            auto_submit: false,
        }
    }

    #[must_use]
    pub fn selected(mut self, selected: Option<&'a str>) -> Self {
        self.selected = selected;
        self
    }

    #[must_use]
    pub fn auto_submit(mut self) -> Self {
        self.auto_submit = true;
        self
    }
}

impl Render for Select<'_> {
    fn render(&self) -> Markup {
        html! {
            select
                name=(self.name)
                id=(self.name)
                onchange=[self.auto_submit.then_some("this.form.submit()")]
            {
                @for (value, label) in &self.options {
                    option value=(value) selected[self.selected == Some(*value)] { (label) }
                }
            }
        }
    }
}

/// A labeled form field.
#[derive(Debug)]
pub struct Field<'a> {
    pub label: &'a str,
    pub r#for: &'a str,
    pub control: Markup,
}

impl<'a> Field<'a> {
    #[must_use]
    pub fn new(label: &'a str, r#for: &'a str, control: Markup) -> Self {
        Self {
            label,
            r#for,
            control,
        }
    }
}

impl Render for Field<'_> {
    fn render(&self) -> Markup {
        html! {
            p {
                label for=(self.r#for) { (self.label) }
                br;
                (self.control)
            }
        }
    }
}
