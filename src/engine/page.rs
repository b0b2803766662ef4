//! Page representation

use crate::renderer::{FieldId, InstructionList, SimplifiedPage};
use url::Url;

/// A fully simplified page, ready for layout
#[derive(Debug, Clone)]
pub struct Page {
    /// Address the page was served from
    url: Url,
    title: Option<String>,
    instructions: InstructionList,
    /// Current text of each form field, indexed by [`FieldId`]
    field_values: Vec<String>,
}

impl Page {
    /// Create a page; fields start with their `value` attribute
    pub fn new(url: Url, simplified: SimplifiedPage) -> Self {
        let field_values = simplified
            .instructions
            .fields()
            .iter()
            .map(|field| field.initial_value.clone())
            .collect();
        Self {
            url,
            title: simplified.title,
            instructions: simplified.instructions,
            field_values,
        }
    }

    /// Get the page URL
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn instructions(&self) -> &InstructionList {
        &self.instructions
    }

    pub fn field_values(&self) -> &[String] {
        &self.field_values
    }

    pub fn field_value(&self, id: FieldId) -> &str {
        self.field_values
            .get(id.index())
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn field_value_mut(&mut self, id: FieldId) -> Option<&mut String> {
        self.field_values.get_mut(id.index())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{FormDescriptor, FormField};

    #[test]
    fn test_fields_start_with_initial_value() {
        let mut instructions = InstructionList::new();
        let form = instructions.add_form(FormDescriptor::default());
        let field = instructions.push_field(FormField {
            name: "q".into(),
            form,
            initial_value: "preset".into(),
        });
        let mut page = Page::new(
            Url::parse("https://x.test/").unwrap(),
            SimplifiedPage {
                title: Some("T".into()),
                instructions,
            },
        );
        assert_eq!(page.field_value(field), "preset");
        assert_eq!(page.title(), Some("T"));

        page.field_value_mut(field).unwrap().push('!');
        assert_eq!(page.field_value(field), "preset!");
    }
}
