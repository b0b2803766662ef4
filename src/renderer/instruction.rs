//! Flat rendering instructions produced by simplification
//!
//! Forms and form fields live in arenas owned by the list; instructions
//! refer to them by index so the whole page is dropped in one piece.

use super::bitmap::Bitmap;

/// Font style toggled by a `StyleBegin`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleKind {
    Bold,
    Italic,
}

/// Index of a form descriptor inside its list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FormId(usize);

/// Index of a form field inside its list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldId(usize);

impl FieldId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Submission method of a form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormMethod {
    #[default]
    Get,
    Post,
}

impl FormMethod {
    /// Interpret a `method` attribute: absent or starting with `g` is GET
    pub fn from_attribute(method: Option<&str>) -> Self {
        match method.and_then(|m| m.chars().next()) {
            None => Self::Get,
            Some(c) if c.eq_ignore_ascii_case(&'g') => Self::Get,
            Some(_) => Self::Post,
        }
    }
}

/// Captured `<form>` attributes, shared by every field of that form
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormDescriptor {
    pub name: Option<String>,
    /// Unresolved `action` attribute; `None` submits to the current page
    pub action: Option<String>,
    pub method: FormMethod,
}

/// A text-entry field bound to a form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: String,
    pub form: FormId,
    pub initial_value: String,
}

/// One rendering directive
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    Text(String),
    Image(Bitmap),
    StyleBegin(StyleKind),
    StyleEnd,
    Separator,
    HyperlinkBegin(String),
    HyperlinkEnd,
    FormField(FieldId),
}

/// Ordered instructions of one page plus the forms they reference
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstructionList {
    instructions: Vec<Instruction>,
    forms: Vec<FormDescriptor>,
    fields: Vec<FormField>,
}

impl InstructionList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    /// Register a form and return its handle
    pub fn add_form(&mut self, form: FormDescriptor) -> FormId {
        self.forms.push(form);
        FormId(self.forms.len() - 1)
    }

    /// Register a field and emit the instruction that places it
    pub fn push_field(&mut self, field: FormField) -> FieldId {
        self.fields.push(field);
        let id = FieldId(self.fields.len() - 1);
        self.instructions.push(Instruction::FormField(id));
        id
    }

    pub fn form(&self, id: FormId) -> &FormDescriptor {
        &self.forms[id.0]
    }

    pub fn field(&self, id: FieldId) -> &FormField {
        &self.fields[id.0]
    }

    /// Form of a field, in one step
    pub fn form_of(&self, id: FieldId) -> &FormDescriptor {
        self.form(self.field(id).form)
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Instruction> {
        self.instructions.iter()
    }

    pub fn as_slice(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Continue this list with `tail`, re-basing the tail's form and
    /// field handles onto this list's arenas
    pub fn append(&mut self, tail: InstructionList) {
        let form_base = self.forms.len();
        let field_base = self.fields.len();
        self.forms.extend(tail.forms);
        self.fields.extend(tail.fields.into_iter().map(|mut field| {
            field.form = FormId(field.form.0 + form_base);
            field
        }));
        self.instructions
            .extend(tail.instructions.into_iter().map(|instruction| match instruction {
                Instruction::FormField(id) => Instruction::FormField(FieldId(id.0 + field_base)),
                other => other,
            }));
    }

    /// Every `StyleBegin` closes with a `StyleEnd` and every
    /// `HyperlinkBegin` with a `HyperlinkEnd`, properly nested
    pub fn is_balanced(&self) -> bool {
        let mut styles = 0usize;
        let mut in_link = false;
        for instruction in &self.instructions {
            match instruction {
                Instruction::StyleBegin(_) => styles += 1,
                Instruction::StyleEnd => {
                    if styles == 0 {
                        return false;
                    }
                    styles -= 1;
                }
                Instruction::HyperlinkBegin(_) => {
                    if in_link {
                        return false;
                    }
                    in_link = true;
                }
                Instruction::HyperlinkEnd => {
                    if !in_link {
                        return false;
                    }
                    in_link = false;
                }
                _ => {}
            }
        }
        styles == 0 && !in_link
    }
}

impl<'a> IntoIterator for &'a InstructionList {
    type Item = &'a Instruction;
    type IntoIter = std::slice::Iter<'a, Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
