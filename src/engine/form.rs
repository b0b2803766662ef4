//! Form submission: one named field becomes a GET query or a POST body

use crate::network::{Request, address};
use crate::renderer::{FieldId, FormMethod, InstructionList};
use crate::utils::Result;
use url::Url;
use url::form_urlencoded;

pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Build the request that submits `field` with `value`.
///
/// The form's action is resolved against `page_url`; a form without an
/// action submits back to the page itself.
pub fn submission(
    list: &InstructionList,
    field: FieldId,
    value: &str,
    page_url: &Url,
) -> Result<Request> {
    let name = &list.field(field).name;
    let form = list.form_of(field);
    let mut target = match form.action.as_deref().map(str::trim) {
        Some(action) if !action.is_empty() => address::resolve(Some(page_url), action)?,
        _ => page_url.clone(),
    };
    target.set_fragment(None);

    let request = match form.method {
        FormMethod::Get => {
            target.query_pairs_mut().clear().append_pair(name, value);
            Request::get(target)
        }
        FormMethod::Post => {
            let body = form_urlencoded::Serializer::new(String::new())
                .append_pair(name, value)
                .finish();
            Request::post(target)
                .header("Content-Type", FORM_CONTENT_TYPE)
                .body(body.into_bytes())
        }
    };
    log::info!(
        "Submitting field {name:?} via {:?} to {}",
        request.method(),
        request.url()
    );
    Ok(request)
}
