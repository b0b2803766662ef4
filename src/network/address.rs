//! Address normalisation and relative URL resolution

use crate::utils::{NetworkError, Result};
use url::{ParseError, Url};

/// Resolve `target` against the page it appears on.
///
/// Absolute targets are returned as-is; relative ones follow the usual
/// scheme/host/path merge rules. Without a base, the target must be
/// absolute.
pub fn resolve(base: Option<&Url>, target: &str) -> Result<Url> {
    let target = target.trim();
    let resolved = match base {
        Some(base) => base.join(target),
        None => Url::parse(target),
    };
    resolved.map_err(|e| invalid(target, e))
}

/// Turn a typed address into an absolute URL, assuming `https://` when
/// no scheme is given
pub fn normalize_typed(input: &str) -> Result<Url> {
    let input = input.trim();
    match Url::parse(input) {
        Ok(url) => Ok(url),
        Err(ParseError::RelativeUrlWithoutBase) => {
            Url::parse(&format!("https://{input}")).map_err(|e| invalid(input, e))
        }
        Err(e) => Err(invalid(input, e)),
    }
}

fn invalid(target: &str, err: ParseError) -> crate::WispError {
    NetworkError::InvalidUrl {
        url: target.to_string(),
        reason: err.to_string(),
    }
    .into()
}
