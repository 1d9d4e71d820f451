//! `%(name)s` value substitution.
//!
//! A value may reference another key of the same section (or `DEFAULT`) with
//! `%(name)s`. `%%` produces a literal `%`. Referenced values are expanded
//! recursively up to [`MAX_DEPTH`] levels.

use crate::error::AppstrapError;

pub const MAX_DEPTH: usize = 10;

/// Expand `raw`, the value of `key` in `section`.
///
/// `lookup` resolves a (lowercased) reference to its raw value, or `None` if
/// it is not visible in the section.
pub fn interpolate<'a, F>(
    section: &str,
    key: &str,
    raw: &str,
    lookup: F,
) -> Result<String, AppstrapError>
where
    F: Fn(&str) -> Option<&'a str>,
{
    let mut out = String::with_capacity(raw.len());
    expand(section, key, raw, &lookup, 1, &mut out)?;
    Ok(out)
}

fn expand<'a, F>(
    section: &str,
    key: &str,
    mut rest: &str,
    lookup: &F,
    depth: usize,
    out: &mut String,
) -> Result<(), AppstrapError>
where
    F: Fn(&str) -> Option<&'a str>,
{
    if depth > MAX_DEPTH {
        return Err(AppstrapError::InterpolationDepth {
            section: section.into(),
            key: key.into(),
        });
    }

    let syntax = |reason: String| AppstrapError::InterpolationSyntax {
        section: section.into(),
        key: key.into(),
        reason,
    };

    while let Some(p) = rest.find('%') {
        out.push_str(&rest[..p]);
        rest = &rest[p..];

        if let Some(after) = rest.strip_prefix("%%") {
            out.push('%');
            rest = after;
        } else if let Some(after) = rest.strip_prefix("%(") {
            let Some(close) = after.find(")s") else {
                return Err(syntax(format!("bad interpolation variable reference {rest:?}")));
            };
            let name = &after[..close];
            if name.is_empty() || name.contains(')') {
                return Err(syntax(format!("bad interpolation variable reference {rest:?}")));
            }
            let reference = name.to_lowercase();
            let value = lookup(&reference).ok_or_else(|| AppstrapError::InterpolationMissing {
                section: section.into(),
                key: key.into(),
                reference: reference.clone(),
            })?;
            if value.contains('%') {
                expand(section, key, value, lookup, depth + 1, out)?;
            } else {
                out.push_str(value);
            }
            rest = &after[close + 2..];
        } else {
            return Err(syntax(format!("'%' must be followed by '%' or '(', found: {rest:?}")));
        }
    }

    out.push_str(rest);
    Ok(())
}
