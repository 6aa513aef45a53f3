//! `${VAR}` and `${VAR:-default}` expansion for string config values.

/// Name of an environment variable that was referenced but not set.
#[derive(Debug)]
pub(crate) struct MissingVar(pub String);

/// Expand environment references in `value`.
///
/// - `${VAR}` expands to the value of `VAR`, failing when unset
/// - `${VAR:-default}` expands to `VAR` when set, otherwise `default`
///
/// Text outside `${...}` passes through unchanged, as does a `${` without a
/// closing brace.
pub(crate) fn expand(value: &str) -> Result<String, MissingVar> {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            out.push_str(&rest[start..]);
            return Ok(out);
        };

        let body = &after[..end];
        let (name, default) = match body.split_once(":-") {
            Some((name, default)) => (name, Some(default)),
            None => (body, None),
        };
        match std::env::var(name) {
            Ok(val) => out.push_str(&val),
            Err(_) => match default {
                Some(default) => out.push_str(default),
                None => return Err(MissingVar(name.to_owned())),
            },
        }

        rest = &after[end + 1..];
    }

    out.push_str(rest);
    Ok(out)
}
