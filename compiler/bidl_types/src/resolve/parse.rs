//! Recursive-descent split of a generic reference.
//!
//! Input is already stripped of whitespace. Only the outer level is split
//! here; nested arguments are handed back to `Registry::resolve` whole.

use smallvec::SmallVec;

use super::ResolveError;

/// Deepest accepted generic nesting; `List<List<String>>` is depth 2.
pub(crate) const MAX_NESTING: usize = 32;

/// `base<arg,arg>` split at the outer level.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct GenericRef<'a> {
    pub base: &'a str,
    pub args: SmallVec<[&'a str; 2]>,
}

/// Split `base<args>` into its base name and top-level arguments.
pub fn parse_generic(text: &str) -> Result<GenericRef<'_>, ResolveError> {
    let malformed = || ResolveError::Malformed(text.to_string());

    let (base, rest) = text.split_once('<').ok_or_else(malformed)?;
    if base.is_empty() {
        return Err(malformed());
    }
    let inner = rest.strip_suffix('>').ok_or_else(malformed)?;
    let args = split_top_level(inner).ok_or_else(malformed)?;
    Ok(GenericRef { base, args })
}

/// Split on commas at bracket depth zero. `None` on unbalanced brackets, an
/// empty argument, or nesting deeper than `MAX_NESTING`.
fn split_top_level(inner: &str) -> Option<SmallVec<[&str; 2]>> {
    let mut args = SmallVec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, c) in inner.char_indices() {
        match c {
            '<' => {
                depth += 1;
                // The outer brackets were already stripped.
                if depth >= MAX_NESTING {
                    return None;
                }
            }
            '>' => depth = depth.checked_sub(1)?,
            ',' if depth == 0 => {
                args.push(non_empty(&inner[start..i])?);
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return None;
    }
    args.push(non_empty(&inner[start..])?);
    Some(args)
}

fn non_empty(arg: &str) -> Option<&str> {
    (!arg.is_empty()).then_some(arg)
}
