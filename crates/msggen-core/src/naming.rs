//! Naming conventions for generated identifiers.
//!
//! | Input | Function | Output |
//! |-------|----------|--------|
//! | `sequenceNr` | [`title_case`] | `Sequencenr` |
//! | `sequenceNr` | [`internal_name`] | `mSequencenr` |
//! | `Msg_Param` | [`enum_tag`] | `Msg_Param_e` |
//! | `Msg_Param` | [`header_guard`] | `MSG_PARAM_H_` |

/// Title-case every alphabetic run: first letter upper, the rest lower.
///
/// Any non-letter starts a new run, so digits and underscores split words.
///
/// # Examples
///
/// ```
/// use msggen_core::naming::title_case;
///
/// assert_eq!(title_case("payload"), "Payload");
/// assert_eq!(title_case("sequenceNr"), "Sequencenr");
/// assert_eq!(title_case("last_in_seq"), "Last_In_Seq");
/// ```
pub fn title_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut in_word = false;

    for c in s.chars() {
        if c.is_alphabetic() {
            if in_word {
                result.extend(c.to_lowercase());
            } else {
                result.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            result.push(c);
            in_word = false;
        }
    }

    result
}

/// Member identifier used inside generated records and classes.
pub fn internal_name(field: &str) -> String {
    format!("m{}", title_case(field))
}

/// Stem used for `get<Stem>` / `set<Stem>` accessors.
pub fn accessor_stem(field: &str) -> String {
    title_case(field)
}

/// Enumerator name of a message, address or domain.
pub fn enum_tag(name: &str) -> String {
    format!("{name}_e")
}

/// Include guard for a generated header.
pub fn header_guard(name: &str) -> String {
    let mut guard: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();
    guard.push_str("_H_");
    guard
}

/// C/C++ identifier check: ASCII letter or underscore, then alphanumerics.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}
