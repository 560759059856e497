//! Free-text name and address heuristics.
//!
//! These reproduce the observed behavior of the upstream directory pages,
//! quirks included. Both parsers are total: whatever the input, they return
//! a value with empty strings for anything they could not place.

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedName {
    pub title: String,
    pub forename: String,
    pub surname: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedAddress {
    pub street: String,
    pub city: String,
    pub postcode: String,
}

/// Splits a raw heading like `"Jane R Doe  MD"` or `"Doe, MD"`.
///
/// A double space separates name from title on most pages; failing that, the
/// last comma does. With neither separator the whole string is kept as the
/// forename rather than guessed at.
pub fn parse_name(raw: &str) -> ParsedName {
    if raw.contains("  ") {
        let cleaned = raw.replace(',', " ");
        let mut segments = cleaned.split("  ");

        let name_part = segments.next().unwrap_or("");
        let title = segments.next().unwrap_or("").trim().to_string();
        let (forename, surname) = split_name_tokens(name_part);

        ParsedName {
            title,
            forename,
            surname,
        }
    } else if let Some((name_part, title)) = raw.rsplit_once(',') {
        let (forename, surname) = split_name_tokens(name_part);

        ParsedName {
            title: title.trim().to_string(),
            forename,
            surname,
        }
    } else {
        ParsedName {
            title: String::new(),
            forename: raw.to_string(),
            surname: String::new(),
        }
    }
}

/// Last token is the surname, the rest is the forename.
fn split_name_tokens(part: &str) -> (String, String) {
    let tokens: Vec<&str> = part.split_whitespace().collect();

    match tokens.as_slice() {
        [] => (String::new(), String::new()),
        [only] => (String::new(), (*only).to_string()),
        [rest @ .., last] => (rest.join(" "), (*last).to_string()),
    }
}

/// Splits a practice address into street, city and postcode.
///
/// Two shapes are recognized: newline-delimited (`street \n city, state zip`)
/// and single-line with a trailing `, state zip`. Everything else parses to
/// empty fields. Fields extracted before a malformed tail are kept.
pub fn parse_address(raw: &str) -> ParsedAddress {
    let mut parsed = ParsedAddress::default();

    if raw.contains('\n') {
        let mut lines = raw.split('\n');
        parsed.street = lines.next().unwrap_or("").trim().to_string();

        if let Some(second) = lines.next() {
            let mut parts = second.split(',');
            parsed.city = parts.next().unwrap_or("").trim().to_string();

            match parts.next().and_then(second_token) {
                Some(postcode) => parsed.postcode = postcode,
                None => log::debug!("No postcode in address line: {second:?}"),
            }
        }
    } else if let Some((prefix, suffix)) = raw.rsplit_once(',') {
        match second_token(suffix) {
            Some(postcode) => {
                parsed.postcode = postcode;

                // Street and city share one line; the last gap splits them.
                if let Some(i) = prefix.rfind(|c: char| c == ' ' || c == '\n') {
                    parsed.street = prefix[..i].trim().to_string();
                    parsed.city = prefix[i..].trim().to_string();
                }
            }
            None => log::debug!("No postcode after last comma: {raw:?}"),
        }
    } else if !raw.is_empty() {
        log::debug!("Unrecognized address shape: {raw:?}");
    }

    parsed
}

fn second_token(fragment: &str) -> Option<String> {
    fragment.split_whitespace().nth(1).map(str::to_string)
}
