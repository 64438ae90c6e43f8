//! Snake-case transform for event names.

use std::sync::OnceLock;

use regex::Regex;

static ACRONYM: OnceLock<Regex> = OnceLock::new();
static CAMEL: OnceLock<Regex> = OnceLock::new();

fn acronym() -> &'static Regex {
    ACRONYM.get_or_init(|| Regex::new(r"([A-Z\d]+)([A-Z][a-z])").expect("valid regex"))
}

fn camel() -> &'static Regex {
    CAMEL.get_or_init(|| Regex::new(r"([a-z\d])([A-Z])").expect("valid regex"))
}

/// Converts a CamelCase name to snake_case.
///
/// `::` namespace separators become `/` and dashes become underscores.
///
/// ```
/// use herald_subscriber::underscore;
///
/// assert_eq!(underscore("UserPromoted"), "user_promoted");
/// assert_eq!(underscore("HTTPRequestFailed"), "http_request_failed");
/// assert_eq!(underscore("Billing::InvoicePaid"), "billing/invoice_paid");
/// ```
pub fn underscore(name: &str) -> String {
    let word = name.replace("::", "/");
    let word = acronym().replace_all(&word, "${1}_${2}");
    let word = camel().replace_all(&word, "${1}_${2}");
    word.replace('-', "_").to_lowercase()
}
