//! Display names for currency codes.

const CURRENCIES: &[(&str, &str)] = &[
    ("AED", "UAE Dirham"),
    ("AUD", "Australian Dollar"),
    ("BND", "Brunei Dollar"),
    ("CAD", "Canadian Dollar"),
    ("CHF", "Swiss Franc"),
    ("CNY", "Chinese Yuan"),
    ("EUR", "Euro"),
    ("GBP", "British Pound"),
    ("HKD", "Hong Kong Dollar"),
    ("IDR", "Indonesian Rupiah"),
    ("INR", "Indian Rupee"),
    ("JPY", "Japanese Yen"),
    ("KRW", "South Korean Won"),
    ("MOP", "Macanese Pataca"),
    ("MYR", "Malaysian Ringgit"),
    ("NZD", "New Zealand Dollar"),
    ("PHP", "Philippine Peso"),
    ("SAR", "Saudi Riyal"),
    ("SGD", "Singapore Dollar"),
    ("THB", "Thai Baht"),
    ("TWD", "New Taiwan Dollar"),
    ("USD", "US Dollar"),
    ("VND", "Vietnamese Dong"),
];

/// Upper-case and trim a currency code.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

/// Human name for a code; unknown codes fall back to the normalized code.
pub fn currency_name(code: &str) -> String {
    let code = normalize_code(code);
    CURRENCIES
        .binary_search_by_key(&code.as_str(), |&(c, _)| c)
        .map(|i| CURRENCIES[i].1.to_owned())
        .unwrap_or(code)
}
