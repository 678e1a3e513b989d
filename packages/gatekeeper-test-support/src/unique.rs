use ulid::Ulid;

/// Unique subject identifier, e.g. `member-01HV...`.
///
/// ```
/// use gatekeeper_test_support::unique_sub;
///
/// assert_ne!(unique_sub("member"), unique_sub("member"));
/// assert!(unique_sub("admin").starts_with("admin-"));
/// ```
pub fn unique_sub(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new())
}

/// Unique address under the reserved `example.test` domain.
///
/// ```
/// use gatekeeper_test_support::unique_email;
///
/// assert!(unique_email("mod").ends_with("@example.test"));
/// ```
pub fn unique_email(prefix: &str) -> String {
    format!("{}-{}@example.test", prefix, Ulid::new().to_string().to_lowercase())
}
