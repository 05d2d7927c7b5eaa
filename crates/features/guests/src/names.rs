//! Display names derived from e-mail addresses.

/// Upper-cases the first character, leaving the rest untouched.
#[must_use]
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| first.to_uppercase().chain(chars).collect())
}

/// `jane.doe@example.com` becomes `Jane.doe`.
#[must_use]
pub fn account_name(email: &str) -> String {
    capitalize(email.split('@').next().unwrap_or_default())
}

/// `jane@doe.com` becomes `Jane Doe`; names without `@` are left alone (`None`).
#[must_use]
pub fn guest_name(name: &str) -> Option<String> {
    if !name.contains('@') {
        return None;
    }
    let mut parts = name.split('@');
    let first = parts.next().unwrap_or_default();
    let last = parts.next().unwrap_or_default().split('.').next().unwrap_or_default();
    Some(format!("{} {}", capitalize(first), capitalize(last)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn examples() {
        assert_eq!(account_name("jane@doe.com"), "Jane");
        assert_eq!(guest_name("jane@doe.com").as_deref(), Some("Jane Doe"));
        assert_eq!(guest_name("matti@mail.example.fi").as_deref(), Some("Matti Mail"));
        assert_eq!(guest_name("Jane Doe"), None);
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("ä"), "Ä");
    }

    proptest! {
        #[test]
        fn renamed_guests_lose_the_at_sign(local in "[a-z]{1,12}", domain in "[a-z]{1,12}", tld in "[a-z]{2,3}") {
            let renamed = guest_name(&format!("{local}@{domain}.{tld}")).unwrap();
            prop_assert!(!renamed.contains('@'));
            prop_assert_eq!(renamed, format!("{} {}", capitalize(&local), capitalize(&domain)));
        }

        #[test]
        fn names_without_at_are_untouched(name in "[A-Za-z ]{0,24}") {
            prop_assert_eq!(guest_name(&name), None);
        }

        #[test]
        fn capitalize_is_idempotent(word in "[a-zA-Zäöå ]{0,16}") {
            let once = capitalize(&word);
            prop_assert_eq!(capitalize(&once), once.clone());
        }
    }
}
