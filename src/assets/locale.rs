//! Localized resource lookup.
//!
//! Candidates are tried from most to least specific; the first hit wins:
//!
//! 1. exact key and exact locale
//! 2. for a regional request (`en-US`), the bare language (`en`)
//! 3. for a regional request, any regional variant of the language (`en-GB`)
//! 4. for a bare-language request (`en`), any regional variant (`en-GB`)
//! 5. the generic, locale-less resource
//! 6. any resource with the key, whatever its locale
//!
//! Keys and locales compare case-insensitively.

use crate::assets::resource::Resource;

const SEPARATORS: [char; 2] = ['-', '_'];

/// Split a locale tag into `(language, has_region)`.
pub(crate) fn split_locale(locale: &str) -> (&str, bool) {
    match locale.split_once(SEPARATORS) {
        Some((lang, region)) => (lang, !region.is_empty()),
        None => (locale, false),
    }
}

fn is_language_variant(candidate: &str, lang: &str) -> bool {
    candidate.len() > lang.len()
        && candidate.is_char_boundary(lang.len())
        && candidate[..lang.len()].eq_ignore_ascii_case(lang)
        && candidate[lang.len()..].starts_with(SEPARATORS)
}

/// Index of the best resource for `key` under `locale`, following the fallback chain above.
pub fn find_best_resource(
    resources: &[Resource],
    key: &str,
    locale: Option<&str>,
) -> Option<usize> {
    let key = key.trim();

    if let Some(locale) = locale.map(str::trim).filter(|l| !l.is_empty()) {
        let exact = first_match(resources, key, |l| {
            l.is_some_and(|l| l.eq_ignore_ascii_case(locale))
        });
        if exact.is_some() {
            return exact;
        }

        let (lang, has_region) = split_locale(locale);
        if has_region {
            let bare = first_match(resources, key, |l| {
                l.is_some_and(|l| l.eq_ignore_ascii_case(lang))
            });
            if bare.is_some() {
                return bare;
            }
        }

        // Steps 3 and 4 share the prefix rule; only the shape of the request differs.
        let variant = first_match(resources, key, |l| {
            l.is_some_and(|l| is_language_variant(l, lang))
        });
        if variant.is_some() {
            return variant;
        }
    }

    first_match(resources, key, |l| l.is_none())
        .or_else(|| first_match(resources, key, |_| true))
}

fn first_match(
    resources: &[Resource],
    key: &str,
    locale_pred: impl Fn(Option<&str>) -> bool,
) -> Option<usize> {
    resources
        .iter()
        .position(|r| r.key().eq_ignore_ascii_case(key) && locale_pred(r.locale()))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/locale.rs"]
mod tests;
