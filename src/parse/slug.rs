use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// Decomposes the text, drops the combining marks left behind, and lowercases what remains.
fn fold(text: &str) -> impl Iterator<Item = char> + '_ {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
}

/// Turns arbitrary text into a filename-safe slug: accents are stripped, everything is
/// lowercased, and each run of non-alphanumeric characters becomes a single hyphen. There are
/// never leading or trailing hyphens.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;
    for c in fold(text) {
        if c.is_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

/// Turns a tag into a filename keyword. This is the same as [`slugify`], except that
/// non-alphanumeric characters are removed outright, since keywords are joined with
/// underscores.
pub fn keywordize(tag: &str) -> String {
    fold(tag).filter(|c| c.is_alphanumeric()).collect()
}
