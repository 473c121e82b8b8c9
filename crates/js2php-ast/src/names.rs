//! Name transforms used when mapping module references to PHP namespaces.

/// Turns a module path or identifier into a PHP class-style name: the last
/// path segment is split on non-alphanumeric separators and each part is
/// upper-cased at the first letter. `./lib/math-utils` becomes `MathUtils`.
pub fn classize(name: &str) -> String {
    let last = name
        .rsplit('/')
        .next()
        .unwrap_or(name);
    let mut out = String::with_capacity(last.len());
    let mut start_of_part = true;
    for ch in last.chars() {
        if ch.is_alphanumeric() {
            if start_of_part {
                out.extend(ch.to_uppercase());
                start_of_part = false;
            } else {
                out.push(ch);
            }
        } else {
            start_of_part = true;
        }
    }
    out
}

/// True when the character begins an uppercase word, the convention this
/// translator uses to treat a name as a class/static reference.
pub fn starts_uppercase(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classize_simple() {
        assert_eq!(classize("fs"), "Fs");
        assert_eq!(classize("saviour"), "Saviour");
    }

    #[test]
    fn classize_separators() {
        assert_eq!(classize("math-utils"), "MathUtils");
        assert_eq!(classize("foo_bar.baz"), "FooBarBaz");
    }

    #[test]
    fn classize_takes_last_path_segment() {
        assert_eq!(classize("churchill/lib/saviour"), "Saviour");
        assert_eq!(classize("./lib/math-utils"), "MathUtils");
    }

    #[test]
    fn classize_keeps_existing_casing_after_first_letter() {
        assert_eq!(classize("myModule"), "MyModule");
        assert_eq!(classize("PI"), "PI");
    }

    #[test]
    fn starts_uppercase_ascii_only() {
        assert!(starts_uppercase("Math"));
        assert!(!starts_uppercase("math"));
        assert!(!starts_uppercase(""));
        assert!(!starts_uppercase("_Private"));
    }
}
